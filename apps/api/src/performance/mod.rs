// Performance reviews and the read-time review summary.

pub mod handlers;
pub mod models;
