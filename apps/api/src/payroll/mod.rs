// Payroll: per-employee compensation entries and monthly payroll runs.

pub mod calc;
pub mod handlers;
pub mod models;
