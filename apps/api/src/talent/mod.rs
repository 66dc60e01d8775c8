// Candidate tracking: pipeline stages, forward-only transitions, bucketed
// pipeline views and bulk recruiter actions.

pub mod handlers;
pub mod models;
pub mod pipeline;
