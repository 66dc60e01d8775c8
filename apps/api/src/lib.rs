pub mod client;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod errors;
pub mod events;
pub mod exit;
pub mod onboarding;
pub mod payroll;
pub mod performance;
pub mod routes;
pub mod simulation;
pub mod state;
pub mod store;
pub mod talent;
pub mod workflow;
