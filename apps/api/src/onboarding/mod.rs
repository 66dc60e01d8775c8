// Onboarding wizard: a 20-step linear workflow whose cursor and per-step
// payloads live on an onboarding process record.

pub mod handlers;
pub mod service;
