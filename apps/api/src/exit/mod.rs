// Exit management: resignation, the follow-up clearance steps, and the exit
// process record they mutate.

pub mod handlers;
pub mod service;
