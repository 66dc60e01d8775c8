// Typed client for the step screens: the per-step action handler, the
// onboarding wizard that drives it, and the fixed-interval record poller.

pub mod action;
pub mod poller;
pub mod transport;
pub mod wizard;

pub use action::{missing_required, submit_step, StepOutcome, StepTarget, NETWORK_ERROR};
pub use poller::{ProcessPoller, DEFAULT_POLL_INTERVAL};
pub use transport::{ApiTransport, HttpTransport, TransportError};
pub use wizard::OnboardingWizard;
