// Workflow engine: static stage registries, the index-based stage controller,
// and the server-side process record mutated by step endpoints.

pub mod controller;
pub mod process;
pub mod registry;

pub use controller::{StageController, StageCursor};
pub use process::{ProcessKind, ProcessRecord, ProcessStatus, StepStatus};
pub use registry::Stage;
