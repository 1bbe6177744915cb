mod progress;
mod result;
mod service;

// Public API of the session subsystem.
pub use progress::SessionProgress;
pub use result::{CategoryResult, SessionResult};
pub use service::AssessmentService;
