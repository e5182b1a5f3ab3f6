#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod order;
pub mod session;

pub use error::FormatError;
pub use order::TraversalOrder;
pub use session::{Progress, ProgressWrite, StudyPhase, StudySession};
