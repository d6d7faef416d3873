pub mod error;
pub mod tolerance;
pub mod traits;
pub mod timestamp;

pub use error::{CurveError, Result};
pub use timestamp::TimeStamp;
pub use tolerance::Tolerance;
