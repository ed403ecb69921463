//! Standard pipeline stages.

pub mod logging;
#[cfg(feature = "timeout")]
pub mod timeout;

pub use logging::LoggingStage;
#[cfg(feature = "timeout")]
pub use timeout::TimeoutStage;
