//! Result extension trait for logging errors with context.

use std::fmt::Display;
use tracing::error;

/// Adds a `log` method to `Result` that records an `Err` together with the
/// caller's source location.
pub trait ResultExt<T, E> {
    /// Log the error with context if this is an `Err` variant, then return
    /// the `Result` unchanged.
    ///
    /// ```ignore
    /// let config = DatabaseConfig::from_env().log("Loading database configuration")?;
    /// ```
    fn log<S: ToString>(self, context: S) -> Result<T, E>;
}

impl<T, E: Display> ResultExt<T, E> for Result<T, E> {
    #[track_caller]
    fn log<S: ToString>(self, context: S) -> Result<T, E> {
        if let Err(ref e) = self {
            let caller_location = std::panic::Location::caller();
            error!(
                target: "eventboard_api",
                error = %e,
                file = %format!("{}:{}", caller_location.file(), caller_location.line()),
                context = %context.to_string(),
                "Operation failed"
            );
        }
        self
    }
}
