use moneywallet_state::BackendError;
use thiserror::Error;

/// Errors that can occur when working with preferences.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// The backend could not complete the operation
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A daily reminder hour outside `[0, 23]`
    #[error("Invalid daily reminder hour {0}, expected a value between 0 and 23")]
    InvalidReminderHour(i32),
}
