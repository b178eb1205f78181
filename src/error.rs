//! UI Errors
//!
//! Failures the widgets can report. None of them are fatal to the page.

/// Errors raised by the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiError {
    /// A required element is not present in the page
    MissingElement(String),
    /// Browser storage could not be read or written
    Storage(String),
    /// Embedded configuration is malformed or invalid
    Config(String),
}

impl std::fmt::Display for UiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UiError::MissingElement(id) => write!(f, "Missing element: #{}", id),
            UiError::Storage(msg) => write!(f, "Storage error: {}", msg),
            UiError::Config(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for UiError {}

/// Result type for UI operations
pub type UiResult<T> = Result<T, UiError>;
