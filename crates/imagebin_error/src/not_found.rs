//! Not found error types.

/// A requested resource does not exist.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Not Found: {} at line {} in {}", message, line, file)]
pub struct NotFoundError {
    /// Client-facing description of what was missing
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl NotFoundError {
    /// Create a new NotFoundError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use imagebin_error::NotFoundError;
    ///
    /// let err = NotFoundError::new("Image not found");
    /// assert_eq!(err.message, "Image not found");
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
