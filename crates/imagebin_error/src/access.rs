//! Access control error types.

/// Reasons a request is turned away before reaching a handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum AccessErrorKind {
    /// Origin header absent or not on the allow-list
    #[display("Origin not allowed: {}", _0)]
    OriginRejected(String),
    /// API key header absent
    #[display("Missing API key")]
    MissingApiKey,
    /// API key header does not match the configured secret
    #[display("Invalid API key")]
    InvalidApiKey,
}

/// Access error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Access Error: {} at line {} in {}", kind, line, file)]
pub struct AccessError {
    /// The kind of error that occurred
    pub kind: AccessErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl AccessError {
    /// Create a new access error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AccessErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
