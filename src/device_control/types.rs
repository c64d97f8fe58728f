//! Shared types for ECP dispatch. Defines the outcome of action commands and
//! the error values produced by query commands.

/// Outcome of an ECP action command (keypress, launch).
///
/// The device either acknowledged the command with a 2xx status or it did
/// not. Why it did not is logged and then dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    Success,
    Failure,
}

/// Reason an ECP query command did not yield a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The per-call HTTP client could not be created
    Client(String),
    /// Connect, DNS, timeout or reset
    Transport(String),
    /// The device answered with a non-2xx status
    Status(u16, String),
    /// The response body could not be decoded as text
    Body(String),
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::Client(e) => write!(f, "failed to create HTTP client: {}", e),
            QueryError::Transport(e) => write!(f, "request failed: {}", e),
            QueryError::Status(code, reason) if reason.is_empty() => {
                write!(f, "device returned status {}", code)
            }
            QueryError::Status(code, reason) => {
                write!(f, "device returned status {} {}", code, reason)
            }
            QueryError::Body(e) => write!(f, "failed to read response body: {}", e),
        }
    }
}

impl std::error::Error for QueryError {}
