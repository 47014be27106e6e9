//! Error types for agent construction and training.

/// Errors surfaced by the agent and its supporting components.
///
/// Every operation in this crate is a single deterministic computation, so
/// errors are never transient and there is no retry path. Numeric failures
/// (NaN/Inf losses) are deliberately *not* represented here; they propagate
/// to the caller inside the returned loss values.
#[derive(Debug)]
pub enum DdpgError {
    /// Structurally malformed training input (wrong temporal extent,
    /// mismatched batch dimensions between trajectory fields).
    InvalidInput(String),
    /// Malformed specs or hyperparameters, or an operation issued in the
    /// wrong agent state. Surfaced immediately at call time.
    Configuration(String),
}

impl std::fmt::Display for DdpgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DdpgError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            DdpgError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for DdpgError {}
