//! Error types for the plugin layer.

use std::fmt;

/// Errors surfaced by plugin lifecycle operations.
///
/// Never constructed on the audio thread: the real-time callback reports
/// problems through status values.
#[derive(Debug, Clone, PartialEq)]
pub enum PluginError {
    /// State serialization/deserialization error.
    StateError(String),
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StateError(msg) => write!(f, "State error: {}", msg),
        }
    }
}

impl std::error::Error for PluginError {}

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;
