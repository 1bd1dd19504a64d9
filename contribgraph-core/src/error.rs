//! Error taxonomy for graph generation
//!
//! Generation-time failures abort the whole run. View-time tooltip failures
//! have their own type and never convert into [`GraphError`].

use std::path::PathBuf;

/// Source label for data that didn't come from a file
pub const INLINE_SOURCE: &str = "<inline>";

/// Fatal error raised while loading configuration or data, or writing the page
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Missing or invalid configuration value
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Malformed data file or data that fails validation
    #[error("data format error in {source_name}: {message}")]
    DataFormat {
        source_name: String,
        message: String,
    },

    /// Input could not be read or output could not be written
    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GraphError {
    pub fn config(message: impl Into<String>) -> Self {
        GraphError::Config {
            message: message.into(),
        }
    }

    pub fn data(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        GraphError::DataFormat {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GraphError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Two catalog entries declare the same event code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate event code '{code}'")]
pub struct DuplicateCodeError {
    pub code: String,
}

/// Serialized per-day event data could not be interpreted at hover time
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unreadable tooltip payload: {reason}")]
pub struct TooltipParseError {
    pub reason: String,
}
