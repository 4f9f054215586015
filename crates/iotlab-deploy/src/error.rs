// crates/iotlab-deploy/src/error.rs

use std::fmt;
use std::io;

/// Errors that can occur while loading node metadata or building a deployment.
///
/// A requested node that cannot be found is not an error: it is logged and
/// reported through `Testbed::unresolved`.
#[derive(Debug)]
pub enum DeployError {
    /// The metadata file (or config file) could not be read.
    Io(io::Error),

    /// The input was not valid JSON or a required field was missing.
    Json(serde_json::Error),

    /// A node's `uid` did not decode to exactly two bytes.
    InvalidUid { node_id: u32, uid: String },

    /// More nodes resolved than deployment ids can number.
    TooManyNodes { count: usize },

    /// A configuration value could not be interpreted.
    InvalidConfig(String),

    /// An error occurred while formatting the output tables.
    FmtError(fmt::Error),
}

impl From<io::Error> for DeployError {
    fn from(e: io::Error) -> Self {
        DeployError::Io(e)
    }
}

impl From<serde_json::Error> for DeployError {
    fn from(e: serde_json::Error) -> Self {
        DeployError::Json(e)
    }
}

impl From<fmt::Error> for DeployError {
    fn from(e: fmt::Error) -> Self {
        DeployError::FmtError(e)
    }
}

impl fmt::Display for DeployError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployError::Io(e) => write!(f, "I/O error: {}", e),
            DeployError::Json(e) => write!(f, "JSON parsing error: {}", e),
            DeployError::InvalidUid { node_id, uid } => write!(
                f,
                "Invalid uid {:?} for node {}: expected 4 hex characters",
                uid, node_id
            ),
            DeployError::TooManyNodes { count } => write!(
                f,
                "Too many nodes: {} resolved, at most {} deployment ids available",
                count,
                u16::MAX
            ),
            DeployError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            DeployError::FmtError(e) => write!(f, "Formatting error: {}", e),
        }
    }
}

impl std::error::Error for DeployError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeployError::Io(e) => Some(e),
            DeployError::Json(e) => Some(e),
            DeployError::FmtError(e) => Some(e),
            _ => None,
        }
    }
}
