use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while translating nodes and assembling networks.
///
/// Every variant is fatal: the conversion is all-or-nothing and nothing is
/// written when one of these surfaces.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error("Node '{node_id}' uses an unsupported {kind}: '{value}'")]
    UnsupportedTag {
        node_id: String,
        kind: String,
        value: String,
    },

    #[error("Node '{node_id}' ({tag}) has a malformed payload: {message}")]
    MalformedPayload {
        node_id: String,
        tag: String,
        message: String,
    },

    #[error("Duplicate {kind} '{key}' in {scope}")]
    DuplicateKey {
        kind: String,
        key: String,
        scope: String,
    },

    #[error("Raw node id '{node_id}' is referenced more than once by {table} in network '{network}'")]
    DuplicatePinReference {
        node_id: String,
        table: String,
        network: String,
    },

    #[error(
        "Wire {wire_index} ({src_node}:{src_pin} -> {dst_node}:{dst_pin}) in network '{network}' cannot be resolved: {reason}"
    )]
    UnresolvedWire {
        network: String,
        wire_index: usize,
        src_node: String,
        src_pin: usize,
        dst_node: String,
        dst_pin: usize,
        reason: String,
    },
}

impl ConvertError {
    pub(crate) fn malformed(node_id: &str, tag: &str, message: impl Into<String>) -> Self {
        ConvertError::MalformedPayload {
            node_id: node_id.to_string(),
            tag: tag.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(node_id: &str, kind: &str, value: impl Into<String>) -> Self {
        ConvertError::UnsupportedTag {
            node_id: node_id.to_string(),
            kind: kind.to_string(),
            value: value.into(),
        }
    }
}

/// Errors from the load/convert/store shell around the core.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse network document JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Failed to serialize converted document: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}
