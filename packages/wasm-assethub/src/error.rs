//! Error types for wasm-assethub

use crate::receipt::PartialReceipt;
use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Main error type for wasm-assethub operations
#[derive(Debug, Clone, Error)]
pub enum WasmAssetHubError {
    /// A required call parameter was absent or zero
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Empty or malformed SS58 address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// A batch must carry at least one call
    #[error("Batch cannot be empty")]
    EmptyBatch,

    /// No seed supplied and no fallback allowed
    #[error("No secret seed supplied")]
    MissingSeed,

    /// No seed resolvable from caller input or configuration
    #[error("No signing credentials available (set PRIVATE_KEY or pass a seed)")]
    MissingCredentials,

    /// Operation deliberately not supported by this crate
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// Transport-level failure before inclusion
    #[error("Submission failed: {reason}")]
    Submission {
        reason: String,
        partial: Option<PartialReceipt>,
    },

    /// Finalization wait abandoned; the transaction may still finalize
    #[error("Timed out after {waited_secs}s waiting for finalization")]
    SubmissionTimeout { waited_secs: u64 },

    /// Batch was included but aborted on-chain
    #[error("Chain execution failed: {reason}")]
    ChainExecution {
        reason: String,
        partial: PartialReceipt,
    },

    /// Seed bytes could not be parsed
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration value absent
    #[error("Missing configuration value: {0}")]
    MissingConfig(&'static str),

    /// Configuration source could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chain state could not be read
    #[error("Query failed: {0}")]
    Query(String),

    /// Call data could not be encoded against runtime metadata
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// SCALE codec decode error
    #[error("SCALE decode error: {0}")]
    ScaleDecodeError(String),
}

impl WasmAssetHubError {
    /// True for errors raised before anything reached the network
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WasmAssetHubError::MissingField(_)
                | WasmAssetHubError::InvalidAddress(_)
                | WasmAssetHubError::EmptyBatch
                | WasmAssetHubError::UnsupportedOperation(_)
                | WasmAssetHubError::InvalidInput(_)
        )
    }

    /// Partial receipt data reported by the chain client, if any
    pub fn partial_receipt(&self) -> Option<&PartialReceipt> {
        match self {
            WasmAssetHubError::Submission { partial, .. } => partial.as_ref(),
            WasmAssetHubError::ChainExecution { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

impl From<parity_scale_codec::Error> for WasmAssetHubError {
    fn from(err: parity_scale_codec::Error) -> Self {
        WasmAssetHubError::ScaleDecodeError(err.to_string())
    }
}

impl From<hex::FromHexError> for WasmAssetHubError {
    fn from(err: hex::FromHexError) -> Self {
        WasmAssetHubError::InvalidInput(format!("Invalid hex: {}", err))
    }
}

impl From<config::ConfigError> for WasmAssetHubError {
    fn from(err: config::ConfigError) -> Self {
        WasmAssetHubError::Config(err.to_string())
    }
}

// REQUIRED: Converts to JS Error with stack trace
impl From<WasmAssetHubError> for JsValue {
    fn from(err: WasmAssetHubError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

pub type Result<T> = std::result::Result<T, WasmAssetHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WasmAssetHubError::MissingField("beneficiary");
        assert_eq!(err.to_string(), "Missing field: beneficiary");
        assert_eq!(
            WasmAssetHubError::EmptyBatch.to_string(),
            "Batch cannot be empty"
        );
    }

    #[test]
    fn test_validation_classification() {
        assert!(WasmAssetHubError::EmptyBatch.is_validation());
        assert!(WasmAssetHubError::InvalidAddress(String::new()).is_validation());
        assert!(!WasmAssetHubError::MissingCredentials.is_validation());
        assert!(!WasmAssetHubError::SubmissionTimeout { waited_secs: 1 }.is_validation());
    }

    #[test]
    fn test_partial_receipt_only_on_network_errors() {
        let partial = PartialReceipt {
            tx_hash: Some("0x01".to_string()),
            ..Default::default()
        };
        let err = WasmAssetHubError::ChainExecution {
            reason: "Module error".to_string(),
            partial: partial.clone(),
        };
        assert_eq!(err.partial_receipt(), Some(&partial));
        assert!(WasmAssetHubError::MissingSeed.partial_receipt().is_none());
    }
}
