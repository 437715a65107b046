//! Chain client seam
//!
//! The crate never talks to a node itself. Hosts plug in a connector that
//! opens a session for a [`Chain`] and a client that signs, broadcasts and
//! waits for finalization of one call.

use crate::call::CallDescriptor;
use crate::keyring::Signer;
use crate::receipt::{FinalizedPayload, PartialReceipt};
use crate::types::Chain;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a chain client implementation
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub message: String,
    /// Set when the transaction got far enough to have a hash or block
    pub partial: Option<PartialReceipt>,
}

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        ClientError {
            message: message.into(),
            partial: None,
        }
    }

    pub fn with_partial(mut self, partial: PartialReceipt) -> Self {
        self.partial = Some(partial);
        self
    }
}

/// Opens client sessions. Connections may be shared between submissions;
/// their lifetime belongs to the implementation.
#[async_trait]
pub trait ChainConnector: Send + Sync {
    async fn connect(&self, chain: &Chain) -> Result<Arc<dyn ChainClient>, ClientError>;
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Sign `call` with `signer`, broadcast it and resolve once the
    /// containing block is finalized.
    async fn submit_signed(
        &self,
        call: &CallDescriptor,
        signer: &Signer,
    ) -> Result<FinalizedPayload, ClientError>;

    async fn disconnect(&self) -> Result<(), ClientError>;
}
