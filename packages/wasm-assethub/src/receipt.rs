//! Finalization results reported by the chain client

use serde::{Deserialize, Serialize};

/// Block a transaction was included in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRef {
    /// Block hash (0x-prefixed hex)
    pub hash: String,
    /// Block number
    pub number: u32,
    /// Index of the extrinsic within the block
    pub index: u32,
}

/// One emitted runtime event, in emission order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub pallet: String,
    pub name: String,
    /// Decoded event fields, shape is event specific
    #[serde(default)]
    pub data: serde_json::Value,
}

impl EventRecord {
    pub fn new(pallet: &str, name: &str) -> Self {
        Self {
            pallet: pallet.to_string(),
            name: name.to_string(),
            data: serde_json::Value::Null,
        }
    }

    pub fn is(&self, pallet: &str, name: &str) -> bool {
        self.pallet == pallet && self.name == name
    }
}

/// What the chain client hands back once a transaction is finalized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedPayload {
    /// False when the extrinsic was included but its dispatch failed
    pub ok: bool,
    /// Runtime error description when `ok` is false
    #[serde(default)]
    pub dispatch_error: Option<String>,
    pub block: BlockRef,
    pub events: Vec<EventRecord>,
    pub tx_hash: String,
}

/// Outcome of a finalized transaction; the caller's single source of truth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    block: BlockRef,
    events: Vec<EventRecord>,
    tx_hash: String,
}

impl TxReceipt {
    pub fn block(&self) -> &BlockRef {
        &self.block
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn tx_hash(&self) -> &str {
        &self.tx_hash
    }

    /// True if `Utility.BatchInterrupted` was emitted (non-atomic batches only)
    pub fn batch_interrupted(&self) -> bool {
        self.events
            .iter()
            .any(|e| e.is("Utility", "BatchInterrupted"))
    }
}

impl From<FinalizedPayload> for TxReceipt {
    fn from(payload: FinalizedPayload) -> Self {
        TxReceipt {
            block: payload.block,
            events: payload.events,
            tx_hash: payload.tx_hash,
        }
    }
}

/// Whatever the client reported before a submission failed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialReceipt {
    #[serde(default)]
    pub block: Option<BlockRef>,
    #[serde(default)]
    pub events: Vec<EventRecord>,
    #[serde(default)]
    pub tx_hash: Option<String>,
}

impl PartialReceipt {
    /// False means the transaction definitely never left this process;
    /// true means it reached the network and its outcome may be unknown.
    pub fn was_broadcast(&self) -> bool {
        self.tx_hash.is_some() || self.block.is_some()
    }
}

impl From<FinalizedPayload> for PartialReceipt {
    fn from(payload: FinalizedPayload) -> Self {
        PartialReceipt {
            block: Some(payload.block),
            events: payload.events,
            tx_hash: Some(payload.tx_hash),
        }
    }
}
