//! Shared types for asset-hub transactions

use crate::error::{Result, WasmAssetHubError};
use serde::{Deserialize, Serialize};
use subxt_core::metadata::Metadata;

/// Chain material metadata required for transaction encoding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// Chain genesis hash (e.g., "0x68d56f15f85d3136...")
    pub genesis_hash: String,
    /// Chain name (e.g., "Polkadot Asset Hub")
    pub chain_name: String,
    /// Runtime spec name (e.g., "statemint", "asset-hub-paseo")
    pub spec_name: String,
    /// Runtime spec version
    pub spec_version: u32,
    /// Transaction format version
    pub tx_version: u32,
    /// Runtime metadata bytes (hex encoded)
    pub metadata: String,
}

impl Material {
    /// Decode the hex-encoded runtime metadata
    pub fn decode_metadata(&self) -> Result<Metadata> {
        let hex_str = self.metadata.strip_prefix("0x").unwrap_or(&self.metadata);
        let bytes = hex::decode(hex_str)?;
        subxt_core::metadata::decode_from(&bytes).map_err(WasmAssetHubError::from)
    }
}

/// Validity window for mortal transactions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validity {
    /// Block number when transaction becomes valid
    pub first_valid: u32,
    /// Maximum duration in blocks (default: 2400, ~4 hours)
    #[serde(default = "default_max_duration")]
    pub max_duration: u32,
}

fn default_max_duration() -> u32 {
    2400
}

impl Default for Validity {
    fn default() -> Self {
        Self {
            first_valid: 0,
            max_duration: default_max_duration(),
        }
    }
}

impl Validity {
    /// Era covering this validity window; a zero duration is immortal
    pub fn era(&self) -> Era {
        if self.max_duration == 0 {
            Era::Immortal
        } else {
            let period = self.max_duration.next_power_of_two().clamp(4, 65536);
            let phase = self.first_valid % period;
            Era::Mortal { period, phase }
        }
    }
}

/// Transaction era (mortal or immortal)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Era {
    /// Immortal transaction (never expires)
    Immortal,
    /// Mortal transaction with period and phase
    Mortal { period: u32, phase: u32 },
}

impl Era {
    /// Check if this is an immortal era
    pub fn is_immortal(&self) -> bool {
        matches!(self, Era::Immortal)
    }
}

/// SS58 address format prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AddressFormat {
    /// Polkadot and Paseo (prefix 0, addresses start with '1')
    Polkadot,
    /// Kusama (prefix 2)
    Kusama,
    /// Substrate generic (prefix 42, addresses start with '5')
    Substrate,
}

impl AddressFormat {
    /// Get the prefix value
    pub fn prefix(self) -> u16 {
        match self {
            AddressFormat::Polkadot => 0,
            AddressFormat::Kusama => 2,
            AddressFormat::Substrate => 42,
        }
    }

    /// Get format from a decoded prefix
    pub fn from_prefix(prefix: u16) -> Self {
        match prefix {
            0 => AddressFormat::Polkadot,
            2 => AddressFormat::Kusama,
            _ => AddressFormat::Substrate,
        }
    }
}

/// A target network. Owned by the caller; the connection itself is
/// managed by a [`crate::client::ChainConnector`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    /// Short key (e.g., "ahpas")
    pub key: String,
    /// Human-readable name
    pub name: String,
    /// RPC endpoint
    pub endpoint: String,
    /// Address encoding used on this chain
    pub address_format: AddressFormat,
}

impl Chain {
    pub fn new(key: &str, name: &str, endpoint: &str, address_format: AddressFormat) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            endpoint: endpoint.to_string(),
            address_format,
        }
    }

    pub fn paseo_asset_hub() -> Self {
        Chain::new(
            "ahpas",
            "Paseo Asset Hub",
            "wss://asset-hub-paseo-rpc.dwellir.com",
            AddressFormat::Polkadot,
        )
    }

    pub fn polkadot_asset_hub() -> Self {
        Chain::new(
            "ahdot",
            "Polkadot Asset Hub",
            "wss://polkadot-asset-hub-rpc.polkadot.io",
            AddressFormat::Polkadot,
        )
    }

    pub fn kusama_asset_hub() -> Self {
        Chain::new(
            "ahksm",
            "Kusama Asset Hub",
            "wss://kusama-asset-hub-rpc.polkadot.io",
            AddressFormat::Kusama,
        )
    }

    /// Resolve one of the known chain keys
    pub fn from_key(key: &str) -> Result<Self> {
        match key.to_lowercase().as_str() {
            "ahpas" => Ok(Chain::paseo_asset_hub()),
            "ahdot" => Ok(Chain::polkadot_asset_hub()),
            "ahksm" => Ok(Chain::kusama_asset_hub()),
            other => Err(WasmAssetHubError::InvalidInput(format!(
                "Unknown chain key: {}",
                other
            ))),
        }
    }
}

impl Default for Chain {
    fn default() -> Self {
        Chain::paseo_asset_hub()
    }
}
