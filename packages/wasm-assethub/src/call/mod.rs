//! Call descriptors for asset-hub pallets
//!
//! Every constructor validates its inputs and never touches the network,
//! so a multi-step intent fails on its first malformed input before
//! anything is signed.

pub mod encode;

use crate::address::Address;
use crate::error::{Result, WasmAssetHubError};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Amount moved by [`transfer_asset`]
pub const DEFAULT_TRANSFER_AMOUNT: u128 = 1;

/// Deserialize u128 from either a number or string
pub(crate) fn deserialize_u128<'de, D>(deserializer: D) -> std::result::Result<u128, D::Error>
where
    D: Deserializer<'de>,
{
    struct U128Visitor;

    impl<'de> de::Visitor<'de> for U128Visitor {
        type Value = u128;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a u128 as number or string")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<u128, E> {
            Ok(value as u128)
        }

        fn visit_u128<E: de::Error>(self, value: u128) -> std::result::Result<u128, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<u128, E> {
            u128::try_from(value).map_err(|_| E::custom("negative values not allowed"))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<u128, E> {
            value.parse().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(U128Visitor)
}

fn default_atomic() -> bool {
    true
}

/// A validated, in-memory representation of an intended on-chain call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CallDescriptor {
    /// System.remark
    Remark { memo: String },
    /// Nfts.create with `admin` as collection admin
    CreateCollection { admin: Address },
    /// Assets.mint
    MintAsset {
        asset_id: u32,
        beneficiary: Address,
        #[serde(deserialize_with = "deserialize_u128")]
        amount: u128,
    },
    /// Nfts.mint
    MintNft {
        collection_id: u32,
        item_id: u32,
        recipient: Address,
    },
    /// Assets.transfer
    TransferAsset {
        asset_id: u32,
        recipient: Address,
        #[serde(deserialize_with = "deserialize_u128")]
        amount: u128,
    },
    /// Nfts.transfer
    TransferNft {
        collection_id: u32,
        item_id: u32,
        recipient: Address,
    },
    /// Utility.batch_all when atomic, Utility.batch otherwise
    Batch {
        items: Vec<CallDescriptor>,
        #[serde(default = "default_atomic")]
        atomic: bool,
    },
}

impl CallDescriptor {
    /// `Pallet.method` this descriptor targets
    pub fn kind(&self) -> &'static str {
        match self {
            CallDescriptor::Remark { .. } => "System.remark",
            CallDescriptor::CreateCollection { .. } => "Nfts.create",
            CallDescriptor::MintAsset { .. } => "Assets.mint",
            CallDescriptor::MintNft { .. } => "Nfts.mint",
            CallDescriptor::TransferAsset { .. } => "Assets.transfer",
            CallDescriptor::TransferNft { .. } => "Nfts.transfer",
            CallDescriptor::Batch { atomic: true, .. } => "Utility.batch_all",
            CallDescriptor::Batch { atomic: false, .. } => "Utility.batch",
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, CallDescriptor::Batch { .. })
    }

    /// Direct children of a batch, empty for leaf calls
    pub fn items(&self) -> &[CallDescriptor] {
        match self {
            CallDescriptor::Batch { items, .. } => items,
            _ => &[],
        }
    }

    /// Number of leaf calls, descending into nested batches
    pub fn leaf_count(&self) -> usize {
        match self {
            CallDescriptor::Batch { items, .. } => items.iter().map(Self::leaf_count).sum(),
            _ => 1,
        }
    }

    /// Re-check construction invariants, e.g. after deserializing from JS
    pub fn validate(&self) -> Result<()> {
        match self {
            CallDescriptor::Remark { .. } => Ok(()),
            CallDescriptor::CreateCollection { admin } => require_address(admin),
            CallDescriptor::MintAsset {
                beneficiary,
                amount,
                ..
            } => {
                require_present(beneficiary, "beneficiary")?;
                require_amount(*amount)
            }
            CallDescriptor::MintNft { recipient, .. }
            | CallDescriptor::TransferNft { recipient, .. } => {
                require_present(recipient, "recipient")
            }
            CallDescriptor::TransferAsset {
                recipient, amount, ..
            } => {
                require_present(recipient, "recipient")?;
                require_amount(*amount)
            }
            CallDescriptor::Batch { items, .. } => {
                if items.is_empty() {
                    return Err(WasmAssetHubError::EmptyBatch);
                }
                items.iter().try_for_each(Self::validate)
            }
        }
    }
}

fn require_address(address: &Address) -> Result<()> {
    if address.is_empty() {
        return Err(WasmAssetHubError::InvalidAddress(
            "Address must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn require_present(address: &Address, field: &'static str) -> Result<()> {
    if address.is_empty() {
        return Err(WasmAssetHubError::MissingField(field));
    }
    Ok(())
}

fn require_amount(amount: u128) -> Result<()> {
    if amount == 0 {
        return Err(WasmAssetHubError::MissingField("amount"));
    }
    Ok(())
}

fn present(address: Option<Address>, field: &'static str) -> Result<Address> {
    let address = address.ok_or(WasmAssetHubError::MissingField(field))?;
    require_present(&address, field)?;
    Ok(address)
}

// =============================================================================
// Constructors
// =============================================================================

pub fn remark(memo: impl Into<String>) -> CallDescriptor {
    CallDescriptor::Remark { memo: memo.into() }
}

pub fn create_collection(admin: impl Into<Address>) -> Result<CallDescriptor> {
    let admin = admin.into();
    require_address(&admin)?;
    Ok(CallDescriptor::CreateCollection { admin })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintAssetParams {
    #[serde(default)]
    pub asset_id: Option<u32>,
    #[serde(default)]
    pub beneficiary: Option<Address>,
    #[serde(default, deserialize_with = "deserialize_opt_u128")]
    pub amount: Option<u128>,
}

fn deserialize_opt_u128<'de, D>(deserializer: D) -> std::result::Result<Option<u128>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "deserialize_u128")] u128);

    Option::<Wrapper>::deserialize(deserializer).map(|w| w.map(|Wrapper(v)| v))
}

/// Fields are checked in order: asset id, beneficiary, amount
pub fn mint_asset(params: MintAssetParams) -> Result<CallDescriptor> {
    let asset_id = params
        .asset_id
        .ok_or(WasmAssetHubError::MissingField("assetId"))?;
    let beneficiary = present(params.beneficiary, "beneficiary")?;
    let amount = params
        .amount
        .filter(|amount| *amount > 0)
        .ok_or(WasmAssetHubError::MissingField("amount"))?;

    Ok(CallDescriptor::MintAsset {
        asset_id,
        beneficiary,
        amount,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintNftParams {
    /// Collection id as text, as returned by chain queries
    pub collection_id: String,
    #[serde(default)]
    pub recipient: Option<Address>,
    pub item_id: u32,
}

pub fn mint_nft(params: MintNftParams) -> Result<CallDescriptor> {
    let collection_id = params.collection_id.trim();
    if collection_id.is_empty() {
        return Err(WasmAssetHubError::MissingField("collectionId"));
    }
    let collection_id: u32 = collection_id.parse().map_err(|_| {
        WasmAssetHubError::InvalidInput(format!(
            "Collection id must be an integer, got {:?}",
            collection_id
        ))
    })?;
    let recipient = present(params.recipient, "recipient")?;

    Ok(CallDescriptor::MintNft {
        collection_id,
        item_id: params.item_id,
        recipient,
    })
}

/// Transfer [`DEFAULT_TRANSFER_AMOUNT`] of `asset_id` to `recipient`
pub fn transfer_asset(asset_id: u32, recipient: impl Into<Address>) -> Result<CallDescriptor> {
    let recipient = present(Some(recipient.into()), "recipient")?;
    Ok(CallDescriptor::TransferAsset {
        asset_id,
        recipient,
        amount: DEFAULT_TRANSFER_AMOUNT,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferNftParams {
    #[serde(default)]
    pub collection_id: Option<u32>,
    #[serde(default)]
    pub item_id: Option<u32>,
    #[serde(default)]
    pub recipient: Option<Address>,
}

pub fn transfer_nft(params: TransferNftParams) -> Result<CallDescriptor> {
    let collection_id = params
        .collection_id
        .ok_or(WasmAssetHubError::MissingField("collectionId"))?;
    let item_id = params
        .item_id
        .ok_or(WasmAssetHubError::MissingField("itemId"))?;
    let recipient = present(params.recipient, "recipient")?;

    Ok(CallDescriptor::TransferNft {
        collection_id,
        item_id,
        recipient,
    })
}

/// Items keep their order; later calls may rely on earlier ones
pub fn batch(items: Vec<CallDescriptor>, atomic: bool) -> Result<CallDescriptor> {
    if items.is_empty() {
        return Err(WasmAssetHubError::EmptyBatch);
    }
    Ok(CallDescriptor::Batch { items, atomic })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyParams {
    /// Account the call would be dispatched on behalf of
    pub real: Address,
}

/// Proxy.proxy needs origin substitution semantics that are not defined
/// here; always `UnsupportedOperation`.
pub fn call_as_proxy(_params: &ProxyParams, _call: CallDescriptor) -> Result<CallDescriptor> {
    Err(WasmAssetHubError::UnsupportedOperation("call_as_proxy"))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivativeParams {
    pub index: u16,
}

/// Utility.as_derivative needs sub-account index derivation that is not
/// defined here; always `UnsupportedOperation`.
pub fn call_as_derivative(
    _params: &DerivativeParams,
    _call: CallDescriptor,
) -> Result<CallDescriptor> {
    Err(WasmAssetHubError::UnsupportedOperation("call_as_derivative"))
}
