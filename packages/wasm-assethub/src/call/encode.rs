//! Call encoding using subxt dynamic API
//!
//! Turns a [`CallDescriptor`] into SCALE call data for the runtime
//! described by `metadata`. Batches nest their children as `RuntimeCall`
//! values, so nested batches encode naturally.

use crate::address::{decode_ss58, Address};
use crate::call::CallDescriptor;
use crate::error::{Result, WasmAssetHubError};
use subxt_core::{
    ext::scale_value::{Composite, Value},
    metadata::Metadata,
    tx::payload::{dynamic, DynamicPayload, Payload},
};

/// Encode a descriptor to call data bytes
pub fn encode_call(call: &CallDescriptor, metadata: &Metadata) -> Result<Vec<u8>> {
    payload(call)?
        .encode_call_data(metadata)
        .map_err(|e| WasmAssetHubError::Encoding(format!("{}: {}", call.kind(), e)))
}

/// `RuntimeCall` value for a descriptor (pallet variant wrapping the call variant)
pub fn call_value(call: &CallDescriptor) -> Result<Value<()>> {
    Ok(payload(call)?.into_value())
}

fn payload(call: &CallDescriptor) -> Result<DynamicPayload> {
    let payload = match call {
        CallDescriptor::Remark { memo } => system_remark(memo),
        CallDescriptor::CreateCollection { admin } => nfts_create(admin)?,
        CallDescriptor::MintAsset {
            asset_id,
            beneficiary,
            amount,
        } => assets_mint(*asset_id, beneficiary, *amount)?,
        CallDescriptor::MintNft {
            collection_id,
            item_id,
            recipient,
        } => nfts_mint(*collection_id, *item_id, recipient)?,
        CallDescriptor::TransferAsset {
            asset_id,
            recipient,
            amount,
        } => assets_transfer(*asset_id, recipient, *amount)?,
        CallDescriptor::TransferNft {
            collection_id,
            item_id,
            recipient,
        } => nfts_transfer(*collection_id, *item_id, recipient)?,
        CallDescriptor::Batch { items, atomic } => utility_batch(items, *atomic)?,
    };
    Ok(payload)
}

// =============================================================================
// System pallet
// =============================================================================

fn system_remark(memo: &str) -> DynamicPayload {
    dynamic(
        "System",
        "remark",
        named([("remark", Value::from_bytes(memo.as_bytes()))]),
    )
}

// =============================================================================
// Assets pallet
// =============================================================================

fn assets_mint(asset_id: u32, beneficiary: &Address, amount: u128) -> Result<DynamicPayload> {
    Ok(dynamic(
        "Assets",
        "mint",
        named([
            ("id", Value::u128(asset_id as u128)),
            ("beneficiary", multi_address(beneficiary)?),
            ("amount", Value::u128(amount)),
        ]),
    ))
}

fn assets_transfer(asset_id: u32, target: &Address, amount: u128) -> Result<DynamicPayload> {
    Ok(dynamic(
        "Assets",
        "transfer",
        named([
            ("id", Value::u128(asset_id as u128)),
            ("target", multi_address(target)?),
            ("amount", Value::u128(amount)),
        ]),
    ))
}

// =============================================================================
// Nfts pallet
// =============================================================================

/// Issuer-only minting, no supply cap, all settings cleared
fn nfts_create(admin: &Address) -> Result<DynamicPayload> {
    let mint_settings = Value::named_composite([
        ("mint_type", Value::unnamed_variant("Issuer", [])),
        ("price", none()),
        ("start_block", none()),
        ("end_block", none()),
        ("default_item_settings", Value::u128(0)),
    ]);
    let config = Value::named_composite([
        ("settings", Value::u128(0)),
        ("max_supply", none()),
        ("mint_settings", mint_settings),
    ]);

    Ok(dynamic(
        "Nfts",
        "create",
        named([("admin", multi_address(admin)?), ("config", config)]),
    ))
}

fn nfts_mint(collection: u32, item: u32, mint_to: &Address) -> Result<DynamicPayload> {
    Ok(dynamic(
        "Nfts",
        "mint",
        named([
            ("collection", Value::u128(collection as u128)),
            ("item", Value::u128(item as u128)),
            ("mint_to", multi_address(mint_to)?),
            ("witness_data", none()),
        ]),
    ))
}

fn nfts_transfer(collection: u32, item: u32, dest: &Address) -> Result<DynamicPayload> {
    Ok(dynamic(
        "Nfts",
        "transfer",
        named([
            ("collection", Value::u128(collection as u128)),
            ("item", Value::u128(item as u128)),
            ("dest", multi_address(dest)?),
        ]),
    ))
}

// =============================================================================
// Utility pallet (batch)
// =============================================================================

fn utility_batch(items: &[CallDescriptor], atomic: bool) -> Result<DynamicPayload> {
    if items.is_empty() {
        return Err(WasmAssetHubError::EmptyBatch);
    }

    let calls = items
        .iter()
        .map(call_value)
        .collect::<Result<Vec<_>>>()?;

    let method = if atomic { "batch_all" } else { "batch" };
    Ok(dynamic(
        "Utility",
        method,
        named([("calls", Value::unnamed_composite(calls))]),
    ))
}

// =============================================================================
// Helpers
// =============================================================================

/// Build a named composite from key-value pairs
fn named<const N: usize>(fields: [(&str, Value<()>); N]) -> Composite<()> {
    Composite::Named(
        fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    )
}

fn none() -> Value<()> {
    Value::unnamed_variant("None", [])
}

/// Convert SS58 address to MultiAddress::Id value
pub fn multi_address(address: &Address) -> Result<Value<()>> {
    let (public_key, _) = decode_ss58(address.as_str())?;
    Ok(Value::unnamed_variant("Id", [Value::from_bytes(public_key)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::{batch, remark, transfer_asset};
    use subxt_core::ext::scale_value::ValueDef;

    const ALICE: &str = "15sND1xy2556eoAx6eGV6zkURiPJ9T9qJ8XMDHsYTuZezp7f";

    fn variant(value: &Value<()>) -> (&str, Vec<&Value<()>>) {
        match &value.value {
            ValueDef::Variant(v) => (v.name.as_str(), v.values.values().collect()),
            other => panic!("Expected variant, got {:?}", other),
        }
    }

    #[test]
    fn test_named_helper() {
        let composite = named([("foo", Value::u128(42)), ("bar", Value::bool(true))]);
        match composite {
            Composite::Named(fields) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].0, "foo");
                assert_eq!(fields[1].0, "bar");
            }
            _ => panic!("Expected Named composite"),
        }
    }

    #[test]
    fn test_remark_value_targets_system() {
        let value = call_value(&remark("hello")).unwrap();
        let (pallet, inner) = variant(&value);
        assert_eq!(pallet, "System");
        assert_eq!(variant(inner[0]).0, "remark");
    }

    #[test]
    fn test_batch_value_keeps_order() {
        let call = batch(
            vec![remark("a"), transfer_asset(1984, ALICE).unwrap(), remark("b")],
            true,
        )
        .unwrap();
        let value = call_value(&call).unwrap();

        let (pallet, inner) = variant(&value);
        assert_eq!(pallet, "Utility");
        let (method, fields) = variant(inner[0]);
        assert_eq!(method, "batch_all");

        let calls: Vec<&str> = match &fields[0].value {
            ValueDef::Composite(c) => c.values().map(|v| variant(v).0).collect(),
            other => panic!("Expected composite, got {:?}", other),
        };
        assert_eq!(calls, vec!["System", "Assets", "System"]);
    }

    #[test]
    fn test_non_atomic_batch_uses_batch() {
        let call = batch(vec![remark("solo")], false).unwrap();
        let value = call_value(&call).unwrap();
        let (_, inner) = variant(&value);
        assert_eq!(variant(inner[0]).0, "batch");
    }

    #[test]
    fn test_multi_address() {
        assert!(multi_address(&ALICE.into()).is_ok());
        assert!(matches!(
            multi_address(&"bogus".into()),
            Err(WasmAssetHubError::InvalidAddress(_))
        ));
    }
}
