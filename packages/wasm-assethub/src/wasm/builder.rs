//! WASM bindings for call building
//!
//! CallBuilderNamespace validates descriptors coming from JavaScript,
//! wraps them into the submitted batch shape and encodes them to call data.

use crate::call::{encode::encode_call, CallDescriptor};
use crate::submit::wrap_calls;
use crate::types::Material;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Namespace for call building operations
#[wasm_bindgen]
pub struct CallBuilderNamespace;

#[wasm_bindgen]
impl CallBuilderNamespace {
    /// Validate a call descriptor and return it in canonical form
    ///
    /// # Example
    /// ```json
    /// { "type": "mintAsset", "assetId": 1984, "beneficiary": "15sND1xy...", "amount": "1000" }
    /// ```
    ///
    /// # Descriptor Types
    /// - `remark`: memo
    /// - `createCollection`: admin
    /// - `mintAsset`: assetId, beneficiary, amount
    /// - `mintNft`: collectionId, itemId, recipient
    /// - `transferAsset`: assetId, recipient, amount
    /// - `transferNft`: collectionId, itemId, recipient
    /// - `batch`: items, atomic
    #[wasm_bindgen(js_name = buildCall)]
    pub fn build_call(descriptor: JsValue) -> Result<JsValue, JsValue> {
        let call = descriptor_from_js(descriptor)?;
        to_js(&call)
    }

    /// Wrap one or more descriptors into the single top-level batch that
    /// a submission signs
    #[wasm_bindgen(js_name = wrapCalls)]
    pub fn wrap_calls_wasm(calls: JsValue) -> Result<JsValue, JsValue> {
        let calls = descriptors_from_js(calls)?;
        let outer = wrap_calls(calls)?;
        to_js(&outer)
    }

    /// SCALE call data for a descriptor
    ///
    /// # Arguments
    /// * `descriptor` - Call descriptor (see `buildCall`)
    /// * `material` - Chain material with hex-encoded runtime metadata
    #[wasm_bindgen(js_name = encodeCall)]
    pub fn encode_call_wasm(descriptor: JsValue, material: JsValue) -> Result<Vec<u8>, JsValue> {
        let call = descriptor_from_js(descriptor)?;
        let material: Material = serde_wasm_bindgen::from_value(material)
            .map_err(|e| JsValue::from_str(&format!("Invalid material: {}", e)))?;
        let metadata = material.decode_metadata()?;
        Ok(encode_call(&call, &metadata)?)
    }

    /// `Pallet.method` targeted by a descriptor
    #[wasm_bindgen(js_name = callKind)]
    pub fn call_kind(descriptor: JsValue) -> Result<String, JsValue> {
        Ok(descriptor_from_js(descriptor)?.kind().to_string())
    }
}

/// Descriptors from JS skip the Rust constructors, so re-check them here
fn descriptor_from_js(value: JsValue) -> Result<CallDescriptor, JsValue> {
    let call: CallDescriptor = serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid descriptor: {}", e)))?;
    call.validate()?;
    Ok(call)
}

fn descriptors_from_js(value: JsValue) -> Result<Vec<CallDescriptor>, JsValue> {
    let calls: Vec<CallDescriptor> = serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid descriptors: {}", e)))?;
    for call in &calls {
        call.validate()?;
    }
    Ok(calls)
}

/// Serialize with BigInt for u64/u128 amounts
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let serializer =
        serde_wasm_bindgen::Serializer::new().serialize_large_number_types_as_bigints(true);
    value
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}
