//! WASM bindings for offline extrinsic signing
//!
//! Thin wrapper around core extrinsic assembly with #[wasm_bindgen]

use crate::extrinsic::{
    sign_extrinsic, signing_payload, ExtrinsicContext, ExtrinsicParams, SignedExtrinsic,
};
use crate::keyring::{derive_signer, KeyPair, SecretSeed};
use crate::types::{Era, Material, Validity};
use wasm_bindgen::prelude::*;

/// JavaScript-friendly wrapper for Material
#[wasm_bindgen]
pub struct MaterialJs {
    inner: Material,
}

#[wasm_bindgen]
impl MaterialJs {
    #[wasm_bindgen(constructor)]
    pub fn new(
        genesis_hash: &str,
        chain_name: &str,
        spec_name: &str,
        spec_version: u32,
        tx_version: u32,
        metadata: &str,
    ) -> MaterialJs {
        MaterialJs {
            inner: Material {
                genesis_hash: genesis_hash.to_string(),
                chain_name: chain_name.to_string(),
                spec_name: spec_name.to_string(),
                spec_version,
                tx_version,
                metadata: metadata.to_string(),
            },
        }
    }
}

/// JavaScript-friendly wrapper for Validity
#[wasm_bindgen]
pub struct ValidityJs {
    inner: Validity,
}

#[wasm_bindgen]
impl ValidityJs {
    #[wasm_bindgen(constructor)]
    pub fn new(first_valid: u32, max_duration: u32) -> ValidityJs {
        ValidityJs {
            inner: Validity {
                first_valid,
                max_duration,
            },
        }
    }

    /// Era derived from this window
    #[wasm_bindgen(getter)]
    pub fn era(&self) -> JsValue {
        let obj = js_sys::Object::new();
        match self.inner.era() {
            Era::Immortal => {
                let _ = js_sys::Reflect::set(&obj, &"type".into(), &"immortal".into());
            }
            Era::Mortal { period, phase } => {
                let _ = js_sys::Reflect::set(&obj, &"type".into(), &"mortal".into());
                let _ = js_sys::Reflect::set(&obj, &"period".into(), &JsValue::from(period));
                let _ = js_sys::Reflect::set(&obj, &"phase".into(), &JsValue::from(phase));
            }
        }
        obj.into()
    }
}

/// Signing context: chain material, validity window, reference block,
/// nonce and tip
#[wasm_bindgen]
pub struct ExtrinsicContextJs {
    context: ExtrinsicContext,
    params: ExtrinsicParams,
}

#[wasm_bindgen]
impl ExtrinsicContextJs {
    #[wasm_bindgen(constructor)]
    pub fn new(
        material: MaterialJs,
        validity: ValidityJs,
        reference_block: &str,
        nonce: u32,
        tip: Option<js_sys::BigInt>,
    ) -> Result<ExtrinsicContextJs, JsValue> {
        let tip = match tip {
            Some(tip) => bigint_to_u128(&tip)?,
            None => 0,
        };
        Ok(ExtrinsicContextJs {
            context: ExtrinsicContext::new(material.inner, validity.inner, reference_block)?,
            params: ExtrinsicParams { nonce, tip },
        })
    }

    /// Bytes an external signer must sign for `call_data`
    #[wasm_bindgen(js_name = signingPayload)]
    pub fn signing_payload(&self, call_data: &[u8]) -> Result<Vec<u8>, JsValue> {
        Ok(signing_payload(call_data, &self.context, self.params)?)
    }

    /// Sign `call_data` with a hex seed and assemble the extrinsic
    #[wasm_bindgen]
    pub fn sign(&self, call_data: &[u8], seed: &str) -> Result<WasmSignedExtrinsic, JsValue> {
        let seed = SecretSeed::parse(seed)?;
        let signer = derive_signer(KeyPair::from_seed(&seed));
        let inner = sign_extrinsic(call_data, &signer, &self.context, self.params)?;
        Ok(WasmSignedExtrinsic { inner })
    }
}

/// WASM-exposed signed extrinsic
#[wasm_bindgen]
pub struct WasmSignedExtrinsic {
    inner: SignedExtrinsic,
}

#[wasm_bindgen]
impl WasmSignedExtrinsic {
    /// Blake2-256 hash of the extrinsic bytes
    #[wasm_bindgen(getter, js_name = txHash)]
    pub fn tx_hash(&self) -> String {
        self.inner.tx_hash()
    }

    #[wasm_bindgen(js_name = toBytes)]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.inner.as_bytes().to_vec()
    }

    #[wasm_bindgen(js_name = toHex)]
    pub fn to_hex(&self) -> String {
        self.inner.to_hex()
    }

    #[wasm_bindgen(getter)]
    pub fn signature(&self) -> Vec<u8> {
        self.inner.signature().to_vec()
    }
}

fn bigint_to_u128(value: &js_sys::BigInt) -> Result<u128, JsValue> {
    let text = value
        .to_string(10)
        .map_err(|_| JsValue::from_str("Invalid tip value"))?;
    String::from(text).parse().map_err(|_| {
        JsValue::from_str("Tip value must be a non-negative integer that fits in u128")
    })
}
