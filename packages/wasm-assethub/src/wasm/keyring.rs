//! WASM bindings for key derivation and addresses

use crate::address::{decode_ss58, validate_address};
use crate::keyring::{address_of, public_key_of, SecretSeed, SeedFallback};
use crate::types::AddressFormat;
use wasm_bindgen::prelude::*;

/// Namespace for keyring operations
#[wasm_bindgen]
pub struct KeyringNamespace;

#[wasm_bindgen]
impl KeyringNamespace {
    /// Public key for a hex seed
    ///
    /// # Arguments
    /// * `seed` - 32-byte seed as hex (optional `0x`); may be omitted
    /// * `allow_random` - when no seed is given, use a throwaway random key
    ///   instead of failing
    #[wasm_bindgen(js_name = publicKeyOf)]
    pub fn public_key_of(seed: Option<String>, allow_random: bool) -> Result<Vec<u8>, JsValue> {
        let seed = seed.as_deref().map(SecretSeed::parse).transpose()?;
        let fallback = if allow_random {
            SeedFallback::Random
        } else {
            SeedFallback::Deny
        };
        Ok(public_key_of(seed.as_ref(), fallback)?.to_vec())
    }

    /// SS58 address of a public key. An empty key yields an empty string.
    ///
    /// # Arguments
    /// * `public_key` - 32-byte Ed25519 public key
    /// * `prefix` - SS58 prefix (0 Polkadot/Paseo, 2 Kusama, 42 Substrate); defaults to 0
    #[wasm_bindgen(js_name = addressOf)]
    pub fn address_of(public_key: &[u8], prefix: Option<u16>) -> Result<String, JsValue> {
        let format = AddressFormat::from_prefix(prefix.unwrap_or(0));
        Ok(address_of(public_key, format)?.to_string())
    }

    /// Public key behind an SS58 address
    #[wasm_bindgen(js_name = decodeAddress)]
    pub fn decode_address(address: &str) -> Result<Vec<u8>, JsValue> {
        let (public_key, _) = decode_ss58(address)?;
        Ok(public_key.to_vec())
    }

    #[wasm_bindgen(js_name = validateAddress)]
    pub fn validate_address(address: &str, prefix: Option<u16>) -> bool {
        validate_address(address, prefix)
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_seed_to_address() {
        let seed = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
        let public_key = KeyringNamespace::public_key_of(Some(seed.to_string()), false).unwrap();
        assert_eq!(
            KeyringNamespace::address_of(&public_key, None).unwrap(),
            "15sND1xy2556eoAx6eGV6zkURiPJ9T9qJ8XMDHsYTuZezp7f"
        );
        assert_eq!(KeyringNamespace::address_of(&[], None).unwrap(), "");
    }

    #[wasm_bindgen_test]
    fn test_random_fallback_requires_opt_in() {
        assert!(KeyringNamespace::public_key_of(None, false).is_err());
        assert_eq!(KeyringNamespace::public_key_of(None, true).unwrap().len(), 32);
    }
}
