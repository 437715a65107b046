//! SS58 address encoding and decoding for asset-hub chains
//!
//! Uses the bs58 crate for base58 and Blake2b-512 for the checksum.
//! See: https://docs.substrate.io/reference/address-formats/

use crate::error::{Result, WasmAssetHubError};
use crate::types::AddressFormat;
use blake2::{Blake2b512, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SS58 prefix for checksum calculation
const SS58_PREFIX: &[u8] = b"SS58PRE";

/// Length of an AccountId32 / Ed25519 public key
pub const PUBLIC_KEY_LEN: usize = 32;

/// A chain-formatted account address. Never mutated; a projection of a
/// public key. The empty string is the sentinel for "no key".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Address(address.into())
    }

    /// The sentinel returned for an empty public key
    pub fn empty() -> Self {
        Address(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Address(s.to_string())
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Address(s)
    }
}

/// Converts raw public keys to chain-formatted addresses and back
pub trait AddressCodec {
    fn encode(&self, public_key: &[u8]) -> Result<Address>;
    fn decode(&self, address: &str) -> Result<[u8; PUBLIC_KEY_LEN]>;
}

/// SS58 codec bound to one network prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ss58Codec {
    prefix: u16,
}

impl Ss58Codec {
    pub fn new(prefix: u16) -> Self {
        Self { prefix }
    }

    pub fn for_format(format: AddressFormat) -> Self {
        Self::new(format.prefix())
    }

    pub fn prefix(&self) -> u16 {
        self.prefix
    }
}

impl AddressCodec for Ss58Codec {
    fn encode(&self, public_key: &[u8]) -> Result<Address> {
        encode_ss58(public_key, self.prefix).map(Address)
    }

    /// Decodes and rejects addresses minted for a different network
    fn decode(&self, address: &str) -> Result<[u8; PUBLIC_KEY_LEN]> {
        let (public_key, prefix) = decode_ss58(address)?;
        if prefix != self.prefix {
            return Err(WasmAssetHubError::InvalidAddress(format!(
                "Expected prefix {}, got {}",
                self.prefix, prefix
            )));
        }
        Ok(public_key)
    }
}

/// Encode a public key to SS58 address format
///
/// # Arguments
/// * `public_key` - 32-byte Ed25519 public key
/// * `prefix` - Network prefix (0 for Polkadot/Paseo, 2 for Kusama, 42 for generic Substrate)
pub fn encode_ss58(public_key: &[u8], prefix: u16) -> Result<String> {
    if public_key.len() != PUBLIC_KEY_LEN {
        return Err(WasmAssetHubError::InvalidAddress(format!(
            "Public key must be 32 bytes, got {}",
            public_key.len()
        )));
    }

    let mut payload = encode_prefix(prefix)?;
    payload.extend_from_slice(public_key);

    // First 2 bytes of Blake2b-512
    let checksum = ss58_checksum(&payload);
    payload.extend_from_slice(&checksum[..2]);

    Ok(bs58::encode(&payload).into_string())
}

/// Decode an SS58 address to public key and prefix, regardless of network
pub fn decode_ss58(address: &str) -> Result<([u8; PUBLIC_KEY_LEN], u16)> {
    let address = address.trim();
    if address.is_empty() {
        return Err(WasmAssetHubError::InvalidAddress(
            "Address is empty".to_string(),
        ));
    }

    let decoded = bs58::decode(address)
        .into_vec()
        .map_err(|e| WasmAssetHubError::InvalidAddress(format!("Invalid base58: {}", e)))?;

    if decoded.len() < 35 {
        return Err(WasmAssetHubError::InvalidAddress(
            "Address too short".to_string(),
        ));
    }

    let (prefix, prefix_len) = decode_prefix(&decoded)?;
    let checksum_start = decoded.len() - 2;

    let public_key: [u8; PUBLIC_KEY_LEN] = decoded[prefix_len..checksum_start]
        .try_into()
        .map_err(|_| {
            WasmAssetHubError::InvalidAddress(format!(
                "Invalid public key length: {}",
                checksum_start - prefix_len
            ))
        })?;

    let expected = ss58_checksum(&decoded[..checksum_start]);
    if decoded[checksum_start..] != expected[..2] {
        return Err(WasmAssetHubError::InvalidAddress(
            "Invalid checksum".to_string(),
        ));
    }

    Ok((public_key, prefix))
}

/// Validate an SS58 address, optionally against an expected prefix
pub fn validate_address(address: &str, expected_prefix: Option<u16>) -> bool {
    match decode_ss58(address) {
        Ok((_, prefix)) => expected_prefix.map_or(true, |expected| prefix == expected),
        Err(_) => false,
    }
}

/// Single and two-byte prefixes per the SS58 spec
fn encode_prefix(prefix: u16) -> Result<Vec<u8>> {
    match prefix {
        0..=63 => Ok(vec![prefix as u8]),
        64..=16383 => {
            let first = ((prefix & 0b0000_0000_1111_1100) as u8) >> 2 | 0b0100_0000;
            let second = ((prefix >> 8) as u8) | ((prefix & 0b0000_0000_0000_0011) as u8) << 6;
            Ok(vec![first, second])
        }
        _ => Err(WasmAssetHubError::InvalidAddress(format!(
            "Invalid prefix: {}",
            prefix
        ))),
    }
}

fn decode_prefix(data: &[u8]) -> Result<(u16, usize)> {
    match data[0] {
        0..=63 => Ok((data[0] as u16, 1)),
        64..=127 => {
            let lower = (data[0] & 0b0011_1111) << 2 | (data[1] >> 6);
            let upper = data[1] & 0b0011_1111;
            Ok((((upper as u16) << 8) | (lower as u16), 2))
        }
        other => Err(WasmAssetHubError::InvalidAddress(format!(
            "Invalid prefix byte: {}",
            other
        ))),
    }
}

/// Blake2b-512 of "SS58PRE" || payload
fn ss58_checksum(payload: &[u8]) -> [u8; 64] {
    let mut hasher = Blake2b512::new();
    hasher.update(SS58_PREFIX);
    hasher.update(payload);
    let mut checksum = [0u8; 64];
    checksum.copy_from_slice(&hasher.finalize());
    checksum
}
