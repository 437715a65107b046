//! Ed25519 signing identities derived from a secret seed.
//!
//! The same seed always yields the same key pair. When no seed is
//! available callers may opt into a random one, which is logged as a
//! warning because anything signed with it cannot be reproduced.

use crate::address::{Address, AddressCodec, Ss58Codec, PUBLIC_KEY_LEN};
use crate::error::{Result, WasmAssetHubError};
use crate::types::AddressFormat;
use ed25519_dalek::{Signer as _, SigningKey};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use std::str::FromStr;

/// Length of an Ed25519 seed
pub const SEED_LEN: usize = 32;

/// Length of an Ed25519 signature
pub const SIGNATURE_LEN: usize = 64;

/// 32-byte secret seed. `Debug` never prints the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretSeed([u8; SEED_LEN]);

impl SecretSeed {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let seed: [u8; SEED_LEN] = bytes.try_into().map_err(|_| {
            WasmAssetHubError::InvalidSeed(format!(
                "Seed must be {} bytes, got {}",
                SEED_LEN,
                bytes.len()
            ))
        })?;
        Ok(SecretSeed(seed))
    }

    /// Parse a hex seed, with or without `0x`
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let hex_str = text.strip_prefix("0x").unwrap_or(text);
        let bytes = hex::decode(hex_str)
            .map_err(|e| WasmAssetHubError::InvalidSeed(format!("Seed is not hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Fresh seed from the OS RNG
    pub fn random() -> Self {
        let mut seed = [0u8; SEED_LEN];
        OsRng.fill_bytes(&mut seed);
        SecretSeed(seed)
    }

    fn expose(&self) -> &[u8; SEED_LEN] {
        &self.0
    }
}

impl FromStr for SecretSeed {
    type Err = WasmAssetHubError;

    fn from_str(s: &str) -> Result<Self> {
        SecretSeed::parse(s)
    }
}

impl fmt::Debug for SecretSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretSeed(<redacted>)")
    }
}

/// What to do when no seed is supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedFallback {
    /// Fail with `MissingSeed`
    #[default]
    Deny,
    /// Generate an ephemeral random seed and warn
    Random,
}

/// Signature scheme identifier. Only Ed25519 is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureScheme {
    Ed25519,
}

impl SignatureScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            SignatureScheme::Ed25519 => "Ed25519",
        }
    }
}

/// Ed25519 key pair owned by exactly one signer
#[derive(Clone)]
pub struct KeyPair {
    public_key: [u8; PUBLIC_KEY_LEN],
    signing_key: SigningKey,
}

impl KeyPair {
    pub fn from_seed(seed: &SecretSeed) -> Self {
        let signing_key = SigningKey::from_bytes(seed.expose());
        KeyPair {
            public_key: signing_key.verifying_key().to_bytes(),
            signing_key,
        }
    }

    pub fn public_key(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.public_key
    }

    pub fn sign(&self, payload: &[u8]) -> [u8; SIGNATURE_LEN] {
        self.signing_key.sign(payload).to_bytes()
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &hex::encode(self.public_key))
            .finish_non_exhaustive()
    }
}

/// A public key paired with a signing function over a fixed scheme
#[derive(Debug, Clone)]
pub struct Signer {
    key_pair: KeyPair,
    scheme: SignatureScheme,
}

impl Signer {
    /// Signature over an arbitrary payload
    pub fn sign(&self, payload: &[u8]) -> [u8; SIGNATURE_LEN] {
        self.key_pair.sign(payload)
    }

    pub fn public_key(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.key_pair.public_key()
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    /// Signer account formatted for the given network
    pub fn address(&self, format: AddressFormat) -> Result<Address> {
        address_of(&self.public_key(), format)
    }

    /// Check a signature produced by this signer
    pub fn verify(&self, payload: &[u8], signature: &[u8; SIGNATURE_LEN]) -> bool {
        let signature = ed25519_dalek::Signature::from_bytes(signature);
        self.key_pair
            .signing_key
            .verifying_key()
            .verify_strict(payload, &signature)
            .is_ok()
    }
}

/// Derive a key pair from `seed`, applying `fallback` when it is absent
pub fn derive_key_pair(seed: Option<&SecretSeed>, fallback: SeedFallback) -> Result<KeyPair> {
    match (seed, fallback) {
        (Some(seed), _) => Ok(KeyPair::from_seed(seed)),
        (None, SeedFallback::Random) => {
            tracing::warn!(
                "No secret seed found, using a random one; transactions signed with it cannot be reproduced"
            );
            Ok(KeyPair::from_seed(&SecretSeed::random()))
        }
        (None, SeedFallback::Deny) => Err(WasmAssetHubError::MissingSeed),
    }
}

pub fn derive_signer(key_pair: KeyPair) -> Signer {
    Signer {
        key_pair,
        scheme: SignatureScheme::Ed25519,
    }
}

/// Public key for `seed`, with the same fallback policy as [`derive_key_pair`]
pub fn public_key_of(
    seed: Option<&SecretSeed>,
    fallback: SeedFallback,
) -> Result<[u8; PUBLIC_KEY_LEN]> {
    derive_key_pair(seed, fallback).map(|kp| kp.public_key())
}

/// Address of a public key. An empty key yields [`Address::empty`] instead
/// of an error.
pub fn address_of(public_key: &[u8], format: AddressFormat) -> Result<Address> {
    if public_key.is_empty() {
        return Ok(Address::empty());
    }
    Ss58Codec::for_format(format).encode(public_key)
}
