//! wasm-assethub: batched asset and NFT operations for Polkadot asset-hub chains
//!
//! This crate provides:
//! - Validated call descriptors (remarks, NFT collections and items, fungible assets)
//! - Ed25519 key derivation and SS58 addresses
//! - Batch submission through a pluggable chain client
//! - Call-data encoding and offline extrinsic signing
//!
//! # Architecture
//!
//! The crate follows a two-layer architecture:
//! - **Core layer** (`src/*.rs`): Pure Rust logic, no WASM dependencies
//! - **WASM layer** (`src/wasm/*.rs`): Thin wrappers with `#[wasm_bindgen]`

pub mod address;
pub mod call;
pub mod client;
pub mod config;
pub mod error;
pub mod extrinsic;
pub mod keyring;
pub mod query;
pub mod receipt;
pub mod submit;
pub mod types;
pub mod wasm;

// Re-export main types for convenience
pub use address::{decode_ss58, encode_ss58, validate_address, Address, AddressCodec, Ss58Codec};
pub use call::CallDescriptor;
pub use client::{ChainClient, ChainConnector, ClientError};
pub use config::AssetHubConfig;
pub use error::WasmAssetHubError;
pub use keyring::{address_of, derive_key_pair, derive_signer, KeyPair, SecretSeed, Signer};
pub use receipt::{PartialReceipt, TxReceipt};
#[cfg(not(target_arch = "wasm32"))]
pub use submit::BatchSubmitter;
pub use submit::{wrap_calls, Calls};
pub use types::{AddressFormat, Chain, Material, Validity};
