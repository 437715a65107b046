//! WASM bindings for wasm-assethub
//!
//! This module contains thin wrappers with #[wasm_bindgen] that delegate
//! to the core Rust implementations.

pub mod builder;
pub mod extrinsic;
pub mod keyring;

// Re-export WASM types
pub use builder::CallBuilderNamespace;
pub use extrinsic::{ExtrinsicContextJs, MaterialJs, ValidityJs, WasmSignedExtrinsic};
pub use keyring::KeyringNamespace;
