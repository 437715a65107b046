//! Offline extrinsic assembly for chain-client implementations
//!
//! Signs encoded call data with a [`Signer`] and lays out a v4 signed
//! extrinsic: `MultiAddress::Id` signer, `MultiSignature::Ed25519`, then the
//! extra (era, nonce, tip, fee asset, metadata-hash mode). The signing
//! payload appends spec/tx versions, genesis hash, reference block and the
//! (absent) metadata hash.

use crate::error::{Result, WasmAssetHubError};
use crate::keyring::{Signer, SIGNATURE_LEN};
use crate::types::{Era, Material, Validity};
use blake2::{digest::consts::U32, Blake2b, Digest};
use parity_scale_codec::{Compact, Encode};

/// Version byte: signed, extrinsic format 4
const SIGNED_V4: u8 = 0x84;
const MULTI_ADDRESS_ID: u8 = 0x00;
const MULTI_SIGNATURE_ED25519: u8 = 0x00;
/// `Option::None`; pay fees in the native token / no metadata hash
const NONE: u8 = 0x00;
/// Payloads longer than this are hashed before signing
const MAX_PLAIN_PAYLOAD: usize = 256;

/// Chain context an extrinsic is built against
#[derive(Debug, Clone)]
pub struct ExtrinsicContext {
    pub material: Material,
    pub validity: Validity,
    /// Hash of the block the era is anchored to
    pub reference_block: [u8; 32],
}

impl ExtrinsicContext {
    pub fn new(material: Material, validity: Validity, reference_block: &str) -> Result<Self> {
        Ok(ExtrinsicContext {
            material,
            validity,
            reference_block: parse_hex_hash(reference_block)?,
        })
    }
}

/// Account-level parameters for one extrinsic
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtrinsicParams {
    pub nonce: u32,
    pub tip: u128,
}

/// A signed extrinsic ready for broadcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedExtrinsic {
    bytes: Vec<u8>,
    signer: [u8; 32],
    signature: [u8; SIGNATURE_LEN],
}

impl SignedExtrinsic {
    /// Length-prefixed extrinsic bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.bytes))
    }

    /// Blake2-256 of the encoded extrinsic, as reported by the chain
    pub fn tx_hash(&self) -> String {
        format!("0x{}", hex::encode(blake2_256(&self.bytes)))
    }

    pub fn signer(&self) -> &[u8; 32] {
        &self.signer
    }

    pub fn signature(&self) -> &[u8; SIGNATURE_LEN] {
        &self.signature
    }
}

/// Bytes the signer signs over
pub fn signing_payload(
    call_data: &[u8],
    context: &ExtrinsicContext,
    params: ExtrinsicParams,
) -> Result<Vec<u8>> {
    let genesis_hash = parse_hex_hash(&context.material.genesis_hash)?;
    let era = context.validity.era();

    let mut payload = call_data.to_vec();
    encode_extra(&era, params, &mut payload);
    context.material.spec_version.encode_to(&mut payload);
    context.material.tx_version.encode_to(&mut payload);
    payload.extend_from_slice(&genesis_hash);
    payload.extend_from_slice(&context.reference_block);
    payload.push(NONE);

    if payload.len() > MAX_PLAIN_PAYLOAD {
        Ok(blake2_256(&payload).to_vec())
    } else {
        Ok(payload)
    }
}

/// Sign `call_data` and assemble the extrinsic
pub fn sign_extrinsic(
    call_data: &[u8],
    signer: &Signer,
    context: &ExtrinsicContext,
    params: ExtrinsicParams,
) -> Result<SignedExtrinsic> {
    if call_data.is_empty() {
        return Err(WasmAssetHubError::InvalidInput(
            "Call data is empty".to_string(),
        ));
    }

    let payload = signing_payload(call_data, context, params)?;
    let signature = signer.sign(&payload);
    let public_key = signer.public_key();
    let era = context.validity.era();

    let mut body = vec![SIGNED_V4, MULTI_ADDRESS_ID];
    body.extend_from_slice(&public_key);
    body.push(MULTI_SIGNATURE_ED25519);
    body.extend_from_slice(&signature);
    encode_extra(&era, params, &mut body);
    body.extend_from_slice(call_data);

    let mut bytes = Compact(body.len() as u32).encode();
    bytes.extend_from_slice(&body);

    Ok(SignedExtrinsic {
        bytes,
        signer: public_key,
        signature,
    })
}

fn encode_extra(era: &Era, params: ExtrinsicParams, out: &mut Vec<u8>) {
    out.extend_from_slice(&encode_era(era));
    Compact(params.nonce).encode_to(out);
    Compact(params.tip).encode_to(out);
    out.push(NONE);
    out.push(NONE);
}

fn encode_era(era: &Era) -> Vec<u8> {
    match era {
        Era::Immortal => vec![0x00],
        Era::Mortal { period, phase } => {
            let period = period.next_power_of_two().clamp(4, 65536);
            let quantize_factor = (period >> 12).max(1);
            let quantized_phase = (phase % period) / quantize_factor * quantize_factor;
            let encoded = (period.trailing_zeros() - 1).clamp(1, 15)
                | ((quantized_phase / quantize_factor) << 4);
            (encoded as u16).to_le_bytes().to_vec()
        }
    }
}

fn parse_hex_hash(hex_str: &str) -> Result<[u8; 32]> {
    let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    let bytes = hex::decode(hex_str)?;
    bytes.as_slice().try_into().map_err(|_| {
        WasmAssetHubError::InvalidInput(format!("Hash must be 32 bytes, got {}", bytes.len()))
    })
}

/// Blake2-256 hash
pub fn blake2_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b::<U32>::new();
    hasher.update(data);
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&hasher.finalize());
    hash
}
