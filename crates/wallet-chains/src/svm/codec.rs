//! Wire serialisation of a Solana message: compact-u16 array lengths
//! (`wallet_codec::shortvec`), fixed 32-byte keys, and an optional
//! leading version byte (`0x80` for v0, omitted for legacy).

use super::{address, raw::SvmRawTx};
use wallet_codec::shortvec;
use wallet_primitives::EngineError;

pub fn serialize_message(tx: &SvmRawTx) -> Result<Vec<u8>, EngineError> {
    let mut buf = Vec::new();
    if let Some(version) = tx.version {
        buf.push(0x80 | version);
    }

    buf.push(tx.header.num_required_signatures);
    buf.push(tx.header.num_readonly_signed_accounts);
    buf.push(tx.header.num_readonly_unsigned_accounts);

    shortvec::write_len(&mut buf, tx.account_keys.len());
    for key in &tx.account_keys {
        let decoded = address::decode32(key)?;
        buf.extend_from_slice(&decoded);
    }

    let blockhash_bytes = bs58::decode(&tx.recent_blockhash)
        .into_vec()
        .map_err(|e| EngineError::Rpc { method: "recent_blockhash".into(), status: None, body: e.to_string() })?;
    if blockhash_bytes.len() != 32 {
        return Err(EngineError::Rpc { method: "recent_blockhash".into(), status: None, body: "expected 32 bytes".into() });
    }
    buf.extend_from_slice(&blockhash_bytes);

    shortvec::write_len(&mut buf, tx.instructions.len());
    for instruction in &tx.instructions {
        buf.push(instruction.program_id_index);
        shortvec::write_len(&mut buf, instruction.accounts.len());
        buf.extend_from_slice(&instruction.accounts);
        shortvec::write_len(&mut buf, instruction.data.len());
        buf.extend_from_slice(&instruction.data);
    }

    if tx.version.is_some() {
        // No address table lookups: this workspace only builds direct
        // (non-lookup-table) messages.
        shortvec::write_len(&mut buf, 0);
    }

    Ok(buf)
}

pub fn serialize_unsigned(tx: &SvmRawTx) -> Result<String, EngineError> {
    let bytes = serialize_message(tx)?;
    Ok(base64::Engine::encode(&base64::engine::general_purpose::STANDARD, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svm::raw::{CompiledInstruction, MessageHeader};

    fn sample_tx() -> SvmRawTx {
        SvmRawTx {
            version: None,
            header: MessageHeader { num_required_signatures: 1, num_readonly_signed_accounts: 0, num_readonly_unsigned_accounts: 1 },
            account_keys: vec![
                address::encode32(&[1u8; 32]),
                address::encode32(&[2u8; 32]),
                address::encode32(&[0u8; 32]),
            ],
            recent_blockhash: address::encode32(&[9u8; 32]),
            instructions: vec![CompiledInstruction { program_id_index: 2, accounts: vec![0, 1], data: vec![2, 0, 0, 0] }],
        }
    }

    #[test]
    fn legacy_message_has_no_version_byte() {
        let bytes = serialize_message(&sample_tx()).unwrap();
        // header is 3 bytes, first byte of a v0 message would have the 0x80 bit set.
        assert_eq!(bytes[0] & 0x80, 0);
    }

    #[test]
    fn v0_message_sets_the_version_bit_and_appends_empty_lookup_table() {
        let mut tx = sample_tx();
        tx.version = Some(0);
        let bytes = serialize_message(&tx).unwrap();
        assert_eq!(bytes[0], 0x80);
        assert_eq!(*bytes.last().unwrap(), 0);
    }
}
