//! RLP encoding of the two EVM preimages:
//!
//! - legacy: `rlp([nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0])`
//! - type-2: `0x02 ‖ rlp([chainId, nonce, maxPriorityFeePerGas, maxFeePerGas, gasLimit, to, value, data, accessList])`
//!
//! Built on the `rlp` crate rather than hand-rolling an encoder.

use super::raw::{AccessListEntry, EvmRawTx};
use rlp::{Rlp, RlpStream};
use wallet_primitives::{Amount, EngineError};

fn append_address(stream: &mut RlpStream, address: &Option<String>) -> Result<(), EngineError> {
    match address {
        Some(addr) => {
            let bytes = hex::decode(addr.trim_start_matches("0x"))
                .map_err(|e| EngineError::InvalidAddress { chain_alias: "evm".into(), address: addr.clone(), reason: e.to_string() })?;
            stream.append(&bytes);
        }
        None => {
            stream.append_empty_data();
        }
    }
    Ok(())
}

fn amount_bytes(amount: &wallet_primitives::Amount) -> Vec<u8> {
    let bytes = amount.as_biguint().to_bytes_be();
    if bytes == [0] {
        Vec::new()
    } else {
        bytes
    }
}

/// Returns the bytes a legacy (type-0) transaction signs over (post
/// EIP-155: `chainId, 0, 0` appended as the trailing three fields).
pub fn legacy_preimage(tx: &EvmRawTx) -> Result<Vec<u8>, EngineError> {
    let mut stream = RlpStream::new_list(9);
    stream.append(&tx.nonce);
    stream.append(&amount_bytes(tx.gas_price.as_ref().unwrap_or(&wallet_primitives::Amount::zero())));
    stream.append(&tx.gas_limit);
    append_address(&mut stream, &tx.to)?;
    stream.append(&amount_bytes(&tx.value));
    stream.append(&tx.data);
    stream.append(&tx.chain_id);
    stream.append_empty_data();
    stream.append_empty_data();
    Ok(stream.out().to_vec())
}

/// Returns the bytes a type-2 (EIP-1559) transaction signs over, including
/// the leading `0x02` type byte.
pub fn eip1559_preimage(tx: &EvmRawTx) -> Result<Vec<u8>, EngineError> {
    let mut stream = RlpStream::new_list(9);
    stream.append(&tx.chain_id);
    stream.append(&tx.nonce);
    stream.append(&amount_bytes(tx.max_priority_fee_per_gas.as_ref().unwrap_or(&wallet_primitives::Amount::zero())));
    stream.append(&amount_bytes(tx.max_fee_per_gas.as_ref().unwrap_or(&wallet_primitives::Amount::zero())));
    stream.append(&tx.gas_limit);
    append_address(&mut stream, &tx.to)?;
    stream.append(&amount_bytes(&tx.value));
    stream.append(&tx.data);
    stream.begin_list(tx.access_list.len());
    for entry in &tx.access_list {
        stream.begin_list(2);
        let addr_bytes = hex::decode(entry.address.trim_start_matches("0x")).unwrap_or_default();
        stream.append(&addr_bytes);
        stream.begin_list(entry.storage_keys.len());
        for key in &entry.storage_keys {
            let key_bytes = hex::decode(key.trim_start_matches("0x")).unwrap_or_default();
            stream.append(&key_bytes);
        }
    }

    let mut out = vec![0x02u8];
    out.extend_from_slice(&stream.out());
    Ok(out)
}

/// The bytes a caller sees as `UnsignedTransaction.serialized`: the
/// unsigned preimage, hex-encoded with a `0x` prefix. Re-decoding it must
/// reconstruct an equal `raw`.
pub fn serialize_unsigned(tx: &EvmRawTx) -> Result<String, EngineError> {
    let bytes = if tx.is_eip1559() { eip1559_preimage(tx)? } else { legacy_preimage(tx)? };
    Ok(format!("0x{}", hex::encode(bytes)))
}

fn rlp_item_to_address(rlp: &Rlp) -> Result<Option<String>, EngineError> {
    let bytes: Vec<u8> = rlp.as_val().map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?;
    if bytes.is_empty() { Ok(None) } else { Ok(Some(format!("0x{}", hex::encode(bytes)))) }
}

fn rlp_item_to_amount(rlp: &Rlp) -> Result<Amount, EngineError> {
    let bytes: Vec<u8> = rlp.as_val().map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?;
    Ok(Amount::from_bytes_be(&bytes))
}

/// Parses the bytes a caller sees as `UnsignedTransaction.serialized` back
/// into an [`EvmRawTx`]. `0x02`-prefixed input is a type-2 (EIP-1559)
/// preimage; anything else is the 9-field legacy preimage. Re-encoding the
/// result with [`serialize_unsigned`] reproduces the original bytes.
pub fn parse_unsigned(serialized: &str) -> Result<EvmRawTx, EngineError> {
    let bytes = hex::decode(serialized.trim_start_matches("0x"))
        .map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?;

    if bytes.first() == Some(&0x02) {
        let rlp = Rlp::new(&bytes[1..]);
        let chain_id: u64 = rlp.val_at(0).map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?;
        let nonce: u64 = rlp.val_at(1).map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?;
        let max_priority_fee_per_gas = rlp_item_to_amount(&rlp.at(2).map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?)?;
        let max_fee_per_gas = rlp_item_to_amount(&rlp.at(3).map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?)?;
        let gas_limit: u64 = rlp.val_at(4).map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?;
        let to = rlp_item_to_address(&rlp.at(5).map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?)?;
        let value = rlp_item_to_amount(&rlp.at(6).map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?)?;
        let data: Vec<u8> = rlp.val_at(7).map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?;
        let access_list_rlp = rlp.at(8).map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?;
        let mut access_list = Vec::new();
        for entry in access_list_rlp.iter() {
            let addr_bytes: Vec<u8> = entry.val_at(0).map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?;
            let keys_rlp = entry.at(1).map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?;
            let storage_keys = keys_rlp
                .iter()
                .map(|k| -> Result<String, EngineError> {
                    let bytes: Vec<u8> = k.as_val().map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?;
                    Ok(format!("0x{}", hex::encode(bytes)))
                })
                .collect::<Result<Vec<_>, _>>()?;
            access_list.push(AccessListEntry { address: format!("0x{}", hex::encode(addr_bytes)), storage_keys });
        }

        Ok(EvmRawTx {
            chain_id,
            nonce,
            to,
            value,
            data,
            gas_limit,
            gas_price: None,
            max_fee_per_gas: Some(max_fee_per_gas),
            max_priority_fee_per_gas: Some(max_priority_fee_per_gas),
            access_list,
        })
    } else {
        let rlp = Rlp::new(&bytes);
        let nonce: u64 = rlp.val_at(0).map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?;
        let gas_price = rlp_item_to_amount(&rlp.at(1).map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?)?;
        let gas_limit: u64 = rlp.val_at(2).map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?;
        let to = rlp_item_to_address(&rlp.at(3).map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?)?;
        let value = rlp_item_to_amount(&rlp.at(4).map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?)?;
        let data: Vec<u8> = rlp.val_at(5).map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?;
        let chain_id: u64 = rlp.val_at(6).map_err(|e| EngineError::InvalidTransactionHash(e.to_string()))?;

        Ok(EvmRawTx {
            chain_id,
            nonce,
            to,
            value,
            data,
            gas_limit,
            gas_price: Some(gas_price),
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
            access_list: vec![],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evm::raw::EvmRawTx;
    use wallet_primitives::Amount;

    fn sample_erc20_tx() -> EvmRawTx {
        let mut data = hex::decode("a9059cbb").unwrap();
        data.extend_from_slice(&[0u8; 11]);
        data.extend_from_slice(&hex::decode("00000000000000000000000000000000000000aa").unwrap());
        data.extend_from_slice(&hex::decode("00000000000000000000000000000000000000000000000000000000000f4240").unwrap());
        EvmRawTx {
            chain_id: 1,
            nonce: 0,
            to: Some("0x0000000000000000000000000000000000000000".to_string()),
            value: Amount::zero(),
            data,
            gas_limit: 65_000,
            gas_price: None,
            max_fee_per_gas: Some(Amount::from_u64(30_000_000_000)),
            max_priority_fee_per_gas: Some(Amount::from_u64(1_000_000_000)),
            access_list: vec![],
        }
    }

    #[test]
    fn eip1559_preimage_round_trips_through_hex() {
        let tx = sample_erc20_tx();
        let serialized = serialize_unsigned(&tx).unwrap();
        assert!(serialized.starts_with("0x02"));
    }

    #[test]
    fn eip1559_serialized_form_parses_back_to_an_equal_raw_tx() {
        let tx = sample_erc20_tx();
        let serialized = serialize_unsigned(&tx).unwrap();
        let parsed = parse_unsigned(&serialized).unwrap();
        assert_eq!(parsed, tx);
        assert_eq!(serialize_unsigned(&parsed).unwrap(), serialized);
    }

    #[test]
    fn legacy_serialized_form_parses_back_to_an_equal_raw_tx() {
        let tx = EvmRawTx {
            chain_id: 1,
            nonce: 7,
            to: Some("0x0000000000000000000000000000000000000002".to_string()),
            value: Amount::from_u64(42),
            data: vec![],
            gas_limit: 21_000,
            gas_price: Some(Amount::from_u64(20_000_000_000)),
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
            access_list: vec![],
        };
        let serialized = serialize_unsigned(&tx).unwrap();
        assert!(!serialized.starts_with("0x02"));
        let parsed = parse_unsigned(&serialized).unwrap();
        assert_eq!(parsed, tx);
        assert_eq!(serialize_unsigned(&parsed).unwrap(), serialized);
    }
}
