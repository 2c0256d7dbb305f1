//! Protobuf encoding of `Transaction.raw_data` and its embedded
//! `Contract`/`Any` wrapper, built on `wallet_codec::protobuf`'s
//! varint/length-delimited writer rather than a full protobuf dependency.

use super::raw::{TvmContract, TvmRawTx};
use wallet_codec::protobuf::{write_bytes_field, write_varint_field};

const CONTRACT_TYPE_TRANSFER: u64 = 1;
const CONTRACT_TYPE_TRIGGER_SMART_CONTRACT: u64 = 31;
const CONTRACT_TYPE_CREATE_SMART_CONTRACT: u64 = 30;

fn encode_transfer_contract(owner_address: &[u8], to_address: &[u8], amount: i64) -> Vec<u8> {
    let mut buf = Vec::new();
    write_bytes_field(&mut buf, 1, owner_address);
    write_bytes_field(&mut buf, 2, to_address);
    write_varint_field(&mut buf, 3, amount as u64);
    buf
}

fn encode_trigger_smart_contract(owner_address: &[u8], contract_address: &[u8], data: &[u8], call_value: i64) -> Vec<u8> {
    let mut buf = Vec::new();
    write_bytes_field(&mut buf, 1, owner_address);
    write_bytes_field(&mut buf, 2, contract_address);
    write_varint_field(&mut buf, 3, call_value as u64);
    write_bytes_field(&mut buf, 4, data);
    buf
}

fn encode_create_smart_contract(owner_address: &[u8], bytecode: &[u8], call_value: i64) -> Vec<u8> {
    let mut new_contract = Vec::new();
    write_bytes_field(&mut new_contract, 4, bytecode);
    write_varint_field(&mut new_contract, 5, call_value as u64);

    let mut buf = Vec::new();
    write_bytes_field(&mut buf, 1, owner_address);
    write_bytes_field(&mut buf, 2, &new_contract);
    buf
}

fn contract_type_url(kind: u64) -> &'static str {
    match kind {
        CONTRACT_TYPE_TRANSFER => "type.googleapis.com/protocol.TransferContract",
        CONTRACT_TYPE_TRIGGER_SMART_CONTRACT => "type.googleapis.com/protocol.TriggerSmartContract",
        CONTRACT_TYPE_CREATE_SMART_CONTRACT => "type.googleapis.com/protocol.CreateSmartContract",
        _ => "type.googleapis.com/protocol.Unknown",
    }
}

fn encode_contract_wrapper(contract: &TvmContract) -> Vec<u8> {
    let (kind, parameter) = match contract {
        TvmContract::Transfer { owner_address, to_address, amount } => {
            (CONTRACT_TYPE_TRANSFER, encode_transfer_contract(owner_address, to_address, *amount))
        }
        TvmContract::TriggerSmartContract { owner_address, contract_address, data, call_value } => {
            (CONTRACT_TYPE_TRIGGER_SMART_CONTRACT, encode_trigger_smart_contract(owner_address, contract_address, data, *call_value))
        }
        TvmContract::CreateSmartContract { owner_address, bytecode, call_value } => {
            (CONTRACT_TYPE_CREATE_SMART_CONTRACT, encode_create_smart_contract(owner_address, bytecode, *call_value))
        }
    };

    let mut any = Vec::new();
    write_bytes_field(&mut any, 1, contract_type_url(kind).as_bytes());
    write_bytes_field(&mut any, 2, &parameter);

    let mut wrapper = Vec::new();
    write_varint_field(&mut wrapper, 1, kind);
    write_bytes_field(&mut wrapper, 2, &any);
    wrapper
}

/// Encodes `Transaction.raw_data`: the bytes whose SHA-256 is the txID.
pub fn encode_raw_data(tx: &TvmRawTx) -> Vec<u8> {
    let mut buf = Vec::new();
    write_bytes_field(&mut buf, 1, &tx.ref_block_bytes);
    write_bytes_field(&mut buf, 4, &tx.ref_block_hash);
    write_varint_field(&mut buf, 8, tx.expiration);
    write_bytes_field(&mut buf, 11, &encode_contract_wrapper(&tx.contract));
    write_varint_field(&mut buf, 14, tx.timestamp);
    if let Some(fee_limit) = tx.fee_limit {
        write_varint_field(&mut buf, 18, fee_limit);
    }
    buf
}

pub fn serialize_unsigned(tx: &TvmRawTx) -> String {
    hex::encode(encode_raw_data(tx))
}
