//! XRPL canonical binary serialisation: field headers (type code, field
//! code), variable-length prefixes, and the native/issued `Amount` shapes.
//! Covers exactly the fields `Payment` and `TrustSet` use, ordered the way
//! the canonical format requires — ascending by `(type code, field code)`.
//!
//! Simplifications: the variable-length prefix only implements the
//! single-byte form (lengths up to 192), which every field here stays
//! under; signatures are serialised as the raw 64-byte `r‖s` this engine's
//! closed signature taxonomy produces rather than DER.

use super::{address, raw::{XrpAmount, XrpRawTx, XrpTransactionData}};
use wallet_primitives::EngineError;

const TYPE_UINT16: u8 = 1;
const TYPE_UINT32: u8 = 2;
const TYPE_AMOUNT: u8 = 6;
const TYPE_BLOB: u8 = 7;
const TYPE_ACCOUNT_ID: u8 = 8;

const FIELD_TRANSACTION_TYPE: u8 = 2;
const FIELD_FLAGS: u8 = 2;
const FIELD_SEQUENCE: u8 = 4;
const FIELD_LAST_LEDGER_SEQUENCE: u8 = 27;
const FIELD_AMOUNT: u8 = 1;
const FIELD_LIMIT_AMOUNT: u8 = 3;
const FIELD_FEE: u8 = 8;
const FIELD_SIGNING_PUB_KEY: u8 = 3;
const FIELD_TXN_SIGNATURE: u8 = 4;
const FIELD_ACCOUNT: u8 = 1;
const FIELD_DESTINATION: u8 = 3;

const TRANSACTION_TYPE_PAYMENT: u16 = 0;
const TRANSACTION_TYPE_TRUST_SET: u16 = 20;

fn write_field_id(buf: &mut Vec<u8>, type_code: u8, field_code: u8) {
    if type_code < 16 && field_code < 16 {
        buf.push((type_code << 4) | field_code);
    } else if type_code < 16 {
        buf.push(type_code << 4);
        buf.push(field_code);
    } else if field_code < 16 {
        buf.push(field_code);
        buf.push(type_code);
    } else {
        buf.push(0);
        buf.push(type_code);
        buf.push(field_code);
    }
}

fn write_vl_length(buf: &mut Vec<u8>, length: usize) -> Result<(), EngineError> {
    if length > 192 {
        return Err(EngineError::Psbt { phase: "serialize", cause: "XRPL VL fields over 192 bytes are not supported".into() });
    }
    buf.push(length as u8);
    Ok(())
}

fn write_blob_field(buf: &mut Vec<u8>, type_code: u8, field_code: u8, bytes: &[u8]) -> Result<(), EngineError> {
    write_field_id(buf, type_code, field_code);
    write_vl_length(buf, bytes.len())?;
    buf.extend_from_slice(bytes);
    Ok(())
}

fn write_account_id_field(buf: &mut Vec<u8>, field_code: u8, address_str: &str) -> Result<(), EngineError> {
    let account_id = address::validate(&wallet_primitives::ChainAlias::new("xrpl"), address_str)?;
    write_blob_field(buf, TYPE_ACCOUNT_ID, field_code, &account_id)
}

fn write_uint16_field(buf: &mut Vec<u8>, field_code: u8, value: u16) {
    write_field_id(buf, TYPE_UINT16, field_code);
    buf.extend_from_slice(&value.to_be_bytes());
}

fn write_uint32_field(buf: &mut Vec<u8>, field_code: u8, value: u32) {
    write_field_id(buf, TYPE_UINT32, field_code);
    buf.extend_from_slice(&value.to_be_bytes());
}

/// Native-XRP amounts are 8 bytes big-endian with the top "not XRP" bit
/// clear and the "positive" bit set; issued-currency amounts are a 384-bit
/// mantissa/exponent plus a 20-byte currency code and 20-byte issuer.
fn encode_amount(amount: &XrpAmount) -> Result<Vec<u8>, EngineError> {
    match amount {
        XrpAmount::Native { drops } => {
            let value = 0x4000_0000_0000_0000u64 | drops;
            Ok(value.to_be_bytes().to_vec())
        }
        XrpAmount::Issued { value, currency, issuer } => {
            let parsed: f64 = value.parse().map_err(|_| EngineError::InvalidAmount { reason: "issued-currency amount must be numeric".into() })?;
            let negative = parsed < 0.0;
            let magnitude = parsed.abs();
            let (mantissa, exponent) = normalise_mantissa(magnitude);

            let mut header = 0x8000_0000_0000_0000u64; // "is XRP" bit clear, set below
            if !negative {
                header |= 0x4000_0000_0000_0000;
            }
            header |= ((exponent as i64 + 97) as u64) << 54;
            header |= mantissa & 0x003F_FFFF_FFFF_FFFF;

            let mut buf = header.to_be_bytes().to_vec();
            buf.extend_from_slice(&currency_code(currency));
            let issuer_id = address::validate(&wallet_primitives::ChainAlias::new("xrpl"), issuer)?;
            buf.extend_from_slice(&issuer_id);
            Ok(buf)
        }
    }
}

/// Normalises a positive decimal magnitude into a 54-bit mantissa and an
/// exponent in XRPL's supported range, by repeatedly scaling.
fn normalise_mantissa(mut magnitude: f64) -> (u64, i32) {
    if magnitude == 0.0 {
        return (0, 0);
    }
    let mut exponent = 0i32;
    while magnitude < 1_000_000_000_000_000.0 {
        magnitude *= 10.0;
        exponent -= 1;
    }
    while magnitude >= 10_000_000_000_000_000.0 {
        magnitude /= 10.0;
        exponent += 1;
    }
    (magnitude.round() as u64, exponent)
}

fn currency_code(currency: &str) -> [u8; 20] {
    let mut code = [0u8; 20];
    if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_uppercase()) {
        code[12..15].copy_from_slice(currency.as_bytes());
    }
    code
}

fn write_amount_field(buf: &mut Vec<u8>, field_code: u8, amount: &XrpAmount) -> Result<(), EngineError> {
    write_field_id(buf, TYPE_AMOUNT, field_code);
    buf.extend_from_slice(&encode_amount(amount)?);
    Ok(())
}

/// Serialises every field except `TxnSignature`, in canonical field order —
/// this is what the `0x53545800` STX-prefixed signing preimage covers.
pub fn serialize_for_signing(tx: &XrpRawTx) -> Result<Vec<u8>, EngineError> {
    let mut buf = Vec::new();
    let transaction_type = match tx.data {
        XrpTransactionData::Payment { .. } => TRANSACTION_TYPE_PAYMENT,
        XrpTransactionData::TrustSet { .. } => TRANSACTION_TYPE_TRUST_SET,
    };
    write_uint16_field(&mut buf, FIELD_TRANSACTION_TYPE, transaction_type);
    write_uint32_field(&mut buf, FIELD_FLAGS, 0);
    write_uint32_field(&mut buf, FIELD_SEQUENCE, tx.sequence);
    if let Some(last_ledger_sequence) = tx.last_ledger_sequence {
        write_uint32_field(&mut buf, FIELD_LAST_LEDGER_SEQUENCE, last_ledger_sequence);
    }

    match &tx.data {
        XrpTransactionData::Payment { amount, .. } => write_amount_field(&mut buf, FIELD_AMOUNT, amount)?,
        XrpTransactionData::TrustSet { limit_amount } => write_amount_field(&mut buf, FIELD_LIMIT_AMOUNT, limit_amount)?,
    }
    write_amount_field(&mut buf, FIELD_FEE, &XrpAmount::Native { drops: tx.fee_drops })?;
    write_blob_field(&mut buf, TYPE_BLOB, FIELD_SIGNING_PUB_KEY, &tx.signing_pub_key)?;
    write_account_id_field(&mut buf, FIELD_ACCOUNT, &tx.account)?;
    if let XrpTransactionData::Payment { destination, .. } = &tx.data {
        write_account_id_field(&mut buf, FIELD_DESTINATION, destination)?;
    }
    Ok(buf)
}

/// Serialises the full transaction including `TxnSignature`, for broadcast.
pub fn serialize_signed(tx: &XrpRawTx, signature: &[u8]) -> Result<Vec<u8>, EngineError> {
    let mut buf = serialize_for_signing(tx)?;
    write_blob_field(&mut buf, TYPE_BLOB, FIELD_TXN_SIGNATURE, signature)?;
    Ok(buf)
}
