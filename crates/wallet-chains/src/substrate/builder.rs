//! Assembles a [`SubstrateRawTx`] from a [`TransferIntent`]. Only native
//! transfers are supported: `Balances::transfer_keep_alive(dest, value)`.
//!
//! Call indices aren't discovered from `state_getMetadata` — decoding
//! runtime metadata v14 is out of scope here — so the Balances pallet's
//! current index on Bittensor is hardcoded; see the design ledger.

use super::raw::{Era, SubstrateCall, SubstrateOverrides, SubstrateRawTx, DEFAULT_MORTAL_PERIOD};
use super::address;
use wallet_codec::scale::encode_compact;
use wallet_primitives::{ChainConfig, EngineError, TransferIntent};
use wallet_rpc::RpcCapability;

const BALANCES_PALLET_INDEX: u8 = 5;
const TRANSFER_KEEP_ALIVE_CALL_INDEX: u8 = 3;
const MULTI_ADDRESS_ID_VARIANT: u8 = 0x00;

async fn fetch_runtime_version(rpc: &dyn RpcCapability, rpc_url: &str) -> Result<(u32, u32), EngineError> {
    let result = rpc
        .rpc_call(rpc_url, "state_getRuntimeVersion", serde_json::json!([]))
        .await
        .map_err(|e| EngineError::Rpc { method: "state_getRuntimeVersion".into(), status: None, body: e.to_string() })?;
    let spec_version = result["specVersion"].as_u64().unwrap_or(0) as u32;
    let transaction_version = result["transactionVersion"].as_u64().unwrap_or(0) as u32;
    Ok((spec_version, transaction_version))
}

fn hex_to_hash(value: &str) -> [u8; 32] {
    let stripped = value.trim_start_matches("0x");
    let mut out = [0u8; 32];
    if let Ok(bytes) = hex::decode(stripped) {
        let len = bytes.len().min(32);
        out[..len].copy_from_slice(&bytes[..len]);
    }
    out
}

async fn fetch_block_hash(rpc: &dyn RpcCapability, rpc_url: &str, block_number: Option<u64>) -> Result<[u8; 32], EngineError> {
    let params = match block_number {
        Some(n) => serde_json::json!([n]),
        None => serde_json::json!([]),
    };
    let result = rpc
        .rpc_call(rpc_url, "chain_getBlockHash", params)
        .await
        .map_err(|e| EngineError::Rpc { method: "chain_getBlockHash".into(), status: None, body: e.to_string() })?;
    result.as_str().map(hex_to_hash).ok_or_else(|| EngineError::Rpc { method: "chain_getBlockHash".into(), status: None, body: "missing block hash".into() })
}

async fn fetch_header_number(rpc: &dyn RpcCapability, rpc_url: &str, block_hash: &[u8; 32]) -> Result<u64, EngineError> {
    let result = rpc
        .rpc_call(rpc_url, "chain_getHeader", serde_json::json!([format!("0x{}", hex::encode(block_hash))]))
        .await
        .map_err(|e| EngineError::Rpc { method: "chain_getHeader".into(), status: None, body: e.to_string() })?;
    let number_hex = result["number"].as_str().unwrap_or("0x0").trim_start_matches("0x").to_string();
    u64::from_str_radix(&number_hex, 16).map_err(|_| EngineError::Rpc { method: "chain_getHeader".into(), status: None, body: "invalid block number".into() })
}

async fn fetch_nonce(rpc: &dyn RpcCapability, rpc_url: &str, address_str: &str) -> Result<u64, EngineError> {
    let result = rpc
        .rpc_call(rpc_url, "system_accountNextIndex", serde_json::json!([address_str]))
        .await
        .map_err(|e| EngineError::Rpc { method: "system_accountNextIndex".into(), status: None, body: e.to_string() })?;
    result.as_u64().ok_or_else(|| EngineError::Rpc { method: "system_accountNextIndex".into(), status: None, body: "missing nonce".into() })
}

fn transfer_keep_alive_args(dest: &[u8; 32], value_planck: u128) -> Vec<u8> {
    let mut args = vec![MULTI_ADDRESS_ID_VARIANT];
    args.extend_from_slice(dest);
    args.extend_from_slice(&encode_compact(value_planck));
    args
}

pub async fn build(
    chain_config: &ChainConfig,
    intent: &TransferIntent,
    overrides: &SubstrateOverrides,
    rpc: &dyn RpcCapability,
) -> Result<SubstrateRawTx, EngineError> {
    let (from, to, value) = match intent {
        TransferIntent::NativeTransfer { from, to, value } => (from, to, value),
        other => return Err(EngineError::unsupported_operation(&chain_config.alias, format!("{other:?} is not supported on Substrate"))),
    };

    let signer_account_id = address::validate(&chain_config.alias, from, address::BITTENSOR_SS58_PREFIX)?;
    let dest_account_id = address::validate(&chain_config.alias, to, address::BITTENSOR_SS58_PREFIX)?;

    let (spec_version, transaction_version) = match (overrides.spec_version, overrides.transaction_version) {
        (Some(spec), Some(transaction)) => (spec, transaction),
        _ => fetch_runtime_version(rpc, &chain_config.rpc_url).await?,
    };
    let genesis_hash = match overrides.genesis_hash {
        Some(hash) => hash,
        None => fetch_block_hash(rpc, &chain_config.rpc_url, Some(0)).await?,
    };
    let (block_hash, era) = match overrides.era {
        Some(era) => (overrides.block_hash.unwrap_or(genesis_hash), era),
        None => {
            let block_hash = match overrides.block_hash {
                Some(hash) => hash,
                None => fetch_block_hash(rpc, &chain_config.rpc_url, None).await?,
            };
            let block_number = fetch_header_number(rpc, &chain_config.rpc_url, &block_hash).await?;
            (block_hash, Era::Mortal { period: DEFAULT_MORTAL_PERIOD, phase: block_number % DEFAULT_MORTAL_PERIOD })
        }
    };
    let nonce = match overrides.nonce {
        Some(nonce) => nonce,
        None => fetch_nonce(rpc, &chain_config.rpc_url, from).await?,
    };
    let tip = overrides.tip.unwrap_or(0);

    let value_planck: u128 = value.to_decimal_string().parse().map_err(|_| EngineError::InvalidAmount { reason: "Substrate balances must fit in u128 planck units".into() })?;

    Ok(SubstrateRawTx {
        call: SubstrateCall {
            pallet_index: BALANCES_PALLET_INDEX,
            call_index: TRANSFER_KEEP_ALIVE_CALL_INDEX,
            args: transfer_keep_alive_args(&dest_account_id, value_planck),
        },
        era,
        nonce,
        tip,
        spec_version,
        transaction_version,
        genesis_hash,
        block_hash,
        signer_account_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_primitives::{Amount, ChainAlias, Ecosystem, FeatureFlags, NativeCurrency};
    use wallet_rpc::mock::MockRpc;

    fn bittensor_config() -> ChainConfig {
        ChainConfig {
            alias: ChainAlias::new("bittensor"),
            ecosystem: Ecosystem::Substrate,
            rpc_url: "http://localhost".into(),
            native: NativeCurrency { symbol: "TAO".into(), decimals: 9 },
            features: FeatureFlags::default(),
        }
    }

    #[tokio::test]
    async fn native_transfer_uses_fetched_nonce_and_pinned_era() {
        let from = address::encode(&[0x11u8; 32], address::BITTENSOR_SS58_PREFIX);
        let to = address::encode(&[0x22u8; 32], address::BITTENSOR_SS58_PREFIX);
        let rpc = MockRpc::new()
            .with_response("state_getRuntimeVersion", serde_json::json!({"specVersion": 200, "transactionVersion": 5}))
            .with_response("chain_getBlockHash", serde_json::json!(format!("0x{}", hex::encode([0xaa; 32]))))
            .with_response("system_accountNextIndex", serde_json::json!(7));
        let intent = TransferIntent::NativeTransfer { from: from.clone(), to, value: Amount::from_u64(1_000_000_000) };
        let overrides = SubstrateOverrides { era: Some(Era::Immortal), ..Default::default() };
        let tx = build(&bittensor_config(), &intent, &overrides, &rpc).await.unwrap();
        assert_eq!(tx.nonce, 7);
        assert_eq!(tx.spec_version, 200);
        assert_eq!(tx.call.pallet_index, BALANCES_PALLET_INDEX);
    }
}
