//! Assembles a [`TvmRawTx`] from a [`TransferIntent`], fetching the
//! reference block from `getnowblock` and stamping an expiration 60
//! minutes out.

use super::{
    address,
    raw::{TvmContract, TvmOverrides, TvmRawTx, DEFAULT_FEE_LIMIT_SUN, EXPIRATION_WINDOW_MS},
};
use wallet_primitives::{ChainConfig, EngineError, TransferIntent};
use wallet_rpc::RpcCapability;

const ERC20_TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

struct ReferenceBlock {
    ref_block_bytes: Vec<u8>,
    ref_block_hash: Vec<u8>,
    timestamp: u64,
}

async fn fetch_reference_block(rpc: &dyn RpcCapability, rpc_url: &str) -> Result<ReferenceBlock, EngineError> {
    let url = format!("{}/wallet/getnowblock", rpc_url.trim_end_matches('/'));
    let body = rpc
        .http_post(&url, Vec::new(), "application/json")
        .await
        .map_err(|e| EngineError::Rpc { method: "getnowblock".into(), status: None, body: e.to_string() })?;
    let parsed: serde_json::Value =
        serde_json::from_slice(&body).map_err(|e| EngineError::Rpc { method: "getnowblock".into(), status: None, body: e.to_string() })?;

    let block_number = parsed["block_header"]["raw_data"]["number"].as_u64().unwrap_or(0);
    let block_id = parsed["blockID"].as_str().unwrap_or_default();
    let block_id_bytes = hex::decode(block_id).unwrap_or_default();
    let timestamp = parsed["block_header"]["raw_data"]["timestamp"].as_u64().unwrap_or(0);

    // refBlockBytes = bytes [6,8) of the block number (big-endian u64);
    // refBlockHash = bytes [8,16) of the block id.
    let ref_block_bytes = block_number.to_be_bytes()[6..8].to_vec();
    let ref_block_hash = if block_id_bytes.len() >= 16 { block_id_bytes[8..16].to_vec() } else { vec![0u8; 8] };

    Ok(ReferenceBlock { ref_block_bytes, ref_block_hash, timestamp })
}

fn encode_erc20_transfer(to_identifier: &[u8; 20], amount: &wallet_primitives::Amount) -> Vec<u8> {
    let mut data = Vec::with_capacity(68);
    data.extend_from_slice(&ERC20_TRANSFER_SELECTOR);
    data.extend_from_slice(&[0u8; 12]);
    data.extend_from_slice(to_identifier);
    let value_bytes = amount.as_biguint().to_bytes_be();
    data.extend_from_slice(&vec![0u8; 32 - value_bytes.len()]);
    data.extend_from_slice(&value_bytes);
    data
}

pub async fn build(
    chain_config: &ChainConfig,
    intent: &TransferIntent,
    overrides: &TvmOverrides,
    rpc: &dyn RpcCapability,
) -> Result<TvmRawTx, EngineError> {
    let reference = fetch_reference_block(rpc, &chain_config.rpc_url).await?;
    let expiration = reference.timestamp + EXPIRATION_WINDOW_MS;

    let (contract, fee_limit) = match intent {
        TransferIntent::NativeTransfer { from, to, value } => {
            let owner = address::validate(&chain_config.alias, from)?;
            let recipient = address::validate(&chain_config.alias, to)?;
            let amount: i64 = value.to_decimal_string().parse().map_err(|_| EngineError::InvalidAmount { reason: "TRX amount must fit in i64 SUN".into() })?;
            (TvmContract::Transfer { owner_address: owner, to_address: recipient, amount }, None)
        }
        TransferIntent::TokenTransfer { from, to, token_contract, value, .. } => {
            let owner = address::validate(&chain_config.alias, from)?;
            let contract_address = address::validate(&chain_config.alias, token_contract)?;
            let to_identifier = address::identifier(&chain_config.alias, to)?;
            let data = encode_erc20_transfer(&to_identifier, value);
            (
                TvmContract::TriggerSmartContract { owner_address: owner, contract_address, data, call_value: 0 },
                Some(overrides.fee_limit.unwrap_or(DEFAULT_FEE_LIMIT_SUN)),
            )
        }
        TransferIntent::ContractCall { from, contract, data, .. } => {
            let owner = address::validate(&chain_config.alias, from)?;
            let contract_address = address::validate(&chain_config.alias, contract)?;
            (
                TvmContract::TriggerSmartContract { owner_address: owner, contract_address, data: data.clone(), call_value: 0 },
                Some(overrides.fee_limit.unwrap_or(DEFAULT_FEE_LIMIT_SUN)),
            )
        }
        TransferIntent::ContractDeploy { from, bytecode, .. } => {
            let owner = address::validate(&chain_config.alias, from)?;
            (
                TvmContract::CreateSmartContract { owner_address: owner, bytecode: bytecode.clone(), call_value: 0 },
                Some(overrides.fee_limit.unwrap_or(DEFAULT_FEE_LIMIT_SUN)),
            )
        }
    };

    Ok(TvmRawTx {
        ref_block_bytes: reference.ref_block_bytes,
        ref_block_hash: reference.ref_block_hash,
        expiration,
        timestamp: reference.timestamp,
        contract,
        fee_limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_primitives::{Amount, ChainAlias, Ecosystem, FeatureFlags, NativeCurrency};
    use wallet_rpc::mock::MockRpc;

    fn tron_config() -> ChainConfig {
        ChainConfig {
            alias: ChainAlias::new("tron"),
            ecosystem: Ecosystem::Tvm,
            rpc_url: "http://localhost".into(),
            native: NativeCurrency { symbol: "TRX".into(), decimals: 6 },
            features: FeatureFlags::default(),
        }
    }

    #[tokio::test]
    async fn native_transfer_carries_no_fee_limit() {
        let owner = address::encode(&[0x11u8; 20]);
        let to = address::encode(&[0x22u8; 20]);
        let rpc = MockRpc::new().with_http_response(
            "http://localhost/wallet/getnowblock",
            serde_json::to_vec(&serde_json::json!({
                "blockID": "0".repeat(16).to_string() + &"ab".repeat(8),
                "block_header": {"raw_data": {"number": 100, "timestamp": 1_700_000_000_000u64}},
            }))
            .unwrap(),
        );
        let intent = TransferIntent::NativeTransfer { from: owner.clone(), to: to.clone(), value: Amount::from_u64(1_000_000) };
        let tx = build(&tron_config(), &intent, &TvmOverrides::default(), &rpc).await.unwrap();
        assert_eq!(tx.fee_limit, None);
        assert_eq!(tx.expiration, tx.timestamp + EXPIRATION_WINDOW_MS);
    }

    #[tokio::test]
    async fn contract_deploy_defaults_the_fee_limit_to_one_thousand_trx() {
        let owner = address::encode(&[0x33u8; 20]);
        let rpc = MockRpc::new().with_http_response(
            "http://localhost/wallet/getnowblock",
            serde_json::to_vec(&serde_json::json!({
                "blockID": "0".repeat(16).to_string() + &"ab".repeat(8),
                "block_header": {"raw_data": {"number": 100, "timestamp": 1_700_000_000_000u64}},
            }))
            .unwrap(),
        );
        let intent = TransferIntent::ContractDeploy { from: owner.into(), bytecode: vec![0xde, 0xad], constructor_args: None };
        let tx = build(&tron_config(), &intent, &TvmOverrides::default(), &rpc).await.unwrap();
        assert_eq!(tx.fee_limit, Some(DEFAULT_FEE_LIMIT_SUN));
    }
}
