//! Assembles an [`SvmRawTx`] from a [`TransferIntent`]: a System Program
//! transfer instruction for native transfers, an SPL Token transfer
//! instruction (against PDA-derived associated token accounts) for token
//! transfers.

use super::{
    address::{self, SPL_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID},
    raw::{CompiledInstruction, MessageHeader, SvmOverrides, SvmRawTx},
};
use wallet_primitives::{Amount, ChainConfig, EngineError, TransferIntent};
use wallet_rpc::RpcCapability;

async fn fetch_recent_blockhash(rpc: &dyn RpcCapability, rpc_url: &str) -> Result<String, EngineError> {
    let result = rpc
        .rpc_call(rpc_url, "getLatestBlockhash", serde_json::json!([{"commitment": "finalized"}]))
        .await
        .map_err(|e| EngineError::Rpc { method: "getLatestBlockhash".into(), status: None, body: e.to_string() })?;
    result["value"]["blockhash"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| EngineError::Rpc { method: "getLatestBlockhash".into(), status: None, body: "missing blockhash".into() })
}

fn system_transfer_instruction(account_keys: &[String], from_index: u8, to_index: u8, program_index: u8, lamports: &Amount) -> CompiledInstruction {
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&2u32.to_le_bytes());
    let lamports_u64: u64 = lamports.to_decimal_string().parse().unwrap_or(0);
    data.extend_from_slice(&lamports_u64.to_le_bytes());
    let _ = account_keys;
    CompiledInstruction { program_id_index: program_index, accounts: vec![from_index, to_index], data }
}

fn spl_transfer_instruction(source_index: u8, dest_index: u8, authority_index: u8, program_index: u8, amount: &Amount) -> CompiledInstruction {
    let mut data = Vec::with_capacity(9);
    data.push(3u8); // Transfer
    let amount_u64: u64 = amount.to_decimal_string().parse().unwrap_or(0);
    data.extend_from_slice(&amount_u64.to_le_bytes());
    CompiledInstruction { program_id_index: program_index, accounts: vec![source_index, dest_index, authority_index], data }
}

pub async fn build(
    chain_config: &ChainConfig,
    intent: &TransferIntent,
    overrides: &SvmOverrides,
    rpc: &dyn RpcCapability,
) -> Result<SvmRawTx, EngineError> {
    let recent_blockhash = match &overrides.recent_blockhash {
        Some(hash) => hash.clone(),
        None => fetch_recent_blockhash(rpc, &chain_config.rpc_url).await?,
    };
    let version = if overrides.use_versioned_message { Some(0) } else { None };

    match intent {
        TransferIntent::NativeTransfer { from, to, value } => {
            address::validate(&chain_config.alias, from)?;
            address::validate(&chain_config.alias, to)?;
            let account_keys = vec![from.clone(), to.clone(), SYSTEM_PROGRAM_ID.to_string()];
            let instruction = system_transfer_instruction(&account_keys, 0, 1, 2, value);
            Ok(SvmRawTx {
                version,
                header: MessageHeader { num_required_signatures: 1, num_readonly_signed_accounts: 0, num_readonly_unsigned_accounts: 1 },
                account_keys,
                recent_blockhash,
                instructions: vec![instruction],
            })
        }
        TransferIntent::TokenTransfer { from, to, token_contract, value, .. } => {
            address::validate(&chain_config.alias, from)?;
            address::validate(&chain_config.alias, to)?;
            address::validate(&chain_config.alias, token_contract)?;
            let source_ata = address::derive_associated_token_account(from, token_contract)?;
            let dest_ata = address::derive_associated_token_account(to, token_contract)?;
            let account_keys = vec![from.clone(), source_ata, dest_ata, SPL_TOKEN_PROGRAM_ID.to_string()];
            let instruction = spl_transfer_instruction(1, 2, 0, 3, value);
            Ok(SvmRawTx {
                version,
                header: MessageHeader { num_required_signatures: 1, num_readonly_signed_accounts: 0, num_readonly_unsigned_accounts: 1 },
                account_keys,
                recent_blockhash,
                instructions: vec![instruction],
            })
        }
        TransferIntent::ContractCall { from, contract, data, .. } => {
            address::validate(&chain_config.alias, from)?;
            address::validate(&chain_config.alias, contract)?;
            let account_keys = vec![from.clone(), contract.clone()];
            let instruction = CompiledInstruction { program_id_index: 1, accounts: vec![0], data: data.clone() };
            Ok(SvmRawTx {
                version,
                header: MessageHeader { num_required_signatures: 1, num_readonly_signed_accounts: 0, num_readonly_unsigned_accounts: 1 },
                account_keys,
                recent_blockhash,
                instructions: vec![instruction],
            })
        }
        TransferIntent::ContractDeploy { .. } => Err(EngineError::unsupported_operation(&chain_config.alias, "contract_deploy")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_primitives::{ChainAlias, Ecosystem, FeatureFlags, NativeCurrency};
    use wallet_rpc::mock::MockRpc;

    fn solana_config() -> ChainConfig {
        ChainConfig {
            alias: ChainAlias::new("solana"),
            ecosystem: Ecosystem::Svm,
            rpc_url: "http://localhost".into(),
            native: NativeCurrency { symbol: "SOL".into(), decimals: 9 },
            features: FeatureFlags::default(),
        }
    }

    #[tokio::test]
    async fn native_transfer_has_one_system_program_instruction() {
        let rpc = MockRpc::new().with_response(
            "getLatestBlockhash",
            serde_json::json!({"value": {"blockhash": address::encode32(&[9u8; 32])}}),
        );
        let intent = TransferIntent::NativeTransfer {
            from: address::encode32(&[1u8; 32]),
            to: address::encode32(&[2u8; 32]),
            value: Amount::from_u64(1_000_000_000),
        };
        let tx = build(&solana_config(), &intent, &SvmOverrides::default(), &rpc).await.unwrap();
        assert_eq!(tx.instructions.len(), 1);
        assert_eq!(tx.account_keys.last().unwrap(), SYSTEM_PROGRAM_ID);
    }
}
