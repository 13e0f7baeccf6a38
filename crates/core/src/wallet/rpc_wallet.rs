use super::{
    batch_submitter::{BatchReceipt, BatchSubmitter},
    wallet_connection::{WalletConnection, WalletStatus},
};
use crate::types::{call::Call, config_wrapper::WalletSettings};
use alloy::primitives::{Address, B256};
use alloy::providers::Provider;
use async_trait::async_trait;
use eyre::{Result, eyre};
use log::{debug, info, warn};
use serde_json::{Value, json};

const SEND_CALLS_VERSION: &str = "2.0.0";

/// Final or in-flight state reported by `wallet_getCallsStatus`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallsStatus {
    Pending,
    Confirmed(Vec<B256>),
    Failed { code: u64 },
}

impl CallsStatus {
    pub fn failure_message(code: u64) -> &'static str {
        match code {
            400..=499 => "Batch was not included onchain",
            500..=599 => "Batch reverted",
            600..=699 => "Batch partially reverted",
            _ => "Batch failed",
        }
    }
}

/// Wallet reached over JSON-RPC, using EIP-5792 for batches.
pub struct RpcWallet<P> {
    provider: P,
    settings: WalletSettings,
}

impl<P> RpcWallet<P>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    pub fn new(provider: P, settings: WalletSettings) -> Self {
        Self { provider, settings }
    }

    async fn calls_status(&self, id: &str) -> Result<CallsStatus> {
        let response: Value = self
            .provider
            .raw_request("wallet_getCallsStatus".into(), (id.to_string(),))
            .await?;
        parse_calls_status(&response)
    }
}

#[async_trait]
impl<P> WalletConnection for RpcWallet<P>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    async fn status(&self) -> Result<WalletStatus> {
        let accounts = self.provider.get_accounts().await?;
        let Some(account) = accounts.first().copied() else {
            return Ok(WalletStatus::Disconnected);
        };
        let chain_id = self.provider.get_chain_id().await?;
        Ok(WalletStatus::Connected { account, chain_id })
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<()> {
        let _: Value = self
            .provider
            .raw_request(
                "wallet_switchEthereumChain".into(),
                (json!({ "chainId": format!("{:#x}", chain_id) }),),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<P> BatchSubmitter for RpcWallet<P>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    async fn send_calls(
        &self,
        chain_id: u64,
        from: Address,
        calls: Vec<Call>,
    ) -> Result<BatchReceipt> {
        let request =
            build_send_calls_request(chain_id, from, &calls, self.settings.atomic_required);
        debug!("wallet_sendCalls with {} call(s) on chain {}", calls.len(), chain_id);

        let response: Value = self
            .provider
            .raw_request("wallet_sendCalls".into(), (request,))
            .await?;
        let id = parse_batch_id(&response)?;
        info!("Batch {} accepted by wallet", id);

        for attempt in 0..self.settings.max_polls {
            match self.calls_status(&id).await? {
                CallsStatus::Pending => {
                    debug!("Batch {} pending (poll {})", id, attempt + 1);
                    tokio::time::sleep(self.settings.poll_interval).await;
                }
                CallsStatus::Confirmed(transaction_hashes) => {
                    info!("Batch {} confirmed", id);
                    return Ok(BatchReceipt {
                        id,
                        transaction_hashes,
                    });
                }
                CallsStatus::Failed { code } => {
                    return Err(eyre!(
                        "{} (batch {}, status {})",
                        CallsStatus::failure_message(code),
                        id,
                        code
                    ));
                }
            }
        }

        warn!(
            "Batch {} still pending after {} polls",
            id, self.settings.max_polls
        );
        Err(eyre!(
            "Batch {} still pending after {} status checks",
            id,
            self.settings.max_polls
        ))
    }
}

pub fn build_send_calls_request(
    chain_id: u64,
    from: Address,
    calls: &[Call],
    atomic_required: bool,
) -> Value {
    json!({
        "version": SEND_CALLS_VERSION,
        "chainId": format!("{:#x}", chain_id),
        "from": from,
        "atomicRequired": atomic_required,
        "calls": calls,
    })
}

/// Older wallets answer `wallet_sendCalls` with a bare id string.
fn parse_batch_id(response: &Value) -> Result<String> {
    response
        .get("id")
        .and_then(|id| id.as_str())
        .or_else(|| response.as_str())
        .map(|id| id.to_string())
        .ok_or_else(|| eyre!("wallet_sendCalls: batch id not found in response"))
}

pub fn parse_calls_status(response: &Value) -> Result<CallsStatus> {
    let status = response
        .get("status")
        .ok_or_else(|| eyre!("wallet_getCallsStatus: status not found in response"))?;

    let code = match status {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| eyre!("wallet_getCallsStatus: invalid status {}", n))?,
        // Pre 2.0 wallets report strings.
        Value::String(s) => match s.as_str() {
            "PENDING" => 100,
            "CONFIRMED" => 200,
            other => return Err(eyre!("wallet_getCallsStatus: unknown status {}", other)),
        },
        other => return Err(eyre!("wallet_getCallsStatus: invalid status {}", other)),
    };

    match code {
        100..=199 => Ok(CallsStatus::Pending),
        200..=299 => {
            let mut hashes = Vec::new();
            if let Some(receipts) = response.get("receipts").and_then(|r| r.as_array()) {
                for receipt in receipts {
                    if let Some(hash) = receipt.get("transactionHash").and_then(|h| h.as_str()) {
                        hashes.push(hash.parse::<B256>()?);
                    }
                }
            }
            Ok(CallsStatus::Confirmed(hashes))
        }
        _ => Ok(CallsStatus::Failed { code }),
    }
}
