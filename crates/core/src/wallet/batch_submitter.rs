use crate::types::call::Call;
use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use eyre::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReceipt {
    /// Wallet assigned batch identifier.
    pub id: String,
    pub transaction_hashes: Vec<B256>,
}

/// The wallet's batch-call capability. Whether the calls land atomically is
/// up to the wallet and chain.
#[async_trait]
pub trait BatchSubmitter: Send + Sync {
    async fn send_calls(
        &self,
        chain_id: u64,
        from: Address,
        calls: Vec<Call>,
    ) -> Result<BatchReceipt>;
}
