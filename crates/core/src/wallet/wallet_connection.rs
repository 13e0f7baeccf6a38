use alloy::primitives::Address;
use async_trait::async_trait;
use eyre::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletStatus {
    Disconnected,
    Connected { account: Address, chain_id: u64 },
}

impl WalletStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    pub fn chain_id(&self) -> Option<u64> {
        match self {
            Self::Connected { chain_id, .. } => Some(*chain_id),
            Self::Disconnected => None,
        }
    }

    pub fn account(&self) -> Option<Address> {
        match self {
            Self::Connected { account, .. } => Some(*account),
            Self::Disconnected => None,
        }
    }
}

/// Connection state and chain switching, owned by the wallet.
#[async_trait]
pub trait WalletConnection: Send + Sync {
    async fn status(&self) -> Result<WalletStatus>;
    async fn switch_chain(&self, chain_id: u64) -> Result<()>;
}
