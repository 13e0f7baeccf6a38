use super::wallet_connection::WalletConnection;
use crate::types::config_wrapper::AppConfig;
use eyre::{Result, eyre};
use log::{debug, info};

/// Asks the wallet to move to `chain_id`, which must be one of the configured
/// chains. Does nothing when the wallet is already there.
pub async fn select_chain<W>(config: &AppConfig, wallet: &W, chain_id: u64) -> Result<()>
where
    W: WalletConnection + ?Sized,
{
    let chain = config
        .chain(chain_id)
        .ok_or_else(|| eyre!("Chain {} is not configured", chain_id))?;

    let status = wallet.status().await?;
    if status.chain_id() == Some(chain_id) {
        debug!("Wallet already on {} ({})", chain.name, chain_id);
        return Ok(());
    }

    info!("Switching wallet to {} ({})", chain.name, chain_id);
    wallet.switch_chain(chain_id).await
}
