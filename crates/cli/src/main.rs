use alloy::providers::ProviderBuilder;
use batch_core::{
    AppConfig, BatchComposer, CalldataAssistant, ConfigWrapper, GeneratedCalldata, RpcWallet,
    SubmissionStatus, TokenStandard, TokenTransfer, WalletConnection, select_chain,
    types::config_wrapper::DEFAULT_CONFIG_PATH, wait_for_outcome,
};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use eyre::{Result, eyre};
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML config file (defaults to ./config.toml when present)
    #[arg(long = "config", short = 'c', global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the configured chains
    Chains,
    /// Generate token transfer calldata
    Calldata {
        #[command(subcommand)]
        transfer: Transfer,

        /// Append the calldata as a transaction to this batch file
        #[arg(long = "batch", short = 'b', global = true)]
        batch_path: Option<String>,
    },
    /// Print the calls that would be sent for a batch file
    Build {
        /// Path to the batch JSON file
        #[arg(long = "batch", short = 'b')]
        batch_path: String,
    },
    /// Send a batch file through the wallet's batch-call capability
    Send {
        /// Path to the batch JSON file
        #[arg(long = "batch", short = 'b')]
        batch_path: String,

        /// Chain ID to send on (defaults to the configured default chain)
        #[arg(long = "chain", short = 'n')]
        chain_id: Option<u64>,
    },
}

#[derive(Subcommand)]
enum Transfer {
    /// transfer(address,uint256), amount in tokens assuming 18 decimals
    Erc20 {
        #[arg(long = "token")]
        token: String,
        #[arg(long = "to")]
        to: String,
        #[arg(long = "amount")]
        amount: String,
    },
    /// safeTransferFrom(address,address,uint256)
    Erc721 {
        #[arg(long = "token")]
        token: String,
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
        #[arg(long = "token-id")]
        token_id: String,
    },
    /// safeTransferFrom(address,address,uint256,uint256,bytes)
    Erc1155 {
        #[arg(long = "token")]
        token: String,
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
        #[arg(long = "token-id")]
        token_id: String,
        #[arg(long = "amount")]
        amount: String,
    },
}

impl Transfer {
    // Missing fields stay empty so the assistant reports them in its usual order.
    fn into_assistant(self) -> CalldataAssistant {
        match self {
            Transfer::Erc20 { token, to, amount } => CalldataAssistant {
                standard: TokenStandard::Erc20,
                token,
                recipient: to,
                amount,
                ..CalldataAssistant::default()
            },
            Transfer::Erc721 {
                token,
                from,
                to,
                token_id,
            } => CalldataAssistant {
                standard: TokenStandard::Erc721,
                token,
                recipient: to,
                from,
                token_id,
                ..CalldataAssistant::default()
            },
            Transfer::Erc1155 {
                token,
                from,
                to,
                token_id,
                amount,
            } => CalldataAssistant {
                standard: TokenStandard::Erc1155,
                token,
                recipient: to,
                from,
                token_id,
                amount,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    dotenv().ok(); // Load environment variables from .env file

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Chains => {
            for chain in &config.chains {
                let marker = if chain.id == config.default_chain {
                    " (default)"
                } else {
                    ""
                };
                println!("{:>8}  {}{}", chain.id, chain.name, marker);
            }
        }
        Commands::Calldata {
            transfer,
            batch_path,
        } => {
            let call = transfer.into_assistant().validate()?;
            let generated = GeneratedCalldata::from(&call);

            println!("\n## Call");
            println!("```json");
            println!(
                "{}",
                serde_json::to_string_pretty(&call.as_trait_object().describe())?
            );
            println!("```");
            println!("\n## Target");
            println!("`{}`", generated.token);
            println!("\n## Calldata");
            println!("`0x{}`", hex::encode(&generated.data));

            if let Some(path) = batch_path {
                let mut composer = if Path::new(&path).exists() {
                    BatchComposer::from_json_str(&fs::read_to_string(&path)?)?
                } else {
                    BatchComposer::new()
                };

                // Reuse a trailing untouched row, otherwise start a new one.
                let last = composer.len() - 1;
                let index = if composer.entries()[last].is_blank() {
                    last
                } else {
                    composer.add_entry()
                };
                composer.apply_generated(index, &generated)?;

                fs::write(&path, composer.to_json_pretty()?)?;
                println!("\nSaved as transaction {} in: {}", index + 1, path);
            }
        }
        Commands::Build { batch_path } => {
            let composer = read_batch(&batch_path)?;
            print_batch_summary(&composer)?;
        }
        Commands::Send {
            batch_path,
            chain_id,
        } => {
            let composer = read_batch(&batch_path)?;
            print_batch_summary(&composer)?;

            let chain_id = chain_id.unwrap_or(config.default_chain);
            let endpoint = config.endpoint_for(chain_id)?;
            let provider = ProviderBuilder::new().on_builtin(&endpoint).await?;
            let wallet = Arc::new(RpcWallet::new(provider, config.wallet.clone()));

            select_chain(&config, wallet.as_ref(), chain_id).await?;

            let status = wallet.status().await?;
            if !composer.can_submit(&status) {
                return Err(eyre!(
                    "Cannot send: connect a wallet and add at least one valid transaction"
                ));
            }

            let mut receiver = composer.submit(&status, wallet.clone())?;
            if let Some(account) = status.account() {
                println!("\nSending batch from {} on chain {}...", account, chain_id);
            }

            match wait_for_outcome(&mut receiver).await? {
                SubmissionStatus::Succeeded(receipt) => {
                    println!("Batch transaction sent successfully!");
                    println!("\n## Batch ID");
                    println!("`{}`", receipt.id);
                    if !receipt.transaction_hashes.is_empty() {
                        println!("\n## Transactions");
                        for (i, hash) in receipt.transaction_hashes.iter().enumerate() {
                            println!("{}. {}", i + 1, hash);
                        }
                    }
                }
                SubmissionStatus::Failed { message } => return Err(eyre!(message)),
                other => return Err(eyre!("Unexpected submission status: {:?}", other)),
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&str>) -> Result<AppConfig> {
    match path {
        Some(p) => ConfigWrapper::from_file(Some(p))?.app_config(),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            ConfigWrapper::from_file(None)?.app_config()
        }
        None => Ok(AppConfig::default()),
    }
}

fn read_batch(path: &str) -> Result<BatchComposer> {
    let file_content = fs::read_to_string(path)?;
    BatchComposer::from_json_str(&file_content)
}

// Helper function to print the valid calls of a batch
fn print_batch_summary(composer: &BatchComposer) -> Result<()> {
    let calls = composer.build_batch()?;
    let skipped = composer.len() - calls.len();

    println!("\n# Batch Summary");
    println!(
        "\n{} of {} transaction(s) will be sent",
        calls.len(),
        composer.len()
    );
    if skipped > 0 {
        println!("{} incomplete transaction(s) skipped", skipped);
    }

    println!("\n## Calls");
    println!("```json");
    println!("{}", serde_json::to_string_pretty(&calls)?);
    println!("```");

    Ok(())
}
