pub mod bindings;
pub mod calldata;
pub mod composer;
pub mod types;
pub mod utils;
pub mod wallet;

pub use calldata::calldata_assistant::{AssistantField, CalldataAssistant, encode_transfer};
pub use calldata::error::CalldataError;
pub use calldata::token_transfer::{GeneratedCalldata, TokenStandard, TokenTransfer, TransferCall};
pub use composer::batch_composer::BatchComposer;
pub use composer::error::ComposerError;
pub use types::call::Call;
pub use types::config_wrapper::{AppConfig, ChainConfig, ConfigWrapper, WalletSettings};
pub use types::draft_transaction::{DraftTransaction, NO_DATA, TransactionField};
pub use wallet::batch_submitter::{BatchReceipt, BatchSubmitter};
pub use wallet::chain_selector::select_chain;
pub use wallet::rpc_wallet::RpcWallet;
pub use wallet::submission::{SubmissionStatus, wait_for_outcome};
pub use wallet::wallet_connection::{WalletConnection, WalletStatus};
