pub mod batch_submitter;
pub mod chain_selector;
pub mod rpc_wallet;
pub mod submission;
pub mod wallet_connection;
