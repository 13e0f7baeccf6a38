pub mod call;
pub mod config_wrapper;
pub mod draft_transaction;
