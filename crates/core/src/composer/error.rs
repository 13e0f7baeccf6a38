use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposerError {
    #[error("BatchComposer: cannot remove the last transaction")]
    LastEntry,
    #[error("BatchComposer: no transaction at index {0}")]
    IndexOutOfRange(usize),
    #[error("BatchComposer: wallet is not connected")]
    WalletDisconnected,
    #[error("BatchComposer: no valid transactions to send")]
    NothingToSubmit,
    #[error("BatchComposer: a batch submission is already pending")]
    SubmissionPending,
    #[error("BatchComposer: no async runtime to send the batch on")]
    NoRuntime,
    #[error("Transaction {}: invalid value {value:?}: {reason}", .index + 1)]
    InvalidValue {
        index: usize,
        value: String,
        reason: String,
    },
    #[error("Transaction {}: invalid calldata {data:?}", .index + 1)]
    InvalidData { index: usize, data: String },
}
