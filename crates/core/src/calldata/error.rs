use thiserror::Error;

pub const GENERIC_ENCODING_ERROR: &str = "Failed to generate calldata";

/// Reasons the calldata assistant refuses to produce call data. The display
/// strings are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalldataError {
    #[error("Invalid token contract address")]
    InvalidTokenAddress,
    #[error("Invalid recipient address")]
    InvalidRecipient,
    #[error("Invalid from address")]
    InvalidFromAddress,
    #[error("Invalid token ID")]
    InvalidTokenId,
    #[error("Invalid amount")]
    InvalidAmount,
    #[error("{0}")]
    Encoding(String),
}

impl CalldataError {
    pub fn encoding(message: impl ToString) -> Self {
        let message = message.to_string();
        if message.trim().is_empty() {
            Self::Encoding(GENERIC_ENCODING_ERROR.to_string())
        } else {
            Self::Encoding(message)
        }
    }
}
