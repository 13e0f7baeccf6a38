use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// One call of an outgoing batch, shaped like an EIP-5792 call object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub to: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
}
