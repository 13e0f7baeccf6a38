use super::token_transfer::{TokenStandard, TokenTransfer};
use crate::bindings::erc1155::IERC1155;
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use serde_json::{Value, json};

/// `safeTransferFrom` on a multi-token contract, always with empty `data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Erc1155Transfer {
    token: Address,
    from: Address,
    to: Address,
    id: U256,
    amount: U256,
}

impl Erc1155Transfer {
    pub fn new(token: Address, from: Address, to: Address, id: U256, amount: U256) -> Self {
        Self {
            token,
            from,
            to,
            id,
            amount,
        }
    }
}

impl TokenTransfer for Erc1155Transfer {
    fn token(&self) -> Address {
        self.token
    }
    fn data(&self) -> Bytes {
        let bytes_data = IERC1155::safeTransferFromCall::new((
            self.from,
            self.to,
            self.id,
            self.amount,
            Bytes::new(),
        ))
        .abi_encode();
        Bytes::from(bytes_data)
    }
    fn standard(&self) -> TokenStandard {
        TokenStandard::Erc1155
    }
    fn describe(&self) -> Value {
        json!({
            "action": "ERC1155SafeTransferFrom",
            "token": self.token.to_string(),
            "from": self.from.to_string(),
            "to": self.to.to_string(),
            "id": self.id.to_string(),
            "amount": self.amount.to_string(),
        })
    }
}
