use super::token_transfer::{TokenStandard, TokenTransfer};
use crate::bindings::erc721::IERC721;
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Erc721Transfer {
    token: Address,
    from: Address,
    to: Address,
    token_id: U256,
}

impl Erc721Transfer {
    pub fn new(token: Address, from: Address, to: Address, token_id: U256) -> Self {
        Self {
            token,
            from,
            to,
            token_id,
        }
    }
}

impl TokenTransfer for Erc721Transfer {
    fn token(&self) -> Address {
        self.token
    }
    fn data(&self) -> Bytes {
        let bytes_data =
            IERC721::safeTransferFromCall::new((self.from, self.to, self.token_id)).abi_encode();
        Bytes::from(bytes_data)
    }
    fn standard(&self) -> TokenStandard {
        TokenStandard::Erc721
    }
    fn describe(&self) -> Value {
        json!({
            "action": "ERC721SafeTransferFrom",
            "token": self.token.to_string(),
            "from": self.from.to_string(),
            "to": self.to.to_string(),
            "token_id": self.token_id.to_string(),
        })
    }
}
