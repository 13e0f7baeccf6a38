use super::token_transfer::{TokenStandard, TokenTransfer};
use crate::bindings::erc20::IERC20;
use alloy::primitives::{Address, Bytes, U256, utils::format_ether};
use alloy::sol_types::SolCall;
use serde_json::{Value, json};

/// `transfer(address,uint256)` on a fungible token. `amount` is already in
/// the token's smallest unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Erc20Transfer {
    token: Address,
    to: Address,
    amount: U256,
}

impl Erc20Transfer {
    pub fn new(token: Address, to: Address, amount: U256) -> Self {
        Self { token, to, amount }
    }
}

impl TokenTransfer for Erc20Transfer {
    fn token(&self) -> Address {
        self.token
    }
    fn data(&self) -> Bytes {
        let bytes_data = IERC20::transferCall::new((self.to, self.amount)).abi_encode();
        Bytes::from(bytes_data)
    }
    fn standard(&self) -> TokenStandard {
        TokenStandard::Erc20
    }
    fn describe(&self) -> Value {
        json!({
            "action": "ERC20Transfer",
            "token": self.token.to_string(),
            "to": self.to.to_string(),
            "amount": self.amount.to_string(),
            // Display only, assumes 18 decimals.
            "amount_tokens": format_ether(self.amount),
        })
    }
}
