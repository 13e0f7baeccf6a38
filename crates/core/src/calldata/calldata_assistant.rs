use super::{
    erc20_transfer::Erc20Transfer,
    erc721_transfer::Erc721Transfer,
    erc1155_transfer::Erc1155Transfer,
    error::CalldataError,
    token_transfer::{GeneratedCalldata, TokenStandard, TransferCall},
};
use crate::utils::address::parse_address;
use alloy::primitives::{Address, U256, utils::parse_ether};
use log::debug;
use serde::{Deserialize, Serialize};

/// Form state for generating token transfer call data. All fields hold raw
/// input; nothing is checked until [`CalldataAssistant::generate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalldataAssistant {
    pub standard: TokenStandard,
    pub token: String,
    pub recipient: String,
    /// Token owner, used by ERC721 and ERC1155.
    pub from: String,
    pub token_id: String,
    /// Token units for ERC20 (18 decimals assumed), raw integer for ERC1155.
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantField {
    Token(String),
    Recipient(String),
    From(String),
    TokenId(String),
    Amount(String),
}

impl CalldataAssistant {
    pub fn new(standard: TokenStandard) -> Self {
        Self {
            standard,
            ..Self::default()
        }
    }

    pub fn set_standard(&mut self, standard: TokenStandard) {
        self.standard = standard;
    }

    pub fn update_field(&mut self, field: AssistantField) {
        match field {
            AssistantField::Token(v) => self.token = v,
            AssistantField::Recipient(v) => self.recipient = v,
            AssistantField::From(v) => self.from = v,
            AssistantField::TokenId(v) => self.token_id = v,
            AssistantField::Amount(v) => self.amount = v,
        }
    }

    /// Checks the fields in order and builds the transfer call. The first
    /// failing check decides the error.
    pub fn validate(&self) -> Result<TransferCall, CalldataError> {
        let token = parse_address(&self.token).ok_or(CalldataError::InvalidTokenAddress)?;
        let to = parse_address(&self.recipient).ok_or(CalldataError::InvalidRecipient)?;

        match self.standard {
            TokenStandard::Erc20 => {
                if !is_positive_amount(&self.amount) {
                    return Err(CalldataError::InvalidAmount);
                }
                // Always 18 decimals, whatever the token actually uses.
                let amount = parse_ether(&self.amount).map_err(CalldataError::encoding)?;
                Ok(TransferCall::Erc20(Erc20Transfer::new(token, to, amount)))
            }
            TokenStandard::Erc721 => {
                let from = self.parse_from()?;
                let token_id = self.parse_token_id()?;
                Ok(TransferCall::Erc721(Erc721Transfer::new(
                    token, from, to, token_id,
                )))
            }
            TokenStandard::Erc1155 => {
                let from = self.parse_from()?;
                let id = self.parse_token_id()?;
                if !is_positive_amount(&self.amount) {
                    return Err(CalldataError::InvalidAmount);
                }
                let amount = parse_uint(&self.amount).ok_or(CalldataError::InvalidAmount)?;
                Ok(TransferCall::Erc1155(Erc1155Transfer::new(
                    token, from, to, id, amount,
                )))
            }
        }
    }

    /// Validates and encodes the form. On success the form fields are cleared
    /// (the selected standard is kept); on failure the form is left untouched.
    pub fn generate(&mut self) -> Result<GeneratedCalldata, CalldataError> {
        let call = self.validate()?;
        let generated = GeneratedCalldata::from(&call);
        debug!(
            "Generated {} calldata for token {} ({} bytes)",
            self.standard,
            generated.token,
            generated.data.len()
        );
        self.reset();
        Ok(generated)
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.standard);
    }

    fn parse_from(&self) -> Result<Address, CalldataError> {
        parse_address(&self.from).ok_or(CalldataError::InvalidFromAddress)
    }

    fn parse_token_id(&self) -> Result<U256, CalldataError> {
        parse_uint(&self.token_id).ok_or(CalldataError::InvalidTokenId)
    }
}

/// Pure form of [`CalldataAssistant::generate`].
pub fn encode_transfer(form: &CalldataAssistant) -> Result<GeneratedCalldata, CalldataError> {
    form.validate().map(|call| GeneratedCalldata::from(&call))
}

fn is_positive_amount(amount: &str) -> bool {
    amount
        .parse::<f64>()
        .map(|v| v.is_finite() && v > 0.0)
        .unwrap_or(false)
}

/// Decimal string to uint256, digits only.
fn parse_uint(s: &str) -> Option<U256> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_str_radix(s, 10).ok()
}
