use super::{
    erc20_transfer::Erc20Transfer, erc721_transfer::Erc721Transfer,
    erc1155_transfer::Erc1155Transfer,
};
use alloy::primitives::{Address, Bytes};
use eyre::{Result, eyre};
use into_trait::IntoTraitObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A token transfer call that can be placed into a batch entry.
pub trait TokenTransfer: Send + Sync {
    /// The token contract the call is sent to.
    fn token(&self) -> Address;
    fn data(&self) -> Bytes; // encode to call data
    fn standard(&self) -> TokenStandard;
    fn describe(&self) -> Value;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenStandard {
    #[default]
    #[serde(rename = "ERC20", alias = "erc20")]
    Erc20,
    #[serde(rename = "ERC721", alias = "erc721")]
    Erc721,
    #[serde(rename = "ERC1155", alias = "erc1155")]
    Erc1155,
}

impl TokenStandard {
    pub const ALL: [TokenStandard; 3] = [Self::Erc20, Self::Erc721, Self::Erc1155];

    pub fn function_signature(&self) -> &'static str {
        match self {
            Self::Erc20 => "transfer(address,uint256)",
            Self::Erc721 => "safeTransferFrom(address,address,uint256)",
            Self::Erc1155 => "safeTransferFrom(address,address,uint256,uint256,bytes)",
        }
    }
}

impl fmt::Display for TokenStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Erc20 => "ERC20",
            Self::Erc721 => "ERC721",
            Self::Erc1155 => "ERC1155",
        };
        f.write_str(name)
    }
}

impl FromStr for TokenStandard {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ERC20" => Ok(Self::Erc20),
            "ERC721" => Ok(Self::Erc721),
            "ERC1155" => Ok(Self::Erc1155),
            _ => Err(eyre!("Unknown token standard: {}", s)),
        }
    }
}

/// A validated transfer request for one of the supported standards.
#[derive(Debug, Clone, PartialEq, Eq, IntoTraitObject)]
#[trait_name(TokenTransfer)]
pub enum TransferCall {
    Erc20(Erc20Transfer),
    Erc721(Erc721Transfer),
    Erc1155(Erc1155Transfer),
}

/// Call data ready to drop into a batch entry, along with the token contract
/// it must be sent to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCalldata {
    pub token: Address,
    pub data: Bytes,
}

impl GeneratedCalldata {
    fn from_transfer(transfer: &dyn TokenTransfer) -> Self {
        Self {
            token: transfer.token(),
            data: transfer.data(),
        }
    }
}

impl From<&TransferCall> for GeneratedCalldata {
    fn from(call: &TransferCall) -> Self {
        Self::from_transfer(call.as_trait_object())
    }
}
