pub mod calldata_assistant;
pub mod erc1155_transfer;
pub mod erc20_transfer;
pub mod erc721_transfer;
pub mod error;
pub mod token_transfer;
