use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IERC721 {
        function safeTransferFrom(address from, address to, uint256 tokenId) external;
    }
}
