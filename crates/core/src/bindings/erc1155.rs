use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IERC1155 {
        function safeTransferFrom(address from, address to, uint256 id, uint256 amount, bytes data) external;
    }
}
