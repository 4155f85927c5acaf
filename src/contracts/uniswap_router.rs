//! UniswapV2 router interface (Router02 and compatible forks)
//!
//! Only the two entry points the executor drives: the read-only price query
//! and the token-for-token swap. The deadline parameter is compared by the
//! router against block.timestamp, i.e. unix seconds.
use ethers::prelude::*;

abigen!(
    IUniswapV2Router,
    r#"[
        function getAmountsOut(uint256 amountIn, address[] calldata path) external view returns (uint256[] memory amounts)
        function swapExactTokensForTokens(uint256 amountIn, uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) external returns (uint256[] memory amounts)
    ]"#,
);
