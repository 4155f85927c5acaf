//! UniswapV2 factory interface
//!
//! Used to check pair existence before quoting; getPair returns the zero
//! address when no pool has been created for a token pair.
use ethers::prelude::*;

abigen!(
    IUniswapV2Factory,
    r#"[
        function getPair(address tokenA, address tokenB) external view returns (address pair)
    ]"#,
);
