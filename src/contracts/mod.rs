//! Contract interfaces for the swap workflow
//!
//! All bindings are generated with `abigen!`; the per-call structs double as
//! the encode/decode capability the executor uses when talking through the
//! `Ledger` boundary (calldata in, return data out).
pub mod erc20;
pub mod uniswap_factory;
pub mod uniswap_router;
pub mod weth;

pub use erc20::IERC20;
pub use uniswap_factory::IUniswapV2Factory;
pub use uniswap_router::IUniswapV2Router;
pub use weth::IWrappedNative;

use ethers::types::Address;

/// Well-known Ethereum mainnet addresses, used as CLI defaults. Every one of
/// them can be overridden through `ExecutorConfig`.
pub mod addresses {
    use super::Address;
    use std::str::FromStr;

    /// Uniswap V2 Factory
    pub const UNISWAP_V2_FACTORY: &str = "0x5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f";

    /// Uniswap V2 Router02
    pub const UNISWAP_V2_ROUTER: &str = "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D";

    /// Wrapped Ether (WETH9)
    pub const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";

    /// SUSHI governance token
    pub const SUSHI: &str = "0x6B3595068778DD592e39A122f4f5a5cF09C90fE2";

    pub fn uniswap_v2_factory() -> Address {
        Address::from_str(UNISWAP_V2_FACTORY).expect("Invalid UNISWAP_V2_FACTORY address")
    }

    pub fn uniswap_v2_router() -> Address {
        Address::from_str(UNISWAP_V2_ROUTER).expect("Invalid UNISWAP_V2_ROUTER address")
    }

    pub fn weth() -> Address {
        Address::from_str(WETH).expect("Invalid WETH address")
    }

    pub fn sushi() -> Address {
        Address::from_str(SUSHI).expect("Invalid SUSHI address")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_addresses_parse() {
        let factory = addresses::uniswap_v2_factory();
        let router = addresses::uniswap_v2_router();
        let weth = addresses::weth();

        assert_eq!(
            format!("{:?}", factory).to_lowercase(),
            "0x5c69bee701ef814a2b6a3edd4b1652cb9cc5aa6f"
        );
        assert_eq!(
            format!("{:?}", router).to_lowercase(),
            "0x7a250d5630b4cf539739df2c5dacb4c659f2488d"
        );
        assert_eq!(
            format!("{:?}", weth).to_lowercase(),
            "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"
        );
    }
}
