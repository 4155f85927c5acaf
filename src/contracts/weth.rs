//! Wrapped-native-token interface (WETH9 and its forks)
//!
//! `deposit()` is payable: sending value mints the same amount of wrapped
//! token to the sender. Everything else is plain ERC20.
use ethers::prelude::*;

abigen!(
    IWrappedNative,
    r#"[
        function deposit() external payable
        function withdraw(uint256 amount) external
        function balanceOf(address account) external view returns (uint256)
        event Deposit(address indexed dst, uint256 wad)
        event Withdrawal(address indexed src, uint256 wad)
    ]"#,
);
