//! Submission and confirmation tracking for UniswapV2-style router swaps.
//!
//! The pipeline: quote the output amount, top up the router's allowance when
//! it falls short, submit the swap with a slippage floor and deadline, then
//! poll for the receipt until a terminal outcome. All RPC traffic goes
//! through the [`Ledger`] boundary so the whole flow runs against a mock in
//! tests.

pub mod blockchain;
pub mod config;
pub mod contracts;
pub mod executor;
pub mod models;
pub mod utils;

pub use blockchain::{Ledger, RpcLedger};
pub use config::ExecutorConfig;
pub use executor::{
    AccountNonce, AllowanceManager, NativeWrapper, QuoteOracle, ReceiptTracker, SwapSubmitter,
};
pub use models::{
    deadline_after, ApprovalOutcome, GasPolicy, PendingTransaction, SwapOutcome, SwapReport,
    SwapRequest, TransactionOutcome,
};
pub use utils::{Result, SwapError};
