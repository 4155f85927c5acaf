//! Swap execution pipeline
//!
//! One workflow per request: quote, approve if the allowance falls short,
//! submit, track the receipt. Components share the ledger through `Arc` and
//! the per-account nonce counter through [`AccountNonce`].

pub mod allowance;
pub mod nonce;
pub mod quote;
pub mod receipt;
pub mod submitter;
pub mod wrap;

pub use allowance::AllowanceManager;
pub use nonce::AccountNonce;
pub use quote::QuoteOracle;
pub use receipt::ReceiptTracker;
pub use submitter::SwapSubmitter;
pub use wrap::NativeWrapper;

use ethers::types::{TransactionRequest, TxHash, U256};

use crate::blockchain::Ledger;
use crate::models::GasPolicy;
use crate::utils::{Result, SwapError};

/// Resolve a gas policy to a concrete (price, limit) pair.
pub(crate) async fn resolve_gas(ledger: &dyn Ledger, policy: &GasPolicy) -> Result<(U256, U256)> {
    match policy {
        GasPolicy::Fixed {
            gas_price,
            gas_limit,
        } => Ok((*gas_price, *gas_limit)),
        GasPolicy::NodePriced { gas_limit } => Ok((ledger.gas_price().await?, *gas_limit)),
    }
}

pub(crate) fn max_gas_cost(gas_price: U256, gas_limit: U256) -> U256 {
    gas_price.checked_mul(gas_limit).unwrap_or(U256::MAX)
}

/// Broadcast, dropping the cached nonce counter when the node rejects the
/// submission outright — the next reserve re-seeds from the node instead of
/// marching further out of sync.
pub(crate) async fn send_with_nonce(
    ledger: &dyn Ledger,
    nonce: &AccountNonce,
    tx: TransactionRequest,
) -> Result<TxHash> {
    match ledger.send_transaction(tx).await {
        Ok(hash) => Ok(hash),
        Err(err) => {
            if matches!(err, SwapError::SubmissionRejected(_)) {
                nonce.reset().await;
            }
            Err(err)
        }
    }
}
