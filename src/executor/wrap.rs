use ethers::abi::AbiEncode;
use ethers::types::{Address, TransactionReceipt, TransactionRequest, U256};
use std::sync::Arc;

use crate::blockchain::Ledger;
use crate::contracts::weth::DepositCall;
use crate::executor::nonce::AccountNonce;
use crate::executor::receipt::ReceiptTracker;
use crate::executor::{max_gas_cost, resolve_gas, send_with_nonce};
use crate::models::{GasPolicy, TransactionOutcome};
use crate::utils::{Result, SwapError};

/// Wraps native currency into its ERC20 form by sending value into the
/// wrapped token's `deposit()`.
pub struct NativeWrapper {
    ledger: Arc<dyn Ledger>,
    tracker: ReceiptTracker,
    nonce: Arc<AccountNonce>,
    wrapped: Address,
}

impl NativeWrapper {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        tracker: ReceiptTracker,
        nonce: Arc<AccountNonce>,
        wrapped: Address,
    ) -> Self {
        Self {
            ledger,
            tracker,
            nonce,
            wrapped,
        }
    }

    /// Wrap `amount` native units and wait for confirmation.
    pub async fn wrap(&self, amount: U256, gas_policy: &GasPolicy) -> Result<TransactionReceipt> {
        if amount.is_zero() {
            return Err(SwapError::InvalidRequest(
                "wrap amount must be positive".to_string(),
            ));
        }

        let account = self.ledger.sender();
        let (gas_price, gas_limit) = resolve_gas(self.ledger.as_ref(), gas_policy).await?;

        let native = self.ledger.native_balance(account).await?;
        let needed = amount
            .checked_add(max_gas_cost(gas_price, gas_limit))
            .unwrap_or(U256::MAX);
        if native < needed {
            return Err(SwapError::InsufficientFunds(format!(
                "native balance {} cannot cover wrap amount plus max gas cost {}",
                native, needed
            )));
        }

        let nonce = self.nonce.reserve().await?;
        let tx = TransactionRequest::new()
            .from(account)
            .to(self.wrapped)
            .value(amount)
            .data(DepositCall {}.encode())
            .nonce(nonce)
            .gas(gas_limit)
            .gas_price(gas_price);

        let hash = send_with_nonce(self.ledger.as_ref(), &self.nonce, tx).await?;
        tracing::info!("wrapping {} native units: {:?} (nonce {})", amount, hash, nonce);

        match self.tracker.await_confirmation(hash).await {
            TransactionOutcome::Confirmed(receipt) => Ok(receipt),
            TransactionOutcome::Reverted { .. } => Err(SwapError::Reverted(hash)),
            TransactionOutcome::TimedOut => Err(SwapError::ConfirmationTimedOut(hash)),
        }
    }
}
