use ethers::abi::{AbiDecode, AbiEncode};
use ethers::types::{Address, TransactionRequest, U256};
use std::sync::Arc;

use crate::blockchain::Ledger;
use crate::contracts::erc20::{AllowanceCall, AllowanceReturn, ApproveCall};
use crate::executor::nonce::AccountNonce;
use crate::executor::receipt::ReceiptTracker;
use crate::executor::{resolve_gas, send_with_nonce};
use crate::models::{ApprovalOutcome, GasPolicy, TransactionOutcome};
use crate::utils::{Result, SwapError};

/// Ensures a spender holds enough delegated allowance before a
/// transfer-dependent call.
///
/// The fast path is a single read and submits nothing, which makes repeat
/// calls idempotent. Only when the on-chain allowance falls short does an
/// approval transaction go out, and it is confirmed before returning so the
/// swap never races its own approval.
pub struct AllowanceManager {
    ledger: Arc<dyn Ledger>,
    tracker: ReceiptTracker,
    nonce: Arc<AccountNonce>,
}

impl AllowanceManager {
    pub fn new(ledger: Arc<dyn Ledger>, tracker: ReceiptTracker, nonce: Arc<AccountNonce>) -> Self {
        Self {
            ledger,
            tracker,
            nonce,
        }
    }

    /// Current on-chain allowance of (owner, spender) over `token`.
    pub async fn current_allowance(
        &self,
        owner: Address,
        spender: Address,
        token: Address,
    ) -> Result<U256> {
        let data = AllowanceCall { owner, spender }.encode();
        let raw = self.ledger.call(token, data.into()).await?;
        Ok(AllowanceReturn::decode(&raw)?.0)
    }

    pub async fn ensure_allowance(
        &self,
        owner: Address,
        spender: Address,
        token: Address,
        required: U256,
        gas_policy: &GasPolicy,
    ) -> Result<ApprovalOutcome> {
        let current = self.current_allowance(owner, spender, token).await?;
        if current >= required {
            tracing::debug!(
                "allowance {} already covers {}, skipping approval",
                current,
                required
            );
            return Ok(ApprovalOutcome::AlreadySufficient);
        }

        tracing::info!(
            "allowance {} < required {}, submitting approval for {:?}",
            current,
            required,
            spender
        );

        let (gas_price, gas_limit) = resolve_gas(self.ledger.as_ref(), gas_policy).await?;
        let nonce = self.nonce.reserve().await?;
        let data = ApproveCall {
            spender,
            amount: required,
        }
        .encode();
        let tx = TransactionRequest::new()
            .from(owner)
            .to(token)
            .data(data)
            .nonce(nonce)
            .gas(gas_limit)
            .gas_price(gas_price);

        let hash = send_with_nonce(self.ledger.as_ref(), &self.nonce, tx).await?;
        tracing::info!("approval submitted: {:?} (nonce {})", hash, nonce);

        match self.tracker.await_confirmation(hash).await {
            TransactionOutcome::Confirmed(receipt) => Ok(ApprovalOutcome::Approved(receipt)),
            TransactionOutcome::Reverted { .. } => Err(SwapError::ApprovalReverted(hash)),
            TransactionOutcome::TimedOut => Err(SwapError::ApprovalTimedOut(hash)),
        }
    }
}
