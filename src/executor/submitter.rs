use ethers::abi::{AbiDecode, AbiEncode, RawLog};
use ethers::contract::EthLogDecode;
use ethers::types::{Address, Bytes, TransactionReceipt, TransactionRequest, U256};
use std::sync::Arc;
use std::time::SystemTime;

use crate::blockchain::Ledger;
use crate::config::ExecutorConfig;
use crate::contracts::erc20::{BalanceOfCall, BalanceOfReturn, TransferFilter};
use crate::contracts::uniswap_router::SwapExactTokensForTokensCall;
use crate::executor::allowance::AllowanceManager;
use crate::executor::nonce::AccountNonce;
use crate::executor::quote::QuoteOracle;
use crate::executor::receipt::ReceiptTracker;
use crate::executor::{max_gas_cost, resolve_gas, send_with_nonce};
use crate::models::{
    min_amount_out, unix_now, BalanceSnapshot, PendingTransaction, SwapOutcome, SwapReport,
    SwapRequest, TransactionOutcome,
};
use crate::utils::{revert, Result, SwapError};

/// Drives one swap request through quoting, approving, submitting and
/// confirming.
///
/// Failures before anything is broadcast come back as `Err` (the rejected
/// terminal state); once a swap transaction is out, the mined fate arrives
/// in `Ok(SwapReport)` as `Succeeded`, `Reverted` or `TimedOut`. The
/// submitter never resubmits on its own: after `TimedOut` the transaction
/// may still confirm, and a blind retry with a fresh nonce risks swapping
/// twice.
pub struct SwapSubmitter {
    ledger: Arc<dyn Ledger>,
    oracle: QuoteOracle,
    allowance: AllowanceManager,
    tracker: ReceiptTracker,
    nonce: Arc<AccountNonce>,
    router: Address,
}

impl SwapSubmitter {
    pub fn new(ledger: Arc<dyn Ledger>, config: &ExecutorConfig) -> Self {
        let nonce = Arc::new(AccountNonce::new(ledger.clone(), ledger.sender()));
        Self::with_nonce(ledger, config, nonce)
    }

    /// Build around an existing nonce counter, for callers that also submit
    /// other transactions (e.g. wraps) for the same account.
    pub fn with_nonce(
        ledger: Arc<dyn Ledger>,
        config: &ExecutorConfig,
        nonce: Arc<AccountNonce>,
    ) -> Self {
        let oracle = QuoteOracle::new(ledger.clone(), config.router, config.factory);
        let allowance = AllowanceManager::new(
            ledger.clone(),
            ReceiptTracker::new(ledger.clone(), config.poll_interval, config.max_wait),
            nonce.clone(),
        );
        let tracker = ReceiptTracker::new(ledger.clone(), config.poll_interval, config.max_wait);
        Self {
            ledger,
            oracle,
            allowance,
            tracker,
            nonce,
            router: config.router,
        }
    }

    pub async fn execute(&self, request: &SwapRequest) -> Result<SwapReport> {
        if request.account != self.ledger.sender() {
            return Err(SwapError::InvalidRequest(format!(
                "request account {:?} does not match the signing account {:?}",
                request.account,
                self.ledger.sender()
            )));
        }

        // An expired request must not cost anything, not even the approval.
        let now = unix_now();
        if request.deadline <= now {
            return Err(SwapError::DeadlineExpired {
                deadline: request.deadline,
                now,
            });
        }

        let balances_before = self.snapshot(request).await?;

        // Quoting
        let quoted_out = self.oracle.quote(&request.path, request.amount_in).await?;
        let min_out = min_amount_out(quoted_out, request.slippage_bps);
        if min_out.is_zero() {
            return Err(SwapError::InvalidRequest(format!(
                "slippage floor of quote {} is zero",
                quoted_out
            )));
        }
        tracing::info!(
            "quoted {} out, accepting no less than {} ({} bps tolerance)",
            quoted_out,
            min_out,
            request.slippage_bps
        );

        // Approving. Completes, for better or worse, before any swap bytes
        // reach the node.
        self.allowance
            .ensure_allowance(
                request.account,
                self.router,
                request.token_in(),
                request.amount_in,
                &request.gas_policy,
            )
            .await?;

        // Submitting
        let pending = self.submit(request, min_out).await?;

        // Confirming
        let outcome = self.confirm(request, min_out, pending).await;

        let balances_after = match self.snapshot(request).await {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::warn!("post-swap balance read failed: {}", err);
                None
            }
        };

        Ok(SwapReport {
            quoted_out,
            min_amount_out: min_out,
            outcome,
            balances_before,
            balances_after,
        })
    }

    async fn submit(&self, request: &SwapRequest, min_out: U256) -> Result<PendingTransaction> {
        // Re-checked here: confirming the approval may have eaten the window.
        let now = unix_now();
        if request.deadline <= now {
            return Err(SwapError::DeadlineExpired {
                deadline: request.deadline,
                now,
            });
        }

        let (gas_price, gas_limit) = resolve_gas(self.ledger.as_ref(), &request.gas_policy).await?;

        let token_balance = self
            .token_balance(request.token_in(), request.account)
            .await?;
        if token_balance < request.amount_in {
            return Err(SwapError::InsufficientFunds(format!(
                "input token balance {} is below amount in {}",
                token_balance, request.amount_in
            )));
        }
        let native = self.ledger.native_balance(request.account).await?;
        let gas_cost = max_gas_cost(gas_price, gas_limit);
        if native < gas_cost {
            return Err(SwapError::InsufficientFunds(format!(
                "native balance {} cannot cover max gas cost {}",
                native, gas_cost
            )));
        }

        let nonce = self.nonce.reserve().await?;
        let tx = TransactionRequest::new()
            .from(request.account)
            .to(self.router)
            .data(self.swap_calldata(request, min_out))
            .nonce(nonce)
            .gas(gas_limit)
            .gas_price(gas_price);

        let hash = send_with_nonce(self.ledger.as_ref(), &self.nonce, tx).await?;
        tracing::info!("swap submitted: {:?} (nonce {})", hash, nonce);

        Ok(PendingTransaction {
            hash,
            nonce,
            submitted_at: SystemTime::now(),
        })
    }

    async fn confirm(
        &self,
        request: &SwapRequest,
        min_out: U256,
        pending: PendingTransaction,
    ) -> SwapOutcome {
        match self.tracker.await_confirmation(pending.hash).await {
            TransactionOutcome::Confirmed(receipt) => {
                let amount_out = realized_output(&receipt, request.token_out(), request.account);
                if amount_out.is_none() {
                    tracing::warn!(
                        "no transfer log to {:?} found in {:?}",
                        request.account,
                        pending.hash
                    );
                }
                SwapOutcome::Succeeded {
                    receipt,
                    amount_out,
                }
            }
            TransactionOutcome::Reverted { receipt, .. } => {
                let reason = self.replay_for_reason(request, min_out).await;
                SwapOutcome::Reverted { receipt, reason }
            }
            TransactionOutcome::TimedOut => SwapOutcome::TimedOut { pending },
        }
    }

    /// Replay the swap as an `eth_call` to fish the revert reason out of the
    /// node's error message. Best effort: state has moved on since the
    /// transaction was mined.
    async fn replay_for_reason(&self, request: &SwapRequest, min_out: U256) -> Option<String> {
        match self
            .ledger
            .call(self.router, self.swap_calldata(request, min_out))
            .await
        {
            Ok(_) => None,
            Err(err) => revert::reason_from_message(&err.to_string()),
        }
    }

    fn swap_calldata(&self, request: &SwapRequest, min_out: U256) -> Bytes {
        SwapExactTokensForTokensCall {
            amount_in: request.amount_in,
            amount_out_min: min_out,
            path: request.path.clone(),
            to: request.account,
            deadline: U256::from(request.deadline),
        }
        .encode()
        .into()
    }

    async fn token_balance(&self, token: Address, account: Address) -> Result<U256> {
        let data = BalanceOfCall { account }.encode();
        let raw = self.ledger.call(token, data.into()).await?;
        Ok(BalanceOfReturn::decode(&raw)?.0)
    }

    async fn snapshot(&self, request: &SwapRequest) -> Result<BalanceSnapshot> {
        Ok(BalanceSnapshot {
            native: self.ledger.native_balance(request.account).await?,
            token_in: self
                .token_balance(request.token_in(), request.account)
                .await?,
            token_out: self
                .token_balance(request.token_out(), request.account)
                .await?,
        })
    }
}

/// Realized output of a confirmed swap: the value of the last Transfer log
/// the output token emitted to the recipient.
pub(crate) fn realized_output(
    receipt: &TransactionReceipt,
    token_out: Address,
    recipient: Address,
) -> Option<U256> {
    receipt
        .logs
        .iter()
        .rev()
        .filter(|log| log.address == token_out)
        .find_map(|log| {
            let raw = RawLog {
                topics: log.topics.clone(),
                data: log.data.to_vec(),
            };
            let transfer = TransferFilter::decode_log(&raw).ok()?;
            (transfer.to == recipient).then_some(transfer.value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::contract::EthEvent;
    use ethers::types::{Log, H256};

    fn transfer_log(token: Address, from: Address, to: Address, value: U256) -> Log {
        Log {
            address: token,
            topics: vec![
                TransferFilter::signature(),
                H256::from(from),
                H256::from(to),
            ],
            data: value.encode().into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_realized_output_reads_recipient_transfer() {
        let token = Address::from_low_u64_be(1);
        let pair = Address::from_low_u64_be(2);
        let recipient = Address::from_low_u64_be(3);

        let receipt = TransactionReceipt {
            logs: vec![
                // Intermediate hop to someone else, then the final transfer.
                transfer_log(token, pair, Address::from_low_u64_be(9), U256::from(10u64)),
                transfer_log(token, pair, recipient, U256::from(950u64)),
            ],
            ..Default::default()
        };

        assert_eq!(
            realized_output(&receipt, token, recipient),
            Some(U256::from(950u64))
        );
    }

    #[test]
    fn test_realized_output_ignores_other_tokens_and_recipients() {
        let token = Address::from_low_u64_be(1);
        let other_token = Address::from_low_u64_be(5);
        let recipient = Address::from_low_u64_be(3);

        let receipt = TransactionReceipt {
            logs: vec![
                transfer_log(other_token, recipient, recipient, U256::from(7u64)),
                transfer_log(
                    token,
                    Address::from_low_u64_be(2),
                    Address::from_low_u64_be(8),
                    U256::from(11u64),
                ),
            ],
            ..Default::default()
        };

        assert_eq!(realized_output(&receipt, token, recipient), None);
    }
}
