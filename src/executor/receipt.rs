use ethers::types::TxHash;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::blockchain::Ledger;
use crate::models::TransactionOutcome;

/// Polls for a mined receipt until a terminal outcome or the wait budget runs
/// out.
///
/// RPC errors while polling are treated as "receipt not yet available", not
/// as failures: a single network hiccup must not turn into a premature
/// `TimedOut`, and a dropped poll response says nothing about the
/// transaction itself. The budget bounds the total wait either way.
pub struct ReceiptTracker {
    ledger: Arc<dyn Ledger>,
    poll_interval: Duration,
    max_wait: Duration,
}

impl ReceiptTracker {
    pub fn new(ledger: Arc<dyn Ledger>, poll_interval: Duration, max_wait: Duration) -> Self {
        Self {
            ledger,
            poll_interval,
            max_wait,
        }
    }

    pub async fn await_confirmation(&self, hash: TxHash) -> TransactionOutcome {
        let started = Instant::now();
        let deadline = started + self.max_wait;

        loop {
            match self.ledger.transaction_receipt(hash).await {
                Ok(Some(receipt)) => {
                    let outcome = TransactionOutcome::from_receipt(receipt);
                    match &outcome {
                        TransactionOutcome::Confirmed(_) => {
                            tracing::info!("transaction {:?} confirmed", hash)
                        }
                        _ => tracing::warn!("transaction {:?} mined but reverted", hash),
                    }
                    return outcome;
                }
                Ok(None) => {
                    tracing::debug!("receipt for {:?} not yet available", hash);
                }
                Err(err) => {
                    tracing::debug!("transient RPC error while polling {:?}: {}", hash, err);
                }
            }

            let now = Instant::now();
            if now >= deadline {
                tracing::warn!(
                    "gave up waiting for {:?} after {:?}",
                    hash,
                    started.elapsed()
                );
                return TransactionOutcome::TimedOut;
            }
            sleep(self.poll_interval.min(deadline - now)).await;
        }
    }
}
