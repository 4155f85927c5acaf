use ethers::types::Address;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::blockchain::Ledger;
use crate::utils::Result;

/// Per-account nonce reservation with single-writer discipline.
///
/// The ledger node cannot be trusted to serialize nonces across concurrent
/// callers: two submissions reading `getTransactionCount` at the same time
/// get the same value and one transaction is dropped. This counter is seeded
/// from the node's pending count once, then hands out strictly monotonic
/// values under a mutex. Clone the `Arc` and share it between every component
/// that submits for the same account.
pub struct AccountNonce {
    ledger: Arc<dyn Ledger>,
    account: Address,
    next: Mutex<Option<u64>>,
}

impl AccountNonce {
    pub fn new(ledger: Arc<dyn Ledger>, account: Address) -> Self {
        Self {
            ledger,
            account,
            next: Mutex::new(None),
        }
    }

    pub fn account(&self) -> Address {
        self.account
    }

    /// Reserve the next nonce. The mutex stays held across the initial node
    /// read so two first-callers cannot both seed from the same count.
    pub async fn reserve(&self) -> Result<u64> {
        let mut next = self.next.lock().await;
        let nonce = match *next {
            Some(value) => value,
            None => self.ledger.transaction_count(self.account).await?,
        };
        *next = Some(nonce + 1);
        Ok(nonce)
    }

    /// Drop the cached counter and re-seed from the node on the next reserve.
    /// Called after the node rejects a submission for nonce reasons.
    pub async fn reset(&self) {
        *self.next.lock().await = None;
        tracing::debug!("nonce counter for {:?} reset", self.account);
    }
}
