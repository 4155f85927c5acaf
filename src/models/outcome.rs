use ethers::types::{TransactionReceipt, TxHash, U256};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// A broadcast transaction awaiting confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub hash: TxHash,
    pub nonce: u64,
    pub submitted_at: SystemTime,
}

/// Terminal fate of one tracked transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TransactionOutcome {
    Confirmed(TransactionReceipt),
    Reverted {
        receipt: TransactionReceipt,
        reason: Option<String>,
    },
    TimedOut,
}

impl TransactionOutcome {
    /// Split on the receipt status field. A receipt existing is not enough:
    /// status 0 means the transaction was mined and failed.
    pub fn from_receipt(receipt: TransactionReceipt) -> Self {
        match receipt.status.map(|s| s.as_u64()) {
            Some(0) => TransactionOutcome::Reverted {
                receipt,
                reason: None,
            },
            _ => TransactionOutcome::Confirmed(receipt),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, TransactionOutcome::Confirmed(_))
    }
}

/// Result of an allowance check, distinguishing the no-op fast path from an
/// actual on-chain approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ApprovalOutcome {
    AlreadySufficient,
    Approved(TransactionReceipt),
}

/// Terminal state of the swap machine once a transaction was broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SwapOutcome {
    Succeeded {
        receipt: TransactionReceipt,
        /// Realized output read from the final hop's Transfer log; `None`
        /// when no log for the recipient decodes.
        amount_out: Option<U256>,
    },
    Reverted {
        receipt: TransactionReceipt,
        reason: Option<String>,
    },
    /// Confirmation was not observed in time. The transaction may still be
    /// mined later; re-query by hash, never resubmit the nonce.
    TimedOut { pending: PendingTransaction },
}

/// Balances observed around the swap, for diagnostics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub native: U256,
    pub token_in: U256,
    pub token_out: U256,
}

/// Everything a caller needs to understand what happened without re-querying
/// the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapReport {
    pub quoted_out: U256,
    pub min_amount_out: U256,
    pub outcome: SwapOutcome,
    pub balances_before: BalanceSnapshot,
    /// Missing when the post-swap read itself failed.
    pub balances_after: Option<BalanceSnapshot>,
}

impl std::fmt::Display for SwapReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "══════════════ SWAP REPORT ══════════════")?;
        writeln!(f, "Quoted out:     {}", self.quoted_out)?;
        writeln!(f, "Min amount out: {}", self.min_amount_out)?;
        match &self.outcome {
            SwapOutcome::Succeeded { receipt, amount_out } => {
                writeln!(f, "Outcome:        SUCCEEDED")?;
                writeln!(f, "Tx hash:        {:?}", receipt.transaction_hash)?;
                match amount_out {
                    Some(amount) => writeln!(f, "Realized out:   {}", amount)?,
                    None => writeln!(f, "Realized out:   (no transfer log decoded)")?,
                }
            }
            SwapOutcome::Reverted { receipt, reason } => {
                writeln!(f, "Outcome:        REVERTED")?;
                writeln!(f, "Tx hash:        {:?}", receipt.transaction_hash)?;
                writeln!(
                    f,
                    "Reason:         {}",
                    reason.as_deref().unwrap_or("(not decodable)")
                )?;
            }
            SwapOutcome::TimedOut { pending } => {
                writeln!(f, "Outcome:        TIMED OUT")?;
                writeln!(f, "Tx hash:        {:?} (nonce {})", pending.hash, pending.nonce)?;
                writeln!(f, "The transaction may still confirm; re-query by hash.")?;
            }
        }
        writeln!(
            f,
            "Balances before: native {} / in {} / out {}",
            self.balances_before.native, self.balances_before.token_in, self.balances_before.token_out
        )?;
        if let Some(after) = &self.balances_after {
            writeln!(
                f,
                "Balances after:  native {} / in {} / out {}",
                after.native, after.token_in, after.token_out
            )?;
        }
        write!(f, "══════════════════════════════════════════")
    }
}
