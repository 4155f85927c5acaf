pub mod outcome;
pub mod request;

pub use outcome::{
    ApprovalOutcome, BalanceSnapshot, PendingTransaction, SwapOutcome, SwapReport,
    TransactionOutcome,
};
pub use request::{deadline_after, min_amount_out, unix_now, GasPolicy, SwapRequest};
