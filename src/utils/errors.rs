use ethers::types::TxHash;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwapError {
    #[error("Invalid swap request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Quote unavailable: {0}")]
    QuoteUnavailable(String),

    #[error("Approval transaction {0:?} was mined but reverted")]
    ApprovalReverted(TxHash),

    #[error("Approval transaction {0:?} not confirmed within the wait budget")]
    ApprovalTimedOut(TxHash),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Deadline {deadline} is not in the future (now {now})")]
    DeadlineExpired { deadline: u64, now: u64 },

    #[error("Node rejected submission: {0}")]
    SubmissionRejected(String),

    #[error("Transaction {0:?} was mined but reverted")]
    Reverted(TxHash),

    #[error("Transaction {0:?} not confirmed within the wait budget")]
    ConfirmationTimedOut(TxHash),

    #[error("Connected chain id {actual} does not match configured chain id {expected}")]
    ChainMismatch { expected: u64, actual: u64 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Signer error: {0}")]
    Signer(#[from] ethers::signers::WalletError),

    #[error("ABI decode error: {0}")]
    AbiDecode(#[from] ethers::abi::AbiError),
}

impl From<ethers::providers::ProviderError> for SwapError {
    fn from(err: ethers::providers::ProviderError) -> Self {
        SwapError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SwapError>;

/// Classify a node error from `eth_sendRawTransaction` into the taxonomy.
///
/// Nodes refuse transactions for reasons that are the caller's fault (stale
/// nonce, underpriced gas, unfunded account) and for reasons that are the
/// network's fault (connection refused, timeouts). Only the latter are
/// `Transport`.
pub fn classify_send_error(message: &str) -> SwapError {
    let msg = message.to_ascii_lowercase();

    if msg.contains("insufficient funds") {
        return SwapError::InsufficientFunds(message.to_string());
    }

    let rejection_patterns = [
        "nonce too low",
        "nonce too high",
        "replacement transaction underpriced",
        "transaction underpriced",
        "already known",
        "known transaction",
        "exceeds block gas limit",
        "intrinsic gas too low",
        "invalid sender",
    ];
    if rejection_patterns.iter().any(|needle| msg.contains(needle)) {
        return SwapError::SubmissionRejected(message.to_string());
    }

    SwapError::Transport(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_funds_is_not_a_transport_error() {
        let err = classify_send_error(
            "insufficient funds for gas * price + value: have 0 want 1010000000000000000",
        );
        assert!(matches!(err, SwapError::InsufficientFunds(_)));
    }

    #[test]
    fn test_nonce_and_gas_rejections() {
        assert!(matches!(
            classify_send_error("nonce too low: next nonce 42, tx nonce 40"),
            SwapError::SubmissionRejected(_)
        ));
        assert!(matches!(
            classify_send_error("replacement transaction underpriced"),
            SwapError::SubmissionRejected(_)
        ));
        assert!(matches!(
            classify_send_error("already known"),
            SwapError::SubmissionRejected(_)
        ));
    }

    #[test]
    fn test_network_failures_stay_transport() {
        assert!(matches!(
            classify_send_error("error sending request for url: connection refused"),
            SwapError::Transport(_)
        ));
        assert!(matches!(
            classify_send_error("operation timed out"),
            SwapError::Transport(_)
        ));
    }
}
