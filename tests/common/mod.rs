//! Scripted in-memory ledger for driving the executor without a node.
//!
//! Read-only calls are dispatched on the 4-byte selector and served from
//! per-selector queues; when a queue is down to its last entry that entry
//! repeats, so balance reads can be stubbed once. Receipts are scripted per
//! transaction hash as a sequence of poll results.
#![allow(dead_code)]

use async_trait::async_trait;
use ethers::abi::AbiEncode;
use ethers::contract::EthEvent;
use ethers::types::{
    Address, Bytes, Log, TransactionReceipt, TransactionRequest, TxHash, H256, U256, U64,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use swap_executor::contracts::erc20::TransferFilter;
use swap_executor::contracts::uniswap_router::GetAmountsOutReturn;
use swap_executor::utils::{classify_send_error, Result, SwapError};
use swap_executor::Ledger;

pub type Selector = [u8; 4];

pub enum ReceiptStep {
    NotFound,
    Transient(&'static str),
    Mined(TransactionReceipt),
}

type CallResponse = std::result::Result<Bytes, String>;

pub struct MockLedger {
    sender: Address,
    gas_price: U256,
    start_nonce: Mutex<u64>,
    native: Mutex<U256>,
    calls: Mutex<HashMap<Selector, VecDeque<CallResponse>>>,
    sent: Mutex<Vec<TransactionRequest>>,
    receipts: Mutex<HashMap<TxHash, VecDeque<ReceiptStep>>>,
    fail_next_send: Mutex<Option<String>>,
}

impl MockLedger {
    pub fn new(sender: Address) -> Self {
        Self {
            sender,
            gas_price: U256::from(2_000_000_000u64),
            start_nonce: Mutex::new(0),
            native: Mutex::new(U256::exp10(24)),
            calls: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            receipts: Mutex::new(HashMap::new()),
            fail_next_send: Mutex::new(None),
        }
    }

    /// Deterministic hash of the n-th submitted transaction (1-based).
    pub fn tx_hash(index: u64) -> TxHash {
        H256::from_low_u64_be(0xABC0 + index)
    }

    pub fn stub_call(&self, selector: Selector, response: Bytes) {
        self.calls
            .lock()
            .unwrap()
            .entry(selector)
            .or_default()
            .push_back(Ok(response));
    }

    pub fn stub_call_error(&self, selector: Selector, message: &str) {
        self.calls
            .lock()
            .unwrap()
            .entry(selector)
            .or_default()
            .push_back(Err(message.to_string()));
    }

    pub fn script_receipts(&self, hash: TxHash, steps: Vec<ReceiptStep>) {
        self.receipts.lock().unwrap().insert(hash, steps.into());
    }

    pub fn fail_next_send(&self, message: &str) {
        *self.fail_next_send.lock().unwrap() = Some(message.to_string());
    }

    pub fn set_start_nonce(&self, nonce: u64) {
        *self.start_nonce.lock().unwrap() = nonce;
    }

    pub fn set_native_balance(&self, amount: U256) {
        *self.native.lock().unwrap() = amount;
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Ledger for MockLedger {
    fn sender(&self) -> Address {
        self.sender
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(31337)
    }

    async fn native_balance(&self, _address: Address) -> Result<U256> {
        Ok(*self.native.lock().unwrap())
    }

    async fn transaction_count(&self, _address: Address) -> Result<u64> {
        Ok(*self.start_nonce.lock().unwrap())
    }

    async fn gas_price(&self) -> Result<U256> {
        Ok(self.gas_price)
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let selector: Selector = data
            .get(0..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| SwapError::Transport("calldata shorter than a selector".to_string()))?;

        let mut calls = self.calls.lock().unwrap();
        let queue = calls.get_mut(&selector).ok_or_else(|| {
            SwapError::Transport(format!(
                "unscripted call to {:?} with selector {:02x?}",
                to, selector
            ))
        })?;
        let response = if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue
                .front()
                .cloned()
                .ok_or_else(|| SwapError::Transport("empty call script".to_string()))?
        };
        response.map_err(SwapError::Transport)
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        if let Some(message) = self.fail_next_send.lock().unwrap().take() {
            return Err(classify_send_error(&message));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(tx);
        Ok(Self::tx_hash(sent.len() as u64))
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TransactionReceipt>> {
        let mut receipts = self.receipts.lock().unwrap();
        let Some(queue) = receipts.get_mut(&hash) else {
            return Ok(None);
        };
        match queue.front() {
            // Mined is terminal: every later poll sees the same receipt.
            Some(ReceiptStep::Mined(receipt)) => Ok(Some(receipt.clone())),
            Some(ReceiptStep::NotFound) => {
                queue.pop_front();
                Ok(None)
            }
            Some(ReceiptStep::Transient(message)) => {
                let message = *message;
                queue.pop_front();
                Err(SwapError::Transport(message.to_string()))
            }
            None => Ok(None),
        }
    }
}

pub fn success_receipt(hash: TxHash) -> TransactionReceipt {
    TransactionReceipt {
        transaction_hash: hash,
        status: Some(U64::one()),
        ..Default::default()
    }
}

pub fn failure_receipt(hash: TxHash) -> TransactionReceipt {
    TransactionReceipt {
        transaction_hash: hash,
        status: Some(U64::zero()),
        ..Default::default()
    }
}

/// A success receipt carrying a `Transfer(from, to, value)` log of `token`.
pub fn receipt_with_transfer(
    hash: TxHash,
    token: Address,
    from: Address,
    to: Address,
    value: U256,
) -> TransactionReceipt {
    let mut receipt = success_receipt(hash);
    receipt.logs.push(Log {
        address: token,
        topics: vec![
            TransferFilter::signature(),
            H256::from(from),
            H256::from(to),
        ],
        data: value.encode().into(),
        ..Default::default()
    });
    receipt
}

pub fn uint_response(value: U256) -> Bytes {
    value.encode().into()
}

pub fn address_response(address: Address) -> Bytes {
    address.encode().into()
}

pub fn amounts_response(amounts: Vec<U256>) -> Bytes {
    GetAmountsOutReturn { amounts }.encode().into()
}
