use async_trait::async_trait;
use ethers::types::{Address, Bytes, TransactionReceipt, TransactionRequest, TxHash, U256};

use crate::utils::Result;

/// RPC boundary to a ledger node.
///
/// Everything the executor needs from a node fits in these eight methods;
/// the production implementation is [`RpcLedger`](crate::blockchain::RpcLedger)
/// and the integration tests drive the same components through a scripted
/// in-memory mock. Signing lives behind `send_transaction`, so the executor
/// never touches key material.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Address the implementation signs for.
    fn sender(&self) -> Address;

    async fn chain_id(&self) -> Result<u64>;

    /// Native-currency balance in wei.
    async fn native_balance(&self, address: Address) -> Result<U256>;

    /// Pending-block transaction count, the source for fresh nonces.
    async fn transaction_count(&self, address: Address) -> Result<u64>;

    /// Node-suggested legacy gas price.
    async fn gas_price(&self) -> Result<U256>;

    /// Read-only `eth_call` against a contract.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes>;

    /// Sign and broadcast. The request must carry nonce, gas limit and gas
    /// price already; implementations only fill in identity fields.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash>;

    /// `None` until the transaction is mined.
    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TransactionReceipt>>;
}
