use ethers::prelude::*;
use ethers::types::transaction::eip2718::TypedTransaction;
use std::sync::Arc;

use async_trait::async_trait;

use crate::blockchain::Ledger;
use crate::utils::{classify_send_error, Result, SwapError};

/// Ledger node client: an HTTP JSON-RPC provider plus a local signing key.
///
/// Transactions are signed locally and broadcast raw, as legacy (type 0)
/// transactions.
pub struct RpcLedger {
    provider: Arc<Provider<Http>>,
    wallet: LocalWallet,
    chain_id: u64,
}

impl RpcLedger {
    /// Connect and verify chain identity.
    ///
    /// When `expected_chain_id` is set, a mismatch with the node's reported
    /// chain id fails fast instead of producing unreplayable signatures later.
    pub async fn connect(
        rpc_url: &str,
        wallet: LocalWallet,
        expected_chain_id: Option<u64>,
    ) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| SwapError::Transport(format!("Invalid RPC URL: {}", e)))?;
        let provider = Arc::new(provider);

        let chain_id = provider.get_chainid().await?.as_u64();
        if let Some(expected) = expected_chain_id {
            if chain_id != expected {
                return Err(SwapError::ChainMismatch {
                    expected,
                    actual: chain_id,
                });
            }
        }

        tracing::info!("Connected to chain id {}", chain_id);

        let wallet = wallet.with_chain_id(chain_id);
        Ok(Self {
            provider,
            wallet,
            chain_id,
        })
    }

    /// Get chain name
    pub fn chain_name(&self) -> &'static str {
        match self.chain_id {
            1 => "Ethereum Mainnet",
            11155111 => "Sepolia Testnet",
            31337 => "Local Fork",
            _ => "Unknown Chain",
        }
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    fn sender(&self) -> Address {
        self.wallet.address()
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(self.chain_id)
    }

    async fn native_balance(&self, address: Address) -> Result<U256> {
        Ok(self.provider.get_balance(address, None).await?)
    }

    async fn transaction_count(&self, address: Address) -> Result<u64> {
        let count = self
            .provider
            .get_transaction_count(address, Some(BlockNumber::Pending.into()))
            .await?;
        Ok(count.as_u64())
    }

    async fn gas_price(&self) -> Result<U256> {
        Ok(self.provider.get_gas_price().await?)
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let tx: TypedTransaction = TransactionRequest::new().to(to).data(data).into();
        Ok(self.provider.call(&tx, None).await?)
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        let tx = tx.from(self.wallet.address()).chain_id(self.chain_id);
        let typed: TypedTransaction = tx.into();

        let signature = self.wallet.sign_transaction(&typed).await?;
        let raw = typed.rlp_signed(&signature);

        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(|e| classify_send_error(&e.to_string()))?;
        Ok(pending.tx_hash())
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TransactionReceipt>> {
        Ok(self.provider.get_transaction_receipt(hash).await?)
    }
}
