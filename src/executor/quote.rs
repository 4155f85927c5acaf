use ethers::abi::{AbiDecode, AbiEncode};
use ethers::types::{Address, U256};
use std::sync::Arc;

use crate::blockchain::Ledger;
use crate::contracts::uniswap_factory::{GetPairCall, GetPairReturn};
use crate::contracts::uniswap_router::{GetAmountsOutCall, GetAmountsOutReturn};
use crate::utils::{Result, SwapError};

/// Read-only price query against the router's `getAmountsOut`.
///
/// Checks pair existence for every hop first so a missing pool surfaces as
/// `QuoteUnavailable` with a usable message instead of a bare router revert.
pub struct QuoteOracle {
    ledger: Arc<dyn Ledger>,
    router: Address,
    factory: Address,
}

impl QuoteOracle {
    pub fn new(ledger: Arc<dyn Ledger>, router: Address, factory: Address) -> Self {
        Self {
            ledger,
            router,
            factory,
        }
    }

    /// Expected output of the final hop for `amount_in` pushed through `path`.
    pub async fn quote(&self, path: &[Address], amount_in: U256) -> Result<U256> {
        if path.len() < 2 {
            return Err(SwapError::InvalidRequest(
                "quote path needs at least 2 hops".to_string(),
            ));
        }
        if amount_in.is_zero() {
            return Err(SwapError::InvalidRequest(
                "quote amount must be positive".to_string(),
            ));
        }

        for hop in path.windows(2) {
            self.ensure_pair(hop[0], hop[1]).await?;
        }

        let data = GetAmountsOutCall {
            amount_in,
            path: path.to_vec(),
        }
        .encode();
        let raw = self
            .ledger
            .call(self.router, data.into())
            .await
            .map_err(|e| SwapError::QuoteUnavailable(format!("getAmountsOut failed: {}", e)))?;
        let decoded = GetAmountsOutReturn::decode(&raw).map_err(|e| {
            SwapError::QuoteUnavailable(format!("getAmountsOut returned garbage: {}", e))
        })?;

        decoded
            .amounts
            .last()
            .copied()
            .ok_or_else(|| SwapError::QuoteUnavailable("empty amounts array".to_string()))
    }

    async fn ensure_pair(&self, token_a: Address, token_b: Address) -> Result<()> {
        let data = GetPairCall { token_a, token_b }.encode();
        let raw = self
            .ledger
            .call(self.factory, data.into())
            .await
            .map_err(|e| SwapError::QuoteUnavailable(format!("getPair failed: {}", e)))?;
        let pair = GetPairReturn::decode(&raw)
            .map_err(|e| SwapError::QuoteUnavailable(format!("getPair returned garbage: {}", e)))?
            .pair;

        if pair == Address::zero() {
            return Err(SwapError::QuoteUnavailable(format!(
                "no pair for {:?}/{:?}",
                token_a, token_b
            )));
        }
        tracing::debug!("pair for {:?}/{:?}: {:?}", token_a, token_b, pair);
        Ok(())
    }
}
