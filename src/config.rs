//! Executor configuration
//!
//! Every knob is explicit and passed into components at construction; there
//! is no process-wide provider or signer.

use ethers::types::{Address, U256};
use std::env;
use std::time::Duration;

use crate::contracts::addresses;
use crate::models::GasPolicy;
use crate::utils::{Result, SwapError};

#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub rpc_url: String,
    /// When set, the connected node's chain id must match.
    pub chain_id: Option<u64>,
    pub router: Address,
    pub factory: Address,
    pub wrapped_native: Address,
    /// Slippage tolerance in basis points.
    pub slippage_bps: u32,
    pub gas_policy: GasPolicy,
    /// Receipt polling cadence.
    pub poll_interval: Duration,
    /// Confirmation wait budget per transaction.
    pub max_wait: Duration,
    /// Swap deadline window added to the current time, in seconds.
    pub deadline_window: Duration,
}

impl ExecutorConfig {
    /// Mainnet contract addresses with conservative timing defaults.
    pub fn mainnet(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            chain_id: None,
            router: addresses::uniswap_v2_router(),
            factory: addresses::uniswap_v2_factory(),
            wrapped_native: addresses::weth(),
            slippage_bps: 100,
            gas_policy: GasPolicy::default(),
            poll_interval: Duration::from_secs(2),
            max_wait: Duration::from_secs(120),
            deadline_window: Duration::from_secs(300),
        }
    }

    /// Read configuration from `SWAP_*` environment variables.
    ///
    /// `SWAP_RPC_URL` is required; everything else falls back to the mainnet
    /// defaults. Setting `SWAP_GAS_PRICE_GWEI` switches the gas policy from
    /// node-priced to fixed.
    pub fn from_env() -> Result<Self> {
        let rpc_url = env::var("SWAP_RPC_URL")
            .map_err(|_| SwapError::Config("SWAP_RPC_URL is not set".to_string()))?;
        let mut config = Self::mainnet(rpc_url);

        if let Some(chain_id) = read_env("SWAP_CHAIN_ID")? {
            config.chain_id = Some(chain_id);
        }
        if let Some(router) = read_env("SWAP_ROUTER")? {
            config.router = router;
        }
        if let Some(factory) = read_env("SWAP_FACTORY")? {
            config.factory = factory;
        }
        if let Some(wrapped) = read_env("SWAP_WRAPPED_NATIVE")? {
            config.wrapped_native = wrapped;
        }
        if let Some(bps) = read_env("SWAP_SLIPPAGE_BPS")? {
            config.slippage_bps = bps;
        }
        if let Some(ms) = read_env("SWAP_POLL_INTERVAL_MS")? {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = read_env("SWAP_MAX_WAIT_SECS")? {
            config.max_wait = Duration::from_secs(secs);
        }
        if let Some(secs) = read_env("SWAP_DEADLINE_WINDOW_SECS")? {
            config.deadline_window = Duration::from_secs(secs);
        }

        let gas_limit = read_env::<u64>("SWAP_GAS_LIMIT")?
            .map(U256::from)
            .unwrap_or_else(|| config.gas_policy.gas_limit());
        config.gas_policy = match env::var("SWAP_GAS_PRICE_GWEI") {
            Ok(gwei) => {
                let gas_price = ethers::utils::parse_units(gwei.trim(), "gwei")
                    .map_err(|e| {
                        SwapError::Config(format!("bad SWAP_GAS_PRICE_GWEI `{}`: {}", gwei, e))
                    })?
                    .into();
                GasPolicy::Fixed {
                    gas_price,
                    gas_limit,
                }
            }
            Err(_) => GasPolicy::NodePriced { gas_limit },
        };

        Ok(config)
    }
}

fn read_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| SwapError::Config(format!("bad {} `{}`: {}", name, raw, e))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_defaults() {
        let config = ExecutorConfig::mainnet("http://localhost:8545");
        assert_eq!(config.router, addresses::uniswap_v2_router());
        assert_eq!(config.slippage_bps, 100);
        assert_eq!(config.gas_policy.gas_limit(), U256::from(200_000u64));
        assert!(config.chain_id.is_none());
    }

    #[test]
    fn test_env_overrides() {
        env::set_var("SWAP_RPC_URL", "http://localhost:8545");
        env::set_var("SWAP_CHAIN_ID", "31337");
        env::set_var("SWAP_SLIPPAGE_BPS", "50");
        env::set_var("SWAP_GAS_PRICE_GWEI", "50.5");
        env::set_var("SWAP_GAS_LIMIT", "200000");

        let config = ExecutorConfig::from_env().unwrap();
        assert_eq!(config.chain_id, Some(31337));
        assert_eq!(config.slippage_bps, 50);
        assert_eq!(
            config.gas_policy,
            GasPolicy::Fixed {
                gas_price: U256::from(50_500_000_000u64),
                gas_limit: U256::from(200_000u64),
            }
        );

        for name in [
            "SWAP_RPC_URL",
            "SWAP_CHAIN_ID",
            "SWAP_SLIPPAGE_BPS",
            "SWAP_GAS_PRICE_GWEI",
            "SWAP_GAS_LIMIT",
        ] {
            env::remove_var(name);
        }
    }
}
