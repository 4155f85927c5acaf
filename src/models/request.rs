use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::utils::{Result, SwapError};

/// Gas selection for a submission. Legacy (type 0) pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GasPolicy {
    /// Caller-fixed gas price and limit.
    Fixed { gas_price: U256, gas_limit: U256 },
    /// Gas price read from the node at submission time.
    NodePriced { gas_limit: U256 },
}

impl GasPolicy {
    pub fn gas_limit(&self) -> U256 {
        match self {
            GasPolicy::Fixed { gas_limit, .. } => *gas_limit,
            GasPolicy::NodePriced { gas_limit } => *gas_limit,
        }
    }
}

impl Default for GasPolicy {
    fn default() -> Self {
        GasPolicy::NodePriced {
            gas_limit: U256::from(200_000u64),
        }
    }
}

/// A validated token-for-token swap order.
///
/// Amounts are minimal-unit integers; `min_amount_out` is not stored because
/// it is derived from a live quote during execution. The deadline is a unix
/// timestamp in seconds, the unit UniswapV2 routers compare against
/// `block.timestamp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRequest {
    pub account: Address,
    pub path: Vec<Address>,
    pub amount_in: U256,
    /// Slippage tolerance in basis points (100 = 1%).
    pub slippage_bps: u32,
    /// Unix seconds; must be strictly in the future at submission.
    pub deadline: u64,
    pub gas_policy: GasPolicy,
}

impl SwapRequest {
    pub fn new(
        account: Address,
        path: Vec<Address>,
        amount_in: U256,
        slippage_bps: u32,
        deadline: u64,
        gas_policy: GasPolicy,
    ) -> Result<Self> {
        if path.len() < 2 {
            return Err(SwapError::InvalidRequest(format!(
                "swap path needs at least 2 hops, got {}",
                path.len()
            )));
        }
        if path.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(SwapError::InvalidRequest(
                "swap path repeats a token on adjacent hops".to_string(),
            ));
        }
        if amount_in.is_zero() {
            return Err(SwapError::InvalidRequest(
                "amount in must be positive".to_string(),
            ));
        }
        if slippage_bps >= 10_000 {
            return Err(SwapError::InvalidRequest(format!(
                "slippage of {} bps would allow a zero output",
                slippage_bps
            )));
        }

        Ok(Self {
            account,
            path,
            amount_in,
            slippage_bps,
            deadline,
            gas_policy,
        })
    }

    pub fn token_in(&self) -> Address {
        self.path[0]
    }

    pub fn token_out(&self) -> Address {
        self.path[self.path.len() - 1]
    }
}

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Deadline `window` from now, in unix seconds.
pub fn deadline_after(window: Duration) -> u64 {
    unix_now() + window.as_secs()
}

/// Slippage floor: `quote * (10_000 - slippage_bps) / 10_000`, rounded down.
pub fn min_amount_out(quote: U256, slippage_bps: u32) -> U256 {
    quote * U256::from(10_000 - slippage_bps.min(10_000)) / U256::from(10_000)
}
