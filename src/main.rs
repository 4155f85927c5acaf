use clap::Parser;
use ethers::abi::{AbiDecode, AbiEncode};
use ethers::signers::LocalWallet;
use ethers::types::{Address, U256};
use std::sync::Arc;

use swap_executor::contracts::erc20::{BalanceOfCall, BalanceOfReturn, DecimalsCall, DecimalsReturn};
use swap_executor::contracts::addresses;
use swap_executor::executor::{AccountNonce, NativeWrapper, ReceiptTracker};
use swap_executor::{
    deadline_after, ExecutorConfig, Ledger, RpcLedger, SwapOutcome, SwapRequest, SwapSubmitter,
};

/// Submit a token-for-token swap through a UniswapV2-style router and track
/// it to a terminal outcome.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input token address (defaults to WETH)
    #[arg(long, default_value = addresses::WETH)]
    token_in: String,

    /// Output token address (defaults to SUSHI)
    #[arg(long, default_value = addresses::SUSHI)]
    token_out: String,

    /// Amount of the input token to swap, in human units
    #[arg(long, default_value = "1.0")]
    amount: String,

    /// RPC URL (overrides SWAP_RPC_URL)
    #[arg(short, long)]
    rpc: Option<String>,

    /// Slippage tolerance override, in basis points
    #[arg(long)]
    slippage_bps: Option<u32>,

    /// Wrap native currency to cover a short input-token balance
    /// (only when the input token is the wrapped-native token)
    #[arg(long)]
    wrap: bool,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let filter = if args.verbose {
        "swap_executor=debug"
    } else {
        "swap_executor=info"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("\n🔄 Swap Executor");
    println!("================\n");

    let mut config = if std::env::var("SWAP_RPC_URL").is_ok() {
        ExecutorConfig::from_env()?
    } else {
        let rpc = args
            .rpc
            .clone()
            .ok_or("set SWAP_RPC_URL or pass --rpc")?;
        ExecutorConfig::mainnet(rpc)
    };
    if let Some(rpc) = &args.rpc {
        config.rpc_url = rpc.clone();
    }
    if let Some(bps) = args.slippage_bps {
        config.slippage_bps = bps;
    }

    let token_in: Address = args.token_in.parse()?;
    let token_out: Address = args.token_out.parse()?;

    let wallet: LocalWallet = std::env::var("SWAP_PRIVATE_KEY")
        .map_err(|_| "SWAP_PRIVATE_KEY is not set")?
        .trim()
        .parse()?;

    print!("Connecting to {}... ", config.rpc_url);
    let ledger = Arc::new(RpcLedger::connect(&config.rpc_url, wallet, config.chain_id).await?);
    println!("✅ {}", ledger.chain_name());

    let account = ledger.sender();
    println!("Account: {:?}", account);

    let ledger: Arc<dyn Ledger> = ledger;
    println!("Chain id: {}", ledger.chain_id().await?);
    let decimals = token_decimals(ledger.as_ref(), token_in).await?;
    let amount_in: U256 = ethers::utils::parse_units(&args.amount, decimals as u32)?.into();
    println!(
        "Swapping {} ({} minimal units) of {:?} for {:?}\n",
        args.amount, amount_in, token_in, token_out
    );

    let nonce = Arc::new(AccountNonce::new(ledger.clone(), account));

    if args.wrap && token_in == config.wrapped_native {
        let balance = token_balance(ledger.as_ref(), token_in, account).await?;
        if balance < amount_in {
            let shortfall = amount_in - balance;
            println!("Wrapping {} native units to cover the input amount...", shortfall);
            let tracker =
                ReceiptTracker::new(ledger.clone(), config.poll_interval, config.max_wait);
            let wrapper =
                NativeWrapper::new(ledger.clone(), tracker, nonce.clone(), config.wrapped_native);
            let receipt = wrapper.wrap(shortfall, &config.gas_policy).await?;
            println!("✅ Wrapped in {:?}\n", receipt.transaction_hash);
        }
    }

    let request = SwapRequest::new(
        account,
        vec![token_in, token_out],
        amount_in,
        config.slippage_bps,
        deadline_after(config.deadline_window),
        config.gas_policy.clone(),
    )?;

    let submitter = SwapSubmitter::with_nonce(ledger, &config, nonce);
    match submitter.execute(&request).await {
        Ok(report) => {
            println!("{}", report);
            match report.outcome {
                SwapOutcome::Succeeded { .. } => std::process::exit(0),
                SwapOutcome::Reverted { .. } => std::process::exit(1),
                SwapOutcome::TimedOut { .. } => std::process::exit(2),
            }
        }
        Err(err) => {
            println!("❌ Swap rejected: {}\n", err);
            std::process::exit(3);
        }
    }
}

async fn token_decimals(ledger: &dyn Ledger, token: Address) -> swap_executor::Result<u8> {
    let raw = ledger.call(token, DecimalsCall {}.encode().into()).await?;
    Ok(DecimalsReturn::decode(&raw)?.0)
}

async fn token_balance(
    ledger: &dyn Ledger,
    token: Address,
    account: Address,
) -> swap_executor::Result<U256> {
    let raw = ledger
        .call(token, BalanceOfCall { account }.encode().into())
        .await?;
    Ok(BalanceOfReturn::decode(&raw)?.0)
}
