use anyhow::{Context, Result};
use clap::Parser;

use steth_proofgen::{generate_proof_data, oracle, BlockSelector, RpcClient};

/// StableSwapStateOracle mainnet deployment.
const DEFAULT_ORACLE_ADDRESS: &str = "0x602C71e4DAC47a042Ee7f46E0aee17F94A3bA0B6";

/// Blocks kept back from the chain head when no block is given, so a shallow
/// reorg cannot invalidate the bundle while it is in flight.
const REORG_BUFFER: u64 = 15;

#[derive(Debug, Parser)]
#[command(name = "steth-proofgen")]
#[command(about = "Merkle-Patricia proof generating tool for the stETH state oracle")]
struct Cli {
    /// Block number or `latest`/`earliest`. Defaults to `latest - 15`.
    #[arg(short = 'b', long)]
    block_number: Option<String>,

    /// URL of a full node JSON-RPC endpoint.
    #[arg(short, long, default_value = "http://localhost:8545", env = "RPC_URL")]
    rpc: String,

    /// Oracle contract address, queried for the accounts and slots to prove.
    #[arg(long, default_value = DEFAULT_ORACLE_ADDRESS)]
    contract: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "steth_proofgen=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let client = RpcClient::new(cli.rpc.clone());

    let selector = match &cli.block_number {
        Some(s) => s
            .parse::<BlockSelector>()
            .context("invalid --block-number")?,
        None => {
            let head = client
                .block_number()
                .await
                .context("failed to fetch chain head")?;
            BlockSelector::Number(head.saturating_sub(REORG_BUFFER))
        }
    };

    let params = oracle::fetch_proof_params(&client, &cli.contract)
        .await
        .context("failed to read proof params from oracle contract")?;

    let data = generate_proof_data(&client, selector, &params)
        .await
        .context("proof generation failed")?;
    let (header_blob, proofs_blob) = data.to_blobs();

    println!("\nBlock number: {}\n", data.block_number);
    println!("Header RLP bytes:\n");
    println!("0x{}\n", hex::encode(&header_blob));
    println!("Proofs list RLP bytes:\n");
    println!("0x{}", hex::encode(&proofs_blob));

    Ok(())
}
