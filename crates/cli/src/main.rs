//! `solverify` — submit Solidity contract source for explorer verification.

use alloy_primitives::Address;
use clap::{Parser, ValueHint};
use eyre::Result;
use solverify::{verify, Networks, VerifyRequest};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use yansi::Paint;

/// Verify deployed contract source code on an Etherscan-style explorer.
#[derive(Clone, Debug, Parser)]
#[command(name = "solverify", version, about)]
pub struct Args {
    /// The address of the deployed contract.
    #[arg(value_name = "ADDRESS")]
    pub address: Address,

    /// Path to the contract source file.
    #[arg(value_hint = ValueHint::FilePath, value_name = "PATH")]
    pub path: PathBuf,

    /// Verification service API key.
    #[arg(long, env = "ETHERSCAN_API_KEY", value_name = "KEY")]
    pub key: String,

    /// The network the contract is deployed to.
    #[arg(long, default_value = "mainnet", value_name = "NETWORK")]
    pub network: String,

    /// The contract name, required when the file holds several contracts.
    #[arg(long, value_name = "NAME")]
    pub contract_name: Option<String>,

    /// Constructor argument values, in declaration order.
    #[arg(long, num_args = 1.., value_name = "VALUE")]
    pub constructor_args: Option<Vec<String>>,

    /// The number of optimizer runs used to build the contract.
    #[arg(long, value_name = "NUM")]
    pub runs: Option<u32>,

    /// The license type identifier to report.
    #[arg(long, value_name = "ID")]
    pub license_type: Option<u32>,

    /// Whether the contract was compiled with the optimizer enabled.
    #[arg(long)]
    pub optimize: bool,

    /// The EVM version the contract targets.
    #[arg(long, value_name = "VERSION")]
    pub evm_version: Option<String>,

    /// The compiler version used to build the contract; inferred from the
    /// source pragma when omitted.
    #[arg(long, value_name = "VERSION")]
    pub compiler_version: Option<String>,

    /// Do not narrate submission and polling progress.
    #[arg(long, short)]
    pub quiet: bool,
}

impl From<Args> for VerifyRequest {
    fn from(args: Args) -> Self {
        Self {
            key: args.key,
            path: args.path,
            address: args.address,
            network: args.network,
            contract_name: args.contract_name,
            constructor_values: args.constructor_args,
            runs: args.runs,
            license_type: args.license_type,
            optimize: args.optimize,
            evm_version: args.evm_version,
            compiler_version: args.compiler_version,
            quiet: args.quiet,
        }
    }
}

fn subscriber() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

fn main() -> Result<()> {
    subscriber();
    let args = Args::parse();
    main_args(args)
}

#[tokio::main]
async fn main_args(args: Args) -> Result<()> {
    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_token.cancel();
        }
    });

    let quiet = args.quiet;
    let request = VerifyRequest::from(args);
    let networks = Networks::default();
    if networks.endpoint(&request.network).is_err() {
        let known = networks.networks().collect::<Vec<_>>().join(", ");
        eyre::bail!("unsupported network `{}`; known networks: {known}", request.network);
    }

    let outcome = verify(&request, &networks, token).await?;
    let line = outcome_line(&outcome.message, outcome.is_success(), quiet);
    if outcome.is_success() {
        println!("{line}");
        Ok(())
    } else {
        eprintln!("{line}");
        std::process::exit(1);
    }
}

/// Renders the final outcome message: colored by result, plain under
/// `--quiet`.
fn outcome_line(message: &str, success: bool, quiet: bool) -> String {
    if quiet {
        message.to_string()
    } else if success {
        message.green().to_string()
    } else {
        message.red().to_string()
    }
}
