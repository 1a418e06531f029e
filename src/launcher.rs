use clap::{Args, Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::{ConfigError, LedgerArgs, LogLevel};
use crate::issuance::{IssuanceError, IssuanceResult, RenounceOutcome};
use crate::ledger::LedgerConnector;
use crate::manifest::{ManifestError, ValidationError, load_manifest, validate};

#[derive(Debug, Parser)]
#[command(name = "twisted-soul")]
#[command(about = "Launch SPL tokens from a local manifest")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(
        long,
        env = "LOG_LEVEL",
        value_enum,
        default_value = "info",
        global = true,
        help = "Log level, overridden by RUST_LOG"
    )]
    pub log_level: LogLevel,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the mint, mint the full supply and apply bindings.
    Launch(LaunchArgs),

    /// Write a new signer keypair to disk.
    GenerateWallet {
        #[arg(long, default_value = "wallet.json")]
        output: PathBuf,

        #[arg(long, help = "Overwrite an existing key file")]
        force: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct LaunchArgs {
    #[command(flatten)]
    pub ledger: LedgerArgs,

    #[arg(
        long,
        env = "MANIFEST_PATH",
        default_value = "manifest.json",
        help = "Token manifest to launch"
    )]
    pub manifest: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Issuance(#[from] IssuanceError),
}

/// Loads the wallet and manifest, then runs one launch.
///
/// Both files are read and the manifest validated before any ledger call.
///
/// # Errors
///
/// Returns `LaunchError` if a file is missing or malformed, the manifest is
/// invalid, or a mandatory launch step fails.
pub async fn launch(
    args: &LaunchArgs,
    connector: Arc<dyn LedgerConnector>,
) -> Result<IssuanceResult, LaunchError> {
    let issuer = args.ledger.issuer(connector)?;
    info!(wallet = %issuer.signer(), "Wallet loaded");

    let config = validate(load_manifest(&args.manifest)?)?;

    Ok(issuer.issue(&config).await?)
}

/// Human-readable launch report for the terminal.
pub fn render_summary(result: &IssuanceResult) -> String {
    let mut out = String::new();
    let flag = |set: bool| if set { "TRUE" } else { "FALSE" };

    let _ = writeln!(out, "=== Twisted Soul Launch Complete ===");
    let _ = writeln!(out, "Network : {}", result.network);
    let _ = writeln!(out, "Token   : {} ({})", result.name, result.symbol);
    let _ = writeln!(
        out,
        "Supply  : {} ({} raw units, {} decimals)",
        result.supply, result.raw_supply, result.decimals
    );
    let _ = writeln!(out, "Mint    : {}", result.mint);
    let _ = writeln!(out, "ATA     : {}", result.holding_account);
    let _ = writeln!(out, "Mint TX : {}", result.mint_signature);

    let renounce = match &result.renounce {
        RenounceOutcome::Skipped => "not requested".to_string(),
        RenounceOutcome::Renounced { signature } => {
            format!("renounced ({signature})")
        }
        RenounceOutcome::Failed { reason } => format!("FAILED: {reason}"),
    };
    let _ = writeln!(out, "Mint authority : {renounce}");

    let bindings = result.bindings;
    let _ = writeln!(out, "LockLiquidity  : {}", flag(bindings.lock_liquidity));
    let _ = writeln!(out, "NoGodWallet    : {}", flag(bindings.no_god_wallet));
    let _ = write!(out, "OpenSource     : {}", flag(bindings.open_source));

    out
}
