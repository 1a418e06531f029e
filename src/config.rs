use clap::{Args, Parser, ValueEnum};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::issuance::Issuer;
use crate::ledger::LedgerConnector;
use crate::network::{Network, NetworkContext};
use crate::supply::DEFAULT_DECIMALS;
use crate::wallet::{WalletError, load_signer};

/// Settings shared by every entry point that talks to the ledger.
#[derive(Debug, Clone, Args)]
pub struct LedgerArgs {
    #[arg(
        long,
        env = "TSOUL_NETWORK",
        value_enum,
        default_value = "devnet",
        help = "Solana cluster to launch on"
    )]
    pub network: Network,

    #[arg(
        long,
        env = "RPC_URL",
        help = "RPC endpoint, overriding the cluster's public endpoint"
    )]
    pub rpc_url: Option<Url>,

    #[arg(
        long,
        env = "WALLET_PATH",
        default_value = "wallet.json",
        help = "JSON file holding the signer's secret key bytes"
    )]
    pub wallet: PathBuf,

    #[arg(
        long,
        env = "TOKEN_DECIMALS",
        default_value_t = DEFAULT_DECIMALS,
        help = "Decimal precision of created mints"
    )]
    pub decimals: u8,
}

impl LedgerArgs {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRpcUrl` if the cluster's built-in
    /// endpoint fails to parse.
    pub fn network_context(&self) -> Result<NetworkContext, ConfigError> {
        match &self.rpc_url {
            Some(url) => {
                Ok(NetworkContext::with_rpc_url(self.network, url.clone()))
            }
            None => Ok(NetworkContext::new(self.network)?),
        }
    }

    /// Loads the signer and builds an `Issuer` over `connector`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Wallet` if the key file is missing or invalid.
    pub fn issuer(
        &self,
        connector: Arc<dyn LedgerConnector>,
    ) -> Result<Issuer, ConfigError> {
        let signer = load_signer(&self.wallet)?;

        Ok(Issuer::new(
            connector,
            self.network_context()?,
            Arc::new(signer),
            self.decimals,
        ))
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "twisted-soul-server")]
#[command(about = "HTTP service that launches SPL tokens from JSON manifests")]
pub struct Config {
    #[command(flatten)]
    pub ledger: LedgerArgs,

    #[arg(long, env = "PORT", default_value_t = 8080, help = "Listening port")]
    pub port: u16,

    #[arg(
        long,
        env = "BIND_ADDRESS",
        default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        help = "Address to bind the HTTP listener to"
    )]
    pub address: IpAddr,

    #[arg(
        long,
        env = "LOG_LEVEL",
        value_enum,
        default_value = "info",
        help = "Log level, overridden by RUST_LOG"
    )]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Installs the global fmt subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `log_level` when set. Calling this more
/// than once is a no-op.
pub fn setup_tracing(log_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(#[from] url::ParseError),

    #[error(transparent)]
    Wallet(#[from] WalletError),
}
