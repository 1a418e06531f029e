use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use url::Url;

/// Solana cluster a launch runs against.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    Devnet,
    Testnet,
    #[value(name = "mainnet-beta")]
    MainnetBeta,
}

impl Network {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Devnet => "devnet",
            Self::Testnet => "testnet",
            Self::MainnetBeta => "mainnet-beta",
        }
    }

    /// Public RPC endpoint for the cluster.
    pub const fn default_rpc_url(self) -> &'static str {
        match self {
            Self::Devnet => "https://api.devnet.solana.com",
            Self::Testnet => "https://api.testnet.solana.com",
            Self::MainnetBeta => "https://api.mainnet-beta.solana.com",
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The cluster and endpoint an issuance talks to.
///
/// Passed explicitly to the connector, funding check and issuer so nothing
/// in the issuance path reads the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkContext {
    network: Network,
    rpc_url: Url,
}

impl NetworkContext {
    /// Context for `network` using the cluster's public endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error only if the built-in endpoint fails to parse.
    pub fn new(network: Network) -> Result<Self, url::ParseError> {
        Ok(Self { network, rpc_url: Url::parse(network.default_rpc_url())? })
    }

    pub const fn with_rpc_url(network: Network, rpc_url: Url) -> Self {
        Self { network, rpc_url }
    }

    pub const fn network(&self) -> Network {
        self.network
    }

    pub const fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }

    /// Only devnet exposes an airdrop faucet that launches may draw on.
    pub const fn faucet_enabled(&self) -> bool {
        matches!(self.network, Network::Devnet)
    }
}
