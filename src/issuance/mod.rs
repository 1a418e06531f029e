mod api;

use chrono::{DateTime, Utc};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub(crate) use api::{issue_token, status};
pub use api::{MintResponse, StatusResponse};

use crate::funding::{FundingError, FundingOutcome, ensure_funded};
use crate::ledger::{LedgerConnector, LedgerError, serialize_base58};
use crate::manifest::{Bindings, TokenConfig};
use crate::network::{Network, NetworkContext};
use crate::supply::{RawSupply, SupplyError, to_mintable_units};

/// Outcome of the optional mint-authority revocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RenounceOutcome {
    /// `renounceMint` was not requested.
    Skipped,
    Renounced {
        #[serde(serialize_with = "serialize_base58")]
        signature: Signature,
    },
    Failed { reason: String },
}

/// Record of a completed launch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuanceResult {
    pub issuance_id: Uuid,
    pub network: Network,
    pub name: String,
    pub symbol: String,
    pub supply: String,
    pub raw_supply: RawSupply,
    pub decimals: u8,
    #[serde(serialize_with = "serialize_base58")]
    pub owner: Pubkey,
    #[serde(serialize_with = "serialize_base58")]
    pub mint: Pubkey,
    #[serde(serialize_with = "serialize_base58")]
    pub holding_account: Pubkey,
    #[serde(serialize_with = "serialize_base58")]
    pub create_mint_signature: Signature,
    #[serde(serialize_with = "serialize_base58")]
    pub mint_signature: Signature,
    pub renounce: RenounceOutcome,
    pub funding: FundingOutcome,
    pub bindings: Bindings,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum IssuanceError {
    #[error(transparent)]
    Supply(#[from] SupplyError),

    #[error("Failed to connect to {network}: {source}")]
    Connection {
        network: Network,
        #[source]
        source: LedgerError,
    },

    #[error("Funding failed: {0}")]
    Funding(#[from] FundingError),

    #[error("Mint creation failed: {0}")]
    MintCreation(#[source] LedgerError),

    #[error("Token account creation failed for mint {mint}: {source}")]
    AccountCreation {
        mint: Pubkey,
        #[source]
        source: LedgerError,
    },

    #[error(
        "Minting supply failed for mint {mint} (token account {holding_account}): {source}"
    )]
    MintSupply {
        mint: Pubkey,
        holding_account: Pubkey,
        #[source]
        source: LedgerError,
    },
}

impl IssuanceError {
    /// True when the input was rejected before any ledger call.
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Supply(_))
    }

    /// Mint left on chain by a launch that failed after creating it.
    pub const fn partial_mint(&self) -> Option<&Pubkey> {
        match self {
            Self::AccountCreation { mint, .. } | Self::MintSupply { mint, .. } => {
                Some(mint)
            }
            Self::Supply(_)
            | Self::Connection { .. }
            | Self::Funding(_)
            | Self::MintCreation(_) => None,
        }
    }
}

/// Runs token launches against a ledger for a single signer.
///
/// Every call to `issue` creates a brand-new mint: there is no
/// deduplication, no retry and no rollback of steps that already landed.
/// Concurrent calls share the signer and are not serialized.
pub struct Issuer {
    connector: Arc<dyn LedgerConnector>,
    network: NetworkContext,
    signer: Arc<Keypair>,
    decimals: u8,
}

impl Issuer {
    /// Creates a new issuer.
    ///
    /// # Arguments
    ///
    /// * `connector` - Opens the ledger session for each launch
    /// * `network` - Cluster and endpoint to launch on
    /// * `signer` - Payer, mint authority and owner of the minted supply
    /// * `decimals` - Decimal precision of created mints
    pub fn new(
        connector: Arc<dyn LedgerConnector>,
        network: NetworkContext,
        signer: Arc<Keypair>,
        decimals: u8,
    ) -> Self {
        Self { connector, network, signer, decimals }
    }

    pub const fn network(&self) -> &NetworkContext {
        &self.network
    }

    pub fn signer(&self) -> Pubkey {
        self.signer.pubkey()
    }

    /// Launches the token described by `config`.
    ///
    /// Steps, each waiting on the previous one:
    /// 1. Converts the supply to raw units and checks it fits the token
    ///    program's `u64` amount (no network access)
    /// 2. Connects to the cluster
    /// 3. Ensures the signer is funded (devnet airdrop only)
    /// 4. Creates the mint with the signer as mint authority
    /// 5. Gets or creates the signer's associated token account
    /// 6. Mints the full supply into that account
    /// 7. Revokes the mint authority if `renounceMint` is set
    ///
    /// A failed revocation is recorded in the result rather than returned as
    /// an error.
    ///
    /// # Errors
    ///
    /// * `IssuanceError::Supply` - supply cannot be scaled to a mintable
    ///   raw amount
    /// * `IssuanceError::Connection` - cluster unreachable
    /// * `IssuanceError::Funding` - balance query or airdrop failed
    /// * `IssuanceError::MintCreation` - mint was not created
    /// * `IssuanceError::AccountCreation` - mint exists, no token account
    /// * `IssuanceError::MintSupply` - mint and account exist, supply not
    ///   delivered
    pub async fn issue(
        &self,
        config: &TokenConfig,
    ) -> Result<IssuanceResult, IssuanceError> {
        let issuance_id = Uuid::new_v4();
        let raw_supply = to_mintable_units(config.supply(), self.decimals)?;
        let network = self.network.network();
        let owner = self.signer.pubkey();
        let bindings = config.bindings();

        info!(
            %issuance_id,
            %network,
            %owner,
            name = config.name(),
            symbol = config.symbol(),
            supply = config.supply(),
            %raw_supply,
            decimals = self.decimals,
            ?bindings,
            "Starting token launch"
        );

        let ledger = self
            .connector
            .connect(&self.network, self.signer.clone())
            .await
            .map_err(|source| IssuanceError::Connection { network, source })?;

        let funding =
            ensure_funded(ledger.as_ref(), &owner, &self.network).await?;

        let created = ledger
            .create_mint(self.decimals)
            .await
            .map_err(IssuanceError::MintCreation)?;
        let mint = created.mint;

        info!(
            %issuance_id,
            %mint,
            signature = %created.signature,
            "Mint created"
        );

        let holding_account = ledger
            .holding_account(&mint, &owner)
            .await
            .map_err(|source| IssuanceError::AccountCreation { mint, source })?;

        info!(%issuance_id, %mint, %holding_account, "Token account ready");

        let mint_signature = ledger
            .mint_to(&mint, &holding_account, raw_supply)
            .await
            .map_err(|source| {
                warn!(
                    %issuance_id,
                    %mint,
                    %holding_account,
                    error = %source,
                    "Minting supply failed; mint left without supply"
                );
                IssuanceError::MintSupply { mint, holding_account, source }
            })?;

        info!(
            %issuance_id,
            %mint,
            signature = %mint_signature,
            supply = config.supply(),
            "Supply minted"
        );

        let renounce = if bindings.renounce_mint {
            match ledger.revoke_mint_authority(&mint).await {
                Ok(signature) => {
                    info!(
                        %issuance_id,
                        %mint,
                        %signature,
                        "Mint authority renounced"
                    );
                    RenounceOutcome::Renounced { signature }
                }
                Err(e) => {
                    warn!(
                        %issuance_id,
                        %mint,
                        error = %e,
                        "Failed to renounce mint authority"
                    );
                    RenounceOutcome::Failed { reason: e.to_string() }
                }
            }
        } else {
            info!(%issuance_id, "renounceMint not set; mint authority kept");
            RenounceOutcome::Skipped
        };

        log_advisory_bindings(issuance_id, bindings);

        info!(%issuance_id, %mint, %holding_account, "Token launch complete");

        Ok(IssuanceResult {
            issuance_id,
            network,
            name: config.name().to_string(),
            symbol: config.symbol().to_string(),
            supply: config.supply().to_string(),
            raw_supply,
            decimals: self.decimals,
            owner,
            mint,
            holding_account,
            create_mint_signature: created.signature,
            mint_signature,
            renounce,
            funding,
            bindings,
            issued_at: Utc::now(),
        })
    }
}

/// These bindings have no on-chain effect here; they are surfaced for the
/// DEX and review layers that enforce them.
fn log_advisory_bindings(issuance_id: Uuid, bindings: Bindings) {
    if bindings.lock_liquidity {
        info!(%issuance_id, "lockLiquidity set; LP lock enforced in DEX layer");
    } else {
        info!(%issuance_id, "lockLiquidity not set; LP can be pulled");
    }

    if bindings.no_god_wallet {
        info!(%issuance_id, "noGodWallet set; admin wallets to be avoided");
    } else {
        info!(%issuance_id, "noGodWallet not set; admin wallet allowed");
    }

    if bindings.open_source {
        info!(%issuance_id, "openSource set; code transparency expected");
    } else {
        info!(%issuance_id, "openSource not set; closed source");
    }
}
