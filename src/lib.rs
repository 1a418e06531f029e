use rocket::routes;
use std::sync::Arc;
use tracing::info;

pub mod config;
pub mod funding;
pub mod issuance;
pub mod launcher;
pub mod ledger;
pub mod manifest;
pub mod network;
pub mod supply;
pub mod wallet;

pub(crate) mod catchers;
pub(crate) mod cors;

pub use config::{Config, LedgerArgs, LogLevel, setup_tracing};
pub use issuance::{
    IssuanceError, IssuanceResult, Issuer, MintResponse, RenounceOutcome,
    StatusResponse,
};
pub use ledger::{LedgerConnector, LedgerService, RpcLedgerConnector};
pub use manifest::{Bindings, RawManifest, TokenConfig, validate};
pub use network::{Network, NetworkContext};
pub use supply::{RawSupply, to_raw_units};

/// Builds the HTTP service against the configured Solana cluster.
///
/// The signer is loaded once here and shared by every request.
///
/// # Errors
///
/// Returns an error if the wallet file is missing or invalid, or the RPC
/// endpoint cannot be parsed.
pub fn initialize_rocket(
    config: Config,
) -> Result<rocket::Rocket<rocket::Build>, anyhow::Error> {
    let issuer = config.ledger.issuer(Arc::new(RpcLedgerConnector))?;

    info!(
        network = %issuer.network().network(),
        rpc_url = %issuer.network().rpc_url(),
        wallet = %issuer.signer(),
        "Issuer ready"
    );

    Ok(build_rocket(&config, Arc::new(issuer)))
}

fn build_rocket(
    config: &Config,
    issuer: Arc<Issuer>,
) -> rocket::Rocket<rocket::Build> {
    let figment = rocket::Config::figment()
        .merge(("address", config.address))
        .merge(("port", config.port))
        .merge(("ip_header", false));

    rocket::custom(figment)
        .manage(issuer)
        .mount("/", routes![issuance::status, issuance::issue_token])
        .register("/", catchers::json_catchers())
        .attach(cors::Cors)
}
