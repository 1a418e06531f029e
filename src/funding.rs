use rust_decimal::Decimal;
use serde::Serialize;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use tracing::info;

use crate::ledger::{LedgerError, LedgerService, serialize_base58};
use crate::network::NetworkContext;

/// Balance below which a devnet signer is topped up: half a SOL.
pub const MIN_BALANCE_LAMPORTS: u64 = LAMPORTS_PER_SOL / 2;

/// Size of a single devnet airdrop: one SOL.
pub const AIRDROP_LAMPORTS: u64 = LAMPORTS_PER_SOL;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum FundingOutcome {
    /// The cluster has no faucet; balance reported only.
    Skipped { balance: u64 },
    Sufficient { balance: u64 },
    #[serde(rename_all = "camelCase")]
    Airdropped {
        #[serde(serialize_with = "serialize_base58")]
        signature: Signature,
        previous_balance: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FundingError {
    #[error("Failed to query balance: {0}")]
    Balance(#[source] LedgerError),

    #[error("Devnet airdrop failed: {0}")]
    Airdrop(#[source] LedgerError),

    #[error("Devnet airdrop {signature} was not confirmed: {source}")]
    Confirmation {
        signature: Signature,
        #[source]
        source: LedgerError,
    },
}

/// Makes sure `account` can pay for a launch.
///
/// Off devnet this only reports the balance. On devnet a balance under
/// `MIN_BALANCE_LAMPORTS` triggers one airdrop of `AIRDROP_LAMPORTS`, and
/// the call waits for it to be confirmed. Nothing is retried.
///
/// # Errors
///
/// Returns `FundingError` if the balance query, the airdrop request or its
/// confirmation fails.
pub async fn ensure_funded(
    ledger: &dyn LedgerService,
    account: &Pubkey,
    network: &NetworkContext,
) -> Result<FundingOutcome, FundingError> {
    let balance = ledger.balance(account).await.map_err(FundingError::Balance)?;

    if !network.faucet_enabled() {
        info!(
            network = %network.network(),
            balance_sol = %format_sol(balance),
            "No airdrop on this network"
        );
        return Ok(FundingOutcome::Skipped { balance });
    }

    if balance >= MIN_BALANCE_LAMPORTS {
        info!(balance_sol = %format_sol(balance), "Wallet balance OK");
        return Ok(FundingOutcome::Sufficient { balance });
    }

    info!(
        %account,
        balance_sol = %format_sol(balance),
        "Requesting devnet airdrop"
    );

    let signature = ledger
        .request_airdrop(account, AIRDROP_LAMPORTS)
        .await
        .map_err(FundingError::Airdrop)?;

    ledger
        .confirm(&signature)
        .await
        .map_err(|source| FundingError::Confirmation { signature, source })?;

    info!(%signature, "Devnet airdrop complete");

    Ok(FundingOutcome::Airdropped { signature, previous_balance: balance })
}

/// Lamports as SOL with four decimal places.
pub(crate) fn format_sol(lamports: u64) -> Decimal {
    (Decimal::from(lamports) / Decimal::from(LAMPORTS_PER_SOL))
        .round_dp(4)
        .normalize()
}
