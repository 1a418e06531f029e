use async_trait::async_trait;
use serde::Serializer;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use std::sync::Arc;

use crate::network::NetworkContext;
use crate::supply::RawSupply;

mod service;

#[cfg(test)]
pub(crate) mod mock;

pub use service::{RpcLedgerConnector, RpcLedgerService};

/// Opens a ledger session for a signer on a given cluster.
#[async_trait]
pub trait LedgerConnector: Send + Sync {
    async fn connect(
        &self,
        network: &NetworkContext,
        signer: Arc<Keypair>,
    ) -> Result<Arc<dyn LedgerService>, LedgerError>;
}

/// Ledger operations a launch needs. Every mutating call is signed and paid
/// for by the session's signer and returns once the transaction is
/// confirmed.
#[async_trait]
pub trait LedgerService: Send + Sync {
    /// Public key of the signer paying for and authorising transactions.
    fn payer(&self) -> Pubkey;

    /// Balance of `account` in lamports.
    async fn balance(&self, account: &Pubkey) -> Result<u64, LedgerError>;

    async fn request_airdrop(
        &self,
        account: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, LedgerError>;

    /// Blocks until `signature` reaches confirmed commitment.
    async fn confirm(&self, signature: &Signature) -> Result<(), LedgerError>;

    /// Creates a mint with the payer as mint authority and no freeze
    /// authority.
    async fn create_mint(
        &self,
        decimals: u8,
    ) -> Result<CreatedMint, LedgerError>;

    /// Returns the associated token account of `owner` for `mint`, creating
    /// it if it does not exist yet.
    async fn holding_account(
        &self,
        mint: &Pubkey,
        owner: &Pubkey,
    ) -> Result<Pubkey, LedgerError>;

    async fn mint_to(
        &self,
        mint: &Pubkey,
        account: &Pubkey,
        amount: RawSupply,
    ) -> Result<Signature, LedgerError>;

    /// Clears the mint authority so no further supply can be minted.
    async fn revoke_mint_authority(
        &self,
        mint: &Pubkey,
    ) -> Result<Signature, LedgerError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedMint {
    pub mint: Pubkey,
    pub signature: Signature,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("RPC error: {message}")]
    Rpc { message: String },

    #[error("Failed to build instruction: {message}")]
    Instruction { message: String },

    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("Amount {amount} exceeds the token program's u64 range")]
    AmountOutOfRange { amount: RawSupply },
}

/// Serializes keys and signatures as their base58 text form.
pub(crate) fn serialize_base58<T, S>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    T: std::fmt::Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
