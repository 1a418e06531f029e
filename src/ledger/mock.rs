use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use std::sync::{Arc, Mutex};

use super::{CreatedMint, LedgerConnector, LedgerError, LedgerService};
use crate::network::NetworkContext;
use crate::supply::RawSupply;

/// Ledger call recorded by `MockLedgerService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LedgerCall {
    Balance,
    RequestAirdrop { lamports: u64 },
    Confirm,
    CreateMint { decimals: u8 },
    HoldingAccount { mint: Pubkey, owner: Pubkey },
    MintTo { mint: Pubkey, account: Pubkey, amount: RawSupply },
    RevokeMintAuthority { mint: Pubkey },
}

/// Which call the mock should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailAt {
    Balance,
    RequestAirdrop,
    Confirm,
    CreateMint,
    HoldingAccount,
    MintTo,
    RevokeMintAuthority,
}

pub(crate) struct MockLedgerService {
    payer: Pubkey,
    balance: u64,
    fail_at: Option<(FailAt, String)>,
    mint: Pubkey,
    holding_account: Pubkey,
    calls: Arc<Mutex<Vec<LedgerCall>>>,
}

impl MockLedgerService {
    pub(crate) fn new_success() -> Self {
        Self {
            payer: Pubkey::new_unique(),
            balance: 2_000_000_000,
            fail_at: None,
            mint: Pubkey::new_unique(),
            holding_account: Pubkey::new_unique(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn new_failure(step: FailAt, reason: impl Into<String>) -> Self {
        Self { fail_at: Some((step, reason.into())), ..Self::new_success() }
    }

    pub(crate) fn with_balance(mut self, lamports: u64) -> Self {
        self.balance = lamports;
        self
    }

    pub(crate) fn with_payer(mut self, payer: Pubkey) -> Self {
        self.payer = payer;
        self
    }

    pub(crate) const fn mint(&self) -> Pubkey {
        self.mint
    }

    pub(crate) const fn holding_account_address(&self) -> Pubkey {
        self.holding_account
    }

    pub(crate) fn calls(&self) -> Vec<LedgerCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: LedgerCall, step: FailAt) -> Result<(), LedgerError> {
        self.calls.lock().unwrap().push(call);

        match &self.fail_at {
            Some((failing, reason)) if *failing == step => {
                Err(LedgerError::TransactionFailed { reason: reason.clone() })
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl LedgerService for MockLedgerService {
    fn payer(&self) -> Pubkey {
        self.payer
    }

    async fn balance(&self, _account: &Pubkey) -> Result<u64, LedgerError> {
        self.record(LedgerCall::Balance, FailAt::Balance)?;
        Ok(self.balance)
    }

    async fn request_airdrop(
        &self,
        _account: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, LedgerError> {
        self.record(
            LedgerCall::RequestAirdrop { lamports },
            FailAt::RequestAirdrop,
        )?;
        Ok(Signature::new_unique())
    }

    async fn confirm(&self, _signature: &Signature) -> Result<(), LedgerError> {
        self.record(LedgerCall::Confirm, FailAt::Confirm)
    }

    async fn create_mint(
        &self,
        decimals: u8,
    ) -> Result<CreatedMint, LedgerError> {
        self.record(LedgerCall::CreateMint { decimals }, FailAt::CreateMint)?;
        Ok(CreatedMint { mint: self.mint, signature: Signature::new_unique() })
    }

    async fn holding_account(
        &self,
        mint: &Pubkey,
        owner: &Pubkey,
    ) -> Result<Pubkey, LedgerError> {
        self.record(
            LedgerCall::HoldingAccount { mint: *mint, owner: *owner },
            FailAt::HoldingAccount,
        )?;
        Ok(self.holding_account)
    }

    async fn mint_to(
        &self,
        mint: &Pubkey,
        account: &Pubkey,
        amount: RawSupply,
    ) -> Result<Signature, LedgerError> {
        self.record(
            LedgerCall::MintTo { mint: *mint, account: *account, amount },
            FailAt::MintTo,
        )?;
        Ok(Signature::new_unique())
    }

    async fn revoke_mint_authority(
        &self,
        mint: &Pubkey,
    ) -> Result<Signature, LedgerError> {
        self.record(
            LedgerCall::RevokeMintAuthority { mint: *mint },
            FailAt::RevokeMintAuthority,
        )?;
        Ok(Signature::new_unique())
    }
}

/// Hands out a shared `MockLedgerService`, or fails the connect step.
pub(crate) struct MockLedgerConnector {
    ledger: Arc<MockLedgerService>,
    connect_error: Option<String>,
    connect_count: Arc<Mutex<usize>>,
}

impl MockLedgerConnector {
    pub(crate) fn new(ledger: Arc<MockLedgerService>) -> Self {
        Self {
            ledger,
            connect_error: None,
            connect_count: Arc::new(Mutex::new(0)),
        }
    }

    pub(crate) fn unreachable(reason: impl Into<String>) -> Self {
        Self {
            connect_error: Some(reason.into()),
            ..Self::new(Arc::new(MockLedgerService::new_success()))
        }
    }

    pub(crate) fn connect_count(&self) -> usize {
        *self.connect_count.lock().unwrap()
    }
}

#[async_trait]
impl LedgerConnector for MockLedgerConnector {
    async fn connect(
        &self,
        _network: &NetworkContext,
        _signer: Arc<Keypair>,
    ) -> Result<Arc<dyn LedgerService>, LedgerError> {
        *self.connect_count.lock().unwrap() += 1;

        if let Some(message) = &self.connect_error {
            return Err(LedgerError::Rpc { message: message.clone() });
        }

        Ok(self.ledger.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;

    #[tokio::test]
    async fn test_records_calls_in_order() {
        let mock = MockLedgerService::new_success();
        let owner = Pubkey::new_unique();

        let created = mock.create_mint(9).await.unwrap();
        let account = mock.holding_account(&created.mint, &owner).await.unwrap();

        assert_eq!(created.mint, mock.mint());
        assert_eq!(account, mock.holding_account_address());
        assert_eq!(
            mock.calls(),
            vec![
                LedgerCall::CreateMint { decimals: 9 },
                LedgerCall::HoldingAccount { mint: mock.mint(), owner },
            ]
        );
    }

    #[tokio::test]
    async fn test_fails_only_the_configured_step() {
        let mock = MockLedgerService::new_failure(FailAt::MintTo, "boom");

        assert!(mock.create_mint(9).await.is_ok());

        let err = mock
            .mint_to(
                &mock.mint(),
                &mock.holding_account_address(),
                RawSupply(alloy::primitives::U256::from(1)),
            )
            .await
            .unwrap_err();

        assert_eq!(err, LedgerError::TransactionFailed { reason: "boom".into() });
    }

    #[tokio::test]
    async fn test_unreachable_connector_counts_attempts() {
        let connector = MockLedgerConnector::unreachable("offline");
        let network = NetworkContext::new(Network::Devnet).unwrap();

        let result = connector.connect(&network, Arc::new(Keypair::new())).await;

        assert!(matches!(result, Err(LedgerError::Rpc { message }) if message == "offline"));
        assert_eq!(connector.connect_count(), 1);
    }
}
