use async_trait::async_trait;
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;
use solana_system_interface::instruction::create_account;
use spl_associated_token_account::get_associated_token_address;
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use spl_token::instruction::{
    AuthorityType, initialize_mint2, mint_to as mint_to_instruction,
    set_authority,
};
use spl_token::solana_program::program_pack::Pack;
use std::sync::Arc;
use tracing::{debug, info};

use super::{CreatedMint, LedgerConnector, LedgerError, LedgerService};
use crate::network::NetworkContext;
use crate::supply::RawSupply;

/// Connects to a Solana JSON-RPC endpoint at confirmed commitment.
#[derive(Debug, Clone, Copy, Default)]
pub struct RpcLedgerConnector;

#[async_trait]
impl LedgerConnector for RpcLedgerConnector {
    async fn connect(
        &self,
        network: &NetworkContext,
        signer: Arc<Keypair>,
    ) -> Result<Arc<dyn LedgerService>, LedgerError> {
        let rpc = RpcClient::new_with_commitment(
            network.rpc_url().to_string(),
            CommitmentConfig::confirmed(),
        );

        let version = rpc.get_version().await.map_err(rpc_error)?;

        info!(
            network = %network.network(),
            rpc_url = %network.rpc_url(),
            solana_core = %version.solana_core,
            "Connected to cluster"
        );

        Ok(Arc::new(RpcLedgerService::new(rpc, signer)))
    }
}

/// `LedgerService` backed by the SPL token and associated token account
/// programs.
pub struct RpcLedgerService {
    rpc: RpcClient,
    signer: Arc<Keypair>,
}

impl RpcLedgerService {
    pub const fn new(rpc: RpcClient, signer: Arc<Keypair>) -> Self {
        Self { rpc, signer }
    }

    async fn send(
        &self,
        instructions: &[Instruction],
        extra_signers: &[&Keypair],
    ) -> Result<Signature, LedgerError> {
        let blockhash =
            self.rpc.get_latest_blockhash().await.map_err(rpc_error)?;

        let mut signers: Vec<&Keypair> = vec![self.signer.as_ref()];
        signers.extend_from_slice(extra_signers);

        let transaction = Transaction::new_signed_with_payer(
            instructions,
            Some(&self.signer.pubkey()),
            &signers,
            blockhash,
        );

        self.rpc.send_and_confirm_transaction(&transaction).await.map_err(|e| {
            LedgerError::TransactionFailed { reason: e.to_string() }
        })
    }
}

#[async_trait]
impl LedgerService for RpcLedgerService {
    fn payer(&self) -> Pubkey {
        self.signer.pubkey()
    }

    async fn balance(&self, account: &Pubkey) -> Result<u64, LedgerError> {
        self.rpc.get_balance(account).await.map_err(rpc_error)
    }

    async fn request_airdrop(
        &self,
        account: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, LedgerError> {
        self.rpc.request_airdrop(account, lamports).await.map_err(rpc_error)
    }

    async fn confirm(&self, signature: &Signature) -> Result<(), LedgerError> {
        let commitment = CommitmentConfig::confirmed();

        // Polling returns once any status exists, including a failed one.
        self.rpc
            .poll_for_signature_with_commitment(signature, commitment)
            .await
            .map_err(rpc_error)?;

        match self
            .rpc
            .get_signature_status_with_commitment(signature, commitment)
            .await
            .map_err(rpc_error)?
        {
            Some(Ok(())) => Ok(()),
            Some(Err(e)) => {
                Err(LedgerError::TransactionFailed { reason: e.to_string() })
            }
            None => Err(LedgerError::Rpc {
                message: format!("No status for transaction {signature}"),
            }),
        }
    }

    async fn create_mint(
        &self,
        decimals: u8,
    ) -> Result<CreatedMint, LedgerError> {
        let payer = self.payer();
        let mint = Keypair::new();
        let space = spl_token::state::Mint::LEN;

        let rent = self
            .rpc
            .get_minimum_balance_for_rent_exemption(space)
            .await
            .map_err(rpc_error)?;

        let instructions = [
            create_account(
                &payer,
                &mint.pubkey(),
                rent,
                space as u64,
                &spl_token::id(),
            ),
            initialize_mint2(
                &spl_token::id(),
                &mint.pubkey(),
                &payer,
                None,
                decimals,
            )
            .map_err(instruction_error)?,
        ];

        let signature = self.send(&instructions, &[&mint]).await?;

        Ok(CreatedMint { mint: mint.pubkey(), signature })
    }

    async fn holding_account(
        &self,
        mint: &Pubkey,
        owner: &Pubkey,
    ) -> Result<Pubkey, LedgerError> {
        let address = get_associated_token_address(owner, mint);

        let existing = self
            .rpc
            .get_account_with_commitment(&address, self.rpc.commitment())
            .await
            .map_err(rpc_error)?;

        if existing.value.is_some() {
            debug!(%address, "Associated token account already exists");
            return Ok(address);
        }

        let instruction = create_associated_token_account_idempotent(
            &self.payer(),
            owner,
            mint,
            &spl_token::id(),
        );

        let signature = self.send(&[instruction], &[]).await?;
        debug!(%address, %signature, "Created associated token account");

        Ok(address)
    }

    async fn mint_to(
        &self,
        mint: &Pubkey,
        account: &Pubkey,
        amount: RawSupply,
    ) -> Result<Signature, LedgerError> {
        let amount =
            amount.to_u64().ok_or(LedgerError::AmountOutOfRange { amount })?;

        let instruction = mint_to_instruction(
            &spl_token::id(),
            mint,
            account,
            &self.payer(),
            &[],
            amount,
        )
        .map_err(instruction_error)?;

        self.send(&[instruction], &[]).await
    }

    async fn revoke_mint_authority(
        &self,
        mint: &Pubkey,
    ) -> Result<Signature, LedgerError> {
        let instruction = set_authority(
            &spl_token::id(),
            mint,
            None,
            AuthorityType::MintTokens,
            &self.payer(),
            &[],
        )
        .map_err(instruction_error)?;

        self.send(&[instruction], &[]).await
    }
}

fn rpc_error(e: ClientError) -> LedgerError {
    LedgerError::Rpc { message: e.to_string() }
}

fn instruction_error(e: impl std::fmt::Display) -> LedgerError {
    LedgerError::Instruction { message: e.to_string() }
}
