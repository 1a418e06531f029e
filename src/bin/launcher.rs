use clap::Parser;
use solana_sdk::signature::Signer;
use std::sync::Arc;

use twisted_soul::launcher::{Cli, Command, launch, render_summary};
use twisted_soul::wallet::generate_wallet;
use twisted_soul::{RpcLedgerConnector, setup_tracing};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_tracing(cli.log_level);

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Launch(args) => {
            let result = launch(&args, Arc::new(RpcLedgerConnector)).await?;
            println!("{}", render_summary(&result));
        }
        Command::GenerateWallet { output, force } => {
            let keypair = generate_wallet(&output, force)?;
            println!("New wallet created.");
            println!("Public key: {}", keypair.pubkey());
            println!("Secret key saved to {}", output.display());
        }
    }

    Ok(())
}
