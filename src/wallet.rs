use solana_sdk::signature::{Keypair, Signer};
use std::path::Path;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error(
        "{path} missing. Run `twisted-soul generate-wallet` to create one first."
    )]
    NotFound { path: String },

    #[error("{path} already exists. Pass --force to overwrite it.")]
    AlreadyExists { path: String },

    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a JSON byte array: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} does not hold a valid keypair: {reason}")]
    InvalidKeypair { path: String, reason: String },
}

/// Loads the signer keypair from a JSON array of secret key bytes.
///
/// # Errors
///
/// Returns `WalletError::NotFound` if the file is absent, and the other
/// variants if it cannot be read or does not hold a 64-byte keypair.
pub fn load_signer(path: &Path) -> Result<Keypair, WalletError> {
    let location = path.display().to_string();

    let contents = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            WalletError::NotFound { path: location.clone() }
        } else {
            WalletError::Io { path: location.clone(), source }
        }
    })?;

    let bytes: Vec<u8> = serde_json::from_str(&contents).map_err(|source| {
        WalletError::Parse { path: location.clone(), source }
    })?;

    Keypair::try_from(bytes.as_slice()).map_err(|e| {
        WalletError::InvalidKeypair { path: location, reason: e.to_string() }
    })
}

/// Generates a fresh keypair and stores its secret bytes at `path`.
///
/// # Errors
///
/// Returns `WalletError::AlreadyExists` if `path` exists and `force` is not
/// set, or `WalletError::Io` if the file cannot be written.
pub fn generate_wallet(path: &Path, force: bool) -> Result<Keypair, WalletError> {
    let location = path.display().to_string();

    if path.exists() && !force {
        return Err(WalletError::AlreadyExists { path: location });
    }

    let keypair = Keypair::new();
    let secret = serde_json::to_string(&keypair.to_bytes().to_vec())
        .map_err(|source| WalletError::Parse {
            path: location.clone(),
            source,
        })?;

    std::fs::write(path, secret)
        .map_err(|source| WalletError::Io { path: location.clone(), source })?;

    info!(path = %location, pubkey = %keypair.pubkey(), "Generated wallet");

    Ok(keypair)
}
