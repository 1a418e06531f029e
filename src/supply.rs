use alloy::primitives::U256;
use serde::{Serialize, Serializer};

/// Default decimal precision for newly created mints.
pub const DEFAULT_DECIMALS: u8 = 9;

/// Token amount in base units: the human supply scaled by `10^decimals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSupply(pub U256);

impl std::fmt::Display for RawSupply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for RawSupply {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl RawSupply {
    /// Narrows to the `u64` amount the SPL token program accepts, or `None`
    /// if the amount does not fit in 64 bits.
    pub fn to_u64(self) -> Option<u64> {
        u64::try_from(self.0).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SupplyError {
    #[error("token.supply must be digits only.")]
    Malformed { value: String },
    #[error("token.supply {supply} with {decimals} decimals is out of range")]
    Overflow { supply: String, decimals: u8 },
    #[error(
        "token.supply {supply} with {decimals} decimals exceeds the maximum \
         mintable amount of {max} raw units."
    )]
    ExceedsMintable { supply: String, decimals: u8, max: u64 },
}

/// Checks that `supply` is a non-empty string of ASCII digits.
///
/// # Errors
///
/// Returns `SupplyError::Malformed` for empty input or any non-digit
/// character, including signs, decimal points and whitespace.
pub fn ensure_digits(supply: &str) -> Result<(), SupplyError> {
    if supply.is_empty() || !supply.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(SupplyError::Malformed { value: supply.to_string() });
    }

    Ok(())
}

/// Converts a human supply string into raw units using exact integer
/// arithmetic.
///
/// # Errors
///
/// * `SupplyError::Malformed` - `supply` is empty or not all digits
/// * `SupplyError::Overflow` - the scaled amount exceeds 256 bits
pub fn to_raw_units(supply: &str, decimals: u8) -> Result<RawSupply, SupplyError> {
    ensure_digits(supply)?;

    let overflow =
        || SupplyError::Overflow { supply: supply.to_string(), decimals };

    let human = U256::from_str_radix(supply, 10).map_err(|_| overflow())?;
    let factor = U256::from(10_u64)
        .checked_pow(U256::from(decimals))
        .ok_or_else(overflow)?;

    human.checked_mul(factor).map(RawSupply).ok_or_else(overflow)
}

/// Converts a human supply string into raw units the SPL token program can
/// mint in one instruction.
///
/// # Errors
///
/// Returns the `to_raw_units` errors, or `SupplyError::ExceedsMintable` if
/// the exact amount does not fit in a `u64`.
pub fn to_mintable_units(
    supply: &str,
    decimals: u8,
) -> Result<RawSupply, SupplyError> {
    let raw = to_raw_units(supply, decimals)?;

    if raw.to_u64().is_none() {
        return Err(SupplyError::ExceedsMintable {
            supply: supply.to_string(),
            decimals,
            max: u64::MAX,
        });
    }

    Ok(raw)
}
