use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::supply::{SupplyError, ensure_digits};

/// Manifest or request body as received, before any validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawManifest {
    pub token: Option<RawToken>,
    pub bindings: Option<Bindings>,
}

impl RawManifest {
    /// Parses a request body. An empty body is an empty manifest; `null`
    /// values count as absent.
    ///
    /// # Errors
    ///
    /// * `ValidationError::InvalidJson` - the body is not JSON
    /// * `ValidationError::InvalidField` - a field is present with the wrong
    ///   type
    pub fn from_json(body: &str) -> Result<Self, ValidationError> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_str(body).map_err(|e| {
            ValidationError::InvalidJson { reason: e.to_string() }
        })?;

        Self::from_value(value)
    }

    /// # Errors
    ///
    /// Returns `ValidationError::InvalidField` naming the first field whose
    /// JSON type does not match the manifest.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        let mut root = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(root) => root,
            _ => return Err(invalid("manifest", "a JSON object")),
        };

        let token = object_field(&mut root, "token", "token")?
            .map(|mut token| {
                Ok::<_, ValidationError>(RawToken {
                    name: string_field(&mut token, "name", "token.name")?,
                    symbol: string_field(&mut token, "symbol", "token.symbol")?,
                    supply: string_field(&mut token, "supply", "token.supply")?,
                })
            })
            .transpose()?;

        let bindings = object_field(&mut root, "bindings", "bindings")?
            .map(|mut bindings| {
                Ok::<_, ValidationError>(Bindings {
                    renounce_mint: bool_field(
                        &mut bindings,
                        "renounceMint",
                        "bindings.renounceMint",
                    )?,
                    lock_liquidity: bool_field(
                        &mut bindings,
                        "lockLiquidity",
                        "bindings.lockLiquidity",
                    )?,
                    no_god_wallet: bool_field(
                        &mut bindings,
                        "noGodWallet",
                        "bindings.noGodWallet",
                    )?,
                    open_source: bool_field(
                        &mut bindings,
                        "openSource",
                        "bindings.openSource",
                    )?,
                })
            })
            .transpose()?;

        Ok(Self { token, bindings })
    }
}

const fn invalid(field: &'static str, expected: &'static str) -> ValidationError {
    ValidationError::InvalidField { field, expected }
}

fn object_field(
    parent: &mut Map<String, Value>,
    key: &str,
    field: &'static str,
) -> Result<Option<Map<String, Value>>, ValidationError> {
    match parent.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(invalid(field, "an object")),
    }
}

fn string_field(
    parent: &mut Map<String, Value>,
    key: &str,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match parent.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(invalid(field, "a string")),
    }
}

fn bool_field(
    parent: &mut Map<String, Value>,
    key: &str,
    field: &'static str,
) -> Result<bool, ValidationError> {
    match parent.remove(key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(value)) => Ok(value),
        Some(_) => Err(invalid(field, "a boolean")),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawToken {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub supply: Option<String>,
}

/// Launch bindings. Only `renounce_mint` changes what happens on chain; the
/// rest are recorded for downstream systems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bindings {
    pub renounce_mint: bool,
    pub lock_liquidity: bool,
    pub no_god_wallet: bool,
    pub open_source: bool,
}

/// Validated token configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    name: String,
    symbol: String,
    supply: String,
    bindings: Bindings,
}

impl TokenConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Human-readable supply, digits only.
    pub fn supply(&self) -> &str {
        &self.supply
    }

    pub const fn bindings(&self) -> Bindings {
        self.bindings
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Request body is not valid JSON: {reason}")]
    InvalidJson { reason: String },

    #[error("{field} must be {expected}.")]
    InvalidField { field: &'static str, expected: &'static str },

    #[error(transparent)]
    Supply(#[from] SupplyError),
}

/// Validates a raw manifest into a `TokenConfig`.
///
/// # Errors
///
/// * `ValidationError::MissingFields` - any of `token.name`, `token.symbol`,
///   `token.supply` is absent or blank, listed together
/// * `ValidationError::Supply` - `token.supply` is not digits only
pub fn validate(raw: RawManifest) -> Result<TokenConfig, ValidationError> {
    let RawToken { name, symbol, supply } = raw.token.unwrap_or_default();

    let name = non_blank(name);
    let symbol = non_blank(symbol);
    let supply = non_blank(supply);

    let missing: Vec<&'static str> = [
        ("token.name", name.is_none()),
        ("token.symbol", symbol.is_none()),
        ("token.supply", supply.is_none()),
    ]
    .into_iter()
    .filter_map(|(field, absent)| absent.then_some(field))
    .collect();

    let (Some(name), Some(symbol), Some(supply)) = (name, symbol, supply) else {
        return Err(ValidationError::MissingFields(missing));
    };

    ensure_digits(&supply)?;

    Ok(TokenConfig {
        name,
        symbol,
        supply,
        bindings: raw.bindings.unwrap_or_default(),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("{path} missing.")]
    NotFound { path: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads a manifest file from disk without validating it.
///
/// # Errors
///
/// Returns `ManifestError` if the file is absent, unreadable or not valid
/// JSON.
pub fn load_manifest(path: &Path) -> Result<RawManifest, ManifestError> {
    let display = path.display().to_string();

    let contents = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ManifestError::NotFound { path: display.clone() }
        } else {
            ManifestError::Read { path: display.clone(), source }
        }
    })?;

    serde_json::from_str(&contents)
        .map_err(|source| ManifestError::Parse { path: display, source })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::io::Write;

    use super::*;

    fn parse(value: serde_json::Value) -> RawManifest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_manifest_reports_every_missing_field() {
        let err = validate(RawManifest::default()).unwrap_err();

        assert_eq!(
            err,
            ValidationError::MissingFields(vec![
                "token.name",
                "token.symbol",
                "token.supply"
            ])
        );
        assert_eq!(
            err.to_string(),
            "Missing required fields: token.name, token.symbol, token.supply"
        );
    }

    #[test]
    fn test_empty_object_parses_to_empty_manifest() {
        let err = validate(parse(json!({}))).unwrap_err();
        assert!(matches!(err, ValidationError::MissingFields(fields) if fields.len() == 3));
    }

    #[test]
    fn test_minimal_manifest_defaults_bindings() {
        let config = validate(parse(json!({
            "token": { "name": "Soul", "symbol": "SOUL", "supply": "1000" }
        })))
        .unwrap();

        assert_eq!(config.name(), "Soul");
        assert_eq!(config.symbol(), "SOUL");
        assert_eq!(config.supply(), "1000");
        assert_eq!(config.bindings(), Bindings::default());
        assert!(!config.bindings().renounce_mint);
    }

    #[test]
    fn test_only_absent_fields_are_listed() {
        let err = validate(parse(json!({
            "token": { "name": "Soul", "supply": "" }
        })))
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Missing required fields: token.symbol, token.supply"
        );
    }

    #[test]
    fn test_blank_strings_count_as_missing() {
        let err = validate(parse(json!({
            "token": { "name": "   ", "symbol": "SOUL", "supply": "1" }
        })))
        .unwrap_err();

        assert_eq!(err, ValidationError::MissingFields(vec!["token.name"]));
    }

    #[test]
    fn test_non_digit_supply_is_rejected() {
        let err = validate(parse(json!({
            "token": { "name": "Soul", "symbol": "SOUL", "supply": "12.5" }
        })))
        .unwrap_err();

        assert!(matches!(
            err,
            ValidationError::Supply(SupplyError::Malformed { .. })
        ));
        assert_eq!(err.to_string(), "token.supply must be digits only.");
    }

    #[test]
    fn test_padded_supply_is_not_coerced() {
        let err = validate(parse(json!({
            "token": { "name": "Soul", "symbol": "SOUL", "supply": " 12 " }
        })))
        .unwrap_err();

        assert!(matches!(err, ValidationError::Supply(_)));
    }

    #[test]
    fn test_bindings_are_read_in_camel_case() {
        let config = validate(parse(json!({
            "token": { "name": "Soul", "symbol": "SOUL", "supply": "1" },
            "bindings": { "renounceMint": true, "openSource": true }
        })))
        .unwrap();

        assert_eq!(
            config.bindings(),
            Bindings {
                renounce_mint: true,
                lock_liquidity: false,
                no_god_wallet: false,
                open_source: true,
            }
        );
    }

    #[test]
    fn test_empty_body_is_an_empty_manifest() {
        for body in ["", "  \n", "null", "{}"] {
            let err = validate(RawManifest::from_json(body).unwrap()).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Missing required fields: token.name, token.symbol, token.supply",
                "body {body:?}"
            );
        }
    }

    #[test]
    fn test_numeric_supply_is_named_not_missing() {
        let err = RawManifest::from_json(
            r#"{"token":{"name":"Soul","symbol":"SOUL","supply":1000}}"#,
        )
        .unwrap_err();

        assert_eq!(
            err,
            ValidationError::InvalidField {
                field: "token.supply",
                expected: "a string"
            }
        );
        assert_eq!(err.to_string(), "token.supply must be a string.");
    }

    #[test]
    fn test_string_binding_is_named_not_missing() {
        let err = RawManifest::from_json(
            r#"{
                "token": { "name": "Soul", "symbol": "SOUL", "supply": "1" },
                "bindings": { "renounceMint": "true" }
            }"#,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "bindings.renounceMint must be a boolean.");
    }

    #[test]
    fn test_non_object_token_is_rejected() {
        let err = RawManifest::from_json(r#"{"token":"SOUL"}"#).unwrap_err();
        assert_eq!(err.to_string(), "token must be an object.");

        let err = RawManifest::from_json("[1, 2]").unwrap_err();
        assert_eq!(err.to_string(), "manifest must be a JSON object.");
    }

    #[test]
    fn test_body_parse_keeps_partial_fields() {
        let raw = RawManifest::from_json(
            r#"{"token":{"name":"Soul","symbol":null},"bindings":{"openSource":true}}"#,
        )
        .unwrap();

        let err = validate(raw.clone()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required fields: token.symbol, token.supply"
        );
        assert!(raw.bindings.unwrap().open_source);
    }

    #[test]
    fn test_body_that_is_not_json_is_rejected() {
        let err = RawManifest::from_json("token=Soul").unwrap_err();

        assert!(matches!(err, ValidationError::InvalidJson { .. }));
        assert!(err.to_string().starts_with("Request body is not valid JSON"));
    }

    #[test]
    fn test_load_manifest_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"token":{{"name":"Soul","symbol":"SOUL","supply":"7"}}}}"#
        )
        .unwrap();

        let raw = load_manifest(file.path()).unwrap();
        let config = validate(raw).unwrap();

        assert_eq!(config.supply(), "7");
    }

    #[test]
    fn test_load_manifest_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");

        let err = load_manifest(&path).unwrap_err();

        assert!(matches!(err, ManifestError::NotFound { .. }));
        assert!(err.to_string().ends_with("manifest.json missing."));
    }

    #[test]
    fn test_load_manifest_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = load_manifest(file.path()).unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
    }
}
