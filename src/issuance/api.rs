use rocket::serde::json::Json;
use rocket::{State, get, post};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::{IssuanceError, IssuanceResult, Issuer};
use crate::manifest::{RawManifest, ValidationError, validate};
use crate::network::Network;

pub(crate) const PROTOCOL: &str = "Twisted Soul";

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub protocol: String,
    pub network: Network,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MintResponse {
    pub ok: bool,
    pub result: IssuanceResult,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ErrorResponse {
    pub(crate) ok: bool,
    pub(crate) error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) mint: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Issuance(#[from] IssuanceError),
}

impl<'r> rocket::response::Responder<'r, 'static> for ApiError {
    fn respond_to(
        self,
        _: &'r rocket::Request<'_>,
    ) -> rocket::response::Result<'static> {
        let status = match &self {
            Self::Validation(_) => rocket::http::Status::BadRequest,
            Self::Issuance(e) if e.is_validation() => {
                rocket::http::Status::BadRequest
            }
            Self::Issuance(_) => rocket::http::Status::InternalServerError,
        };

        let mint = match &self {
            Self::Issuance(e) => e.partial_mint().map(ToString::to_string),
            Self::Validation(_) => None,
        };

        let response = ErrorResponse { ok: false, error: self.to_string(), mint };

        rocket::response::Response::build()
            .status(status)
            .header(rocket::http::ContentType::JSON)
            .sized_body(
                None,
                std::io::Cursor::new(
                    serde_json::to_string(&response).unwrap_or_else(|_| {
                        r#"{"ok":false,"error":"Internal server error"}"#
                            .to_string()
                    }),
                ),
            )
            .ok()
    }
}

#[get("/")]
pub(crate) fn status(issuer: &State<Arc<Issuer>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        protocol: PROTOCOL.to_string(),
        network: issuer.network().network(),
        status: "online".to_string(),
        message: format!("{PROTOCOL} backend is alive."),
    })
}

/// Launches a token from a manifest-shaped JSON body.
///
/// An empty body is an empty manifest, so the caller gets the missing-fields
/// error. A field sent with the wrong type is reported by name.
#[tracing::instrument(skip(issuer, body))]
#[post("/api/mint", data = "<body>")]
pub(crate) async fn issue_token(
    issuer: &State<Arc<Issuer>>,
    body: String,
) -> Result<Json<MintResponse>, ApiError> {
    let config =
        RawManifest::from_json(&body).and_then(validate).map_err(|e| {
            warn!("Rejected mint request: {e}");
            ApiError::Validation(e)
        })?;

    info!(
        name = config.name(),
        symbol = config.symbol(),
        supply = config.supply(),
        "Mint request accepted"
    );

    let result = issuer.issue(&config).await.map_err(|e| {
        error!("Token launch failed: {e}");
        ApiError::Issuance(e)
    })?;

    Ok(Json(MintResponse { ok: true, result }))
}
