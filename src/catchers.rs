use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Catcher, Request, catch, catchers};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    ok: bool,
    error: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Json<Self> {
        Json(Self { ok: false, error: error.into() })
    }
}

pub(crate) fn json_catchers() -> Vec<Catcher> {
    catchers![
        bad_request,
        not_found,
        payload_too_large,
        unprocessable_entity,
        internal_server_error,
        default_catcher
    ]
}

#[catch(400)]
fn bad_request() -> Json<ErrorResponse> {
    ErrorResponse::new("Bad Request")
}

#[catch(404)]
fn not_found() -> Json<ErrorResponse> {
    ErrorResponse::new("Not Found")
}

#[catch(413)]
fn payload_too_large() -> Json<ErrorResponse> {
    ErrorResponse::new("Payload Too Large")
}

#[catch(422)]
fn unprocessable_entity() -> Json<ErrorResponse> {
    ErrorResponse::new("Unprocessable Entity")
}

#[catch(500)]
fn internal_server_error() -> Json<ErrorResponse> {
    ErrorResponse::new("Unknown server error in backend.")
}

#[catch(default)]
fn default_catcher(status: Status, _req: &Request<'_>) -> Json<ErrorResponse> {
    ErrorResponse::new(status.reason_lossy())
}
