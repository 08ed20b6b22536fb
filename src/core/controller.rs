use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use crate::core::command::CommandError;
use crate::core::domain::Configuration;

#[derive(Debug, Clone)]
pub struct AppState {
    pub(crate) config: Configuration,
}

impl AppState {
    pub fn new(config: Configuration) -> AppState {
        AppState {
            config,
        }
    }
}

// MessageResponse is the body of every failed request
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

// Every failure is reported as 400 with a fixed message for the route.
pub(crate) type ServerError = (StatusCode, Json<MessageResponse>);

pub(crate) fn bad_request(message: &str) -> ServerError {
    (StatusCode::BAD_REQUEST, Json(MessageResponse::new(message)))
}

pub(crate) fn command_to_server_error(err: CommandError, message: &str) -> ServerError {
    warn!(error = %err, "{}", message);
    bad_request(message)
}

pub(crate) fn json_to_server_error(err: serde_json::Error, message: &str) -> ServerError {
    warn!(error = %err, "{}", message);
    bad_request(message)
}

// parse_payload turns the raw body into a command request, a malformed body
// fails with the route's message like any other error.
pub(crate) fn parse_payload<T: DeserializeOwned>(
    payload: Result<Json<Value>, JsonRejection>, message: &str) -> Result<T, ServerError> {
    let Json(value) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "{}", message);
        bad_request(message)
    })?;
    serde_json::from_value(value).map_err(|err| json_to_server_error(err, message))
}
