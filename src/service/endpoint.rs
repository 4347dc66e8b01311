//! Change-password endpoint handler.
//!
//! Takes the raw JSON body of `POST /user/password`, runs the store call on
//! a blocking worker so the async executor is never stalled by disk I/O, and
//! maps the outcome to an HTTP status.

use crate::error::AuthError;
use crate::service::gate::AdminGate;
use serde::Deserialize;
use tracing::{debug, error};
use zeroize::Zeroize;

/// Request body. A missing field, `null`, and `""` are kept apart: only a
/// present empty string or absence clears the password, and a missing old
/// password is only accepted while none is set.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub old_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

impl Drop for ChangePasswordRequest {
    fn drop(&mut self) {
        self.old_password.zeroize();
        self.new_password.zeroize();
    }
}

impl std::fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangePasswordRequest")
            .field("old_password", &self.old_password.as_ref().map(|_| "***"))
            .field("new_password", &self.new_password.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointResponse {
    NoContent,
    BadRequest(String),
    Unauthorized,
    /// Details stay in the server log.
    ServerError,
}

impl EndpointResponse {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NoContent => 204,
            Self::BadRequest(_) => 400,
            Self::Unauthorized => 401,
            Self::ServerError => 500,
        }
    }
}

impl From<AuthError> for EndpointResponse {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized => Self::Unauthorized,
            _ => Self::ServerError,
        }
    }
}

/// Handle a change-password request body.
pub async fn change_password(gate: &AdminGate, body: &[u8]) -> EndpointResponse {
    let request: ChangePasswordRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => {
            debug!("rejecting change-password body: {}", e);
            return EndpointResponse::BadRequest(e.to_string());
        }
    };

    let gate = gate.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        gate.change_password(
            request.old_password.as_deref(),
            request.new_password.as_deref(),
        )
    })
    .await;

    match outcome {
        Ok(Ok(())) => EndpointResponse::NoContent,
        Ok(Err(AuthError::Unauthorized)) => EndpointResponse::Unauthorized,
        Ok(Err(e)) => {
            error!("change password failed: {}", e);
            EndpointResponse::from(e)
        }
        Err(e) => {
            error!("change password worker failed: {}", e);
            EndpointResponse::ServerError
        }
    }
}
