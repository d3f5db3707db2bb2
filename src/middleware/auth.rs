use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose, Engine as _};

use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// The one credential pair allowed through the gate.
#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub pass: String,
}

impl From<&SecurityConfig> for Credentials {
    fn from(security: &SecurityConfig) -> Self {
        Self {
            user: security.admin_user.clone(),
            pass: security.admin_pass.clone(),
        }
    }
}

// Keep the password out of logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("pass", &"***")
            .finish()
    }
}

/// Basic auth middleware. Stateless: every guarded request is checked again.
pub async fn basic_auth_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if authenticate(request.headers(), &state.credentials) {
        return next.run(request).await;
    }

    tracing::debug!("Rejected credentials for {} {}", request.method(), request.uri().path());
    ApiError::unauthorized().into_response()
}

/// True only when the request carries `Basic <base64(user:pass)>` matching `expected` exactly.
pub fn authenticate(headers: &HeaderMap, expected: &Credentials) -> bool {
    match extract_basic_credentials(headers) {
        Ok((user, pass)) => user == expected.user && pass == expected.pass,
        Err(reason) => {
            tracing::debug!("Authorization rejected: {}", reason);
            false
        }
    }
}

/// Extract the decoded `(user, password)` pair from the Authorization header
fn extract_basic_credentials(headers: &HeaderMap) -> Result<(String, String), &'static str> {
    let auth_str = headers
        .get(AUTHORIZATION)
        .ok_or("Missing Authorization header")?
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    let mut parts = auth_str.split(' ');
    if parts.next() != Some("Basic") {
        return Err("Authorization header must use Basic scheme");
    }
    let encoded = parts
        .next()
        .filter(|token| !token.is_empty())
        .ok_or("Empty Basic credentials")?;

    let decoded = general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| "Credentials are not valid base64")?;
    let decoded = String::from_utf8(decoded).map_err(|_| "Credentials are not valid UTF-8")?;

    // Split at the first colon; the password may itself contain colons
    let (user, pass) = decoded.split_once(':').ok_or("Credentials missing ':' separator")?;
    Ok((user.to_string(), pass.to_string()))
}
