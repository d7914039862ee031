//! Current token service
//!
//! Every API route requires `Authorization: Bearer <token>`, checked against
//! the single token the process is configured with

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::Extension;
use axum::RequestPartsExt;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;

use super::Error;

/// The API token the process is configured with
#[derive(Clone)]
pub struct ApiToken {
    /// The token itself
    token: Arc<String>,
}

impl ApiToken {
    /// Create a new API token
    pub fn new(token: String) -> Self {
        Self {
            token: Arc::new(token),
        }
    }

    /// Does the presented token match
    fn matches(&self, presented: &str) -> bool {
        *self.token == presented
    }
}

/// Proof that the request carried the right bearer token
///
/// Add as an argument to a handler to require authentication
pub struct CurrentToken;

#[async_trait]
impl<S> FromRequestParts<S> for CurrentToken
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract the token from the authorization header
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| Error::unauthorized("Unauthorized request"))?;

        let Extension(api_token) = parts
            .extract::<Extension<ApiToken>>()
            .await
            .map_err(|_| Error::internal_server_error("Could not get the API token"))?;

        if api_token.matches(bearer.token()) {
            Ok(CurrentToken)
        } else {
            Err(Error::unauthorized("Unauthorized request"))
        }
    }
}
