use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue},
    response::{IntoResponse, Response},
};

use crate::proxy::ProxyError;

/// Rejection for bearer-only routes
#[derive(Debug, PartialEq)]
pub enum AuthError {
    MissingToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            // Same envelope the forwarder uses, whichever layer rejects
            AuthError::MissingToken => ProxyError::MissingCredential.into_response(),
        }
    }
}

/// Raw `Authorization` header of a bearer route
///
/// Only presence is checked: the value is forwarded untouched and the
/// backend decides whether it is valid.
#[derive(Debug)]
pub struct BearerToken(pub HeaderValue);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(header::AUTHORIZATION)
            .cloned()
            .map(BearerToken)
            .ok_or(AuthError::MissingToken)
    }
}
