// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Two families share the `{ "error": { "id": ... } }` body shape:
//!
//! - [`WalletSigninError`] - terminal outcomes of the wallet signin flow
//! - [`AuthError`] - bearer session token verification failures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Terminal failure of a wallet signin attempt.
///
/// Each variant maps to exactly one `(status, id)` pair. Invalid signatures
/// never distinguish "malformed" from "signed by someone else".
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WalletSigninError {
    /// Request body is not a JSON object
    #[error("request body is not a valid JSON object")]
    InvalidRequestBody,
    /// `walletAddress` absent or empty
    #[error("wallet address is required")]
    WalletAddressMissing,
    /// `signature` absent or empty
    #[error("signature is required")]
    SignatureMissing,
    /// Caller exceeded the signin rate limit
    #[error("too many signin attempts")]
    RateLimited,
    /// Signature does not recover to the claimed address
    #[error("signature does not match wallet address")]
    InvalidSignature,
    /// No account is linked to the wallet address
    #[error("wallet address is not registered")]
    WalletNotRegistered,
    /// The linked account is suspended
    #[error("account is suspended")]
    AccountSuspended,
    /// Session issuance failed downstream
    #[error("signin failed")]
    SigninFailed,
}

impl WalletSigninError {
    /// Stable machine-readable identifier.
    pub fn error_id(&self) -> &'static str {
        match self {
            WalletSigninError::InvalidRequestBody => "invalid_request_body",
            WalletSigninError::WalletAddressMissing => "wallet_address_missing",
            WalletSigninError::SignatureMissing => "signature_missing",
            WalletSigninError::RateLimited => "rate_limited",
            WalletSigninError::InvalidSignature => "invalid_signature",
            WalletSigninError::WalletNotRegistered => "wallet_not_registered",
            WalletSigninError::AccountSuspended => "account_suspended",
            WalletSigninError::SigninFailed => "signin_failed",
        }
    }

    /// HTTP status for this outcome.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WalletSigninError::InvalidRequestBody
            | WalletSigninError::WalletAddressMissing
            | WalletSigninError::SignatureMissing
            | WalletSigninError::InvalidSignature => StatusCode::BAD_REQUEST,
            WalletSigninError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            WalletSigninError::WalletNotRegistered => StatusCode::NOT_FOUND,
            WalletSigninError::AccountSuspended => StatusCode::FORBIDDEN,
            WalletSigninError::SigninFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<WalletSigninError> for ApiError {
    fn from(err: WalletSigninError) -> Self {
        ApiError::new(err.status_code(), err.error_id())
    }
}

impl IntoResponse for WalletSigninError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

/// Session token verification error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header is required")]
    MissingAuthHeader,
    /// Invalid authorization header format
    #[error("Invalid authorization header format (expected 'Bearer <token>')")]
    InvalidAuthHeader,
    /// Token is malformed
    #[error("Token is malformed")]
    MalformedToken,
    /// Token signature is invalid
    #[error("Token signature is invalid")]
    InvalidSignature,
    /// Token has expired
    #[error("Token has expired")]
    TokenExpired,
    /// Token issuer is invalid
    #[error("Token issuer is invalid")]
    InvalidIssuer,
    /// Token is not yet valid
    #[error("Token is not yet valid")]
    TokenNotYetValid,
}

impl AuthError {
    /// Get the error id for this error.
    pub fn error_id(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_token_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidIssuer => "invalid_issuer",
            AuthError::TokenNotYetValid => "token_not_yet_valid",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::new(StatusCode::UNAUTHORIZED, self.error_id()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    #[test]
    fn signin_errors_have_documented_status() {
        let table = [
            (WalletSigninError::WalletAddressMissing, 400, "wallet_address_missing"),
            (WalletSigninError::SignatureMissing, 400, "signature_missing"),
            (WalletSigninError::RateLimited, 429, "rate_limited"),
            (WalletSigninError::InvalidSignature, 400, "invalid_signature"),
            (WalletSigninError::WalletNotRegistered, 404, "wallet_not_registered"),
            (WalletSigninError::AccountSuspended, 403, "account_suspended"),
            (WalletSigninError::SigninFailed, 500, "signin_failed"),
        ];

        for (err, status, id) in table {
            assert_eq!(err.status_code().as_u16(), status, "{id}");
            assert_eq!(err.error_id(), id);
        }
    }

    #[tokio::test]
    async fn signin_error_body_contains_only_id() {
        let response = WalletSigninError::InvalidSignature.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({ "error": { "id": "invalid_signature" } }));
    }

    #[tokio::test]
    async fn missing_auth_returns_401() {
        let response = AuthError::MissingAuthHeader.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["error"]["id"], "missing_auth_header");
    }
}
