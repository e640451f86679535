// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authentication.
//!
//! Use the `Auth` extractor in handlers to require a session issued by a
//! wallet signin:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```
//!
//! `ClientIp` resolves the caller's address for rate limiting and never
//! rejects.

use std::{convert::Infallible, net::SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Header set by reverse proxies with the original client address.
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Extractor for authenticated users.
///
/// Validates the `Authorization: Bearer <session token>` header against the
/// session issuer's key and issuer claim.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?;

        let user = state.sessions.verify(token.trim())?;
        Ok(Auth(user))
    }
}

/// Client IP address as seen by this service.
///
/// With `TRUST_PROXY_HEADERS` enabled the first `X-Forwarded-For` hop wins;
/// otherwise the socket peer address is used. Falls back to `"unknown"` so
/// that all unidentifiable callers share one rate-limit budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl FromRequestParts<AppState> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if state.config.trust_proxy_headers {
            let forwarded = parts
                .headers
                .get(FORWARDED_FOR_HEADER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split(',').next())
                .map(str::trim)
                .filter(|value| !value.is_empty());
            if let Some(ip) = forwarded {
                return Ok(ClientIp(ip.to_string()));
            }
        }

        let ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Ok(ClientIp(ip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::{Role, SessionIssuer},
        config::AppConfig,
        models::{UserIdentity, WalletAddress},
        store::InMemoryStore,
    };
    use axum::http::Request;

    fn parts_with(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/test");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn user() -> UserIdentity {
        UserIdentity {
            id: "9x3k2".into(),
            username: "alice".into(),
            wallet_address: WalletAddress::from("0x1234567890abcdef"),
            role: Role::User,
            is_suspended: false,
        }
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let state = AppState::default();
        let mut parts = parts_with(&[]);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_rejects_non_bearer_scheme() {
        let state = AppState::default();
        let mut parts = parts_with(&[("Authorization", "Basic abc")]);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_accepts_issued_session() {
        let state = AppState::default();
        let session = state.sessions.signin(&user()).await.unwrap();
        let header = format!("Bearer {}", session.token);
        let mut parts = parts_with(&[("Authorization", header.as_str())]);

        let Auth(user) = Auth::from_request_parts(&mut parts, &state)
            .await
            .expect("session accepted");
        assert_eq!(user.user_id, "9x3k2");
    }

    #[tokio::test]
    async fn auth_extractor_rejects_foreign_session() {
        let state = AppState::default();
        let other = AppState::default();
        let session = other.sessions.signin(&user()).await.unwrap();
        let header = format!("Bearer {}", session.token);
        let mut parts = parts_with(&[("Authorization", header.as_str())]);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
    }

    #[tokio::test]
    async fn client_ip_uses_connect_info() {
        let state = AppState::default();
        let mut parts = parts_with(&[("x-forwarded-for", "198.51.100.1")]);
        parts
            .extensions
            .insert(ConnectInfo("203.0.113.7:5555".parse::<SocketAddr>().unwrap()));

        let ClientIp(ip) = ClientIp::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(ip, "203.0.113.7");
    }

    #[tokio::test]
    async fn client_ip_trusts_forwarded_header_when_configured() {
        let config = AppConfig {
            trust_proxy_headers: true,
            ..AppConfig::default()
        };
        let state = AppState::new(config, InMemoryStore::new());
        let mut parts = parts_with(&[("x-forwarded-for", "198.51.100.1, 10.0.0.1")]);

        let ClientIp(ip) = ClientIp::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(ip, "198.51.100.1");
    }

    #[tokio::test]
    async fn client_ip_falls_back_to_unknown() {
        let state = AppState::default();
        let mut parts = parts_with(&[]);

        let ClientIp(ip) = ClientIp::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(ip, "unknown");
    }
}
