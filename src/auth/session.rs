// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session issuance and verification.
//!
//! A successful signin produces an HS256-signed session token whose claims
//! ([`SessionClaims`]) identify the account. The same issuer verifies tokens
//! presented later as `Authorization: Bearer <token>`.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::{claims::SessionClaims, AuthError, AuthenticatedUser};
use crate::{config::SessionConfig, models::UserIdentity};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Session issuance failure.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to encode session token: {0}")]
    Encoding(String),
    #[error("session issuer unavailable: {0}")]
    Unavailable(String),
}

/// Session issued to a signed-in account.
///
/// Field names follow the platform's signin response (`id`, `i`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    /// Always `true` for a completed signin.
    pub finished: bool,
    /// Account ID.
    pub id: String,
    /// Session token.
    #[serde(rename = "i")]
    pub token: String,
    /// Token expiration (Unix timestamp).
    pub expires_at: i64,
}

/// Issues a session for a resolved account.
#[async_trait]
pub trait SessionIssuer: Send + Sync {
    async fn signin(&self, user: &UserIdentity) -> Result<SessionPayload, SessionError>;
}

/// JWT-backed session issuer.
#[derive(Clone)]
pub struct JwtSessionIssuer {
    config: SessionConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtSessionIssuer {
    pub fn new(config: SessionConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(&config.secret);
        let decoding_key = DecodingKey::from_secret(&config.secret);
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Build the claims for a new session of `user`.
    fn claims_for(&self, user: &UserIdentity) -> SessionClaims {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.config.ttl.as_secs()).unwrap_or(i64::MAX);
        SessionClaims {
            sub: user.id.clone(),
            sid: uuid::Uuid::new_v4().to_string(),
            username: user.username.clone(),
            role: user.role,
            iat: now,
            exp: now.saturating_add(ttl),
            iss: self.config.issuer.clone(),
        }
    }

    /// Verify a session token and extract the authenticated user.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.set_issuer(&[&self.config.issuer]);
        validation.validate_aud = false;

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                jsonwebtoken::errors::ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
                _ => AuthError::MalformedToken,
            })?;

        Ok(AuthenticatedUser::from_claims(token_data.claims))
    }
}

#[async_trait]
impl SessionIssuer for JwtSessionIssuer {
    async fn signin(&self, user: &UserIdentity) -> Result<SessionPayload, SessionError> {
        let claims = self.claims_for(user);
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SessionError::Encoding(e.to_string()))?;

        tracing::info!(
            user_id = %user.id,
            session_id = %claims.sid,
            "Issued wallet signin session"
        );

        Ok(SessionPayload {
            finished: true,
            id: user.id.clone(),
            token,
            expires_at: claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::Role, models::WalletAddress};
    use std::time::Duration;

    fn config(ttl_secs: u64) -> SessionConfig {
        SessionConfig {
            secret: b"test-secret".to_vec(),
            issuer: "test-issuer".to_string(),
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    fn user() -> UserIdentity {
        UserIdentity {
            id: "9x3k2".to_string(),
            username: "alice".to_string(),
            wallet_address: WalletAddress::from("0x1234567890abcdef"),
            role: Role::Admin,
            is_suspended: false,
        }
    }

    #[tokio::test]
    async fn issued_token_verifies() {
        let issuer = JwtSessionIssuer::new(config(3600));
        let payload = issuer.signin(&user()).await.expect("signin succeeds");

        assert!(payload.finished);
        assert_eq!(payload.id, "9x3k2");

        let authenticated = issuer.verify(&payload.token).expect("token verifies");
        assert_eq!(authenticated.user_id, "9x3k2");
        assert_eq!(authenticated.username, "alice");
        assert_eq!(authenticated.role, Role::Admin);
        assert_eq!(authenticated.expires_at, payload.expires_at);
    }

    #[tokio::test]
    async fn each_signin_gets_a_new_session_id() {
        let issuer = JwtSessionIssuer::new(config(3600));
        let first = issuer.signin(&user()).await.unwrap();
        let second = issuer.signin(&user()).await.unwrap();

        let first = issuer.verify(&first.token).unwrap();
        let second = issuer.verify(&second.token).unwrap();
        assert_ne!(first.session_id, second.session_id);
    }

    #[tokio::test]
    async fn token_from_other_secret_is_rejected() {
        let issuer = JwtSessionIssuer::new(config(3600));
        let mut other_config = config(3600);
        other_config.secret = b"another-secret".to_vec();
        let other = JwtSessionIssuer::new(other_config);

        let payload = other.signin(&user()).await.unwrap();
        assert!(matches!(
            issuer.verify(&payload.token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[tokio::test]
    async fn token_from_other_issuer_is_rejected() {
        let issuer = JwtSessionIssuer::new(config(3600));
        let mut other_config = config(3600);
        other_config.issuer = "someone-else".to_string();
        let other = JwtSessionIssuer::new(other_config);

        let payload = other.signin(&user()).await.unwrap();
        assert!(matches!(
            issuer.verify(&payload.token),
            Err(AuthError::InvalidIssuer)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = JwtSessionIssuer::new(config(3600));
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "1".into(),
            sid: "s".into(),
            username: "u".into(),
            role: Role::User,
            iat: now - 7200,
            exp: now - 3600,
            iss: "test-issuer".into(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(issuer.verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn garbage_token_is_malformed() {
        let issuer = JwtSessionIssuer::new(config(3600));
        assert!(matches!(
            issuer.verify("not-a-jwt"),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn payload_serializes_platform_field_names() {
        let payload = SessionPayload {
            finished: true,
            id: "9x3k2".into(),
            token: "tok".into(),
            expires_at: 42,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["i"], "tok");
        assert_eq!(json["id"], "9x3k2");
        assert_eq!(json["expiresAt"], 42);
        assert_eq!(json["finished"], true);
    }
}
