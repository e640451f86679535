// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet signin orchestration.
//!
//! ## Flow
//!
//! 1. Input check: `walletAddress` then `signature` must be present
//! 2. Rate limit check against the caller's key
//! 3. Signature verification against the server's login phrase
//! 4. Account resolution by wallet address
//! 5. Session issuance
//!
//! Steps run strictly in this order and every path ends in exactly one
//! [`WalletSigninResponse`] or one [`WalletSigninError`]. Nothing is mutated
//! before step 5, so an abandoned request leaves no partial state.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::{RateLimiter, SessionIssuer, SignatureVerifier, WalletSigninError};
use crate::models::{UserIdentity, WalletAddress, WalletLoginRequest, WalletSigninResponse};

/// Account lookup failure (storage unavailable, corrupt record, ...).
#[derive(Debug, Error)]
#[error("identity lookup failed: {0}")]
pub struct ResolverError(pub String);

/// Maps a verified wallet address to the account linked to it.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn find_by_wallet_address(
        &self,
        address: &WalletAddress,
    ) -> Result<Option<UserIdentity>, ResolverError>;
}

/// Collaborators and settings for the wallet signin flow.
#[derive(Clone)]
pub struct WalletSigninService {
    verifier: Arc<dyn SignatureVerifier>,
    limiter: Arc<dyn RateLimiter>,
    resolver: Arc<dyn IdentityResolver>,
    issuer: Arc<dyn SessionIssuer>,
    expected_message: String,
}

impl WalletSigninService {
    pub fn new(
        verifier: Arc<dyn SignatureVerifier>,
        limiter: Arc<dyn RateLimiter>,
        resolver: Arc<dyn IdentityResolver>,
        issuer: Arc<dyn SessionIssuer>,
        expected_message: impl Into<String>,
    ) -> Self {
        Self {
            verifier,
            limiter,
            resolver,
            issuer,
            expected_message: expected_message.into(),
        }
    }

    /// The phrase clients are expected to sign.
    pub fn expected_message(&self) -> &str {
        &self.expected_message
    }

    /// Run the signin flow for one request.
    ///
    /// `limiter_key` identifies the caller for rate limiting (typically a
    /// digest of the client IP).
    pub async fn signin(
        &self,
        limiter_key: &str,
        request: WalletLoginRequest,
    ) -> Result<WalletSigninResponse, WalletSigninError> {
        let result = self.run(limiter_key, request).await;
        if let Err(err) = &result {
            match err {
                WalletSigninError::SigninFailed => {
                    tracing::warn!(error_id = err.error_id(), "Wallet signin failed")
                }
                _ => tracing::info!(error_id = err.error_id(), "Wallet signin rejected"),
            }
        }
        result
    }

    async fn run(
        &self,
        limiter_key: &str,
        request: WalletLoginRequest,
    ) -> Result<WalletSigninResponse, WalletSigninError> {
        let wallet_address =
            present(request.wallet_address).ok_or(WalletSigninError::WalletAddressMissing)?;
        let signature = present(request.signature).ok_or(WalletSigninError::SignatureMissing)?;

        self.limiter.limit(limiter_key).await.map_err(|e| {
            tracing::debug!(error = %e, "Signin attempt throttled");
            WalletSigninError::RateLimited
        })?;

        if !self
            .verifier
            .verify(&wallet_address, &signature, &self.expected_message)
        {
            return Err(WalletSigninError::InvalidSignature);
        }

        let address = WalletAddress::from(wallet_address);
        let user = self
            .resolver
            .find_by_wallet_address(&address)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Account lookup failed during wallet signin");
                WalletSigninError::SigninFailed
            })?
            .ok_or(WalletSigninError::WalletNotRegistered)?;

        if user.is_suspended {
            return Err(WalletSigninError::AccountSuspended);
        }

        let session = self.issuer.signin(&user).await.map_err(|e| {
            tracing::error!(error = %e, user_id = %user.id, "Session issuance failed");
            WalletSigninError::SigninFailed
        })?;

        Ok(WalletSigninResponse {
            signin_response: session,
        })
    }
}

/// Treat absent, empty and whitespace-only fields alike.
fn present(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
