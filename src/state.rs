// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Application context shared by all handlers.
//!
//! Built once at startup and cloned into each request; every collaborator
//! owns its own synchronization.

use std::sync::Arc;

use hmac::digest::InvalidLength;
use tokio::sync::RwLock;

use crate::{
    auth::{
        rate_limit::client_key, Eip191Verifier, JwtSessionIssuer, SlidingWindowLimiter,
        WalletSigninService,
    },
    config::AppConfig,
    store::InMemoryStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<RwLock<InMemoryStore>>,
    pub sessions: Arc<JwtSessionIssuer>,
    pub wallet_signin: WalletSigninService,
}

impl AppState {
    /// Wire the production collaborators around `store`.
    pub fn new(config: AppConfig, store: InMemoryStore) -> Self {
        let store = Arc::new(RwLock::new(store));
        let sessions = Arc::new(JwtSessionIssuer::new(config.session.clone()));
        let wallet_signin = WalletSigninService::new(
            Arc::new(Eip191Verifier),
            Arc::new(SlidingWindowLimiter::new(config.rate_limit)),
            store.clone(),
            sessions.clone(),
            config.login_message.clone(),
        );

        Self {
            config: Arc::new(config),
            store,
            sessions,
            wallet_signin,
        }
    }

    /// Replace the signin flow (collaborator substitution in tests and tooling).
    pub fn with_wallet_signin(mut self, wallet_signin: WalletSigninService) -> Self {
        self.wallet_signin = wallet_signin;
        self
    }

    /// Rate limiter key for a client IP.
    pub fn limiter_key(&self, client_ip: &str) -> Result<String, InvalidLength> {
        client_key(&self.config.session.secret, client_ip)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default(), InMemoryStore::new())
    }
}
