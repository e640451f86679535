// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory account store.
//!
//! Holds the accounts that can sign in with a wallet and serves as the
//! [`IdentityResolver`] for the signin flow. Wallet addresses are indexed in
//! lowercase; one wallet address maps to at most one account.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::{IdentityResolver, ResolverError, Role};
use crate::config::SeedAccount;
use crate::models::{UserIdentity, WalletAddress};

/// Account store errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("wallet address {0} is already linked to an account")]
    WalletAlreadyLinked(String),
    #[error("username {0} is already taken")]
    UsernameTaken(String),
    #[error("account {0} not found")]
    NotFound(String),
}

#[derive(Default)]
pub struct InMemoryStore {
    accounts: HashMap<String, UserIdentity>,
    /// Lowercased wallet address → account ID.
    wallet_index: HashMap<String, String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `SEED_ACCOUNTS` entries.
    ///
    /// Entries that conflict with an earlier one are logged and skipped.
    pub fn from_seeds(seeds: &[SeedAccount]) -> Self {
        let mut store = Self::new();
        for seed in seeds {
            match store.insert_seed(seed) {
                Ok(user) => tracing::info!(
                    user_id = %user.id,
                    username = %user.username,
                    role = %user.role,
                    suspended = user.is_suspended,
                    "Seeded wallet account"
                ),
                Err(e) => tracing::warn!(error = %e, "Skipping seed account"),
            }
        }
        store
    }

    fn insert_seed(&mut self, seed: &SeedAccount) -> Result<UserIdentity, StoreError> {
        let user =
            self.insert_account(seed.username.clone(), seed.wallet_address.clone(), seed.role)?;
        if seed.suspended {
            self.set_suspended(&user.id, true)?;
            return Ok(UserIdentity {
                is_suspended: true,
                ..user
            });
        }
        Ok(user)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Register an account linked to `wallet_address`.
    pub fn insert_account(
        &mut self,
        username: impl Into<String>,
        wallet_address: impl Into<WalletAddress>,
        role: Role,
    ) -> Result<UserIdentity, StoreError> {
        let username = username.into();
        let wallet_address = wallet_address.into();
        let key = wallet_address.canonical();

        if self.wallet_index.contains_key(&key) {
            return Err(StoreError::WalletAlreadyLinked(wallet_address.to_string()));
        }
        if self
            .accounts
            .values()
            .any(|user| user.username.eq_ignore_ascii_case(&username))
        {
            return Err(StoreError::UsernameTaken(username));
        }

        let user = UserIdentity {
            id: Uuid::new_v4().simple().to_string(),
            username,
            wallet_address,
            role,
            is_suspended: false,
        };
        self.wallet_index.insert(key, user.id.clone());
        self.accounts.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    pub fn find_by_wallet_address(&self, address: &WalletAddress) -> Option<&UserIdentity> {
        self.wallet_index
            .get(&address.canonical())
            .and_then(|id| self.accounts.get(id))
    }

    pub fn set_suspended(&mut self, user_id: &str, suspended: bool) -> Result<(), StoreError> {
        let Some(user) = self.accounts.get_mut(user_id) else {
            return Err(StoreError::NotFound(user_id.to_string()));
        };
        user.is_suspended = suspended;
        Ok(())
    }
}

#[async_trait]
impl IdentityResolver for RwLock<InMemoryStore> {
    async fn find_by_wallet_address(
        &self,
        address: &WalletAddress,
    ) -> Result<Option<UserIdentity>, ResolverError> {
        Ok(self.read().await.find_by_wallet_address(address).cloned())
    }
}
