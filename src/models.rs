// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures used by the REST API. All types derive
//! `Serialize`, `Deserialize`, and `ToSchema` for JSON handling and OpenAPI
//! documentation. Field names follow the platform's camelCase wire format.
//!
//! ## Wallet Address Type
//!
//! The [`WalletAddress`] newtype wraps EVM-style addresses (0x-prefixed hex).
//! Equality and hashing are case-insensitive, matching how wallets present
//! addresses (lowercase, checksummed, or upper case).

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{Role, SessionPayload};

// =============================================================================
// Wallet Address Type
// =============================================================================

/// EVM-compatible wallet address wrapper.
///
/// Keeps the address exactly as supplied; comparisons go through
/// [`WalletAddress::canonical`].
///
/// # Example
///
/// ```rust,ignore
/// let a = WalletAddress::from("0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12");
/// let b = WalletAddress::from("0x742d35cc6634c0532925a3b844bc9e7595f4ab12");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    /// Lowercased form used for lookups and comparisons.
    pub fn canonical(&self) -> String {
        self.0.trim().to_ascii_lowercase()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for WalletAddress {
    fn eq(&self, other: &Self) -> bool {
        self.0.trim().eq_ignore_ascii_case(other.0.trim())
    }
}

impl Eq for WalletAddress {}

impl Hash for WalletAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(value: String) -> Self {
        WalletAddress(value)
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        WalletAddress(value.to_string())
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

// =============================================================================
// Account Models
// =============================================================================

/// An existing platform account linked to a wallet address.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    /// Account identifier.
    pub id: String,
    /// Public username.
    pub username: String,
    /// The wallet address bound to this account.
    pub wallet_address: WalletAddress,
    /// Account role, carried into the session.
    pub role: Role,
    /// Suspended accounts may not sign in.
    pub is_suspended: bool,
}

// =============================================================================
// Wallet Signin Models
// =============================================================================

/// Body of `POST /v1/signin-with-wallet`.
///
/// Both fields are optional on the wire so that a missing field produces the
/// documented error id instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletLoginRequest {
    /// Claimed wallet address (hex, any case).
    #[serde(default)]
    pub wallet_address: Option<String>,
    /// Hex-encoded `personal_sign` signature over the login phrase (65 bytes,
    /// or 64 bytes in EIP-2098 compact form).
    #[serde(default)]
    pub signature: Option<String>,
}

/// Successful signin response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletSigninResponse {
    /// The issued session.
    pub signin_response: SessionPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn wallet_address_from_and_into_string() {
        let from_str: WalletAddress = "abc".into();
        assert_eq!(from_str.0, "abc");

        let from_string: WalletAddress = String::from("def").into();
        assert_eq!(from_string.0, "def");

        let to_string: String = WalletAddress("ghi".into()).into();
        assert_eq!(to_string, "ghi");
    }

    #[test]
    fn wallet_address_equality_ignores_case() {
        let lower = WalletAddress::from("0xabcdef0123");
        let upper = WalletAddress::from("0xABCDEF0123");
        assert_eq!(lower, upper);
        assert_eq!(upper.canonical(), "0xabcdef0123");

        let mut set = HashSet::new();
        set.insert(lower);
        assert!(set.contains(&upper));
    }

    #[test]
    fn login_request_accepts_missing_fields() {
        let request: WalletLoginRequest =
            serde_json::from_str(r#"{"signature":"0xdead"}"#).unwrap();
        assert!(request.wallet_address.is_none());
        assert_eq!(request.signature.as_deref(), Some("0xdead"));

        let request: WalletLoginRequest =
            serde_json::from_str(r#"{"walletAddress":"0x1","signature":null}"#).unwrap();
        assert_eq!(request.wallet_address.as_deref(), Some("0x1"));
        assert!(request.signature.is_none());
    }
}
