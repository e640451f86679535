// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup via [`AppConfig::from_env`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//! | `WALLET_LOGIN_MESSAGE` | Phrase the wallet is expected to sign | `Login by Wallet to the Ryu Platform` |
//! | `SESSION_SECRET` | HS256 key for session tokens | Random per process |
//! | `SESSION_ISSUER` | `iss` claim of issued tokens | `ryu-wallet-signin` |
//! | `SESSION_TTL_SECS` | Session lifetime in seconds | `604800` |
//! | `SIGNIN_RATE_LIMIT_MAX` | Signin attempts per window per client | `10` |
//! | `SIGNIN_RATE_LIMIT_WINDOW_SECS` | Rate limit window | `60` |
//! | `SIGNIN_RATE_LIMIT_MIN_INTERVAL_MS` | Minimum gap between attempts | `1000` |
//! | `TRUST_PROXY_HEADERS` | Use `X-Forwarded-For` for the client IP | `false` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | Serve HTTPS when both are set | Unset |
//! | `SEED_ACCOUNTS` | `username:0xaddress[:role][:suspended]` entries, comma separated | Unset |

use std::{env, str::FromStr, time::Duration};

use crate::auth::Role;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const WALLET_LOGIN_MESSAGE_ENV: &str = "WALLET_LOGIN_MESSAGE";
pub const SESSION_SECRET_ENV: &str = "SESSION_SECRET";
pub const SESSION_ISSUER_ENV: &str = "SESSION_ISSUER";
pub const SESSION_TTL_ENV: &str = "SESSION_TTL_SECS";
pub const RATE_LIMIT_MAX_ENV: &str = "SIGNIN_RATE_LIMIT_MAX";
pub const RATE_LIMIT_WINDOW_ENV: &str = "SIGNIN_RATE_LIMIT_WINDOW_SECS";
pub const RATE_LIMIT_MIN_INTERVAL_ENV: &str = "SIGNIN_RATE_LIMIT_MIN_INTERVAL_MS";
pub const TRUST_PROXY_HEADERS_ENV: &str = "TRUST_PROXY_HEADERS";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const SEED_ACCOUNTS_ENV: &str = "SEED_ACCOUNTS";

/// The phrase the web client asks the wallet to sign.
///
/// Fixed rather than per-session: a captured signature stays valid for as
/// long as this phrase is unchanged. Rotating `WALLET_LOGIN_MESSAGE`
/// invalidates every previously captured signature.
pub const DEFAULT_LOGIN_MESSAGE: &str = "Login by Wallet to the Ryu Platform";

pub const DEFAULT_SESSION_ISSUER: &str = "ryu-wallet-signin";

/// One week.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

pub const DEFAULT_RATE_LIMIT_MAX: usize = 10;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;
pub const DEFAULT_RATE_LIMIT_MIN_INTERVAL_MS: u64 = 1000;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON output; anything else is pretty.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }

    /// Read `LOG_FORMAT`, defaulting to pretty output.
    ///
    /// Kept apart from [`AppConfig`] because the subscriber must exist
    /// before the rest of the configuration is loaded.
    pub fn from_env() -> Self {
        env::var(LOG_FORMAT_ENV)
            .map(|v| Self::parse(&v))
            .unwrap_or(LogFormat::Pretty)
    }
}

/// Sliding-window parameters for the signin rate limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Attempts allowed per window.
    pub max_attempts: usize,
    /// Window length.
    pub window: Duration,
    /// Minimum time between two attempts from the same client.
    pub min_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RATE_LIMIT_MAX,
            window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
            min_interval: Duration::from_millis(DEFAULT_RATE_LIMIT_MIN_INTERVAL_MS),
        }
    }
}

/// Session token parameters.
#[derive(Clone)]
pub struct SessionConfig {
    /// HS256 signing key.
    pub secret: Vec<u8>,
    /// `iss` claim written into and required from session tokens.
    pub issuer: String,
    /// Lifetime of an issued session.
    pub ttl: Duration,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionConfig {
    /// Session config with a random per-process secret.
    ///
    /// Tokens issued with it do not survive a restart.
    pub fn ephemeral() -> Self {
        let secret = format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple());
        Self {
            secret: secret.into_bytes(),
            issuer: DEFAULT_SESSION_ISSUER.to_string(),
            ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }
}

/// A pre-registered account loaded from `SEED_ACCOUNTS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedAccount {
    pub username: String,
    pub wallet_address: String,
    pub role: Role,
    /// Register the account as suspended.
    pub suspended: bool,
}

/// Application configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub login_message: String,
    pub session: SessionConfig,
    pub rate_limit: RateLimitConfig,
    pub trust_proxy_headers: bool,
    pub tls_cert_path: Option<String>,
    pub tls_key_path: Option<String>,
    pub seed_accounts: Vec<SeedAccount>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            login_message: DEFAULT_LOGIN_MESSAGE.to_string(),
            session: SessionConfig::ephemeral(),
            rate_limit: RateLimitConfig::default(),
            trust_proxy_headers: false,
            tls_cert_path: None,
            tls_key_path: None,
            seed_accounts: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let session = match non_empty(SESSION_SECRET_ENV) {
            Some(secret) => SessionConfig {
                secret: secret.into_bytes(),
                issuer: non_empty(SESSION_ISSUER_ENV)
                    .unwrap_or_else(|| DEFAULT_SESSION_ISSUER.to_string()),
                ttl: Duration::from_secs(parse_or(
                    SESSION_TTL_ENV,
                    lookup(SESSION_TTL_ENV),
                    DEFAULT_SESSION_TTL_SECS,
                )),
            },
            None => {
                tracing::warn!(
                    "{SESSION_SECRET_ENV} is not set; using a random secret, sessions will not survive a restart"
                );
                SessionConfig {
                    issuer: non_empty(SESSION_ISSUER_ENV)
                        .unwrap_or_else(|| DEFAULT_SESSION_ISSUER.to_string()),
                    ttl: Duration::from_secs(parse_or(
                        SESSION_TTL_ENV,
                        lookup(SESSION_TTL_ENV),
                        DEFAULT_SESSION_TTL_SECS,
                    )),
                    ..defaults.session
                }
            }
        };

        let rate_limit = RateLimitConfig {
            max_attempts: parse_or(
                RATE_LIMIT_MAX_ENV,
                lookup(RATE_LIMIT_MAX_ENV),
                DEFAULT_RATE_LIMIT_MAX,
            ),
            window: Duration::from_secs(parse_or(
                RATE_LIMIT_WINDOW_ENV,
                lookup(RATE_LIMIT_WINDOW_ENV),
                DEFAULT_RATE_LIMIT_WINDOW_SECS,
            )),
            min_interval: Duration::from_millis(parse_or(
                RATE_LIMIT_MIN_INTERVAL_ENV,
                lookup(RATE_LIMIT_MIN_INTERVAL_ENV),
                DEFAULT_RATE_LIMIT_MIN_INTERVAL_MS,
            )),
        };

        Self {
            host: non_empty(HOST_ENV).unwrap_or(defaults.host),
            port: parse_or(PORT_ENV, lookup(PORT_ENV), defaults.port),
            login_message: lookup(WALLET_LOGIN_MESSAGE_ENV)
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.login_message),
            session,
            rate_limit,
            trust_proxy_headers: lookup(TRUST_PROXY_HEADERS_ENV)
                .map(|v| parse_bool(&v))
                .unwrap_or(false),
            tls_cert_path: non_empty(TLS_CERT_PATH_ENV),
            tls_key_path: non_empty(TLS_KEY_PATH_ENV),
            seed_accounts: lookup(SEED_ACCOUNTS_ENV)
                .map(|v| parse_seed_accounts(&v))
                .unwrap_or_default(),
        }
    }

    /// TLS certificate and key paths, when both are configured.
    pub fn tls_paths(&self) -> Option<(&str, &str)> {
        match (&self.tls_cert_path, &self.tls_key_path) {
            (Some(cert), Some(key)) => Some((cert.as_str(), key.as_str())),
            _ => None,
        }
    }
}

fn parse_or<T: FromStr + Copy>(key: &str, value: Option<String>, default: T) -> T {
    match value {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!(variable = key, value = %raw, "Invalid value, using default");
                default
            }
        },
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Parse `alice:0xabc...,bob:0xdef...:admin,carol:0x123...:suspended` into
/// seed accounts.
///
/// After the address, each `:`-separated flag is either a role name or
/// `suspended`. Entries with an empty username or address, or with an
/// unknown flag, are skipped.
pub fn parse_seed_accounts(value: &str) -> Vec<SeedAccount> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let seed = parse_seed_entry(entry);
            if seed.is_none() {
                tracing::warn!(entry = %entry, "Skipping malformed seed account");
            }
            seed
        })
        .collect()
}

fn parse_seed_entry(entry: &str) -> Option<SeedAccount> {
    let mut parts = entry.split(':').map(str::trim);
    let username = parts.next().filter(|v| !v.is_empty())?;
    let wallet_address = parts.next().filter(|v| !v.is_empty())?;

    let mut seed = SeedAccount {
        username: username.to_string(),
        wallet_address: wallet_address.to_string(),
        role: Role::User,
        suspended: false,
    };
    for flag in parts {
        if flag.eq_ignore_ascii_case("suspended") {
            seed.suspended = true;
        } else {
            seed.role = flag.parse().ok()?;
        }
    }
    Some(seed)
}
