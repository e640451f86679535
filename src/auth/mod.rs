// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Wallet-signature signin and the sessions it issues.
//!
//! ## Auth Flow
//!
//! 1. Web client connects a wallet and asks it to `personal_sign` the
//!    server's login phrase
//! 2. Client sends `POST /v1/signin-with-wallet` with
//!    `{ walletAddress, signature }`
//! 3. Server:
//!    - Rate-limits the caller
//!    - Recovers the signer (EIP-191) and compares it with `walletAddress`
//!    - Resolves the account linked to the wallet
//!    - Issues an HS256 session token
//! 4. Client sends `Authorization: Bearer <token>` on later requests
//!
//! ## Security
//!
//! - The login phrase is fixed per deployment; a captured signature can be
//!   replayed until the phrase is rotated
//! - Invalid and malformed signatures share one error id
//! - Clock skew tolerance for session tokens is 60 seconds

pub mod claims;
pub mod error;
pub mod extractor;
pub mod rate_limit;
pub mod roles;
pub mod session;
pub mod signature;
pub mod wallet_signin;

pub use claims::{AuthenticatedUser, SessionClaims};
pub use error::{AuthError, WalletSigninError};
pub use extractor::{Auth, ClientIp};
pub use rate_limit::{RateLimitError, RateLimiter, SlidingWindowLimiter};
pub use roles::Role;
pub use session::{JwtSessionIssuer, SessionError, SessionIssuer, SessionPayload};
pub use signature::{verify_wallet_signature, Eip191Verifier, SignatureVerifier};
pub use wallet_signin::{IdentityResolver, ResolverError, WalletSigninService};
