// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ryu Wallet Signin - wallet-signature authentication service
//!
//! Lets an existing platform account sign in by proving control of the EVM
//! wallet address linked to it, and issues a session token for it.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Signature verification, rate limiting, sessions, signin flow
//! - `store` - In-memory account store (wallet address → account)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
