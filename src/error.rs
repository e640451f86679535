// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Generic API error rendering.
//!
//! Every failure leaving the service has the same body shape:
//! `{ "error": { "id": "<stable identifier>" } }`. The `id` is the only
//! machine-checkable discriminator; no human-readable text or underlying
//! cause is ever written to the body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub id: &'static str,
}

/// Error payload nested under `error`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ErrorDetail {
    /// Stable error identifier (e.g. `invalid_signature`).
    pub id: String,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

impl ErrorBody {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail { id: id.into() },
        }
    }
}

impl ApiError {
    pub fn new(status: StatusCode, id: &'static str) -> Self {
        Self { status, id }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.id))).into_response()
    }
}
