// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet signin endpoint.

use axum::{body::Bytes, extract::State, Json};

use crate::{
    auth::{ClientIp, WalletSigninError},
    models::{WalletLoginRequest, WalletSigninResponse},
    state::AppState,
};

/// Sign in with a wallet signature.
///
/// The wallet must have signed the server's login phrase with
/// `personal_sign`; the recovered signer must equal `walletAddress` and be
/// linked to an existing account.
///
/// The body is read as JSON whatever the `Content-Type`. An empty body is an
/// empty request and fails the field checks. A body that is not a JSON
/// object with string-or-null fields is rejected with `invalid_request_body`.
#[utoipa::path(
    post,
    path = "/v1/signin-with-wallet",
    request_body = WalletLoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Session issued", body = WalletSigninResponse),
        (status = 400, description = "wallet_address_missing, signature_missing or invalid_signature; invalid_request_body when the body is not JSON or a field is not a string", body = crate::error::ErrorBody),
        (status = 403, description = "account_suspended", body = crate::error::ErrorBody),
        (status = 404, description = "wallet_not_registered", body = crate::error::ErrorBody),
        (status = 429, description = "rate_limited", body = crate::error::ErrorBody),
        (status = 500, description = "signin_failed", body = crate::error::ErrorBody)
    )
)]
pub async fn signin_with_wallet(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    body: Bytes,
) -> Result<Json<WalletSigninResponse>, WalletSigninError> {
    let request = parse_login_request(&body)?;

    let limiter_key = state.limiter_key(&client_ip).map_err(|e| {
        tracing::error!(error = %e, "Failed to derive rate limit key");
        WalletSigninError::SigninFailed
    })?;
    let response = state.wallet_signin.signin(&limiter_key, request).await?;
    Ok(Json(response))
}

/// Decode a signin body; whitespace-only bodies are an empty request.
fn parse_login_request(body: &[u8]) -> Result<WalletLoginRequest, WalletSigninError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(WalletLoginRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected wallet signin body");
        WalletSigninError::InvalidRequestBody
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::Role,
        config::{parse_seed_accounts, AppConfig},
        store::InMemoryStore,
    };
    use alloy::{
        hex,
        signers::{local::PrivateKeySigner, SignerSync},
    };
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    const TEST_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn signed_request(signer: &PrivateKeySigner, message: &str) -> WalletLoginRequest {
        let signature = signer.sign_message_sync(message.as_bytes()).unwrap();
        WalletLoginRequest {
            wallet_address: Some(signer.address().to_string()),
            signature: Some(hex::encode_prefixed(signature.as_bytes())),
        }
    }

    fn body_of(request: &WalletLoginRequest) -> Bytes {
        Bytes::from(serde_json::to_vec(request).unwrap())
    }

    fn state_with_account(signer: &PrivateKeySigner) -> AppState {
        let mut store = InMemoryStore::new();
        store
            .insert_account("alice", signer.address().to_string().to_lowercase(), Role::User)
            .unwrap();
        AppState::new(AppConfig::default(), store)
    }

    #[test]
    fn empty_body_is_an_empty_request() {
        let bodies: [&[u8]; 2] = [b"", b"  \n"];
        for body in bodies {
            let request = parse_login_request(body).unwrap();
            assert!(request.wallet_address.is_none());
            assert!(request.signature.is_none());
        }
    }

    #[test]
    fn mistyped_fields_are_an_invalid_body() {
        let bodies: [&[u8]; 3] = [br#"{"walletAddress":123}"#, b"{not json", br#""text""#];
        for body in bodies {
            assert_eq!(
                parse_login_request(body).unwrap_err(),
                WalletSigninError::InvalidRequestBody
            );
        }
    }

    #[tokio::test]
    async fn empty_body_reports_missing_wallet_address() {
        let err = signin_with_wallet(
            State(AppState::default()),
            ClientIp("203.0.113.7".into()),
            Bytes::new(),
        )
        .await
        .unwrap_err();
        assert_eq!(err, WalletSigninError::WalletAddressMissing);
    }

    #[tokio::test]
    async fn signed_request_for_registered_wallet_succeeds() {
        let signer: PrivateKeySigner = TEST_KEY.parse().unwrap();
        let state = state_with_account(&signer);
        let request = signed_request(&signer, state.wallet_signin.expected_message());

        let Json(response) = signin_with_wallet(
            State(state.clone()),
            ClientIp("203.0.113.7".into()),
            body_of(&request),
        )
        .await
        .expect("signin succeeds");

        let user = state
            .sessions
            .verify(&response.signin_response.token)
            .expect("token verifies");
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn signature_over_wrong_phrase_is_invalid() {
        let signer: PrivateKeySigner = TEST_KEY.parse().unwrap();
        let state = state_with_account(&signer);
        let request = signed_request(&signer, "some other phrase");

        let err = signin_with_wallet(
            State(state),
            ClientIp("203.0.113.7".into()),
            body_of(&request),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unregistered_wallet_returns_404() {
        let signer: PrivateKeySigner = TEST_KEY.parse().unwrap();
        let state = AppState::default();
        let request = signed_request(&signer, state.wallet_signin.expected_message());

        let err = signin_with_wallet(
            State(state.clone()),
            ClientIp("203.0.113.7".into()),
            body_of(&request),
        )
        .await
        .unwrap_err();
        assert_eq!(err, WalletSigninError::WalletNotRegistered);
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn suspended_account_is_refused() {
        let signer: PrivateKeySigner = TEST_KEY.parse().unwrap();
        let seeds = parse_seed_accounts(&format!("alice:{}:suspended", signer.address()));
        let state = AppState::new(AppConfig::default(), InMemoryStore::from_seeds(&seeds));
        let request = signed_request(&signer, state.wallet_signin.expected_message());

        let err = signin_with_wallet(
            State(state),
            ClientIp("203.0.113.7".into()),
            body_of(&request),
        )
        .await
        .unwrap_err();
        assert_eq!(err, WalletSigninError::AccountSuspended);
    }

    #[tokio::test]
    async fn repeated_attempts_from_one_client_are_limited() {
        let signer: PrivateKeySigner = TEST_KEY.parse().unwrap();
        let state = state_with_account(&signer);
        let request = signed_request(&signer, state.wallet_signin.expected_message());

        signin_with_wallet(
            State(state.clone()),
            ClientIp("203.0.113.7".into()),
            body_of(&request),
        )
        .await
        .expect("first attempt allowed");

        // Default minimum interval between attempts is one second.
        let err = signin_with_wallet(
            State(state.clone()),
            ClientIp("203.0.113.7".into()),
            body_of(&request),
        )
        .await
        .unwrap_err();
        assert_eq!(err, WalletSigninError::RateLimited);

        signin_with_wallet(
            State(state),
            ClientIp("198.51.100.1".into()),
            body_of(&request),
        )
        .await
        .expect("other client has its own budget");
    }
}
