// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Login identity provisioning handlers.
//!
//! | Route                   | Success                                 |
//! |-------------------------|-----------------------------------------|
//! | POST /createAuthUser    | 200 + uid                               |
//! | POST /createUserLogin   | 201 + uid, or 200 + `EMAIL_EXISTS`      |
//! | POST /removeUserLogin   | 204                                     |

use axum::{
	body::Bytes,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
};
use gatehouse_login::{
	ChangeEvent, CreateLoginRequest, CreatedLogin, CreationPolicy, DeprovisionOutcome,
	DocumentSnapshot, LoginError,
};
use tracing::{debug, info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// Body returned by idempotent creation when the email is already registered.
pub const EMAIL_EXISTS: &str = "EMAIL_EXISTS";

fn parse_request(body: &[u8]) -> Result<CreateLoginRequest, LoginError> {
	serde_json::from_slice(body).map_err(|e| LoginError::MalformedInput(e.to_string()))
}

async fn create(state: &AppState, body: &[u8], policy: CreationPolicy) -> Result<CreatedLogin, ApiError> {
	let request = parse_request(body).map_err(ApiError::from)?;
	state
		.login
		.create_login(&request, policy)
		.await
		.map_err(|e| ApiError::for_creation(e, policy))
}

/// POST /createAuthUser - strict creation.
#[instrument(skip_all)]
pub async fn create_auth_user(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<Response, ApiError> {
	match create(&state, &body, CreationPolicy::Strict).await? {
		CreatedLogin::Created { uid } => Ok((StatusCode::OK, uid).into_response()),
		CreatedLogin::AlreadyProvisioned { .. } => Err(ApiError::Internal(
			"strict creation reported an existing identity".to_string(),
		)),
	}
}

/// POST /createUserLogin - idempotent creation.
#[instrument(skip_all)]
pub async fn create_user_login(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<Response, ApiError> {
	let response = match create(&state, &body, CreationPolicy::TolerateExisting).await? {
		CreatedLogin::Created { uid } => (StatusCode::CREATED, uid).into_response(),
		CreatedLogin::AlreadyProvisioned { .. } => (StatusCode::OK, EMAIL_EXISTS).into_response(),
	};
	Ok(response)
}

/// POST /removeUserLogin - deletion event from the user directory.
#[instrument(skip_all)]
pub async fn remove_user_login(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<StatusCode, ApiError> {
	let event = ChangeEvent::from_slice(&body)?;
	let trigger = event.deletion_trigger()?;
	let document_id = event
		.old_value
		.as_ref()
		.and_then(DocumentSnapshot::document_id)
		.map(str::to_string);

	let outcome = state.login.remove_login(trigger).await?;
	match &outcome {
		DeprovisionOutcome::Deleted { uid } => {
			info!(uid = %uid, document_id = ?document_id, "user login removed");
		}
		other => {
			debug!(outcome = ?other, document_id = ?document_id, "no login identity removed");
		}
	}

	Ok(StatusCode::NO_CONTENT)
}
