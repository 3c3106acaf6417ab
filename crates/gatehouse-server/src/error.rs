// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Transport mapping of provisioning failures.
//!
//! Response bodies are empty; the status code alone classifies the outcome.
//! The cause is logged where the failure happens.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gatehouse_login::{CreationPolicy, LoginError};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	#[error("bad request: {0}")]
	BadRequest(String),
	/// Caller is authenticated but not an admin. Strict creation answers 402.
	#[error("payment required: {0}")]
	PaymentRequired(String),
	/// Caller is authenticated but not an admin. Idempotent creation answers 401.
	#[error("unauthorized: {0}")]
	Unauthorized(String),
	#[error("forbidden: {0}")]
	Forbidden(String),
	#[error("internal error: {0}")]
	Internal(String),
}

impl ApiError {
	/// Map a creation failure, whose denial status depends on the policy.
	pub fn for_creation(err: LoginError, policy: CreationPolicy) -> Self {
		match (err, policy) {
			(e @ LoginError::AuthorizationDenied { .. }, CreationPolicy::Strict) => {
				ApiError::PaymentRequired(e.to_string())
			}
			(e, _) => e.into(),
		}
	}

	pub fn status(&self) -> StatusCode {
		match self {
			ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
			ApiError::PaymentRequired(_) => StatusCode::PAYMENT_REQUIRED,
			ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
			ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
			ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl From<LoginError> for ApiError {
	fn from(e: LoginError) -> Self {
		match e {
			LoginError::MalformedInput(msg) => ApiError::BadRequest(msg),
			LoginError::Unauthenticated(e) => ApiError::Forbidden(e.to_string()),
			e @ LoginError::AuthorizationDenied { .. } => ApiError::Unauthorized(e.to_string()),
			e @ (LoginError::Lookup(_) | LoginError::Creation { .. } | LoginError::Deprovision(_)) => {
				ApiError::Internal(e.to_string())
			}
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status();
		debug!(status = status.as_u16(), error = %self, "request failed");
		status.into_response()
	}
}
