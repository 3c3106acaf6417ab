// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

/// Why a bearer credential was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
	/// Nothing left after trimming and stripping the `Bearer ` prefix.
	MissingCredential,
	/// The identity provider refused the token.
	InvalidToken,
}

impl fmt::Display for AuthErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AuthErrorKind::MissingCredential => write!(f, "missing_credential"),
			AuthErrorKind::InvalidToken => write!(f, "invalid_token"),
		}
	}
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct AuthError {
	pub kind: AuthErrorKind,
	pub message: String,
}

impl AuthError {
	pub fn missing_credential() -> Self {
		Self {
			kind: AuthErrorKind::MissingCredential,
			message: "no bearer credential supplied".to_string(),
		}
	}

	pub fn invalid_token(message: impl Into<String>) -> Self {
		Self {
			kind: AuthErrorKind::InvalidToken,
			message: message.into(),
		}
	}
}

/// Failures reported by a [`crate::UserDirectory`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum DirectoryError {
	#[error("directory unavailable: {0}")]
	Unavailable(String),

	#[error("unsupported query on {collection}.{field}")]
	UnsupportedQuery { collection: String, field: String },

	#[error("directory error: {0}")]
	Internal(String),
}

/// Failures reported by an [`crate::IdentityProvider`].
///
/// `EmailAlreadyExists` and `IdentityNotFound` are the two shapes the
/// provisioning pipeline treats as expected outcomes rather than failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IdentityProviderError {
	#[error("token rejected: {0}")]
	TokenRejected(String),

	#[error("email already registered: {email}")]
	EmailAlreadyExists { email: String, uid: Option<String> },

	#[error("identity not found: {0}")]
	IdentityNotFound(String),

	#[error("identity provider unavailable: {0}")]
	Unavailable(String),

	#[error("identity provider error: {0}")]
	Internal(String),
}

/// Rejections raised by the provisioner before any provider call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProvisioningError {
	#[error("validation failed: {0}")]
	Validation(String),
}

/// A deletion the provider refused for a reason other than "not found".
///
/// The identity is now orphaned: its directory record is gone but the login
/// still works.
#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to delete login identity {uid}: {source}")]
pub struct DeprovisionError {
	pub uid: String,
	#[source]
	pub source: IdentityProviderError,
}

/// Terminal failure of a provisioning flow.
///
/// Each variant corresponds to one response class at the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
	#[error("malformed input: {0}")]
	MalformedInput(String),

	#[error("authentication failed: {0}")]
	Unauthenticated(#[from] AuthError),

	#[error("principal {subject_id} may not create login identities")]
	AuthorizationDenied { subject_id: String },

	#[error("role lookup failed: {0}")]
	Lookup(#[from] DirectoryError),

	#[error("login identity creation failed for {email}: {reason}")]
	Creation { email: String, reason: String },

	#[error(transparent)]
	Deprovision(#[from] DeprovisionError),
}

impl From<ProvisioningError> for LoginError {
	fn from(e: ProvisioningError) -> Self {
		match e {
			ProvisioningError::Validation(msg) => LoginError::MalformedInput(msg),
		}
	}
}

pub type Result<T> = std::result::Result<T, LoginError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn auth_error_display_includes_kind() {
		let err = AuthError::invalid_token("expired");
		assert_eq!(err.to_string(), "invalid_token: expired");
	}

	#[test]
	fn deprovision_error_names_uid() {
		let err = DeprovisionError {
			uid: "U9".to_string(),
			source: IdentityProviderError::Unavailable("timeout".to_string()),
		};
		let msg = err.to_string();
		assert!(msg.contains("U9"));
		assert!(msg.contains("timeout"));
	}

	#[test]
	fn validation_maps_to_malformed_input() {
		let err: LoginError = ProvisioningError::Validation("email is required".to_string()).into();
		assert!(matches!(err, LoginError::MalformedInput(ref m) if m == "email is required"));
	}
}
