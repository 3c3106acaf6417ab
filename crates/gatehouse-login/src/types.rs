// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Value types shared by the provisioning pipeline.
//!
//! Everything here is request scoped: a value is built while one request or
//! change event is handled and dropped when that handling finishes. The user
//! directory owns roles and the `login_uid` linkage; the identity provider
//! owns login identities.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Caller
// =============================================================================

/// The authenticated caller. Only [`crate::TokenValidator`] produces one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
	pub subject_id: String,
}

impl Principal {
	pub fn new(subject_id: impl Into<String>) -> Self {
		Self {
			subject_id: subject_id.into(),
		}
	}
}

/// A successfully verified identity token, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedToken {
	pub subject_id: String,
}

impl VerifiedToken {
	pub fn new(subject_id: impl Into<String>) -> Self {
		Self {
			subject_id: subject_id.into(),
		}
	}
}

// =============================================================================
// Directory
// =============================================================================

/// A role name as stored on a directory record. Compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
	pub fn new(name: impl Into<String>) -> Self {
		Self(name.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// A user profile in the directory, keyed by its document id.
///
/// `login_uid` links the record to a login identity. At most one record may
/// carry a given `login_uid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRecord {
	pub document_id: String,
	#[serde(default)]
	pub login_uid: Option<String>,
	#[serde(default)]
	pub role: Option<Role>,
}

impl DirectoryRecord {
	pub fn new(document_id: impl Into<String>) -> Self {
		Self {
			document_id: document_id.into(),
			login_uid: None,
			role: None,
		}
	}

	pub fn with_login_uid(mut self, login_uid: impl Into<String>) -> Self {
		self.login_uid = Some(login_uid.into());
		self
	}

	pub fn with_role(mut self, role: impl Into<String>) -> Self {
		self.role = Some(Role::new(role));
		self
	}

	/// String value of a named field, for field-equality queries.
	pub fn field(&self, name: &str) -> Option<&str> {
		match name {
			"login_uid" => self.login_uid.as_deref(),
			"role" => self.role.as_ref().map(Role::as_str),
			_ => None,
		}
	}
}

// =============================================================================
// Authorization
// =============================================================================

/// Outcome of the "may create login identities" check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationDecision {
	Admit,
	Deny,
}

impl AuthorizationDecision {
	pub fn is_admit(self) -> bool {
		matches!(self, AuthorizationDecision::Admit)
	}
}

impl fmt::Display for AuthorizationDecision {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AuthorizationDecision::Admit => write!(f, "admit"),
			AuthorizationDecision::Deny => write!(f, "deny"),
		}
	}
}

// =============================================================================
// Identity provider
// =============================================================================

/// The login identity a caller asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRequest {
	pub email: String,
}

impl IdentityRequest {
	pub fn new(email: impl Into<String>) -> Self {
		Self {
			email: email.into(),
		}
	}
}

/// Parameters handed to [`crate::IdentityProvider::create_identity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIdentity {
	pub email: String,
	pub email_verified: bool,
	pub disabled: bool,
}

impl NewIdentity {
	/// An enabled identity whose email has not been verified yet.
	pub fn unverified(email: impl Into<String>) -> Self {
		Self {
			email: email.into(),
			email_verified: false,
			disabled: false,
		}
	}
}

/// A login identity held by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
	pub uid: String,
	pub email: String,
	#[serde(default)]
	pub email_verified: bool,
	#[serde(default)]
	pub disabled: bool,
}

/// Result of [`crate::IdentityProvisioner::create_or_reuse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityOutcome {
	Created { uid: String },
	/// The email is already registered. `uid` is set when the provider reports it.
	AlreadyExists { uid: Option<String> },
	Failed { reason: String },
}

/// Result of [`crate::IdentityProvisioner::deprovision`]. All variants are success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeprovisionOutcome {
	/// No login uid on the deleted record; nothing to remove.
	Skipped,
	Deleted { uid: String },
	/// The provider had no identity with this uid.
	AlreadyAbsent { uid: String },
}

/// Derived from the prior state of a deleted directory record. Fire-once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionTrigger {
	pub login_uid: Option<String>,
}

impl DeletionTrigger {
	pub fn new(login_uid: Option<String>) -> Self {
		Self { login_uid }
	}
}

// =============================================================================
// Orchestration
// =============================================================================

/// How a creation request treats an email that is already registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreationPolicy {
	/// Any provider failure, including an existing email, fails the request.
	Strict,
	/// An existing email is a distinguishable success, so retries converge.
	TolerateExisting,
}

impl fmt::Display for CreationPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CreationPolicy::Strict => write!(f, "strict"),
			CreationPolicy::TolerateExisting => write!(f, "tolerate_existing"),
		}
	}
}

/// A successful end state of a creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatedLogin {
	Created { uid: String },
	AlreadyProvisioned { uid: Option<String> },
}
