// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Collaborator contracts for the two external systems of record.
//!
//! Implementations are created once per process and shared by every request
//! through an `Arc`, so they must be safe for concurrent use.

use async_trait::async_trait;
use gatehouse_common_secret::SecretString;

use crate::error::{DirectoryError, IdentityProviderError};
use crate::types::{DirectoryRecord, IdentityRecord, NewIdentity, VerifiedToken};

/// Collection holding one record per application user.
pub const USERS_COLLECTION: &str = "users";

/// Field on a user record that links it to a login identity.
pub const LOGIN_UID_FIELD: &str = "login_uid";

/// The system of record for login identities.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
	/// Verify signature and expiry of an identity token.
	async fn verify_token(&self, token: &SecretString)
		-> Result<VerifiedToken, IdentityProviderError>;

	/// Create a login identity. Fails with `EmailAlreadyExists` on a taken email.
	async fn create_identity(
		&self,
		identity: NewIdentity,
	) -> Result<IdentityRecord, IdentityProviderError>;

	/// Delete a login identity. Fails with `IdentityNotFound` on an unknown uid.
	async fn delete_identity(&self, uid: &str) -> Result<(), IdentityProviderError>;
}

/// The system of record for user profiles and roles.
#[async_trait]
pub trait UserDirectory: Send + Sync {
	/// Every record in `collection` whose `field` equals `value`.
	async fn query_by_field(
		&self,
		collection: &str,
		field: &str,
		value: &str,
	) -> Result<Vec<DirectoryRecord>, DirectoryError>;
}
