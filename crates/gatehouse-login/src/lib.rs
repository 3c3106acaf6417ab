// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Admin-gated provisioning of login identities.
//!
//! This crate provides:
//! - Bearer token validation against an identity provider
//! - Role resolution through the user directory's `login_uid` linkage
//! - The admin-only authorization decision
//! - Idempotent creation and deletion of login identities
//! - The change-event model for directory deletions
//! - In-memory collaborators for tests and standalone runs
//!
//! # Reconciliation
//!
//! The user directory and the identity provider are two systems of record
//! without a shared transaction. Creation treats "email already exists" and
//! deletion treats "identity not found" as converged states, so retries and
//! replays are harmless.
//!
//! # Security Considerations
//!
//! - Credentials travel as [`gatehouse_common_secret::SecretString`] and are never logged
//! - Ambiguous directory data (duplicate `login_uid`) always denies

pub mod error;
pub mod event;
pub mod memory;
pub mod policy;
pub mod provider;
pub mod provisioner;
pub mod role;
pub mod service;
pub mod token;
pub mod types;

#[cfg(test)]
mod testing;

pub use gatehouse_common_secret::SecretString;

pub use error::{
	AuthError, AuthErrorKind, DeprovisionError, DirectoryError, IdentityProviderError, LoginError,
	ProvisioningError, Result,
};
pub use event::{ChangeEvent, DocumentSnapshot, FieldValue, UpdateMask};
pub use memory::{InMemoryDirectory, InMemoryIdentityProvider};
pub use policy::{decide, ADMIN_ROLE};
pub use provider::{IdentityProvider, UserDirectory, LOGIN_UID_FIELD, USERS_COLLECTION};
pub use provisioner::IdentityProvisioner;
pub use role::{RoleLookup, RoleResolver};
pub use service::{CreateLoginRequest, LoginService};
pub use token::{strip_bearer, TokenValidator, BEARER_PREFIX};
pub use types::{
	AuthorizationDecision, CreatedLogin, CreationPolicy, DeletionTrigger, DeprovisionOutcome,
	DirectoryRecord, IdentityOutcome, IdentityRecord, IdentityRequest, NewIdentity, Principal,
	Role, VerifiedToken,
};
