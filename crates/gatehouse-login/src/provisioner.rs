// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Idempotent create and delete against the identity provider.
//!
//! The directory and the identity provider are reconciled eventually, not
//! transactionally. Two provider answers are therefore expected outcomes:
//!
//! | Operation       | Provider answer      | Outcome                     |
//! |-----------------|----------------------|-----------------------------|
//! | create_or_reuse | email already exists | `IdentityOutcome::AlreadyExists` |
//! | deprovision     | identity not found   | `DeprovisionOutcome::AlreadyAbsent` |
//!
//! Nothing here retries.

use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::error::{DeprovisionError, IdentityProviderError, ProvisioningError};
use crate::provider::IdentityProvider;
use crate::types::{DeprovisionOutcome, IdentityOutcome, IdentityRequest, NewIdentity};

#[derive(Clone)]
pub struct IdentityProvisioner {
	provider: Arc<dyn IdentityProvider>,
}

impl IdentityProvisioner {
	pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
		Self { provider }
	}

	/// Create an unverified, enabled login identity for `request.email`.
	///
	/// An empty email is rejected before the provider is called. Provider
	/// failures are folded into [`IdentityOutcome`].
	#[instrument(skip(self), fields(email = %request.email))]
	pub async fn create_or_reuse(
		&self,
		request: &IdentityRequest,
	) -> Result<IdentityOutcome, ProvisioningError> {
		if request.email.trim().is_empty() {
			return Err(ProvisioningError::Validation("email is required".to_string()));
		}

		let outcome = match self
			.provider
			.create_identity(NewIdentity::unverified(request.email.clone()))
			.await
		{
			Ok(identity) => {
				info!(uid = %identity.uid, email = %request.email, "created login identity");
				IdentityOutcome::Created { uid: identity.uid }
			}
			Err(IdentityProviderError::EmailAlreadyExists { uid, .. }) => {
				info!(email = %request.email, uid = ?uid, "login identity already exists");
				IdentityOutcome::AlreadyExists { uid }
			}
			Err(e) => {
				error!(email = %request.email, error = %e, "failed to create login identity");
				IdentityOutcome::Failed {
					reason: e.to_string(),
				}
			}
		};

		Ok(outcome)
	}

	/// Remove the login identity linked to a deleted directory record.
	///
	/// A missing or empty uid means the user never had a login. Any provider
	/// failure other than "not found" leaves an orphaned identity and is
	/// returned to the caller.
	#[instrument(skip(self))]
	pub async fn deprovision(
		&self,
		login_uid: Option<&str>,
	) -> Result<DeprovisionOutcome, DeprovisionError> {
		let Some(uid) = login_uid.filter(|uid| !uid.is_empty()) else {
			info!("deleted user had no login uid, nothing to remove");
			return Ok(DeprovisionOutcome::Skipped);
		};

		match self.provider.delete_identity(uid).await {
			Ok(()) => {
				info!(uid = %uid, "deleted login identity");
				Ok(DeprovisionOutcome::Deleted {
					uid: uid.to_string(),
				})
			}
			Err(IdentityProviderError::IdentityNotFound(_)) => {
				info!(uid = %uid, "login identity not found, nothing to remove");
				Ok(DeprovisionOutcome::AlreadyAbsent {
					uid: uid.to_string(),
				})
			}
			Err(e) => {
				error!(
					uid = %uid,
					error = %e,
					"failed to delete login identity; it is now orphaned from the directory"
				);
				Err(DeprovisionError {
					uid: uid.to_string(),
					source: e,
				})
			}
		}
	}
}

impl std::fmt::Debug for IdentityProvisioner {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("IdentityProvisioner").finish_non_exhaustive()
	}
}
