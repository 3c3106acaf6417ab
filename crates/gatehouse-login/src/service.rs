// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Orchestration of the provisioning flows.
//!
//! Both creation entry points run one pipeline; [`CreationPolicy`] decides
//! how far validation happens up front and what an existing email means.
//!
//! ```text
//! Strict:            token → email → role → decide → create_or_reuse
//! TolerateExisting:  email + authorization → token → role → decide → create_or_reuse
//! ```
//!
//! Every flow stops at its first failing stage.

use std::sync::Arc;

use gatehouse_common_secret::SecretString;
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

use crate::error::{LoginError, Result};
use crate::policy;
use crate::provider::{IdentityProvider, UserDirectory};
use crate::provisioner::IdentityProvisioner;
use crate::role::RoleResolver;
use crate::token::TokenValidator;
use crate::types::{
	CreatedLogin, CreationPolicy, DeletionTrigger, DeprovisionOutcome, IdentityOutcome,
	IdentityRequest,
};

/// Body of a creation request. Both fields are required by the schema.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLoginRequest {
	pub email: String,
	pub authorization: SecretString,
}

impl CreateLoginRequest {
	pub fn new(email: impl Into<String>, authorization: impl Into<SecretString>) -> Self {
		Self {
			email: email.into(),
			authorization: authorization.into(),
		}
	}
}

#[derive(Clone)]
pub struct LoginService {
	validator: TokenValidator,
	roles: RoleResolver,
	provisioner: IdentityProvisioner,
}

impl LoginService {
	pub fn new(provider: Arc<dyn IdentityProvider>, directory: Arc<dyn UserDirectory>) -> Self {
		Self {
			validator: TokenValidator::new(provider.clone()),
			roles: RoleResolver::new(directory),
			provisioner: IdentityProvisioner::new(provider),
		}
	}

	/// Create a login identity on behalf of an admin caller.
	#[instrument(skip(self, request), fields(email = %request.email, policy = %policy))]
	pub async fn create_login(
		&self,
		request: &CreateLoginRequest,
		policy: CreationPolicy,
	) -> Result<CreatedLogin> {
		if policy == CreationPolicy::TolerateExisting {
			require_email(&request.email)?;
			if request.authorization.is_blank() {
				return Err(LoginError::MalformedInput(
					"authorization is required".to_string(),
				));
			}
		}

		let principal = self.validator.validate(&request.authorization).await?;

		if policy == CreationPolicy::Strict {
			require_email(&request.email)?;
		}

		let role = self.roles.resolve_role(&principal.subject_id).await.map_err(|e| {
			error!(subject_id = %principal.subject_id, error = %e, "role lookup failed");
			LoginError::from(e)
		})?;

		let decision = policy::decide(role.as_ref());
		if !decision.is_admit() {
			warn!(
				subject_id = %principal.subject_id,
				role = ?role,
				"caller is not permitted to create login identities"
			);
			return Err(LoginError::AuthorizationDenied {
				subject_id: principal.subject_id,
			});
		}

		let outcome = self
			.provisioner
			.create_or_reuse(&IdentityRequest::new(request.email.clone()))
			.await?;

		match (outcome, policy) {
			(IdentityOutcome::Created { uid }, _) => {
				info!(
					subject_id = %principal.subject_id,
					email = %request.email,
					uid = %uid,
					"login identity provisioned"
				);
				Ok(CreatedLogin::Created { uid })
			}
			(IdentityOutcome::AlreadyExists { uid }, CreationPolicy::TolerateExisting) => {
				Ok(CreatedLogin::AlreadyProvisioned { uid })
			}
			(IdentityOutcome::AlreadyExists { .. }, CreationPolicy::Strict) => {
				error!(
					subject_id = %principal.subject_id,
					email = %request.email,
					"login identity already exists"
				);
				Err(LoginError::Creation {
					email: request.email.clone(),
					reason: "email already registered".to_string(),
				})
			}
			(IdentityOutcome::Failed { reason }, _) => {
				error!(
					subject_id = %principal.subject_id,
					email = %request.email,
					reason = %reason,
					"login identity creation failed"
				);
				Err(LoginError::Creation {
					email: request.email.clone(),
					reason,
				})
			}
		}
	}

	/// Deprovision the login identity of a deleted directory record.
	#[instrument(skip(self))]
	pub async fn remove_login(&self, trigger: DeletionTrigger) -> Result<DeprovisionOutcome> {
		let outcome = self
			.provisioner
			.deprovision(trigger.login_uid.as_deref())
			.await?;
		Ok(outcome)
	}
}

impl std::fmt::Debug for LoginService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LoginService").finish_non_exhaustive()
	}
}

fn require_email(email: &str) -> Result<()> {
	if email.trim().is_empty() {
		return Err(LoginError::MalformedInput("email is required".to_string()));
	}
	Ok(())
}
