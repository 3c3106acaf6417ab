// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bearer credential validation.
//!
//! ```text
//! raw header → trim → strip "Bearer " → provider.verify_token → Principal
//! ```
//!
//! Signature and expiry checks belong to the identity provider. The raw
//! credential stays inside a [`SecretString`] and is never logged.

use std::sync::Arc;

use gatehouse_common_secret::SecretString;
use tracing::{debug, instrument, warn};

use crate::error::AuthError;
use crate::provider::IdentityProvider;
use crate::types::Principal;

/// Prefix stripped from the credential. Case-sensitive, stripped at most once.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Trim surrounding whitespace, then strip a single leading `Bearer `.
pub fn strip_bearer(raw: &str) -> &str {
	let trimmed = raw.trim();
	trimmed.strip_prefix(BEARER_PREFIX).unwrap_or(trimmed)
}

/// Turns a bearer credential into an authenticated [`Principal`].
#[derive(Clone)]
pub struct TokenValidator {
	provider: Arc<dyn IdentityProvider>,
}

impl TokenValidator {
	pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
		Self { provider }
	}

	/// Validate a raw `Authorization` value.
	///
	/// A blank credential is rejected without calling the provider. Callers
	/// must not resolve roles after an error.
	#[instrument(level = "debug", skip_all)]
	pub async fn validate(&self, raw_header: &SecretString) -> Result<Principal, AuthError> {
		let token = SecretString::new(strip_bearer(raw_header.expose()).to_string());
		if token.is_blank() {
			warn!("rejecting request without a bearer credential");
			return Err(AuthError::missing_credential());
		}

		match self.provider.verify_token(&token).await {
			Ok(verified) => {
				debug!(subject_id = %verified.subject_id, "identity token verified");
				Ok(Principal::new(verified.subject_id))
			}
			Err(e) => {
				warn!(error = %e, "identity token verification failed");
				Err(AuthError::invalid_token(e.to_string()))
			}
		}
	}
}
