// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role resolution against the user directory.
//!
//! A subject id maps to a role through the one directory record whose
//! `login_uid` equals it. Ambiguity never grants anything: two or more
//! matching records resolve to no role.

use std::sync::Arc;

use tracing::{debug, error, instrument};

use crate::error::DirectoryError;
use crate::provider::{UserDirectory, LOGIN_UID_FIELD, USERS_COLLECTION};
use crate::types::Role;

/// What the directory holds for a subject id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleLookup {
	/// No record carries this `login_uid`.
	NoRecord,
	/// Exactly one record; its role field may be missing.
	Unique { document_id: String, role: Option<Role> },
	/// Data-integrity fault: several records share one `login_uid`.
	Duplicate { count: usize },
}

impl RoleLookup {
	/// The role this lookup grants. Only a unique record yields one.
	pub fn into_role(self) -> Option<Role> {
		match self {
			RoleLookup::Unique { role, .. } => role,
			RoleLookup::NoRecord | RoleLookup::Duplicate { .. } => None,
		}
	}
}

#[derive(Clone)]
pub struct RoleResolver {
	directory: Arc<dyn UserDirectory>,
}

impl RoleResolver {
	pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
		Self { directory }
	}

	/// Classify the directory records linked to `subject_id`.
	#[instrument(level = "debug", skip(self))]
	pub async fn lookup(&self, subject_id: &str) -> Result<RoleLookup, DirectoryError> {
		let mut records = self
			.directory
			.query_by_field(USERS_COLLECTION, LOGIN_UID_FIELD, subject_id)
			.await?;

		let lookup = match records.len() {
			0 => RoleLookup::NoRecord,
			1 => {
				let record = records.remove(0);
				RoleLookup::Unique {
					document_id: record.document_id,
					role: record.role,
				}
			}
			count => {
				error!(
					subject_id = %subject_id,
					match_count = count,
					"CRITICAL: duplicate login_uid in user directory, denying"
				);
				RoleLookup::Duplicate { count }
			}
		};

		debug!(subject_id = %subject_id, lookup = ?lookup, "resolved directory records");
		Ok(lookup)
	}

	/// Role of the principal, or `None` when absent or ambiguous.
	pub async fn resolve_role(&self, subject_id: &str) -> Result<Option<Role>, DirectoryError> {
		self.lookup(subject_id).await.map(RoleLookup::into_role)
	}
}
