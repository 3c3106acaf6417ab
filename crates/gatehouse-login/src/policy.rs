// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The single enforcement point for "only admins may provision logins".

use crate::types::{AuthorizationDecision, Role};

/// Role name that grants login provisioning, compared after lower-casing.
pub const ADMIN_ROLE: &str = "admin";

/// Admit iff the role, lower-cased, is exactly `admin`.
pub fn decide(role: Option<&Role>) -> AuthorizationDecision {
	match role {
		Some(role) if role.as_str().to_lowercase() == ADMIN_ROLE => AuthorizationDecision::Admit,
		_ => AuthorizationDecision::Deny,
	}
}
