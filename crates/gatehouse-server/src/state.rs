// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared handler state.

use std::sync::Arc;

use gatehouse_login::{IdentityProvider, LoginService, UserDirectory};

/// Cloned into every handler. Collaborators are created once per process.
#[derive(Clone, Debug)]
pub struct AppState {
	pub login: LoginService,
}

pub fn create_app_state(
	provider: Arc<dyn IdentityProvider>,
	directory: Arc<dyn UserDirectory>,
) -> AppState {
	AppState {
		login: LoginService::new(provider, directory),
	}
}
