// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Collaborator backend configuration.

use std::path::PathBuf;

use serde::Deserialize;

/// Backend configuration (runtime, fully resolved).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendConfig {
	/// TOML file seeding the in-memory identity provider and directory.
	/// Without one the server starts with both stores empty.
	pub seed_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendConfigLayer {
	#[serde(default)]
	pub seed_path: Option<PathBuf>,
}

impl BackendConfigLayer {
	pub fn merge(&mut self, other: BackendConfigLayer) {
		if other.seed_path.is_some() {
			self.seed_path = other.seed_path;
		}
	}

	pub fn finalize(self) -> BackendConfig {
		BackendConfig {
			seed_path: self.seed_path,
		}
	}
}
