// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory collaborator backends, optionally seeded from a TOML file.
//!
//! ```toml
//! [tokens]
//! "abc123" = "U1"
//!
//! [[identities]]
//! uid = "U1"
//! email = "admin@example.com"
//!
//! [[users]]
//! document_id = "doc-1"
//! login_uid = "U1"
//! role = "admin"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gatehouse_login::{DirectoryRecord, IdentityRecord, InMemoryDirectory, InMemoryIdentityProvider};
use gatehouse_server_config::BackendConfig;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
	#[error("Failed to read seed file {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse seed file {path}: {source}")]
	Parse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
}

/// Contents of a seed file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
	/// Accepted bearer tokens, mapped to their subject id.
	#[serde(default)]
	pub tokens: HashMap<String, String>,
	#[serde(default)]
	pub identities: Vec<IdentityRecord>,
	#[serde(default)]
	pub users: Vec<DirectoryRecord>,
}

impl Seed {
	pub fn load(path: &Path) -> Result<Self, BackendError> {
		let content = std::fs::read_to_string(path).map_err(|e| BackendError::Read {
			path: path.to_path_buf(),
			source: e,
		})?;
		toml::from_str(&content).map_err(|e| BackendError::Parse {
			path: path.to_path_buf(),
			source: e,
		})
	}

	pub fn apply(self, provider: &InMemoryIdentityProvider, directory: &InMemoryDirectory) {
		for (token, subject_id) in self.tokens {
			provider.insert_token(token, subject_id);
		}
		for identity in self.identities {
			provider.insert_identity(identity);
		}
		for user in self.users {
			directory.insert(user);
		}
	}
}

/// Both collaborators, shared by every request.
#[derive(Debug, Clone)]
pub struct Backends {
	pub provider: Arc<InMemoryIdentityProvider>,
	pub directory: Arc<InMemoryDirectory>,
}

impl Backends {
	pub fn empty() -> Self {
		Self {
			provider: Arc::new(InMemoryIdentityProvider::new()),
			directory: Arc::new(InMemoryDirectory::new()),
		}
	}

	pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
		let backends = Self::empty();
		match &config.seed_path {
			Some(path) => {
				let seed = Seed::load(path)?;
				info!(
					path = %path.display(),
					tokens = seed.tokens.len(),
					identities = seed.identities.len(),
					users = seed.users.len(),
					"seeding in-memory backends"
				);
				seed.apply(&backends.provider, &backends.directory);
			}
			None => warn!("no seed file configured, starting with empty backends"),
		}
		Ok(backends)
	}
}
