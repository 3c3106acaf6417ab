// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! CORS configuration for the provisioning endpoints.

use serde::Deserialize;

/// Origin allowed when none is configured.
pub const ANY_ORIGIN: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
	pub allowed_origin: String,
}

impl CorsConfig {
	pub fn allows_any_origin(&self) -> bool {
		self.allowed_origin == ANY_ORIGIN
	}
}

impl Default for CorsConfig {
	fn default() -> Self {
		Self {
			allowed_origin: ANY_ORIGIN.to_string(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfigLayer {
	#[serde(default)]
	pub allowed_origin: Option<String>,
}

impl CorsConfigLayer {
	pub fn merge(&mut self, other: CorsConfigLayer) {
		if other.allowed_origin.is_some() {
			self.allowed_origin = other.allowed_origin;
		}
	}

	pub fn finalize(self) -> CorsConfig {
		CorsConfig {
			allowed_origin: self
				.allowed_origin
				.unwrap_or_else(|| ANY_ORIGIN.to_string()),
		}
	}
}
