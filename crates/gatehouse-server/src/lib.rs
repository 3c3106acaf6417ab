// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP surface for admin-gated login identity provisioning.
//!
//! Routes:
//! - `POST /createAuthUser` - strict creation
//! - `POST /createUserLogin` - idempotent creation
//! - `POST /removeUserLogin` - directory deletion events
//! - `GET /health` - liveness check

pub mod backend;
pub mod error;
pub mod routes;
pub mod state;

pub use backend::{BackendError, Backends, Seed};
pub use error::ApiError;
pub use gatehouse_server_config::ServerConfig;
pub use state::{create_app_state, AppState};

use axum::{
	http::{header, HeaderValue, Method},
	routing::{get, post},
	Router,
};
use gatehouse_server_config::CorsConfig;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/createAuthUser", post(routes::login::create_auth_user))
		.route("/createUserLogin", post(routes::login::create_user_login))
		.route("/removeUserLogin", post(routes::login::remove_user_login))
		.route("/health", get(routes::health::health_check))
		.with_state(state)
}

/// CORS policy for browser callers of the creation endpoints.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, header::InvalidHeaderValue> {
	let origin = if config.allows_any_origin() {
		AllowOrigin::any()
	} else {
		AllowOrigin::exact(HeaderValue::from_str(&config.allowed_origin)?)
	};

	Ok(CorsLayer::new()
		.allow_origin(origin)
		.allow_methods([Method::POST, Method::GET])
		.allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}
