// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Integration tests for the provisioning routes.
//!
//! Tests cover:
//! - Strict and idempotent creation status codes
//! - Authentication and authorization ordering (call-count assertions)
//! - Directory deletion events
//! - CORS headers and the health check

use std::sync::Arc;

use axum::{
	body::Body,
	http::{header, Method, Request, StatusCode},
	response::Response,
	Router,
};
use gatehouse_login::{
	DirectoryError, DirectoryRecord, IdentityProviderError, IdentityRecord, InMemoryDirectory,
	InMemoryIdentityProvider,
};
use gatehouse_server::{cors_layer, create_app_state, create_router};
use gatehouse_server_config::CorsConfig;
use serde_json::json;
use tower::ServiceExt;

struct TestApp {
	router: Router,
	provider: Arc<InMemoryIdentityProvider>,
	directory: Arc<InMemoryDirectory>,
}

/// Token `abc123` resolves to subject `U1`, whose directory record carries `role`.
fn setup_test_app(role: &str) -> TestApp {
	let provider = Arc::new(InMemoryIdentityProvider::new().with_token("abc123", "U1"));
	let directory = Arc::new(InMemoryDirectory::new());
	directory.insert(DirectoryRecord::new("doc-1").with_login_uid("U1").with_role(role));

	let state = create_app_state(provider.clone(), directory.clone());
	TestApp {
		router: create_router(state),
		provider,
		directory,
	}
}

async fn post_json(router: Router, uri: &str, body: serde_json::Value) -> Response {
	post_raw(router, uri, body.to_string()).await
}

async fn post_raw(router: Router, uri: &str, body: impl Into<Body>) -> Response {
	router
		.oneshot(
			Request::builder()
				.method(Method::POST)
				.uri(uri)
				.header(header::CONTENT_TYPE, "application/json")
				.body(body.into())
				.unwrap(),
		)
		.await
		.unwrap()
}

async fn body_string(response: Response) -> String {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	String::from_utf8(bytes.to_vec()).unwrap()
}

fn create_body(email: &str, authorization: &str) -> serde_json::Value {
	json!({ "email": email, "authorization": authorization })
}

// ============================================================================
// Strict creation
// ============================================================================

mod create_auth_user {
	use super::*;

	#[tokio::test]
	async fn admin_creates_identity_and_gets_uid() {
		let app = setup_test_app("Admin");

		let response = post_json(
			app.router,
			"/createAuthUser",
			create_body("new@x.com", "Bearer abc123"),
		)
		.await;

		assert_eq!(response.status(), StatusCode::OK);
		let uid = body_string(response).await;
		assert!(!uid.is_empty());
		let identity = app.provider.identity(&uid).unwrap();
		assert_eq!(identity.email, "new@x.com");
		assert!(!identity.email_verified);
		assert!(!identity.disabled);
	}

	#[tokio::test]
	async fn viewer_gets_402_and_nothing_is_created() {
		let app = setup_test_app("viewer");

		let response = post_json(
			app.router,
			"/createAuthUser",
			create_body("new@x.com", "Bearer abc123"),
		)
		.await;

		assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
		assert_eq!(app.provider.create_calls(), 0);
	}

	#[tokio::test]
	async fn invalid_token_gets_403_without_directory_lookup() {
		let app = setup_test_app("admin");

		let response = post_json(
			app.router,
			"/createAuthUser",
			create_body("new@x.com", "Bearer forged"),
		)
		.await;

		assert_eq!(response.status(), StatusCode::FORBIDDEN);
		assert_eq!(app.directory.query_calls(), 0);
	}

	#[tokio::test]
	async fn empty_authorization_gets_403() {
		let app = setup_test_app("admin");

		let response = post_json(app.router, "/createAuthUser", create_body("new@x.com", "")).await;

		assert_eq!(response.status(), StatusCode::FORBIDDEN);
		assert_eq!(app.provider.verify_calls(), 0);
	}

	#[tokio::test]
	async fn empty_email_with_valid_token_gets_400() {
		let app = setup_test_app("admin");

		let response = post_json(app.router, "/createAuthUser", create_body("", "Bearer abc123")).await;

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	}

	#[tokio::test]
	async fn missing_field_gets_400() {
		let app = setup_test_app("admin");

		let response = post_json(
			app.router,
			"/createAuthUser",
			json!({ "authorization": "Bearer abc123" }),
		)
		.await;

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
		assert_eq!(app.provider.verify_calls(), 0);
	}

	#[tokio::test]
	async fn duplicate_email_gets_500() {
		let app = setup_test_app("admin");
		app.provider.insert_identity(IdentityRecord {
			uid: "U2".to_string(),
			email: "taken@x.com".to_string(),
			email_verified: false,
			disabled: false,
		});

		let response = post_json(
			app.router,
			"/createAuthUser",
			create_body("taken@x.com", "Bearer abc123"),
		)
		.await;

		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert!(body_string(response).await.is_empty());
	}

	#[tokio::test]
	async fn directory_outage_gets_500() {
		let app = setup_test_app("admin");
		app.directory
			.fail_queries_with(DirectoryError::Unavailable("deadline exceeded".to_string()));

		let response = post_json(
			app.router,
			"/createAuthUser",
			create_body("new@x.com", "Bearer abc123"),
		)
		.await;

		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(app.provider.create_calls(), 0);
	}
}

// ============================================================================
// Idempotent creation
// ============================================================================

mod create_user_login {
	use super::*;

	#[tokio::test]
	async fn admin_creates_identity_with_201() {
		let app = setup_test_app("admin");

		let response = post_json(
			app.router,
			"/createUserLogin",
			create_body("new@x.com", "Bearer abc123"),
		)
		.await;

		assert_eq!(response.status(), StatusCode::CREATED);
		let uid = body_string(response).await;
		assert!(app.provider.identity(&uid).is_some());
	}

	#[tokio::test]
	async fn second_request_gets_email_exists() {
		let app = setup_test_app("admin");
		let body = create_body("a@b.com", "Bearer abc123");

		let first = post_json(app.router.clone(), "/createUserLogin", body.clone()).await;
		let second = post_json(app.router, "/createUserLogin", body).await;

		assert_eq!(first.status(), StatusCode::CREATED);
		assert_eq!(second.status(), StatusCode::OK);
		assert_eq!(body_string(second).await, "EMAIL_EXISTS");
		assert_eq!(app.provider.identity_count(), 1);
	}

	#[tokio::test]
	async fn viewer_gets_401() {
		let app = setup_test_app("viewer");

		let response = post_json(
			app.router,
			"/createUserLogin",
			create_body("new@x.com", "Bearer abc123"),
		)
		.await;

		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
		assert_eq!(app.provider.identity_count(), 0);
	}

	#[tokio::test]
	async fn missing_email_gets_400_before_token_check() {
		let app = setup_test_app("admin");

		let response = post_json(app.router, "/createUserLogin", create_body("", "Bearer forged")).await;

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
		assert_eq!(app.provider.verify_calls(), 0);
	}

	#[tokio::test]
	async fn missing_authorization_gets_400() {
		let app = setup_test_app("admin");

		let response = post_json(app.router, "/createUserLogin", create_body("new@x.com", "")).await;

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	}

	#[tokio::test]
	async fn invalid_token_gets_403() {
		let app = setup_test_app("admin");

		let response = post_json(
			app.router,
			"/createUserLogin",
			create_body("new@x.com", "Bearer forged"),
		)
		.await;

		assert_eq!(response.status(), StatusCode::FORBIDDEN);
		assert_eq!(app.directory.query_calls(), 0);
	}

	#[tokio::test]
	async fn provider_outage_gets_500() {
		let app = setup_test_app("admin");
		app.provider
			.fail_creates_with(IdentityProviderError::Unavailable("503".to_string()));

		let response = post_json(
			app.router,
			"/createUserLogin",
			create_body("new@x.com", "Bearer abc123"),
		)
		.await;

		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}

	#[tokio::test]
	async fn invalid_json_gets_400() {
		let app = setup_test_app("admin");

		let response = post_raw(app.router, "/createUserLogin", "{\"email\":").await;

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	}
}

// ============================================================================
// Deletion events
// ============================================================================

mod remove_user_login {
	use super::*;

	fn deletion_event(login_uid: serde_json::Value) -> serde_json::Value {
		json!({
			"oldValue": {
				"name": "projects/p/databases/(default)/documents/users/doc-9",
				"fields": { "login_uid": login_uid },
				"createTime": "2025-01-01T00:00:00Z",
				"updateTime": "2025-01-02T00:00:00Z"
			},
			"value": {},
			"updateMask": { "fieldPaths": [] }
		})
	}

	#[tokio::test]
	async fn unknown_uid_completes_with_204() {
		let app = setup_test_app("admin");

		let response = post_json(
			app.router,
			"/removeUserLogin",
			deletion_event(json!({ "stringValue": "U9" })),
		)
		.await;

		assert_eq!(response.status(), StatusCode::NO_CONTENT);
		assert_eq!(app.provider.delete_calls(), 1);
	}

	#[tokio::test]
	async fn existing_identity_is_deleted() {
		let app = setup_test_app("admin");
		app.provider.insert_identity(IdentityRecord {
			uid: "U9".to_string(),
			email: "gone@x.com".to_string(),
			email_verified: true,
			disabled: false,
		});

		let response = post_json(
			app.router,
			"/removeUserLogin",
			deletion_event(json!({ "stringValue": "U9" })),
		)
		.await;

		assert_eq!(response.status(), StatusCode::NO_CONTENT);
		assert!(app.provider.identity("U9").is_none());
	}

	#[tokio::test]
	async fn record_without_login_uid_is_noop() {
		let app = setup_test_app("admin");

		let response = post_json(
			app.router,
			"/removeUserLogin",
			json!({ "oldValue": { "fields": {} } }),
		)
		.await;

		assert_eq!(response.status(), StatusCode::NO_CONTENT);
		assert_eq!(app.provider.delete_calls(), 0);
	}

	#[tokio::test]
	async fn null_fields_in_post_delete_value_still_deletes() {
		let app = setup_test_app("admin");
		app.provider.insert_identity(IdentityRecord {
			uid: "U9".to_string(),
			email: "gone@x.com".to_string(),
			email_verified: false,
			disabled: false,
		});

		let response = post_json(
			app.router,
			"/removeUserLogin",
			json!({
				"oldValue": { "fields": { "login_uid": { "stringValue": "U9" } } },
				"value": { "fields": null }
			}),
		)
		.await;

		assert_eq!(response.status(), StatusCode::NO_CONTENT);
		assert!(app.provider.identity("U9").is_none());
	}

	#[tokio::test]
	async fn double_login_uid_gets_400() {
		let app = setup_test_app("admin");

		let response = post_json(
			app.router,
			"/removeUserLogin",
			deletion_event(json!({ "doubleValue": 1.5 })),
		)
		.await;

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
		assert_eq!(app.provider.delete_calls(), 0);
	}

	#[tokio::test]
	async fn provider_failure_gets_500() {
		let app = setup_test_app("admin");
		app.provider
			.fail_deletes_with(IdentityProviderError::Internal("quota exceeded".to_string()));

		let response = post_json(
			app.router,
			"/removeUserLogin",
			deletion_event(json!({ "stringValue": "U9" })),
		)
		.await;

		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}

	#[tokio::test]
	async fn non_string_login_uid_gets_400() {
		let app = setup_test_app("admin");

		let response = post_json(
			app.router,
			"/removeUserLogin",
			deletion_event(json!({ "integerValue": "9" })),
		)
		.await;

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
		assert_eq!(app.provider.delete_calls(), 0);
	}

	#[tokio::test]
	async fn event_without_old_value_gets_400() {
		let app = setup_test_app("admin");

		let response = post_json(app.router, "/removeUserLogin", json!({ "value": {} })).await;

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	}
}

// ============================================================================
// Ambient routes
// ============================================================================

#[tokio::test]
async fn health_reports_ok_and_version() {
	let app = setup_test_app("admin");

	let response = app
		.router
		.oneshot(
			Request::builder()
				.uri("/health")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
	assert_eq!(body["status"], "ok");
	assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn cors_preflight_allows_post_and_get() {
	let app = setup_test_app("admin");
	let router = app
		.router
		.layer(cors_layer(&CorsConfig::default()).unwrap());

	let response = router
		.oneshot(
			Request::builder()
				.method(Method::OPTIONS)
				.uri("/createAuthUser")
				.header(header::ORIGIN, "https://admin.example.com")
				.header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
				.header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();

	let headers = response.headers();
	assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
	let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
	assert!(methods.contains("POST"));
	assert!(methods.contains("GET"));
}

#[tokio::test]
async fn cors_header_on_simple_response() {
	let app = setup_test_app("viewer");
	let router = app
		.router
		.layer(cors_layer(&CorsConfig::default()).unwrap());

	let response = router
		.oneshot(
			Request::builder()
				.method(Method::POST)
				.uri("/createAuthUser")
				.header(header::ORIGIN, "https://admin.example.com")
				.header(header::CONTENT_TYPE, "application/json")
				.body(Body::from(create_body("new@x.com", "Bearer abc123").to_string()))
				.unwrap(),
		)
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
	assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
