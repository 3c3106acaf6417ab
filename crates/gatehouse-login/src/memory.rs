// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory collaborators.
//!
//! Used by the test suites and by the server binary when it runs without
//! external services. Each keeps call counters and can be told to fail
//! every later call with a given error.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use gatehouse_common_secret::SecretString;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{DirectoryError, IdentityProviderError};
use crate::provider::{IdentityProvider, UserDirectory, USERS_COLLECTION};
use crate::types::{DirectoryRecord, IdentityRecord, NewIdentity, VerifiedToken};

// =============================================================================
// Identity provider
// =============================================================================

#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
	tokens: RwLock<HashMap<String, String>>,
	identities: RwLock<HashMap<String, IdentityRecord>>,
	create_failure: RwLock<Option<IdentityProviderError>>,
	delete_failure: RwLock<Option<IdentityProviderError>>,
	verify_calls: AtomicUsize,
	create_calls: AtomicUsize,
	delete_calls: AtomicUsize,
}

impl InMemoryIdentityProvider {
	pub fn new() -> Self {
		Self::default()
	}

	/// Accept `token` as a credential for `subject_id`.
	pub fn with_token(self, token: impl Into<String>, subject_id: impl Into<String>) -> Self {
		self.insert_token(token, subject_id);
		self
	}

	pub fn insert_token(&self, token: impl Into<String>, subject_id: impl Into<String>) {
		self.tokens.write().insert(token.into(), subject_id.into());
	}

	pub fn insert_identity(&self, identity: IdentityRecord) {
		self.identities.write().insert(identity.uid.clone(), identity);
	}

	pub fn identity(&self, uid: &str) -> Option<IdentityRecord> {
		self.identities.read().get(uid).cloned()
	}

	pub fn identity_count(&self) -> usize {
		self.identities.read().len()
	}

	/// Fail every later `create_identity` call with `error`.
	pub fn fail_creates_with(&self, error: IdentityProviderError) {
		*self.create_failure.write() = Some(error);
	}

	/// Fail every later `delete_identity` call with `error`.
	pub fn fail_deletes_with(&self, error: IdentityProviderError) {
		*self.delete_failure.write() = Some(error);
	}

	pub fn verify_calls(&self) -> usize {
		self.verify_calls.load(Ordering::SeqCst)
	}

	pub fn create_calls(&self) -> usize {
		self.create_calls.load(Ordering::SeqCst)
	}

	pub fn delete_calls(&self) -> usize {
		self.delete_calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
	async fn verify_token(
		&self,
		token: &SecretString,
	) -> Result<VerifiedToken, IdentityProviderError> {
		self.verify_calls.fetch_add(1, Ordering::SeqCst);
		self.tokens
			.read()
			.get(token.expose())
			.map(|subject_id| VerifiedToken::new(subject_id.clone()))
			.ok_or_else(|| IdentityProviderError::TokenRejected("unknown token".to_string()))
	}

	async fn create_identity(
		&self,
		identity: NewIdentity,
	) -> Result<IdentityRecord, IdentityProviderError> {
		self.create_calls.fetch_add(1, Ordering::SeqCst);
		if let Some(error) = self.create_failure.read().clone() {
			return Err(error);
		}

		let mut identities = self.identities.write();
		if let Some(existing) = identities.values().find(|i| i.email == identity.email) {
			return Err(IdentityProviderError::EmailAlreadyExists {
				email: identity.email,
				uid: Some(existing.uid.clone()),
			});
		}

		let record = IdentityRecord {
			uid: Uuid::new_v4().simple().to_string(),
			email: identity.email,
			email_verified: identity.email_verified,
			disabled: identity.disabled,
		};
		identities.insert(record.uid.clone(), record.clone());
		Ok(record)
	}

	async fn delete_identity(&self, uid: &str) -> Result<(), IdentityProviderError> {
		self.delete_calls.fetch_add(1, Ordering::SeqCst);
		if let Some(error) = self.delete_failure.read().clone() {
			return Err(error);
		}

		self.identities
			.write()
			.remove(uid)
			.map(|_| ())
			.ok_or_else(|| IdentityProviderError::IdentityNotFound(uid.to_string()))
	}
}

// =============================================================================
// User directory
// =============================================================================

#[derive(Debug, Default)]
pub struct InMemoryDirectory {
	collections: RwLock<HashMap<String, Vec<DirectoryRecord>>>,
	query_failure: RwLock<Option<DirectoryError>>,
	query_calls: AtomicUsize,
}

impl InMemoryDirectory {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert into the `users` collection.
	pub fn insert(&self, record: DirectoryRecord) {
		self.insert_into(USERS_COLLECTION, record);
	}

	pub fn insert_into(&self, collection: impl Into<String>, record: DirectoryRecord) {
		self.collections
			.write()
			.entry(collection.into())
			.or_default()
			.push(record);
	}

	pub fn fail_queries_with(&self, error: DirectoryError) {
		*self.query_failure.write() = Some(error);
	}

	pub fn query_calls(&self) -> usize {
		self.query_calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
	async fn query_by_field(
		&self,
		collection: &str,
		field: &str,
		value: &str,
	) -> Result<Vec<DirectoryRecord>, DirectoryError> {
		self.query_calls.fetch_add(1, Ordering::SeqCst);
		if let Some(error) = self.query_failure.read().clone() {
			return Err(error);
		}

		let collections = self.collections.read();
		let Some(records) = collections.get(collection) else {
			return Ok(Vec::new());
		};

		Ok(records
			.iter()
			.filter(|record| record.field(field) == Some(value))
			.cloned()
			.collect())
	}
}
