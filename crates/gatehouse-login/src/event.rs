// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Directory change events.
//!
//! A deletion arrives as a change event whose `oldValue` holds the record as
//! it was before removal:
//!
//! ```json
//! {
//!   "oldValue": {
//!     "name": "projects/p/databases/(default)/documents/users/doc-1",
//!     "fields": { "login_uid": { "stringValue": "U9" } },
//!     "createTime": "2025-01-01T00:00:00Z",
//!     "updateTime": "2025-01-02T00:00:00Z"
//!   },
//!   "value": {},
//!   "updateMask": { "fieldPaths": [] }
//! }
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::LoginError;
use crate::provider::LOGIN_UID_FIELD;
use crate::types::DeletionTrigger;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
	#[serde(default)]
	pub old_value: Option<DocumentSnapshot>,
	#[serde(default)]
	pub value: Option<DocumentSnapshot>,
	#[serde(default)]
	pub update_mask: Option<UpdateMask>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub fields: HashMap<String, FieldValue>,
	#[serde(default)]
	pub create_time: Option<DateTime<Utc>>,
	#[serde(default)]
	pub update_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMask {
	#[serde(default)]
	pub field_paths: Vec<String>,
}

/// A typed field value. At most one member is set.
///
/// Only `stringValue` is read; every other member is kept raw under its wire
/// name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub string_value: Option<String>,
	#[serde(flatten)]
	pub other: serde_json::Map<String, serde_json::Value>,
}

impl FieldValue {
	pub fn as_str(&self) -> Option<&str> {
		self.string_value.as_deref()
	}

	/// True for `nullValue` or a value with no member set.
	pub fn is_null(&self) -> bool {
		self.string_value.is_none() && self.other.keys().all(|member| member == "nullValue")
	}
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<HashMap<String, FieldValue>, D::Error>
where
	D: Deserializer<'de>,
{
	Option::<HashMap<String, FieldValue>>::deserialize(deserializer)
		.map(Option::unwrap_or_default)
}

impl DocumentSnapshot {
	/// Trailing segment of the resource name, i.e. the document id.
	pub fn document_id(&self) -> Option<&str> {
		self.name
			.as_deref()
			.and_then(|name| name.rsplit('/').next())
			.filter(|id| !id.is_empty())
	}

	pub fn field(&self, name: &str) -> Option<&FieldValue> {
		self.fields.get(name)
	}
}

impl ChangeEvent {
	pub fn from_slice(body: &[u8]) -> Result<Self, LoginError> {
		serde_json::from_slice(body).map_err(|e| LoginError::MalformedInput(e.to_string()))
	}

	/// Extract the login uid of the deleted record.
	///
	/// A missing or null `login_uid` is valid and yields an empty trigger. A
	/// missing `oldValue`, or a `login_uid` of any other type, is malformed.
	pub fn deletion_trigger(&self) -> Result<DeletionTrigger, LoginError> {
		let old = self
			.old_value
			.as_ref()
			.ok_or_else(|| LoginError::MalformedInput("event has no oldValue".to_string()))?;

		let login_uid = match old.field(LOGIN_UID_FIELD) {
			None => None,
			Some(value) => match value.as_str() {
				Some(uid) => Some(uid.to_string()),
				None if value.is_null() => None,
				None => {
					return Err(LoginError::MalformedInput(format!(
						"{LOGIN_UID_FIELD} is not a string value"
					)))
				}
			},
		};

		Ok(DeletionTrigger::new(login_uid))
	}
}
