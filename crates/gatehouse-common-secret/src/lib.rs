// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Redacting wrapper for bearer credentials.
//!
//! Identity tokens travel from the request body to the identity provider and
//! nowhere else. [`Secret<T>`] keeps them out of logs and error messages:
//!
//! - `Debug` and `Display` print `[REDACTED]`
//! - `Serialize` writes `"[REDACTED]"`
//! - the inner value is zeroized on drop
//! - reading the value requires an explicit `.expose()`
//!
//! ```
//! use gatehouse_common_secret::SecretString;
//!
//! let token = SecretString::new("eyJhbGciOi...".to_string());
//! assert_eq!(format!("{token}"), "[REDACTED]");
//! assert_eq!(token.expose(), "eyJhbGciOi...");
//! ```

use std::fmt;
use zeroize::Zeroize;

/// The placeholder written wherever a secret would otherwise be printed.
pub const REDACTED: &str = "[REDACTED]";

/// A value that must never be printed or serialized in the clear.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T>
where
	T: Zeroize,
{
	inner: T,
}

/// Secret strings, used for raw identity tokens.
pub type SecretString = Secret<String>;

impl<T> Secret<T>
where
	T: Zeroize,
{
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Access the inner value. Every call site is a place the secret leaves the wrapper.
	pub fn expose(&self) -> &T {
		&self.inner
	}
}

impl SecretString {
	/// True when the credential is empty or whitespace only.
	pub fn is_blank(&self) -> bool {
		self.inner.trim().is_empty()
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self::new(value.to_string())
	}
}

impl<T> Clone for Secret<T>
where
	T: Zeroize + Clone,
{
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T> fmt::Debug for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T> fmt::Display for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T> PartialEq for Secret<T>
where
	T: Zeroize + PartialEq,
{
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T> Eq for Secret<T> where T: Zeroize + Eq {}

#[cfg(feature = "serde")]
mod serde_impl {
	use super::{Secret, REDACTED};
	use serde::{Deserialize, Deserializer, Serialize, Serializer};
	use zeroize::Zeroize;

	impl<T> Serialize for Secret<T>
	where
		T: Serialize + Zeroize,
	{
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			serializer.serialize_str(REDACTED)
		}
	}

	impl<'de, T> Deserialize<'de> for Secret<T>
	where
		T: Deserialize<'de> + Zeroize,
	{
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			T::deserialize(deserializer).map(Secret::new)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn debug_and_display_are_redacted() {
		let token = SecretString::from("Bearer abc123");

		assert_eq!(format!("{token}"), REDACTED);
		assert_eq!(format!("{token:?}"), "Secret(\"[REDACTED]\")");
	}

	#[test]
	fn option_wrapped_token_is_redacted() {
		let token = Some(SecretString::from("abc123"));
		let debug = format!("{token:?}");

		assert!(debug.contains(REDACTED));
		assert!(!debug.contains("abc123"));
	}

	#[test]
	fn is_blank_detects_whitespace_only() {
		assert!(SecretString::from("").is_blank());
		assert!(SecretString::from("  \t ").is_blank());
		assert!(!SecretString::from(" abc ").is_blank());
	}

	#[cfg(feature = "serde")]
	mod serde_tests {
		use super::*;

		#[test]
		fn serialize_is_redacted() {
			let token = SecretString::from("abc123");
			let json = serde_json::to_string(&token).unwrap();

			assert_eq!(json, "\"[REDACTED]\"");
		}

		#[test]
		fn deserialize_keeps_value() {
			let token: SecretString = serde_json::from_str("\"abc123\"").unwrap();
			assert_eq!(token.expose(), "abc123");
		}
	}

	proptest! {
		#[test]
		fn display_never_leaks(inner in "[a-zA-Z0-9._-]{3,64}") {
			prop_assume!(!"Secret(\"[REDACTED]\")".contains(&inner));

			let token = SecretString::new(inner.clone());
			let displayed = format!("{}", token);
			let debugged = format!("{:?}", token);
			prop_assert!(!displayed.contains(&inner));
			prop_assert!(!debugged.contains(&inner));
		}
	}
}
