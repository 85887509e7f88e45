//! Secure token secret wrapper that redacts sensitive material.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

const FINGERPRINT_LEN: usize = 12;

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when the wrapped value is empty or whitespace.
	pub fn is_blank(&self) -> bool {
		self.0.trim().is_empty()
	}

	/// Short, log-safe digest of the secret.
	///
	/// The fingerprint is the first characters of a base64 (no padding) SHA-256 digest, enough to
	/// tell rotations apart without revealing the value.
	pub fn fingerprint(&self) -> String {
		let digest = Sha256::digest(self.0.as_bytes());
		let mut encoded = STANDARD_NO_PAD.encode(digest);

		encoded.truncate(FINGERPRINT_LEN);

		encoded
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl From<String> for TokenSecret {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl From<&str> for TokenSecret {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn fingerprint_is_stable_and_short() {
		let a = TokenSecret::new("AT1");
		let b = TokenSecret::new("AT1");
		let c = TokenSecret::new("AT2");

		assert_eq!(a.fingerprint(), b.fingerprint());
		assert_ne!(a.fingerprint(), c.fingerprint());
		assert_eq!(a.fingerprint().len(), FINGERPRINT_LEN);
		assert!(!a.fingerprint().contains("AT1"));
	}

	#[test]
	fn blank_detection_trims_whitespace() {
		assert!(TokenSecret::new("  ").is_blank());
		assert!(!TokenSecret::new("r1").is_blank());
	}
}
