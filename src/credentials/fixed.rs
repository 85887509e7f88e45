//! [`CredentialSource`] over an already-resolved bundle.

// self
use crate::{
	_prelude::*,
	auth::Credentials,
	credentials::{CredentialFuture, CredentialSource},
};

/// Hands out a bundle resolved elsewhere (a vault client at startup, tests, demos).
#[derive(Clone, Debug)]
pub struct FixedCredentialSource(Credentials);
impl FixedCredentialSource {
	/// Wraps the provided bundle.
	pub fn new(credentials: Credentials) -> Self {
		Self(credentials)
	}
}
impl CredentialSource for FixedCredentialSource {
	fn load_credentials(&self) -> CredentialFuture<'_> {
		let credentials = self.0.clone();

		Box::pin(async move { Ok(credentials) })
	}
}
