//! Environment-variable-backed [`CredentialSource`].

// self
use crate::{
	_prelude::*,
	auth::Credentials,
	credentials::{
		CLIENT_ID, CLIENT_SECRET, CredentialFuture, CredentialSource, REFRESH_TOKEN,
		RawCredentials,
	},
};

/// Reads `CLIENT_ID`, `CLIENT_SECRET`, and `REFRESH_TOKEN` from the process environment.
///
/// An optional prefix is prepended verbatim, so `with_prefix("TASTY_")` reads
/// `TASTY_CLIENT_ID` and friends. Empty variables count as missing.
#[derive(Clone, Debug, Default)]
pub struct EnvCredentialSource {
	prefix: Option<String>,
}
impl EnvCredentialSource {
	/// Source reading the unprefixed variable names.
	pub fn new() -> Self {
		Self::default()
	}

	/// Source reading variables named `{prefix}CLIENT_ID` etc.
	pub fn with_prefix(prefix: impl Into<String>) -> Self {
		Self { prefix: Some(prefix.into()) }
	}

	/// Fully qualified variable names in `[client_id, client_secret, refresh_token]` order.
	pub fn variable_names(&self) -> [String; 3] {
		let prefix = self.prefix.as_deref().unwrap_or_default();

		[CLIENT_ID, CLIENT_SECRET, REFRESH_TOKEN].map(|name| format!("{prefix}{name}"))
	}

	pub(crate) fn load_with<F>(&self, lookup: F) -> Result<Credentials>
	where
		F: Fn(&str) -> Option<String>,
	{
		let [id, secret, refresh] = self.variable_names();
		let raw = RawCredentials {
			client_id: lookup(&id),
			client_secret: lookup(&secret),
			refresh_token: lookup(&refresh),
		};

		raw.into_credentials([id.as_str(), secret.as_str(), refresh.as_str()])
	}
}
impl CredentialSource for EnvCredentialSource {
	fn load_credentials(&self) -> CredentialFuture<'_> {
		Box::pin(async move { self.load_with(|name| std::env::var(name).ok()) })
	}
}
