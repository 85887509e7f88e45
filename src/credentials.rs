//! Credential source contracts and the built-in environment, file, and fixed sources.
//!
//! The broker never reads secrets from ambient state. A [`CredentialSource`] is injected at
//! construction time and consulted on every access-token refresh, so rotating the backing
//! secret takes effect on the next refresh without rebuilding the broker.

pub mod env;
pub mod file;
pub mod fixed;

pub use env::EnvCredentialSource;
pub use file::FileCredentialSource;
pub use fixed::FixedCredentialSource;

// self
use crate::{_prelude::*, auth::Credentials, error::ConfigError};

/// Boxed future returned by [`CredentialSource::load_credentials`].
pub type CredentialFuture<'a> = Pin<Box<dyn Future<Output = Result<Credentials>> + 'a + Send>>;

/// Supplies the long-lived secret bundle used to mint access tokens.
pub trait CredentialSource
where
	Self: Send + Sync,
{
	/// Loads the credential bundle, failing with [`ConfigError::MissingCredential`] when any
	/// required secret is absent.
	fn load_credentials(&self) -> CredentialFuture<'_>;
}

/// Secret names shared by the built-in sources.
pub const CLIENT_ID: &str = "CLIENT_ID";
/// Secret name for the OAuth client secret.
pub const CLIENT_SECRET: &str = "CLIENT_SECRET";
/// Secret name for the long-lived refresh token.
pub const REFRESH_TOKEN: &str = "REFRESH_TOKEN";

/// Raw, possibly incomplete secrets as read from a backing store.
#[derive(Clone, Default, Deserialize)]
pub(crate) struct RawCredentials {
	#[serde(default, alias = "CLIENT_ID")]
	pub(crate) client_id: Option<String>,
	#[serde(default, alias = "CLIENT_SECRET")]
	pub(crate) client_secret: Option<String>,
	#[serde(default, alias = "REFRESH_TOKEN")]
	pub(crate) refresh_token: Option<String>,
}
impl RawCredentials {
	/// Validates presence of every secret; `names` maps each field to its backing-store name.
	pub(crate) fn into_credentials(self, names: [&str; 3]) -> Result<Credentials> {
		let [id_name, secret_name, refresh_name] = names;
		let client_id = require(self.client_id, id_name)?;
		let client_secret = require(self.client_secret, secret_name)?;
		let refresh_token = require(self.refresh_token, refresh_name)?;

		Ok(Credentials::new(client_id, client_secret, refresh_token))
	}
}

fn require(value: Option<String>, name: &str) -> Result<String> {
	match value {
		Some(value) if !value.trim().is_empty() => Ok(value),
		_ => Err(ConfigError::missing_credential(name).into()),
	}
}
