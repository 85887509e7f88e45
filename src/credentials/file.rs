//! JSON-file-backed [`CredentialSource`].

// std
use std::{
	fs,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::Credentials,
	credentials::{
		CLIENT_ID, CLIENT_SECRET, CredentialFuture, CredentialSource, REFRESH_TOKEN,
		RawCredentials,
	},
	error::ConfigError,
};

/// Reads `{client_id, client_secret, refresh_token}` from a JSON document on every load.
///
/// Upper-case keys (`CLIENT_ID`, ...) are accepted as aliases so secret files exported from
/// other tooling can be used unchanged.
#[derive(Clone, Debug)]
pub struct FileCredentialSource {
	path: PathBuf,
}
impl FileCredentialSource {
	/// Creates a source reading the provided path.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// Path of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_now(&self) -> Result<Credentials> {
		let bytes = fs::read(&self.path).map_err(|e| ConfigError::CredentialFile {
			path: self.path.display().to_string(),
			source: Box::new(e),
		})?;
		let raw: RawCredentials =
			serde_json::from_slice(&bytes).map_err(|e| ConfigError::CredentialFile {
				path: self.path.display().to_string(),
				source: Box::new(e),
			})?;

		raw.into_credentials([CLIENT_ID, CLIENT_SECRET, REFRESH_TOKEN])
	}
}
impl CredentialSource for FileCredentialSource {
	fn load_credentials(&self) -> CredentialFuture<'_> {
		Box::pin(async move { self.load_now() })
	}
}
