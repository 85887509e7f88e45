//! Long-lived credential bundle used to bootstrap access-token acquisition.

// self
use crate::{_prelude::*, auth::secret::TokenSecret};

/// Client id, client secret, and refresh token for the configured identity.
///
/// The bundle is owned by a [`CredentialSource`](crate::credentials::CredentialSource); the
/// broker loads it for every refresh and never caches it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: TokenSecret,
	/// Long-lived refresh token exchanged for access tokens.
	pub refresh_token: TokenSecret,
}
impl Credentials {
	/// Bundles the three secrets.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		refresh_token: impl Into<String>,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: TokenSecret::new(client_secret),
			refresh_token: TokenSecret::new(refresh_token),
		}
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("refresh_token", &"<redacted>")
			.finish()
	}
}
