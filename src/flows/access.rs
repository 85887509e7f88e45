//! Access-token acquisition via the OAuth refresh-token grant.
//!
//! [`TokenBroker::acquire_access_token`] hands out the cached access token while it has more
//! than the access margin (60 seconds by default) of validity left. Otherwise it loads the
//! credential bundle, performs `grant_type=refresh_token` against the token endpoint, and
//! overwrites the `access` slot with `expires_in` (or the 900-second fallback). Failures leave
//! the previous entry in place and are never retried here.

// self
use crate::{
	_prelude::*,
	auth::{CachedToken, Credentials, TokenKind, TokenSecret},
	error::Endpoint,
	exchange::{self, AccessTokenResponse, TransportErrorMapper},
	flows::TokenBroker,
	http::TokenHttpClient,
};

impl<C, M> TokenBroker<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Returns a valid access token, refreshing only when the cached one is stale or
	/// `force_refresh` is set.
	pub async fn acquire_access_token(&self, force_refresh: bool) -> Result<TokenSecret> {
		const KIND: TokenKind = TokenKind::Access;

		let span = self.start(KIND, "acquire_access_token");
		let result = span
			.instrument(self.acquire_with(KIND, force_refresh, || self.refresh_access_token()))
			.await;

		self.finish(KIND, &span, result)
	}

	/// Performs the refresh-token grant without consulting or updating the cache.
	pub async fn request_access_token(
		&self,
		credentials: &Credentials,
	) -> Result<AccessTokenResponse> {
		const ENDPOINT: Endpoint = Endpoint::for_kind(TokenKind::Access);

		let request =
			exchange::refresh_grant_request(&self.descriptor.endpoints.token, credentials)?;
		let response = exchange::send(
			self.http_client.as_ref(),
			self.transport_mapper.as_ref(),
			ENDPOINT,
			request,
		)
		.await?;

		exchange::parse_body(ENDPOINT, response.body())
	}

	async fn refresh_access_token(&self) -> Result<CachedToken> {
		let credentials = self.credentials.load_credentials().await?;
		let response = self.request_access_token(&credentials).await?;
		let ttl = response.ttl(self.descriptor.policy.access_default_ttl)?;
		let record =
			self.store.put(TokenKind::Access, TokenSecret::new(response.access_token), ttl).await?;

		Ok(record)
	}
}
