//! Streamer-token acquisition via the quote-token endpoint.
//!
//! A streamer refresh needs a valid access token; when the caller does not supply one it is
//! resolved through [`TokenBroker::acquire_access_token`] (never forced), so a streamer refresh
//! can transparently refresh the access token but never the reverse. The quote-token endpoint
//! declares no expiry, so the `streamer` slot always gets the policy's fixed lifetime
//! (20 hours by default) regardless of what the body contains.

// self
use crate::{
	_prelude::*,
	auth::{CachedToken, TokenKind, TokenSecret},
	error::Endpoint,
	exchange::{self, StreamerTokenResponse, TransportErrorMapper},
	flows::TokenBroker,
	http::TokenHttpClient,
};

impl<C, M> TokenBroker<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Returns a valid streamer token, refreshing only when the cached one is stale or
	/// `force_refresh` is set.
	///
	/// A supplied `access_token` is used verbatim for the refresh; `None` resolves one through
	/// the access-token cache.
	pub async fn acquire_streamer_token(
		&self,
		access_token: Option<&str>,
		force_refresh: bool,
	) -> Result<TokenSecret> {
		const KIND: TokenKind = TokenKind::Streamer;

		let span = self.start(KIND, "acquire_streamer_token");
		let result = span
			.instrument(
				self.acquire_with(KIND, force_refresh, || self.refresh_streamer_token(access_token)),
			)
			.await;

		self.finish(KIND, &span, result)
	}

	/// Zero-argument entry point for dashboards and feed clients: always valid on return.
	pub async fn ensure_streamer_token(&self) -> Result<TokenSecret> {
		self.acquire_streamer_token(None, false).await
	}

	/// Calls the quote-token endpoint without consulting or updating the cache.
	pub async fn request_streamer_token(&self, access_token: &str) -> Result<StreamerTokenResponse> {
		const ENDPOINT: Endpoint = Endpoint::for_kind(TokenKind::Streamer);

		let request =
			exchange::quote_token_request(&self.descriptor.endpoints.quote_token, access_token)?;
		let response = exchange::send(
			self.http_client.as_ref(),
			self.transport_mapper.as_ref(),
			ENDPOINT,
			request,
		)
		.await?;

		exchange::parse_body(ENDPOINT, response.body())
	}

	async fn refresh_streamer_token(&self, access_token: Option<&str>) -> Result<CachedToken> {
		let access = match access_token {
			Some(token) => TokenSecret::new(token),
			None => self.acquire_access_token(false).await?,
		};
		let response = self.request_streamer_token(access.expose()).await?;
		let ttl = self.descriptor.policy.streamer_ttl;
		let record =
			self.store.put(TokenKind::Streamer, TokenSecret::new(response.data.token), ttl).await?;

		Ok(record)
	}
}
