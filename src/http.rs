//! Transport primitives for the token and quote-token exchanges.
//!
//! [`TokenHttpClient`] is the broker's only dependency on an HTTP stack. Requests and responses
//! use the `http` types re-exported by `oauth2`, so custom transports (proxies, recording
//! clients, test fakes) only need to turn an [`HttpRequest`] into an [`HttpResponse`].

// crates.io
use oauth2::{
	HttpClientError, HttpRequest, HttpResponse,
	http::header::{HeaderMap, RETRY_AFTER},
};
use time::format_description::well_known::Rfc2822;
// self
use crate::_prelude::*;

/// Boxed future returned by [`TokenHttpClient::execute`].
pub type HttpFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, HttpClientError<E>>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing the broker's upstream calls.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared by
/// cloned brokers, and the returned future must be `Send` so acquisitions can hop executors.
/// Non-success statuses are not errors at this layer; return the response and let the broker
/// classify it.
pub trait TokenHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Executes `request` and buffers the full response body.
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Timeouts and cancellation are whatever the wrapped client is configured with; the broker
/// adds none of its own. Token endpoints answer directly, so configure custom clients to not
/// follow redirects.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl TokenHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Reads a `Retry-After` header expressed either as delta-seconds or an HTTP date.
pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u32>() {
		return Some(Duration::seconds(i64::from(secs)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
