//! Wire protocol for the two upstream exchanges.
//!
//! - OAuth token endpoint: `POST` form `grant_type=refresh_token&refresh_token=..&client_id=..
//!   &client_secret=..`, answering `{"access_token": "..", "expires_in": 900}`.
//! - Quote-token endpoint: `GET` with `Authorization: Bearer <access>`, answering
//!   `{"data": {"token": "..", "dxlink-url": "..", "level": ".."}}`.
//!
//! Any non-2xx status becomes a [`TokenExchangeError`] carrying the body verbatim. Success
//! bodies are decoded with `serde_path_to_error` so a missing field reports its path.

pub use oauth2;

// crates.io
use oauth2::{
	HttpClientError, HttpRequest, HttpResponse,
	http::{
		Method,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
use serde::de::DeserializeOwned;
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::Credentials,
	error::{ConfigError, Endpoint, TokenExchangeError, TransportError},
	http::{self, TokenHttpClient},
};

const MIME_JSON: &str = "application/json";
const MIME_FORM: &str = "application/x-www-form-urlencoded";

/// Maps HTTP transport failures into broker [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a broker error.
	fn map_transport_error(&self, endpoint: Endpoint, error: HttpClientError<E>) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, endpoint: Endpoint, err: HttpClientError<ReqwestError>) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(endpoint, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) =>
				TransportError::network(endpoint, OtherTransportError(message)).into(),
			_ => TransportError::network(
				endpoint,
				OtherTransportError("Unrecognized HTTP client error.".into()),
			)
			.into(),
		}
	}
}

/// Free-form transport failure reported by an HTTP client.
#[derive(Debug, ThisError)]
#[error("{0}")]
pub struct OtherTransportError(pub String);

/// Successful OAuth token endpoint body.
#[derive(Clone, Deserialize)]
pub struct AccessTokenResponse {
	/// Newly minted access token.
	pub access_token: String,
	/// Declared validity in seconds, when upstream supplies one.
	#[serde(default)]
	pub expires_in: Option<u64>,
}
impl AccessTokenResponse {
	/// Declared lifetime, or `fallback` when `expires_in` is absent.
	///
	/// Lifetimes whose expiry instant cannot be represented are rejected.
	pub fn ttl(&self, fallback: Duration) -> Result<Duration> {
		let Some(secs) = self.expires_in else { return Ok(fallback) };
		let ttl = i64::try_from(secs)
			.map(Duration::seconds)
			.map_err(|_| ConfigError::ExpiresInOutOfRange)?;

		match OffsetDateTime::now_utc().checked_add(ttl) {
			Some(_) => Ok(ttl),
			None => Err(ConfigError::ExpiresInOutOfRange.into()),
		}
	}
}
impl Debug for AccessTokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessTokenResponse")
			.field("access_token", &"<redacted>")
			.field("expires_in", &self.expires_in)
			.finish()
	}
}

/// Successful quote-token endpoint body.
#[derive(Clone, Debug, Deserialize)]
pub struct StreamerTokenResponse {
	/// Payload envelope.
	pub data: StreamerTokenData,
}

/// Quote-token payload.
#[derive(Clone, Deserialize)]
pub struct StreamerTokenData {
	/// Streamer token authorizing the quote-feed connection.
	pub token: String,
	/// Websocket URL of the quote feed, when advertised.
	#[serde(default, rename = "dxlink-url")]
	pub dxlink_url: Option<String>,
	/// Market-data entitlement level, when advertised.
	#[serde(default)]
	pub level: Option<String>,
}
impl Debug for StreamerTokenData {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StreamerTokenData")
			.field("token", &"<redacted>")
			.field("dxlink_url", &self.dxlink_url)
			.field("level", &self.level)
			.finish()
	}
}

/// Builds the refresh-token grant request.
pub(crate) fn refresh_grant_request(
	endpoint: &Url,
	credentials: &Credentials,
) -> Result<HttpRequest> {
	let body = form_urlencoded::Serializer::new(String::new())
		.append_pair("grant_type", "refresh_token")
		.append_pair("refresh_token", credentials.refresh_token.expose())
		.append_pair("client_id", &credentials.client_id)
		.append_pair("client_secret", credentials.client_secret.expose())
		.finish();

	oauth2::http::Request::builder()
		.method(Method::POST)
		.uri(endpoint.as_str())
		.header(CONTENT_TYPE, MIME_FORM)
		.header(ACCEPT, MIME_JSON)
		.body(body.into_bytes())
		.map_err(|e| ConfigError::from(e).into())
}

/// Builds the bearer-authenticated quote-token request.
pub(crate) fn quote_token_request(endpoint: &Url, access_token: &str) -> Result<HttpRequest> {
	oauth2::http::Request::builder()
		.method(Method::GET)
		.uri(endpoint.as_str())
		.header(AUTHORIZATION, format!("Bearer {access_token}"))
		.header(ACCEPT, MIME_JSON)
		.body(Vec::new())
		.map_err(|e| ConfigError::from(e).into())
}

/// Executes `request`, mapping transport failures and non-success statuses.
pub(crate) async fn send<C, M>(
	http_client: &C,
	mapper: &M,
	endpoint: Endpoint,
	request: HttpRequest,
) -> Result<HttpResponse>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let response = http_client
		.execute(request)
		.await
		.map_err(|err| mapper.map_transport_error(endpoint, err))?;

	if !response.status().is_success() {
		return Err(TokenExchangeError {
			endpoint,
			status: response.status().as_u16(),
			body: String::from_utf8_lossy(response.body()).into_owned(),
			retry_after: http::parse_retry_after(response.headers()),
		}
		.into());
	}

	Ok(response)
}

/// Decodes a success body, reporting the failing path on error.
pub(crate) fn parse_body<T>(endpoint: Endpoint, body: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| Error::MalformedResponse { endpoint, source })
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(endpoint: Endpoint, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransportError::Timeout { endpoint }.into();
	}

	TransportError::network(endpoint, err).into()
}
