//! Broker-level error types shared across flows, credential sources, and stores.

// self
use crate::{_prelude::*, auth::TokenKind};

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem (missing secrets, invalid endpoints).
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Upstream endpoint answered with a non-success status.
	#[error(transparent)]
	TokenExchange(#[from] TokenExchangeError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Upstream answered successfully but the body lacks a required field.
	#[error("The {endpoint} endpoint returned a malformed response.")]
	MalformedResponse {
		/// Endpoint that produced the body.
		endpoint: Endpoint,
		/// Structured parsing failure, including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl Error {
	/// Returns `true` when the failure may succeed on a later attempt.
	///
	/// The broker never retries internally; callers use this to drive their own policy.
	pub fn is_retryable(&self) -> bool {
		match self {
			Self::TokenExchange(e) => e.is_retryable(),
			Self::Transport(_) => true,
			Self::Storage(_) | Self::Config(_) | Self::MalformedResponse { .. } => false,
		}
	}
}

/// Upstream endpoints contacted by the broker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
	/// OAuth token endpoint serving the refresh-token grant.
	OAuthToken,
	/// Quote-token endpoint minting streamer tokens.
	QuoteToken,
}
impl Endpoint {
	/// Returns a stable label suitable for messages and metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::OAuthToken => "oauth_token",
			Endpoint::QuoteToken => "quote_token",
		}
	}

	/// Endpoint that mints tokens of the provided kind.
	pub const fn for_kind(kind: TokenKind) -> Self {
		match kind {
			TokenKind::Access => Endpoint::OAuthToken,
			TokenKind::Streamer => Endpoint::QuoteToken,
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Configuration and validation failures raised by the broker.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required secret is absent from the credential source.
	#[error("Missing required secret `{name}`.")]
	MissingCredential {
		/// Name of the missing secret as the source knows it.
		name: String,
	},
	/// Credential file could not be read or parsed.
	#[error("Credential file {path} could not be loaded.")]
	CredentialFile {
		/// Path of the credential file.
		path: String,
		/// Underlying IO or parsing failure.
		#[source]
		source: BoxError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Descriptor or descriptor input failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::descriptor::DescriptorError),
	/// Token endpoint returned an `expires_in` the broker cannot represent.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Builds a [`ConfigError::MissingCredential`] for the provided secret name.
	pub fn missing_credential(name: impl Into<String>) -> Self {
		Self::MissingCredential { name: name.into() }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Non-success response returned by one of the upstream endpoints.
#[derive(Debug, ThisError)]
#[error("The {endpoint} endpoint returned HTTP {status}: {body}")]
pub struct TokenExchangeError {
	/// Endpoint that rejected the request.
	pub endpoint: Endpoint,
	/// HTTP status code.
	pub status: u16,
	/// Raw upstream body, kept verbatim for diagnostics.
	pub body: String,
	/// Retry-After hint from upstream, if supplied.
	pub retry_after: Option<Duration>,
}
impl TokenExchangeError {
	/// Returns `true` for throttling and server-side failures.
	pub fn is_retryable(&self) -> bool {
		self.status == 429 || self.status >= 500 || self.retry_after.is_some()
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint being called.
		endpoint: Endpoint,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request timed out before a response arrived.
	#[error("Request timed out while calling the {endpoint} endpoint.")]
	Timeout {
		/// Endpoint being called.
		endpoint: Endpoint,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the upstream endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(endpoint: Endpoint, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}
}
