//! Token lifecycle manager: cached, single-flight acquisition of access and streamer tokens.

pub mod access;
pub mod common;
pub mod metrics;
pub mod streamer;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::TokenKind,
	credentials::CredentialSource,
	descriptor::BrokerageDescriptor,
	exchange::TransportErrorMapper,
	http::TokenHttpClient,
	store::TokenStore,
};
#[cfg(feature = "reqwest")]
use crate::{exchange::ReqwestTransportErrorMapper, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Broker specialized for the crate's default reqwest transport stack.
pub type ReqwestTokenBroker = TokenBroker<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Decides, per token kind, whether a cached value may be used and refreshes it when not.
///
/// The broker owns the HTTP client, the injected token cache, the credential source, and the
/// descriptor. Clones share all of them, including the per-kind single-flight guards, so a
/// clone handed to another task still collapses concurrent refreshes into one upstream call.
#[derive(Clone)]
pub struct TokenBroker<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Single-slot-per-kind token cache.
	pub store: Arc<dyn TokenStore>,
	/// Source of the long-lived secret bundle.
	pub credentials: Arc<dyn CredentialSource>,
	/// Endpoints and freshness policy.
	pub descriptor: BrokerageDescriptor,
	metrics: Arc<[RefreshMetrics; 2]>,
	flow_guards: Arc<[AsyncMutex<()>; 2]>,
}
impl<C, M> TokenBroker<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a broker that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		store: Arc<dyn TokenStore>,
		credentials: Arc<dyn CredentialSource>,
		descriptor: BrokerageDescriptor,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			store,
			credentials,
			descriptor,
			metrics: Default::default(),
			flow_guards: Default::default(),
		}
	}

	/// Counters for acquisitions of `kind`.
	pub fn refresh_metrics(&self, kind: TokenKind) -> &RefreshMetrics {
		&self.metrics[kind.slot()]
	}
}
#[cfg(feature = "reqwest")]
impl TokenBroker<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a broker with its own default reqwest transport.
	pub fn new(
		store: Arc<dyn TokenStore>,
		credentials: Arc<dyn CredentialSource>,
		descriptor: BrokerageDescriptor,
	) -> Self {
		Self::with_http_client(
			store,
			credentials,
			descriptor,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> Debug for TokenBroker<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenBroker")
			.field("descriptor", &self.descriptor)
			.field("access_metrics", self.refresh_metrics(TokenKind::Access))
			.field("streamer_metrics", self.refresh_metrics(TokenKind::Streamer))
			.finish()
	}
}
