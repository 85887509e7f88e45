//! Access-token and quote-streamer-token lifecycle manager for brokerage APIs: one cached slot
//! per token kind, explicit freshness margins, and single-flight refreshes against the OAuth
//! and quote-token endpoints.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod credentials;
pub mod descriptor;
pub mod error;
pub mod exchange;
pub mod flows;
pub mod http;
pub mod obs;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Credentials,
		credentials::{CredentialSource, FixedCredentialSource},
		descriptor::BrokerageDescriptor,
		exchange::ReqwestTransportErrorMapper,
		flows::TokenBroker,
		http::ReqwestHttpClient,
		store::{MemoryStore, TokenStore},
	};

	/// Broker type alias used by reqwest-backed integration tests.
	pub type ReqwestTestBroker = TokenBroker<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`TokenBroker`] backed by an in-memory store, fixed credentials, and the
	/// reqwest transport used across integration tests.
	pub fn build_reqwest_test_broker(
		descriptor: BrokerageDescriptor,
		client_id: &str,
		client_secret: &str,
		refresh_token: &str,
	) -> (ReqwestTestBroker, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn TokenStore> = store_backend.clone();
		let credentials: Arc<dyn CredentialSource> = Arc::new(FixedCredentialSource::new(
			Credentials::new(client_id, client_secret, refresh_token),
		));
		let http_client = test_reqwest_http_client();
		let mapper = Arc::new(ReqwestTransportErrorMapper);
		let broker =
			TokenBroker::with_http_client(store, credentials, descriptor, http_client, mapper);

		(broker, store_backend)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)]
use {
	color_eyre as _, httpmock as _, tempfile as _, tokio as _, tracing_subscriber as _,
};
