#![cfg(all(feature = "reqwest", feature = "test"))]

// crates.io
use httpmock::prelude::*;
// self
use quote_token_broker::{
	_preludet::*,
	auth::{CachedToken, TokenKind, TokenSecret},
	descriptor::BrokerageDescriptor,
	error::{Endpoint, TokenExchangeError},
	store::{MemoryStore, TokenStore},
};

const CLIENT_ID: &str = "c1";
const CLIENT_SECRET: &str = "s1";
const REFRESH_TOKEN: &str = "r1";
const GRANT_BODY: &str = "grant_type=refresh_token&refresh_token=r1&client_id=c1&client_secret=s1";

fn build_descriptor(server: &MockServer) -> BrokerageDescriptor {
	BrokerageDescriptor::builder()
		.token_endpoint(
			Url::parse(&server.url("/oauth/token"))
				.expect("Mock token endpoint should parse successfully."),
		)
		.quote_token_endpoint(
			Url::parse(&server.url("/api-quote-tokens"))
				.expect("Mock quote-token endpoint should parse successfully."),
		)
		.build()
		.expect("Brokerage descriptor should build successfully.")
}

async fn seed(store: &MemoryStore, kind: TokenKind, value: &str, ttl_secs: i64) {
	store
		.put(kind, TokenSecret::new(value), Duration::seconds(ttl_secs))
		.await
		.expect("Failed to seed token into the store.");
}

async fn cached(store: &MemoryStore, kind: TokenKind) -> CachedToken {
	store
		.get(kind)
		.await
		.expect("Token store read should succeed.")
		.expect("Token slot should be populated.")
}

#[tokio::test]
async fn cold_cache_resolves_access_then_streamer_once() {
	let server = MockServer::start_async().await;
	let (broker, store) = build_reqwest_test_broker(
		build_descriptor(&server),
		CLIENT_ID,
		CLIENT_SECRET,
		REFRESH_TOKEN,
	);
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token").body(GRANT_BODY);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"AT1\",\"expires_in\":900}");
		})
		.await;
	let quote_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api-quote-tokens").header("authorization", "Bearer AT1");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"data\":{\"token\":\"ST1\"}}");
		})
		.await;
	let first = broker.ensure_streamer_token().await.expect("Cold acquisition should succeed.");
	let second = broker.ensure_streamer_token().await.expect("Warm acquisition should succeed.");

	assert_eq!(first.expose(), "ST1");
	assert_eq!(second.expose(), "ST1");

	token_mock.assert_calls_async(1).await;
	quote_mock.assert_calls_async(1).await;

	assert_eq!(cached(&store, TokenKind::Access).await.value.expose(), "AT1");
	assert_eq!(broker.refresh_metrics(TokenKind::Streamer).refreshes(), 1);
	assert_eq!(broker.refresh_metrics(TokenKind::Streamer).cache_hits(), 1);
}

#[tokio::test]
async fn fresh_streamer_beyond_margin_skips_network() {
	let server = MockServer::start_async().await;
	let (broker, store) = build_reqwest_test_broker(
		build_descriptor(&server),
		CLIENT_ID,
		CLIENT_SECRET,
		REFRESH_TOKEN,
	);
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).body("{\"access_token\":\"AT1\"}");
		})
		.await;
	let quote_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api-quote-tokens");
			then.status(200).body("{\"data\":{\"token\":\"ST-new\"}}");
		})
		.await;

	seed(&store, TokenKind::Streamer, "ST-cached", 301).await;

	let token = broker.ensure_streamer_token().await.expect("Cached token should be reused.");

	assert_eq!(token.expose(), "ST-cached");

	token_mock.assert_calls_async(0).await;
	quote_mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn streamer_inside_margin_is_refreshed_with_cached_access() {
	let server = MockServer::start_async().await;
	let (broker, store) = build_reqwest_test_broker(
		build_descriptor(&server),
		CLIENT_ID,
		CLIENT_SECRET,
		REFRESH_TOKEN,
	);
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).body("{\"access_token\":\"AT-unused\"}");
		})
		.await;
	let quote_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api-quote-tokens").header("authorization", "Bearer AT-cached");
			then.status(200).body("{\"data\":{\"token\":\"ST-new\"}}");
		})
		.await;

	seed(&store, TokenKind::Access, "AT-cached", 900).await;
	seed(&store, TokenKind::Streamer, "ST-stale", 299).await;

	let token = broker.ensure_streamer_token().await.expect("Stale streamer should refresh.");

	assert_eq!(token.expose(), "ST-new");

	token_mock.assert_calls_async(0).await;
	quote_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn streamer_lifetime_is_fixed_regardless_of_body() {
	let server = MockServer::start_async().await;
	let (broker, store) = build_reqwest_test_broker(
		build_descriptor(&server),
		CLIENT_ID,
		CLIENT_SECRET,
		REFRESH_TOKEN,
	);
	let _quote_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api-quote-tokens");
			then.status(200).header("content-type", "application/json").body(
				"{\"data\":{\"token\":\"ST1\",\"expires-in\":60,\"dxlink-url\":\"wss://feed.example\",\"level\":\"api\"}}",
			);
		})
		.await;
	let before = OffsetDateTime::now_utc();

	broker
		.acquire_streamer_token(Some("AT-supplied"), false)
		.await
		.expect("Streamer acquisition should succeed.");

	let after = OffsetDateTime::now_utc();
	let record = cached(&store, TokenKind::Streamer).await;

	assert_eq!(record.expires_at - record.issued_at, Duration::seconds(72_000));
	assert!(record.expires_at >= before + Duration::seconds(72_000));
	assert!(record.expires_at <= after + Duration::seconds(72_000));
}

#[tokio::test]
async fn supplied_access_token_is_used_verbatim() {
	let server = MockServer::start_async().await;
	let (broker, store) = build_reqwest_test_broker(
		build_descriptor(&server),
		CLIENT_ID,
		CLIENT_SECRET,
		REFRESH_TOKEN,
	);
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).body("{\"access_token\":\"AT-unused\"}");
		})
		.await;
	let quote_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api-quote-tokens")
				.header("authorization", "Bearer AT-supplied");
			then.status(200).body("{\"data\":{\"token\":\"ST1\"}}");
		})
		.await;
	let token = broker
		.acquire_streamer_token(Some("AT-supplied"), false)
		.await
		.expect("Streamer acquisition with a supplied access token should succeed.");

	assert_eq!(token.expose(), "ST1");

	token_mock.assert_calls_async(0).await;
	quote_mock.assert_calls_async(1).await;

	assert!(store.get(TokenKind::Access).await.expect("Read should succeed.").is_none());
}

#[tokio::test]
async fn forced_streamer_refresh_bypasses_fresh_cache() {
	let server = MockServer::start_async().await;
	let (broker, store) = build_reqwest_test_broker(
		build_descriptor(&server),
		CLIENT_ID,
		CLIENT_SECRET,
		REFRESH_TOKEN,
	);
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).body("{\"access_token\":\"AT-unused\"}");
		})
		.await;
	let quote_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api-quote-tokens").header("authorization", "Bearer AT-fresh");
			then.status(200).body("{\"data\":{\"token\":\"ST-forced\"}}");
		})
		.await;

	seed(&store, TokenKind::Access, "AT-fresh", 900).await;
	seed(&store, TokenKind::Streamer, "ST-fresh", 72_000).await;

	let token = broker
		.acquire_streamer_token(None, true)
		.await
		.expect("Forced streamer refresh should succeed.");

	assert_eq!(token.expose(), "ST-forced");
	assert_eq!(cached(&store, TokenKind::Streamer).await.value.expose(), "ST-forced");

	token_mock.assert_calls_async(0).await;
	quote_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn failed_streamer_refresh_preserves_stale_entry() {
	let server = MockServer::start_async().await;
	let (broker, store) = build_reqwest_test_broker(
		build_descriptor(&server),
		CLIENT_ID,
		CLIENT_SECRET,
		REFRESH_TOKEN,
	);
	let _quote_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api-quote-tokens");
			then.status(503).header("retry-after", "7").body("maintenance");
		})
		.await;

	seed(&store, TokenKind::Access, "AT-fresh", 900).await;
	seed(&store, TokenKind::Streamer, "ST-stale", 10).await;

	let err = broker
		.ensure_streamer_token()
		.await
		.expect_err("Upstream outage should surface to the caller.");

	match &err {
		Error::TokenExchange(TokenExchangeError { endpoint, status, body, retry_after }) => {
			assert_eq!(*endpoint, Endpoint::QuoteToken);
			assert_eq!(*status, 503);
			assert_eq!(body, "maintenance");
			assert_eq!(*retry_after, Some(Duration::seconds(7)));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert!(err.is_retryable());
	assert_eq!(cached(&store, TokenKind::Streamer).await.value.expose(), "ST-stale");
	assert_eq!(broker.refresh_metrics(TokenKind::Streamer).failures(), 1);
}

#[tokio::test]
async fn access_failure_propagates_through_streamer() {
	let server = MockServer::start_async().await;
	let (broker, store) = build_reqwest_test_broker(
		build_descriptor(&server),
		CLIENT_ID,
		CLIENT_SECRET,
		REFRESH_TOKEN,
	);
	let _token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(400).body("{\"error\":\"invalid_grant\"}");
		})
		.await;
	let quote_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api-quote-tokens");
			then.status(200).body("{\"data\":{\"token\":\"ST1\"}}");
		})
		.await;
	let err = broker
		.ensure_streamer_token()
		.await
		.expect_err("Access failure should fail the streamer acquisition.");

	assert!(matches!(
		err,
		Error::TokenExchange(TokenExchangeError { endpoint: Endpoint::OAuthToken, status: 400, .. })
	));

	quote_mock.assert_calls_async(0).await;

	assert!(store.get(TokenKind::Streamer).await.expect("Read should succeed.").is_none());
}

#[tokio::test]
async fn concurrent_cold_acquisitions_hit_each_endpoint_once() {
	let server = MockServer::start_async().await;
	let (broker, _store) = build_reqwest_test_broker(
		build_descriptor(&server),
		CLIENT_ID,
		CLIENT_SECRET,
		REFRESH_TOKEN,
	);
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"AT1\",\"expires_in\":900}");
		})
		.await;
	let quote_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api-quote-tokens");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"data\":{\"token\":\"ST1\"}}");
		})
		.await;
	let (first, second, third) = tokio::join!(
		broker.ensure_streamer_token(),
		broker.ensure_streamer_token(),
		broker.ensure_streamer_token(),
	);

	for token in [first, second, third] {
		assert_eq!(token.expect("Concurrent acquisition should succeed.").expose(), "ST1");
	}

	token_mock.assert_calls_async(1).await;
	quote_mock.assert_calls_async(1).await;
}
