//! Shared helpers for acquisition flows (freshness checks, guards, outcome bookkeeping).

// self
use crate::{
	_prelude::*,
	auth::{CachedToken, TokenKind, TokenSecret},
	exchange::TransportErrorMapper,
	flows::TokenBroker,
	http::TokenHttpClient,
	obs::{self, FlowOutcome, FlowSpan},
};

/// How an acquisition was satisfied.
#[derive(Debug)]
pub(crate) enum Acquisition {
	Cached(TokenSecret),
	Refreshed(CachedToken),
}

impl<C, M> TokenBroker<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Returns the cached value for `kind` when it is fresh under the kind's margin.
	pub(crate) async fn fresh_cached(&self, kind: TokenKind) -> Result<Option<TokenSecret>> {
		let margin = self.descriptor.margin(kind);
		let now = OffsetDateTime::now_utc();
		let cached = self.store.get(kind).await?;

		Ok(cached.filter(|record| record.is_fresh_at(now, margin)).map(|record| record.value))
	}

	async fn reusable(&self, kind: TokenKind, force_refresh: bool) -> Result<Option<TokenSecret>> {
		if force_refresh { Ok(None) } else { self.fresh_cached(kind).await }
	}

	/// Runs `refresh` under the kind's single-flight guard unless the cache can answer.
	///
	/// Unforced callers check the cache before and after taking the guard, so callers that
	/// queued behind an in-flight refresh pick up its result instead of refreshing again.
	pub(crate) async fn acquire_with<F, Fut>(
		&self,
		kind: TokenKind,
		force_refresh: bool,
		refresh: F,
	) -> Result<Acquisition>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<CachedToken>>,
	{
		if let Some(value) = self.reusable(kind, force_refresh).await? {
			return Ok(Acquisition::Cached(value));
		}

		let _singleflight = self.flow_guards[kind.slot()].lock().await;

		if let Some(value) = self.reusable(kind, force_refresh).await? {
			return Ok(Acquisition::Cached(value));
		}

		refresh().await.map(Acquisition::Refreshed)
	}

	/// Records metrics and span outcome, then unwraps the token.
	pub(crate) fn finish(
		&self,
		kind: TokenKind,
		span: &FlowSpan,
		result: Result<Acquisition>,
	) -> Result<TokenSecret> {
		let metrics = self.refresh_metrics(kind);
		let (outcome, result) = match result {
			Ok(Acquisition::Cached(value)) => {
				metrics.record_cache_hit();

				(FlowOutcome::CacheHit, Ok(value))
			},
			Ok(Acquisition::Refreshed(record)) => {
				metrics.record_refresh();
				obs::record_refresh(&record);

				(FlowOutcome::Refreshed, Ok(record.value))
			},
			Err(err) => {
				metrics.record_failure();

				(FlowOutcome::Failure, Err(err))
			},
		};

		span.record_outcome(outcome);
		obs::record_flow_outcome(kind, outcome);

		result
	}

	pub(crate) fn start(&self, kind: TokenKind, stage: &'static str) -> FlowSpan {
		self.refresh_metrics(kind).record_attempt();
		obs::record_flow_outcome(kind, FlowOutcome::Attempt);

		FlowSpan::new(kind, stage)
	}
}
