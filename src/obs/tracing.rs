// self
use crate::{
	_prelude::*,
	auth::{CachedToken, TokenKind},
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by acquisition flows.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided token kind + stage.
	pub fn new(kind: TokenKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"quote_token_broker.flow",
				kind = kind.as_str(),
				stage,
				outcome = tracing::field::Empty
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Records the final outcome on the span.
	pub fn record_outcome(&self, outcome: crate::obs::FlowOutcome) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("outcome", outcome.as_str());
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = outcome;
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event describing a freshly cached token (fingerprint only, never the value).
pub fn record_refresh(record: &CachedToken) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			kind = record.kind.as_str(),
			fingerprint = %record.value.fingerprint(),
			expires_at = %record.expires_at,
			"cached refreshed token"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = record;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::obs::FlowOutcome;

	#[test]
	fn flow_span_noop_without_tracing() {
		let span = FlowSpan::new(TokenKind::Access, "test");

		span.record_outcome(FlowOutcome::CacheHit);
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = FlowSpan::new(TokenKind::Streamer, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
