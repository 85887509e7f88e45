//! Optional observability helpers for token acquisitions.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `quote_token_broker.flow` with the `kind`
//!   (token kind) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `quote_token_broker_flow_total` counter for every
//!   attempt/cache hit/refresh/failure, labeled by `kind` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each acquisition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to an acquisition helper.
	Attempt,
	/// A fresh cached token was returned without contacting upstream.
	CacheHit,
	/// Upstream minted a new token and the cache was overwritten.
	Refreshed,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::CacheHit => "cache_hit",
			FlowOutcome::Refreshed => "refreshed",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
