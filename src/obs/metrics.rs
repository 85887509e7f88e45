// self
use crate::{auth::TokenKind, obs::FlowOutcome};

/// Records an acquisition outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: TokenKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"quote_token_broker_flow_total",
			"kind" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_flow_outcome_noop_without_metrics() {
		record_flow_outcome(TokenKind::Access, FlowOutcome::Failure);
	}
}
