//! Cached token records and freshness helpers.

// self
use crate::{
	_prelude::*,
	auth::{kind::TokenKind, secret::TokenSecret},
};

/// Freshness of a cached token relative to a safety margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// Remaining validity exceeds the margin; the token may be handed out.
	Fresh,
	/// The token expires within the margin (or already expired) and must be refreshed.
	Stale,
}

/// Immutable snapshot of one token kind's cache slot.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
	/// Kind of token held by the slot.
	pub kind: TokenKind,
	/// Token value; callers must avoid logging it.
	pub value: TokenSecret,
	/// Acquisition instant.
	pub issued_at: OffsetDateTime,
	/// Absolute expiry instant (`issued_at + ttl`).
	pub expires_at: OffsetDateTime,
}
impl CachedToken {
	/// Builds a record that expires `ttl` after `issued_at`.
	///
	/// The expiry saturates at the largest representable instant.
	pub fn issued(
		kind: TokenKind,
		value: impl Into<TokenSecret>,
		issued_at: OffsetDateTime,
		ttl: Duration,
	) -> Self {
		Self { kind, value: value.into(), issued_at, expires_at: issued_at.saturating_add(ttl) }
	}

	/// Computes the freshness status at `instant` under the provided safety margin.
	pub fn status_at(&self, instant: OffsetDateTime, margin: Duration) -> TokenStatus {
		match instant.checked_add(margin) {
			Some(limit) if limit < self.expires_at => TokenStatus::Fresh,
			_ => TokenStatus::Stale,
		}
	}

	/// Returns `true` if `instant + margin` is still before the expiry.
	pub fn is_fresh_at(&self, instant: OffsetDateTime, margin: Duration) -> bool {
		matches!(self.status_at(instant, margin), TokenStatus::Fresh)
	}

	/// Convenience helper that checks freshness against the current UTC instant.
	pub fn is_fresh(&self, margin: Duration) -> bool {
		self.is_fresh_at(OffsetDateTime::now_utc(), margin)
	}

	/// Remaining validity at `instant`; negative once expired.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		self.expires_at - instant
	}
}
impl Debug for CachedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachedToken")
			.field("kind", &self.kind)
			.field("value", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn status_flips_at_the_margin_boundary() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let record = CachedToken::issued(TokenKind::Access, "AT1", issued, Duration::seconds(900));
		let margin = Duration::seconds(60);

		assert_eq!(record.expires_at, macros::datetime!(2025-01-01 00:15 UTC));
		assert_eq!(
			record.status_at(macros::datetime!(2025-01-01 00:13:59 UTC), margin),
			TokenStatus::Fresh
		);
		assert_eq!(
			record.status_at(macros::datetime!(2025-01-01 00:14 UTC), margin),
			TokenStatus::Stale
		);
		assert_eq!(
			record.status_at(macros::datetime!(2025-01-01 00:20 UTC), margin),
			TokenStatus::Stale
		);
	}

	#[test]
	fn remaining_goes_negative_after_expiry() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let record =
			CachedToken::issued(TokenKind::Streamer, "ST1", issued, Duration::hours(20));

		assert_eq!(record.remaining_at(issued), Duration::seconds(72_000));
		assert!(record.remaining_at(issued + Duration::hours(21)).is_negative());
	}

	#[test]
	fn unrepresentable_instants_never_panic() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let record =
			CachedToken::issued(TokenKind::Access, "AT1", issued, Duration::seconds(i64::MAX));

		assert!(record.expires_at > issued);
		assert_eq!(
			record.status_at(issued, Duration::seconds(i64::MAX)),
			TokenStatus::Stale
		);
		assert_eq!(record.status_at(issued, Duration::seconds(60)), TokenStatus::Fresh);
	}

	#[test]
	fn debug_redacts_value() {
		let record = CachedToken::issued(
			TokenKind::Access,
			"super-secret",
			OffsetDateTime::now_utc(),
			Duration::minutes(1),
		);

		assert!(!format!("{record:?}").contains("super-secret"));
	}
}
