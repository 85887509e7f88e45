// self
use crate::{_prelude::*, auth::TokenKind};

/// Freshness margins and lifetimes applied by the broker.
///
/// Serialized as whole seconds (`access_margin_secs`, ...) so config files stay readable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenPolicy {
	/// Minimum remaining validity before a cached access token is handed out.
	#[serde(rename = "access_margin_secs", with = "whole_seconds")]
	pub access_margin: Duration,
	/// Minimum remaining validity before a cached streamer token is handed out.
	#[serde(rename = "streamer_margin_secs", with = "whole_seconds")]
	pub streamer_margin: Duration,
	/// Access-token lifetime assumed when the token endpoint omits `expires_in`.
	#[serde(rename = "access_default_ttl_secs", with = "whole_seconds")]
	pub access_default_ttl: Duration,
	/// Fixed streamer-token lifetime; the quote-token endpoint declares no expiry.
	#[serde(rename = "streamer_ttl_secs", with = "whole_seconds")]
	pub streamer_ttl: Duration,
}
impl TokenPolicy {
	/// Margin that must exceed the round trip of the call consuming an access token.
	pub const DEFAULT_ACCESS_MARGIN: Duration = Duration::seconds(60);
	/// Access-token fallback lifetime (15 minutes).
	pub const DEFAULT_ACCESS_TTL: Duration = Duration::seconds(900);
	/// Streamer-token margin (5 minutes).
	pub const DEFAULT_STREAMER_MARGIN: Duration = Duration::seconds(300);
	/// Assumed streamer-token lifetime (20 hours).
	pub const DEFAULT_STREAMER_TTL: Duration = Duration::seconds(72_000);
	/// Longest lifetime a descriptor may configure for either kind (one year).
	pub const MAX_TTL: Duration = Duration::days(366);

	/// Safety margin for `kind`.
	pub fn margin(&self, kind: TokenKind) -> Duration {
		match kind {
			TokenKind::Access => self.access_margin,
			TokenKind::Streamer => self.streamer_margin,
		}
	}

	/// Lifetime used when upstream does not declare one for `kind`.
	pub fn fallback_ttl(&self, kind: TokenKind) -> Duration {
		match kind {
			TokenKind::Access => self.access_default_ttl,
			TokenKind::Streamer => self.streamer_ttl,
		}
	}
}
impl Default for TokenPolicy {
	fn default() -> Self {
		Self {
			access_margin: Self::DEFAULT_ACCESS_MARGIN,
			streamer_margin: Self::DEFAULT_STREAMER_MARGIN,
			access_default_ttl: Self::DEFAULT_ACCESS_TTL,
			streamer_ttl: Self::DEFAULT_STREAMER_TTL,
		}
	}
}

mod whole_seconds {
	// crates.io
	use serde::{Deserializer, Serializer};
	// self
	use crate::_prelude::*;

	pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_i64(value.whole_seconds())
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
	where
		D: Deserializer<'de>,
	{
		i64::deserialize(deserializer).map(Duration::seconds)
	}
}
