//! Token kinds managed by the broker.

// self
use crate::_prelude::*;

/// The two credential kinds the broker caches, one slot each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
	/// Short-lived OAuth bearer token for the brokerage API.
	Access,
	/// Quote-feed token derived from a valid access token.
	Streamer,
}
impl TokenKind {
	/// Every kind, in cache slot order.
	pub const ALL: [TokenKind; 2] = [TokenKind::Access, TokenKind::Streamer];

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenKind::Access => "access",
			TokenKind::Streamer => "streamer",
		}
	}

	pub(crate) const fn slot(self) -> usize {
		match self {
			TokenKind::Access => 0,
			TokenKind::Streamer => 1,
		}
	}
}
impl Display for TokenKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for TokenKind {
	type Err = UnknownTokenKind;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"access" => Ok(TokenKind::Access),
			"streamer" => Ok(TokenKind::Streamer),
			other => Err(UnknownTokenKind(other.to_owned())),
		}
	}
}

/// Error returned when parsing an unknown token kind label.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown token kind: {0}.")]
pub struct UnknownTokenKind(pub String);
