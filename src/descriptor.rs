//! Brokerage descriptor: upstream endpoints plus the freshness policy applied per token kind.
//!
//! Descriptors are plain data (`serde` round-trippable) so deployments can load them from a
//! JSON config file; the [`BrokerageDescriptorBuilder`] validates endpoint security and margin
//! invariants before a broker ever sees them.

/// Builder API for assembling descriptors.
pub mod builder;
/// Freshness margins and lifetimes per token kind.
pub mod policy;

pub use builder::*;
pub use policy::*;

// self
use crate::{_prelude::*, auth::TokenKind};

/// Default OAuth token endpoint serving the refresh-token grant.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://api.tastytrade.com/oauth/token";
/// Default quote-token endpoint minting streamer tokens.
pub const DEFAULT_QUOTE_TOKEN_ENDPOINT: &str = "https://api.tastyworks.com/api-quote-tokens";

/// Endpoint set used by the broker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerageEndpoints {
	/// OAuth token endpoint (`POST`, form-encoded refresh grant).
	pub token: Url,
	/// Quote-token endpoint (`GET`, bearer access token).
	pub quote_token: Url,
}

/// Immutable descriptor consumed by [`TokenBroker`](crate::flows::TokenBroker).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerageDescriptor {
	/// Upstream endpoints.
	pub endpoints: BrokerageEndpoints,
	/// Freshness margins and lifetimes.
	#[serde(default)]
	pub policy: TokenPolicy,
}
impl BrokerageDescriptor {
	/// Creates a new, empty builder.
	pub fn builder() -> BrokerageDescriptorBuilder {
		BrokerageDescriptorBuilder::default()
	}

	/// Descriptor pointing at the production endpoints with the default policy.
	pub fn production() -> Result<Self, DescriptorError> {
		Self::builder()
			.token_endpoint(parse_endpoint("token", DEFAULT_TOKEN_ENDPOINT)?)
			.quote_token_endpoint(parse_endpoint("quote_token", DEFAULT_QUOTE_TOKEN_ENDPOINT)?)
			.build()
	}

	/// Parses and validates a JSON descriptor document.
	pub fn from_json(raw: &str) -> Result<Self, DescriptorError> {
		let descriptor: Self = serde_json::from_str(raw)
			.map_err(|e| DescriptorError::Parse { message: e.to_string() })?;

		descriptor.validate()?;

		Ok(descriptor)
	}

	/// Safety margin applied to `kind`.
	pub fn margin(&self, kind: TokenKind) -> Duration {
		self.policy.margin(kind)
	}
}

fn parse_endpoint(name: &'static str, raw: &str) -> Result<Url, DescriptorError> {
	Url::parse(raw).map_err(|e| DescriptorError::InvalidUrl { endpoint: name, message: e.to_string() })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn production_descriptor_uses_default_policy() {
		let descriptor =
			BrokerageDescriptor::production().expect("Production descriptor should validate.");

		assert_eq!(descriptor.endpoints.token.as_str(), DEFAULT_TOKEN_ENDPOINT);
		assert_eq!(descriptor.endpoints.quote_token.as_str(), DEFAULT_QUOTE_TOKEN_ENDPOINT);
		assert_eq!(descriptor.margin(TokenKind::Access), Duration::seconds(60));
		assert_eq!(descriptor.margin(TokenKind::Streamer), Duration::seconds(300));
	}

	#[test]
	fn json_descriptor_defaults_missing_policy_fields() {
		let descriptor = BrokerageDescriptor::from_json(
			r#"{
				"endpoints": {
					"token": "https://broker.example/oauth/token",
					"quote_token": "https://broker.example/api-quote-tokens"
				},
				"policy": { "streamer_margin_secs": 120 }
			}"#,
		)
		.expect("JSON descriptor should parse.");

		assert_eq!(descriptor.policy.streamer_margin, Duration::seconds(120));
		assert_eq!(descriptor.policy.access_margin, Duration::seconds(60));
		assert_eq!(descriptor.policy.streamer_ttl, Duration::seconds(72_000));
	}

	#[test]
	fn json_descriptor_is_validated() {
		let err = BrokerageDescriptor::from_json(
			r#"{
				"endpoints": {
					"token": "http://broker.example/oauth/token",
					"quote_token": "https://broker.example/api-quote-tokens"
				}
			}"#,
		)
		.expect_err("Plain HTTP endpoints should be rejected.");

		assert!(matches!(err, DescriptorError::InsecureEndpoint { endpoint: "token", .. }));
	}
}
