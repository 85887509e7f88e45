// self
use crate::{
	_prelude::*,
	auth::TokenKind,
	descriptor::{BrokerageDescriptor, BrokerageEndpoints, TokenPolicy},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum DescriptorError {
	/// Token endpoint is mandatory.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// Quote-token endpoint is mandatory.
	#[error("Missing quote-token endpoint.")]
	MissingQuoteTokenEndpoint,
	/// Endpoint string could not be parsed.
	#[error("The {endpoint} endpoint is not a valid URL: {message}.")]
	InvalidUrl {
		/// Which endpoint failed to parse.
		endpoint: &'static str,
		/// Parser message.
		message: String,
	},
	/// Endpoints must use HTTPS unless they point at a loopback host.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Margins cannot be negative.
	#[error("The {kind} margin must not be negative.")]
	NegativeMargin {
		/// Token kind whose margin is invalid.
		kind: TokenKind,
	},
	/// A freshly minted token must outlive its margin, otherwise every call refreshes.
	#[error("The {kind} lifetime must exceed its safety margin.")]
	MarginExceedsTtl {
		/// Token kind whose policy is inconsistent.
		kind: TokenKind,
	},
	/// Configured lifetimes are capped at [`TokenPolicy::MAX_TTL`].
	#[error("The {kind} lifetime exceeds the supported maximum.")]
	LifetimeTooLong {
		/// Token kind whose lifetime is too long.
		kind: TokenKind,
	},
	/// JSON descriptor document could not be parsed.
	#[error("Descriptor document is invalid: {message}.")]
	Parse {
		/// Parser message.
		message: String,
	},
}

/// Builder for [`BrokerageDescriptor`] values.
#[derive(Debug, Default)]
pub struct BrokerageDescriptorBuilder {
	/// OAuth token endpoint.
	pub token_endpoint: Option<Url>,
	/// Quote-token endpoint.
	pub quote_token_endpoint: Option<Url>,
	/// Freshness policy.
	pub policy: TokenPolicy,
}
impl BrokerageDescriptorBuilder {
	/// Sets the OAuth token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the quote-token endpoint.
	pub fn quote_token_endpoint(mut self, url: Url) -> Self {
		self.quote_token_endpoint = Some(url);

		self
	}

	/// Overrides the whole freshness policy.
	pub fn policy(mut self, policy: TokenPolicy) -> Self {
		self.policy = policy;

		self
	}

	/// Overrides the safety margin for one kind.
	pub fn margin(mut self, kind: TokenKind, margin: Duration) -> Self {
		match kind {
			TokenKind::Access => self.policy.access_margin = margin,
			TokenKind::Streamer => self.policy.streamer_margin = margin,
		}

		self
	}

	/// Overrides the fixed streamer-token lifetime.
	pub fn streamer_ttl(mut self, ttl: Duration) -> Self {
		self.policy.streamer_ttl = ttl;

		self
	}

	/// Overrides the access-token lifetime used when `expires_in` is omitted.
	pub fn access_default_ttl(mut self, ttl: Duration) -> Self {
		self.policy.access_default_ttl = ttl;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<BrokerageDescriptor, DescriptorError> {
		let token = self.token_endpoint.ok_or(DescriptorError::MissingTokenEndpoint)?;
		let quote_token =
			self.quote_token_endpoint.ok_or(DescriptorError::MissingQuoteTokenEndpoint)?;
		let descriptor = BrokerageDescriptor {
			endpoints: BrokerageEndpoints { token, quote_token },
			policy: self.policy,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl BrokerageDescriptor {
	/// Validates invariants for the descriptor.
	pub(crate) fn validate(&self) -> Result<(), DescriptorError> {
		validate_endpoint("token", &self.endpoints.token)?;
		validate_endpoint("quote_token", &self.endpoints.quote_token)?;

		for kind in TokenKind::ALL {
			let margin = self.policy.margin(kind);

			let ttl = self.policy.fallback_ttl(kind);

			if margin.is_negative() {
				return Err(DescriptorError::NegativeMargin { kind });
			}
			if ttl > TokenPolicy::MAX_TTL {
				return Err(DescriptorError::LifetimeTooLong { kind });
			}
			if ttl <= margin {
				return Err(DescriptorError::MarginExceedsTtl { kind });
			}
		}

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), DescriptorError> {
	if url.scheme() == "https" || is_loopback(url) {
		Ok(())
	} else {
		Err(DescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain == "localhost",
		Some(url::Host::Ipv4(addr)) => addr.is_loopback(),
		Some(url::Host::Ipv6(addr)) => addr.is_loopback(),
		None => false,
	}
}
