//! Storage contracts and the built-in in-memory token cache.
//!
//! A store holds zero or one [`CachedToken`] per [`TokenKind`]. Writes replace the whole slot;
//! there is no eviction beyond overwrite-on-refresh and nothing is persisted.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{CachedToken, TokenKind, TokenSecret},
};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Single-slot-per-kind token cache contract.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the current entry for `kind`, if any. Pure read.
	fn get(&self, kind: TokenKind) -> StoreFuture<'_, Option<CachedToken>>;

	/// Stores `value` for `kind`, expiring `ttl` from now, replacing any prior entry.
	fn put(&self, kind: TokenKind, value: TokenSecret, ttl: Duration)
	-> StoreFuture<'_, CachedToken>;

	/// Replaces the slot for `record.kind` with a fully specified record.
	fn insert(&self, record: CachedToken) -> StoreFuture<'_, ()>;

	/// Empties the slot for `kind`, returning the removed entry.
	fn clear(&self, kind: TokenKind) -> StoreFuture<'_, Option<CachedToken>>;

	/// Returns `true` iff an entry exists for `kind` and `now + margin < expires_at`.
	fn is_fresh(&self, kind: TokenKind, margin: Duration) -> StoreFuture<'_, bool> {
		let entry = self.get(kind);

		Box::pin(async move {
			let now = OffsetDateTime::now_utc();

			Ok(entry.await?.is_some_and(|record| record.is_fresh_at(now, margin)))
		})
	}
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
