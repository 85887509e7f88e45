//! Thread-safe in-memory [`TokenStore`] implementation.

// self
use crate::{
	_prelude::*,
	auth::{CachedToken, TokenKind, TokenSecret},
	store::{StoreFuture, TokenStore},
};

type Slots = Arc<RwLock<[Option<CachedToken>; 2]>>;

/// Process-local cache with exactly one slot per [`TokenKind`].
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Slots);
impl MemoryStore {
	fn get_now(slots: Slots, kind: TokenKind) -> Option<CachedToken> {
		slots.read()[kind.slot()].clone()
	}

	fn put_now(slots: Slots, kind: TokenKind, value: TokenSecret, ttl: Duration) -> CachedToken {
		let record = CachedToken::issued(kind, value, OffsetDateTime::now_utc(), ttl);

		slots.write()[kind.slot()] = Some(record.clone());

		record
	}

	fn insert_now(slots: Slots, record: CachedToken) {
		let slot = record.kind.slot();

		slots.write()[slot] = Some(record);
	}

	fn clear_now(slots: Slots, kind: TokenKind) -> Option<CachedToken> {
		slots.write()[kind.slot()].take()
	}
}
impl TokenStore for MemoryStore {
	fn get(&self, kind: TokenKind) -> StoreFuture<'_, Option<CachedToken>> {
		let slots = self.0.clone();

		Box::pin(async move { Ok(Self::get_now(slots, kind)) })
	}

	fn put(
		&self,
		kind: TokenKind,
		value: TokenSecret,
		ttl: Duration,
	) -> StoreFuture<'_, CachedToken> {
		let slots = self.0.clone();

		Box::pin(async move { Ok(Self::put_now(slots, kind, value, ttl)) })
	}

	fn insert(&self, record: CachedToken) -> StoreFuture<'_, ()> {
		let slots = self.0.clone();

		Box::pin(async move {
			Self::insert_now(slots, record);

			Ok(())
		})
	}

	fn clear(&self, kind: TokenKind) -> StoreFuture<'_, Option<CachedToken>> {
		let slots = self.0.clone();

		Box::pin(async move { Ok(Self::clear_now(slots, kind)) })
	}
}
