//! Postgres-backed implementations of the store traits.

use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;

use encore_storage::{
	cache, db::Db,
	models::{ArtistRecord, EventRecord, NewEvent, SearchCacheEntry},
	queries,
};

use crate::{BoxFuture, CacheStore, CacheWrite, RecordStore, ServiceResult};

#[derive(Clone)]
pub struct PgRecordStore {
	db: Arc<Db>,
}
impl PgRecordStore {
	pub fn new(db: Arc<Db>) -> Self {
		Self { db }
	}
}
impl RecordStore for PgRecordStore {
	fn insert_event<'a>(&'a self, new: &'a NewEvent) -> BoxFuture<'a, ServiceResult<EventRecord>> {
		Box::pin(async move { Ok(queries::insert_event(&self.db, new).await?) })
	}

	fn events_by_ids<'a>(
		&'a self,
		ids: &'a [Uuid],
	) -> BoxFuture<'a, ServiceResult<Vec<EventRecord>>> {
		Box::pin(async move { Ok(queries::events_by_ids(&self.db, ids).await?) })
	}

	fn search_text<'a>(
		&'a self,
		query: &'a str,
		limit: i64,
		offset: i64,
	) -> BoxFuture<'a, ServiceResult<(Vec<EventRecord>, i64)>> {
		Box::pin(
			async move { Ok(queries::search_events_by_text(&self.db, query, limit, offset).await?) },
		)
	}

	fn search_vectors<'a>(
		&'a self,
		embedding: &'a [f32],
		limit: i64,
	) -> BoxFuture<'a, ServiceResult<Vec<(EventRecord, f32)>>> {
		Box::pin(async move { Ok(queries::vector_search(&self.db, embedding, limit).await?) })
	}

	fn get_or_create_artist<'a>(
		&'a self,
		name: &'a str,
	) -> BoxFuture<'a, ServiceResult<(ArtistRecord, bool)>> {
		Box::pin(async move { Ok(queries::get_or_create_artist(&self.db, name).await?) })
	}

	fn upsert_embedding<'a>(
		&'a self,
		event_id: Uuid,
		embedding: &'a [f32],
		embedded_text: &'a str,
		model: &'a str,
	) -> BoxFuture<'a, ServiceResult<()>> {
		Box::pin(async move {
			Ok(queries::insert_event_embedding(&self.db, event_id, embedding, embedded_text, model)
				.await?)
		})
	}
}

#[derive(Clone)]
pub struct PgCacheStore {
	db: Arc<Db>,
}
impl PgCacheStore {
	pub fn new(db: Arc<Db>) -> Self {
		Self { db }
	}
}
impl CacheStore for PgCacheStore {
	fn get<'a>(
		&'a self,
		query: &'a str,
		now: OffsetDateTime,
	) -> BoxFuture<'a, ServiceResult<Option<SearchCacheEntry>>> {
		Box::pin(async move { Ok(cache::get_entry(&self.db, query, now).await?) })
	}

	fn put<'a>(&'a self, write: CacheWrite<'a>) -> BoxFuture<'a, ServiceResult<SearchCacheEntry>> {
		Box::pin(async move {
			Ok(cache::put_entry(
				&self.db,
				write.query,
				write.event_ids,
				write.total_results,
				write.search_time_seconds,
				write.ttl,
				write.now,
			)
			.await?)
		})
	}

	fn sweep_expired<'a>(&'a self, now: OffsetDateTime) -> BoxFuture<'a, ServiceResult<u64>> {
		Box::pin(async move { Ok(cache::sweep_expired(&self.db, now).await?) })
	}
}
