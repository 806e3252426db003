use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Result, db::Db, models::SearchCacheEntry};

const CACHE_COLUMNS: &str =
	"id, query, event_ids, total_results, search_time_seconds, created_at, expires_at";

/// Returns the live cache entry for a normalized query, if any. Entries at or
/// past `expires_at` are treated as absent; sweeping removes them later.
pub async fn get_entry(db: &Db, query: &str, now: OffsetDateTime) -> Result<Option<SearchCacheEntry>> {
	let sql = format!(
		"SELECT {CACHE_COLUMNS} FROM search_caches WHERE query = $1 AND expires_at > $2"
	);
	let entry = sqlx::query_as(&sql).bind(query).bind(now).fetch_optional(&db.pool).await?;

	Ok(entry)
}

/// Upserts the cache entry for a normalized query. A query holds at most one
/// row, so a refresh replaces the previous payload in place.
pub async fn put_entry(
	db: &Db,
	query: &str,
	event_ids: &[Uuid],
	total_results: i32,
	search_time_seconds: f64,
	ttl: time::Duration,
	now: OffsetDateTime,
) -> Result<SearchCacheEntry> {
	let sql = format!(
		"\
INSERT INTO search_caches (id, query, event_ids, total_results, search_time_seconds, created_at, expires_at)
VALUES ($1, $2, $3, $4, $5, $6, $7)
ON CONFLICT (query) DO UPDATE
SET
	event_ids = EXCLUDED.event_ids,
	total_results = EXCLUDED.total_results,
	search_time_seconds = EXCLUDED.search_time_seconds,
	created_at = EXCLUDED.created_at,
	expires_at = EXCLUDED.expires_at
RETURNING {CACHE_COLUMNS}"
	);
	let entry = sqlx::query_as(&sql)
		.bind(Uuid::new_v4())
		.bind(query)
		.bind(event_ids)
		.bind(total_results)
		.bind(search_time_seconds)
		.bind(now)
		.bind(now + ttl)
		.fetch_one(&db.pool)
		.await?;

	Ok(entry)
}

/// Deletes every entry whose `expires_at` is strictly before `now`, returning
/// the number of rows removed. An entry exactly at its expiry instant is
/// already invisible to `get_entry` and is collected on the next sweep.
pub async fn sweep_expired(db: &Db, now: OffsetDateTime) -> Result<u64> {
	let done = sqlx::query("DELETE FROM search_caches WHERE expires_at < $1")
		.bind(now)
		.execute(&db.pool)
		.await?;

	Ok(done.rows_affected())
}
