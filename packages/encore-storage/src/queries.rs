use std::collections::HashMap;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Result,
	db::Db,
	models::{ArtistRecord, EventRecord, NewEvent},
	vector_to_pg,
};

const EVENT_COLUMNS: &str = "\
id, title, category, artist_id, artist_name, event_date, event_time, timezone, venue, address, \
city, country, price_currency, price_min, price_max, ticket_url, source, source_url, collected_at";

pub async fn insert_event(db: &Db, new: &NewEvent) -> Result<EventRecord> {
	let sql = format!(
		"\
INSERT INTO events ({EVENT_COLUMNS})
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
RETURNING {EVENT_COLUMNS}"
	);
	let event: EventRecord = sqlx::query_as(&sql)
		.bind(Uuid::new_v4())
		.bind(&new.title)
		.bind(&new.category)
		.bind(new.artist_id)
		.bind(&new.artist_name)
		.bind(new.event_date)
		.bind(new.event_time)
		.bind(&new.timezone)
		.bind(&new.venue)
		.bind(&new.address)
		.bind(&new.city)
		.bind(&new.country)
		.bind(&new.price_currency)
		.bind(new.price_min)
		.bind(new.price_max)
		.bind(&new.ticket_url)
		.bind(&new.source)
		.bind(&new.source_url)
		.bind(new.collected_at)
		.fetch_one(&db.pool)
		.await?;

	Ok(event)
}

/// Fetches records for `ids` in unspecified order; callers re-order.
pub async fn events_by_ids(db: &Db, ids: &[Uuid]) -> Result<Vec<EventRecord>> {
	if ids.is_empty() {
		return Ok(Vec::new());
	}

	let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ANY($1)");
	let events = sqlx::query_as(&sql).bind(ids).fetch_all(&db.pool).await?;

	Ok(events)
}

/// Case-insensitive substring match over title, artist name, and venue,
/// ordered the same way merged results are (date, then time, absent first).
pub async fn search_events_by_text(
	db: &Db,
	query: &str,
	limit: i64,
	offset: i64,
) -> Result<(Vec<EventRecord>, i64)> {
	let pattern = format!("%{query}%");
	let total: i64 = sqlx::query_scalar(
		"\
SELECT count(*)
FROM events
WHERE title ILIKE $1 OR artist_name ILIKE $1 OR venue ILIKE $1",
	)
	.bind(&pattern)
	.fetch_one(&db.pool)
	.await?;
	let sql = format!(
		"\
SELECT {EVENT_COLUMNS}
FROM events
WHERE title ILIKE $1 OR artist_name ILIKE $1 OR venue ILIKE $1
ORDER BY event_date ASC, event_time ASC NULLS FIRST
LIMIT $2 OFFSET $3"
	);
	let events =
		sqlx::query_as(&sql).bind(&pattern).bind(limit).bind(offset).fetch_all(&db.pool).await?;

	Ok((events, total))
}

/// Cosine-distance similarity over pgvector, ascending (closest first).
pub async fn vector_search(
	db: &Db,
	embedding: &[f32],
	limit: i64,
) -> Result<Vec<(EventRecord, f32)>> {
	let vec_text = vector_to_pg(embedding);
	let rows: Vec<(Uuid, f32)> = sqlx::query_as(
		"\
SELECT e.id, (ee.embedding <=> $1::text::vector)::real AS distance
FROM events e
JOIN event_embeddings ee ON ee.event_id = e.id
ORDER BY ee.embedding <=> $1::text::vector
LIMIT $2",
	)
	.bind(vec_text.as_str())
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;
	let events = events_by_ids(db, &rows.iter().map(|(id, _)| *id).collect::<Vec<_>>()).await?;
	let mut by_id: HashMap<Uuid, EventRecord> =
		events.into_iter().map(|event| (event.id, event)).collect();

	Ok(rows
		.into_iter()
		.filter_map(|(id, distance)| by_id.remove(&id).map(|event| (event, distance)))
		.collect())
}

/// Resolves an artist by exact name, creating it when absent. The upsert form
/// keeps concurrent creators from erroring on the unique name constraint.
pub async fn get_or_create_artist(db: &Db, name: &str) -> Result<(ArtistRecord, bool)> {
	let existing: Option<ArtistRecord> =
		sqlx::query_as("SELECT id, name, created_at FROM artists WHERE name = $1")
			.bind(name)
			.fetch_optional(&db.pool)
			.await?;

	if let Some(artist) = existing {
		return Ok((artist, false));
	}

	let artist: ArtistRecord = sqlx::query_as(
		"\
INSERT INTO artists (id, name, created_at)
VALUES ($1, $2, $3)
ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
RETURNING id, name, created_at",
	)
	.bind(Uuid::new_v4())
	.bind(name)
	.bind(OffsetDateTime::now_utc())
	.fetch_one(&db.pool)
	.await?;

	Ok((artist, true))
}

pub async fn insert_event_embedding(
	db: &Db,
	event_id: Uuid,
	embedding: &[f32],
	embedded_text: &str,
	model: &str,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO event_embeddings (event_id, embedding, embedded_text, model)
VALUES ($1, $2::text::vector, $3, $4)
ON CONFLICT (event_id) DO UPDATE
SET
	embedding = EXCLUDED.embedding,
	embedded_text = EXCLUDED.embedded_text,
	model = EXCLUDED.model,
	created_at = now()",
	)
	.bind(event_id)
	.bind(vector_to_pg(embedding))
	.bind(embedded_text)
	.bind(model)
	.execute(&db.pool)
	.await?;

	Ok(())
}
