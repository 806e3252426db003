use time::{Date, OffsetDateTime, Time};
use uuid::Uuid;

use encore_domain::merge::Mergeable;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArtistRecord {
	pub id: Uuid,
	pub name: String,
	pub created_at: OffsetDateTime,
}

/// A persisted event. Identity (`id`) is the sole dedup key once a record
/// exists; the merge engine additionally reads `event_date`/`event_time`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRecord {
	pub id: Uuid,
	pub title: String,
	pub category: String,
	pub artist_id: Uuid,
	pub artist_name: String,
	pub event_date: Date,
	pub event_time: Option<Time>,
	pub timezone: String,
	pub venue: String,
	pub address: Option<String>,
	pub city: String,
	pub country: String,
	pub price_currency: Option<String>,
	pub price_min: Option<f64>,
	pub price_max: Option<f64>,
	pub ticket_url: Option<String>,
	pub source: String,
	pub source_url: String,
	pub collected_at: OffsetDateTime,
}
impl Mergeable for EventRecord {
	fn merge_id(&self) -> Uuid {
		self.id
	}

	fn event_date(&self) -> Date {
		self.event_date
	}

	fn event_time(&self) -> Option<Time> {
		self.event_time
	}
}

/// Insert payload for a new event; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewEvent {
	pub title: String,
	pub category: String,
	pub artist_id: Uuid,
	pub artist_name: String,
	pub event_date: Date,
	pub event_time: Option<Time>,
	pub timezone: String,
	pub venue: String,
	pub address: Option<String>,
	pub city: String,
	pub country: String,
	pub price_currency: Option<String>,
	pub price_min: Option<f64>,
	pub price_max: Option<f64>,
	pub ticket_url: Option<String>,
	pub source: String,
	pub source_url: String,
	pub collected_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SearchCacheEntry {
	pub id: Uuid,
	pub query: String,
	pub event_ids: Vec<Uuid>,
	pub total_results: i32,
	pub search_time_seconds: f64,
	pub created_at: OffsetDateTime,
	pub expires_at: OffsetDateTime,
}
