use std::{collections::HashMap, time::Instant};

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, Time};
use uuid::Uuid;

use encore_domain::{merge, page::PageRequest, query::normalize};
use encore_storage::models::EventRecord;

use crate::{
	CacheWrite, EXISTING_MATCH_LIMIT, SearchService, ServiceError, ServiceResult, pipeline,
	time_serde,
};

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
	pub query: String,
	#[serde(default)]
	pub page: Option<u32>,
	#[serde(default)]
	pub per_page: Option<u32>,
	#[serde(default)]
	pub force_refresh: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchItem {
	pub id: Uuid,
	pub title: String,
	pub category: String,
	pub artist_id: Uuid,
	pub artist_name: String,
	#[serde(with = "time_serde::date")]
	pub event_date: Date,
	#[serde(with = "time_serde::option_time")]
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
}
impl From<EventRecord> for SearchItem {
	fn from(event: EventRecord) -> Self {
		Self {
			id: event.id,
			title: event.title,
			category: event.category,
			artist_id: event.artist_id,
			artist_name: event.artist_name,
			event_date: event.event_date,
			event_time: event.event_time,
			timezone: event.timezone,
			venue: event.venue,
			address: event.address,
			city: event.city,
			country: event.country,
			price_currency: event.price_currency,
			price_min: event.price_min,
			price_max: event.price_max,
			ticket_url: event.ticket_url,
			source: event.source,
			source_url: event.source_url,
		}
	}
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
	pub search_id: Uuid,
	/// The normalized form that keyed the cache lookup.
	pub query: String,
	pub records: Vec<SearchItem>,
	pub total: u64,
	pub page: u32,
	pub per_page: u32,
	pub has_more: bool,
	pub cached: bool,
	pub search_time_seconds: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimilarRequest {
	pub query: String,
	#[serde(default)]
	pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SimilarItem {
	pub distance: f32,
	#[serde(flatten)]
	pub record: SearchItem,
}

#[derive(Debug, Serialize)]
pub struct SimilarResponse {
	pub query: String,
	pub records: Vec<SimilarItem>,
}

pub async fn search(svc: &SearchService, req: SearchRequest) -> ServiceResult<SearchResponse> {
	search_at(svc, req, OffsetDateTime::now_utc()).await
}

/// Search with an explicit wall clock, which only cache expiry reads.
pub async fn search_at(
	svc: &SearchService,
	req: SearchRequest,
	now: OffsetDateTime,
) -> ServiceResult<SearchResponse> {
	if req.query.trim().is_empty() {
		return Err(ServiceError::InvalidRequest { message: "query must not be empty.".into() });
	}

	let page = req.page.unwrap_or(1);
	let per_page = req.per_page.unwrap_or(svc.cfg.search.default_per_page);
	let window =
		PageRequest::new(page, per_page, svc.cfg.search.max_per_page).map_err(|reject| {
			ServiceError::InvalidRequest { message: format!("{reject:?} for page={page}, per_page={per_page}.") }
		})?;
	let normalized = normalize(&req.query);
	let started = Instant::now();

	if !req.force_refresh
		&& let Some(entry) = svc.cache.get(&normalized, now).await?
	{
		let fetched = svc.records.events_by_ids(&entry.event_ids).await?;
		let mut by_id: HashMap<Uuid, EventRecord> =
			fetched.into_iter().map(|event| (event.id, event)).collect();
		// Keep the cached ordering; ids whose records have since been deleted
		// drop out silently.
		let ordered: Vec<EventRecord> =
			entry.event_ids.iter().filter_map(|id| by_id.remove(id)).collect();
		let total = entry.event_ids.len();
		let records = window.take_page(ordered).into_iter().map(SearchItem::from).collect();

		return Ok(SearchResponse {
			// A per-call identifier, distinct even across hits on one entry.
			search_id: Uuid::new_v4(),
			query: normalized,
			records,
			total: total as u64,
			page: window.page,
			per_page: window.per_page,
			has_more: window.has_more(total),
			cached: true,
			search_time_seconds: started.elapsed().as_secs_f64(),
		});
	}

	let new_records = pipeline::run(svc, &normalized).await?;
	let (existing, _) = svc.records.search_text(&normalized, EXISTING_MATCH_LIMIT, 0).await?;
	let merged = merge::merge(new_records, existing);
	let ids: Vec<Uuid> = merged.iter().map(|event| event.id).collect();
	let total = merged.len();
	let total_results = i32::try_from(total).map_err(|_| ServiceError::Storage {
		message: "Merged result count exceeds the cacheable range.".to_string(),
	})?;
	let search_time_seconds = started.elapsed().as_secs_f64();

	svc.cache
		.put(CacheWrite {
			query: &normalized,
			event_ids: &ids,
			total_results,
			search_time_seconds,
			ttl: time::Duration::hours(svc.cfg.search.cache_ttl_hours),
			now,
		})
		.await?;

	let records = window.take_page(merged).into_iter().map(SearchItem::from).collect();

	Ok(SearchResponse {
		search_id: Uuid::new_v4(),
		query: normalized,
		records,
		total: total as u64,
		page: window.page,
		per_page: window.per_page,
		has_more: window.has_more(total),
		cached: false,
		search_time_seconds,
	})
}

/// Embedding-space nearest neighbours, closest first. Unconfigured embedding
/// backends produce zero vectors, so results degrade to arbitrary order
/// rather than erroring.
pub async fn similar(svc: &SearchService, req: SimilarRequest) -> ServiceResult<SimilarResponse> {
	if req.query.trim().is_empty() {
		return Err(ServiceError::InvalidRequest { message: "query must not be empty.".into() });
	}

	let limit = req.limit.unwrap_or(svc.cfg.search.default_per_page);

	if limit < 1 || limit > svc.cfg.search.max_per_page {
		return Err(ServiceError::InvalidRequest {
			message: format!("limit must be between 1 and {}.", svc.cfg.search.max_per_page),
		});
	}

	let normalized = normalize(&req.query);
	let vectors =
		svc.providers.embedding.embed(&svc.cfg.providers.embedding, &[normalized.clone()]).await?;
	let Some(embedding) = vectors.first() else {
		return Err(ServiceError::Provider {
			message: "Embedding backend returned no vector.".into(),
		});
	};
	let hits = svc.records.search_vectors(embedding, limit as i64).await?;
	let records = hits
		.into_iter()
		.map(|(event, distance)| SimilarItem { distance, record: SearchItem::from(event) })
		.collect();

	Ok(SimilarResponse { query: normalized, records })
}
