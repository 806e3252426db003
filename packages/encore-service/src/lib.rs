pub mod admin;
pub mod pipeline;
pub mod postgres;
pub mod search;
pub mod time_serde;

use std::{future::Future, pin::Pin, sync::Arc};

use time::OffsetDateTime;
use uuid::Uuid;

pub use admin::SweepReport;
use encore_config::{Config, EmbeddingProviderConfig, LlmProviderConfig, WebSearchProviderConfig};
use encore_providers::{embedding, extractor, extractor::ExtractedEvent, web_search, web_search::WebDocument};
use encore_storage::models::{ArtistRecord, EventRecord, NewEvent, SearchCacheEntry};
pub use postgres::{PgCacheStore, PgRecordStore};
pub use search::{
	SearchItem, SearchRequest, SearchResponse, SimilarItem, SimilarRequest, SimilarResponse,
};

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// How many stored records the miss path pulls in as merge candidates.
pub(crate) const EXISTING_MATCH_LIMIT: i64 = 100;

pub trait WebSearchProvider
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		cfg: &'a WebSearchProviderConfig,
		query: &'a str,
		max_results: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<WebDocument>>>;
}

pub trait ExtractorProvider
where
	Self: Send + Sync,
{
	fn extract<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		query: &'a str,
		content: &'a str,
		source_url: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<ExtractedEvent>>>;
}

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

/// Durable record access behind the orchestrator, so the search flow can be
/// exercised against in-memory stores as well as Postgres.
pub trait RecordStore
where
	Self: Send + Sync,
{
	fn insert_event<'a>(&'a self, new: &'a NewEvent) -> BoxFuture<'a, ServiceResult<EventRecord>>;

	fn events_by_ids<'a>(
		&'a self,
		ids: &'a [Uuid],
	) -> BoxFuture<'a, ServiceResult<Vec<EventRecord>>>;

	fn search_text<'a>(
		&'a self,
		query: &'a str,
		limit: i64,
		offset: i64,
	) -> BoxFuture<'a, ServiceResult<(Vec<EventRecord>, i64)>>;

	fn search_vectors<'a>(
		&'a self,
		embedding: &'a [f32],
		limit: i64,
	) -> BoxFuture<'a, ServiceResult<Vec<(EventRecord, f32)>>>;

	fn get_or_create_artist<'a>(
		&'a self,
		name: &'a str,
	) -> BoxFuture<'a, ServiceResult<(ArtistRecord, bool)>>;

	fn upsert_embedding<'a>(
		&'a self,
		event_id: Uuid,
		embedding: &'a [f32],
		embedded_text: &'a str,
		model: &'a str,
	) -> BoxFuture<'a, ServiceResult<()>>;
}

/// Payload for one cache write; the entry for `query` is replaced as a whole.
pub struct CacheWrite<'a> {
	pub query: &'a str,
	pub event_ids: &'a [Uuid],
	pub total_results: i32,
	pub search_time_seconds: f64,
	pub ttl: time::Duration,
	pub now: OffsetDateTime,
}

pub trait CacheStore
where
	Self: Send + Sync,
{
	fn get<'a>(
		&'a self,
		query: &'a str,
		now: OffsetDateTime,
	) -> BoxFuture<'a, ServiceResult<Option<SearchCacheEntry>>>;

	fn put<'a>(&'a self, write: CacheWrite<'a>) -> BoxFuture<'a, ServiceResult<SearchCacheEntry>>;

	fn sweep_expired<'a>(&'a self, now: OffsetDateTime) -> BoxFuture<'a, ServiceResult<u64>>;
}

#[derive(Debug)]
pub enum ServiceError {
	InvalidRequest { message: String },
	NotFound { message: String },
	Provider { message: String },
	Storage { message: String },
}

#[derive(Clone)]
pub struct Providers {
	pub web_search: Arc<dyn WebSearchProvider>,
	pub extractor: Arc<dyn ExtractorProvider>,
	pub embedding: Arc<dyn EmbeddingProvider>,
}

pub struct SearchService {
	pub cfg: Config,
	pub records: Arc<dyn RecordStore>,
	pub cache: Arc<dyn CacheStore>,
	pub providers: Providers,
}

struct DefaultProviders;

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::NotFound { message } => write!(f, "Not found: {message}"),
			Self::Provider { message } => write!(f, "Provider error: {message}"),
			Self::Storage { message } => write!(f, "Storage error: {message}"),
		}
	}
}

impl std::error::Error for ServiceError {}

impl From<sqlx::Error> for ServiceError {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<color_eyre::Report> for ServiceError {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<encore_storage::Error> for ServiceError {
	fn from(err: encore_storage::Error) -> Self {
		match err {
			encore_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			encore_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			encore_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}

impl WebSearchProvider for DefaultProviders {
	fn search<'a>(
		&'a self,
		cfg: &'a WebSearchProviderConfig,
		query: &'a str,
		max_results: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<WebDocument>>> {
		Box::pin(web_search::search(cfg, query, max_results))
	}
}

impl ExtractorProvider for DefaultProviders {
	fn extract<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		query: &'a str,
		content: &'a str,
		source_url: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<ExtractedEvent>>> {
		Box::pin(extractor::extract(cfg, query, content, source_url))
	}
}

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

impl Providers {
	pub fn new(
		web_search: Arc<dyn WebSearchProvider>,
		extractor: Arc<dyn ExtractorProvider>,
		embedding: Arc<dyn EmbeddingProvider>,
	) -> Self {
		Self { web_search, extractor, embedding }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { web_search: provider.clone(), extractor: provider.clone(), embedding: provider }
	}
}

impl SearchService {
	pub fn new(cfg: Config, records: Arc<dyn RecordStore>, cache: Arc<dyn CacheStore>) -> Self {
		Self { cfg, records, cache, providers: Providers::default() }
	}

	pub fn with_providers(
		cfg: Config,
		records: Arc<dyn RecordStore>,
		cache: Arc<dyn CacheStore>,
		providers: Providers,
	) -> Self {
		Self { cfg, records, cache, providers }
	}
}
