use std::sync::Arc;

use encore_service::{PgCacheStore, PgRecordStore, SearchService};
use encore_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SearchService>,
}
impl AppState {
	pub async fn new(config: encore_config::Config) -> color_eyre::Result<Self> {
		let db = Arc::new(Db::connect(&config.storage.postgres).await?);

		db.ensure_schema(config.storage.vector_dim).await?;

		let records = Arc::new(PgRecordStore::new(db.clone()));
		let cache = Arc::new(PgCacheStore::new(db));
		let service = SearchService::new(config, records, cache);

		Ok(Self { service: Arc::new(service) })
	}
}
