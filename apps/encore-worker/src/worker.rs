use std::{sync::Arc, time::Duration};

use time::OffsetDateTime;
use tokio::time as tokio_time;

use encore_service::CacheStore;

const SWEEP_INTERVAL_SECONDS: u64 = 3_600;

pub struct WorkerState {
	pub cache: Arc<dyn CacheStore>,
}

/// Periodically reclaims expired cache rows. Expired entries are already
/// invisible to readers, so a failed sweep only delays cleanup.
pub async fn run_worker(state: WorkerState) -> color_eyre::Result<()> {
	let mut interval = tokio_time::interval(Duration::from_secs(SWEEP_INTERVAL_SECONDS));

	loop {
		interval.tick().await;

		match state.cache.sweep_expired(OffsetDateTime::now_utc()).await {
			Ok(deleted) => tracing::info!("Swept {deleted} expired cache entries."),
			Err(err) => tracing::error!("Cache sweep failed: {err}."),
		}
	}
}
