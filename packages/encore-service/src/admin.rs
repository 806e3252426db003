use serde::Serialize;
use time::OffsetDateTime;

use crate::{SearchService, ServiceResult};

#[derive(Debug, Serialize)]
pub struct SweepReport {
	pub deleted: u64,
}

/// Removes expired cache entries. Expiry already hides them from reads, so
/// this only reclaims rows.
pub async fn sweep_cache(svc: &SearchService) -> ServiceResult<SweepReport> {
	sweep_cache_at(svc, OffsetDateTime::now_utc()).await
}

pub async fn sweep_cache_at(svc: &SearchService, now: OffsetDateTime) -> ServiceResult<SweepReport> {
	let deleted = svc.cache.sweep_expired(now).await?;

	tracing::info!("Swept {deleted} expired cache entries.");

	Ok(SweepReport { deleted })
}
