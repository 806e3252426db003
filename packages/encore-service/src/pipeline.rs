use std::collections::HashSet;

use time::OffsetDateTime;

use encore_providers::extractor::ExtractedEvent;
use encore_storage::models::{EventRecord, NewEvent};

use crate::{SearchService, ServiceResult};

/// Runs the retrieval pipeline for one normalized query: web search, per
/// document extraction, candidate dedup, then persistence. Provider failures
/// degrade to fewer candidates; storage failures propagate.
pub(crate) async fn run(svc: &SearchService, query: &str) -> ServiceResult<Vec<EventRecord>> {
	let documents = match svc
		.providers
		.web_search
		.search(&svc.cfg.providers.web_search, query, svc.cfg.search.max_web_results)
		.await
	{
		Ok(documents) => documents,
		Err(err) => {
			tracing::warn!("Web search failed for {query:?}: {err}.");

			Vec::new()
		},
	};
	let mut candidates = Vec::new();

	for document in &documents {
		match svc
			.providers
			.extractor
			.extract(&svc.cfg.providers.llm_extractor, query, &document.content, &document.url)
			.await
		{
			Ok(extracted) => candidates.extend(extracted),
			Err(err) => {
				tracing::warn!("Extraction failed for {}: {err}.", document.url);
			},
		}
	}

	let mut stored = Vec::new();

	for candidate in dedup_candidates(candidates) {
		let (artist, _) = svc.records.get_or_create_artist(&candidate.artist_name).await?;
		let event = svc
			.records
			.insert_event(&NewEvent {
				title: candidate.title.clone(),
				category: candidate.category.clone(),
				artist_id: artist.id,
				artist_name: artist.name.clone(),
				event_date: candidate.event_date,
				event_time: candidate.event_time,
				timezone: candidate.timezone.clone(),
				venue: candidate.venue.clone(),
				address: candidate.address.clone(),
				city: candidate.city.clone(),
				country: candidate.country.clone(),
				price_currency: candidate.price_currency.clone(),
				price_min: candidate.price_min,
				price_max: candidate.price_max,
				ticket_url: candidate.ticket_url.clone(),
				source: source_host(&candidate.source_url).to_string(),
				source_url: candidate.source_url.clone(),
				collected_at: OffsetDateTime::now_utc(),
			})
			.await?;

		embed_event(svc, &event).await;
		stored.push(event);
	}

	Ok(stored)
}

/// Drops repeat candidates sharing `(lowercased title, event_date)`, keeping
/// the first occurrence.
fn dedup_candidates(candidates: Vec<ExtractedEvent>) -> Vec<ExtractedEvent> {
	let mut seen = HashSet::new();

	candidates
		.into_iter()
		.filter(|candidate| seen.insert((candidate.title.to_lowercase(), candidate.event_date)))
		.collect()
}

/// Embedding is best effort; a failure leaves the event unsearchable by
/// similarity but otherwise intact.
async fn embed_event(svc: &SearchService, event: &EventRecord) {
	let text = event_text(event);
	let vectors =
		match svc.providers.embedding.embed(&svc.cfg.providers.embedding, &[text.clone()]).await {
			Ok(vectors) => vectors,
			Err(err) => {
				tracing::warn!("Embedding failed for event {}: {err}.", event.id);

				return;
			},
		};
	let Some(embedding) = vectors.first() else {
		tracing::warn!("Embedding backend returned no vector for event {}.", event.id);

		return;
	};

	if let Err(err) = svc
		.records
		.upsert_embedding(event.id, embedding, &text, &svc.cfg.providers.embedding.model)
		.await
	{
		tracing::warn!("Failed to store embedding for event {}: {err}.", event.id);
	}
}

fn event_text(event: &EventRecord) -> String {
	format!(
		"{} {} {} at {}, {}, {}",
		event.artist_name, event.title, event.category, event.venue, event.city, event.country
	)
}

fn source_host(source_url: &str) -> &str {
	source_url.split('/').nth(2).filter(|host| !host.is_empty()).unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn source_host_reads_url_authority() {
		assert_eq!(source_host("https://tickets.example.com/e/1"), "tickets.example.com");
		assert_eq!(source_host("not a url"), "unknown");
		assert_eq!(source_host(""), "unknown");
	}
}
