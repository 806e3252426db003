use std::collections::HashSet;

use time::{Date, Time};
use uuid::Uuid;

/// The three fields the merge engine needs from a persisted record. Storage
/// models implement this so the merge stays free of any storage dependency.
pub trait Mergeable {
	fn merge_id(&self) -> Uuid;
	fn event_date(&self) -> Date;
	fn event_time(&self) -> Option<Time>;
}

/// Combines freshly retrieved records with existing text matches into one
/// deduplicated, date-ordered list.
///
/// New records come first so that on an id collision the fresher copy wins:
/// dedup keeps the first occurrence in concatenation order. The final sort is
/// stable, by `(event_date, event_time)` with a missing time treated as
/// midnight, so identical inputs always produce identical output order.
pub fn merge<T>(new_records: Vec<T>, existing_matches: Vec<T>) -> Vec<T>
where
	T: Mergeable,
{
	let mut seen = HashSet::with_capacity(new_records.len() + existing_matches.len());
	let mut combined = Vec::with_capacity(new_records.len() + existing_matches.len());

	for record in new_records.into_iter().chain(existing_matches) {
		if seen.insert(record.merge_id()) {
			combined.push(record);
		}
	}

	combined.sort_by_key(|record| {
		(record.event_date(), record.event_time().unwrap_or(Time::MIDNIGHT))
	});

	combined
}
