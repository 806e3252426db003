use time::{
	Date, Time,
	macros::{date, time},
};
use uuid::Uuid;

use encore_domain::{
	merge::{self, Mergeable},
	page::{PageReject, PageRequest},
	query,
};

#[derive(Debug, Clone, PartialEq)]
struct TestRecord {
	id: Uuid,
	event_date: Date,
	event_time: Option<Time>,
}
impl TestRecord {
	fn new(event_date: Date, event_time: Option<Time>) -> Self {
		Self { id: Uuid::new_v4(), event_date, event_time }
	}
}
impl Mergeable for TestRecord {
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

#[test]
fn normalize_lowercases_and_trims() {
	assert_eq!(query::normalize("  BTS  "), "bts");
	assert_eq!(query::normalize("NewJeans Fan  Meeting"), "newjeans fan meeting");
	assert_eq!(query::normalize(""), "");
	assert_eq!(query::normalize("   "), "");
}

#[test]
fn normalize_is_idempotent() {
	for raw in ["  BTS  ", "Seoul   Olympic\tStadium", "already normal", "\nMixed Case\n"] {
		let once = query::normalize(raw);

		assert_eq!(query::normalize(&once), once);
	}
}

#[test]
fn merge_deduplicates_by_id_first_occurrence_wins() {
	let shared = TestRecord::new(date!(2026 - 03 - 15), Some(time!(18:00)));
	let fresh_only = TestRecord::new(date!(2026 - 03 - 14), None);
	let existing_only = TestRecord::new(date!(2026 - 03 - 16), None);
	let merged = merge::merge(
		vec![fresh_only.clone(), shared.clone()],
		vec![shared.clone(), existing_only.clone()],
	);

	assert_eq!(merged.len(), 3);
	assert_eq!(merged.iter().filter(|record| record.id == shared.id).count(), 1);
}

#[test]
fn merge_sorts_by_date_then_time_with_absent_time_first() {
	let evening = TestRecord::new(date!(2026 - 03 - 15), Some(time!(19:30)));
	let morning = TestRecord::new(date!(2026 - 03 - 15), Some(time!(09:00)));
	let untimed = TestRecord::new(date!(2026 - 03 - 15), None);
	let earlier_day = TestRecord::new(date!(2026 - 03 - 01), Some(time!(23:00)));
	let merged = merge::merge(
		vec![evening.clone(), morning.clone()],
		vec![untimed.clone(), earlier_day.clone()],
	);
	let ids: Vec<Uuid> = merged.iter().map(|record| record.id).collect();

	assert_eq!(ids, vec![earlier_day.id, untimed.id, morning.id, evening.id]);

	for pair in merged.windows(2) {
		let a = pair[0].event_date;
		let b = pair[1].event_date;

		assert!(a <= b);

		if a == b {
			let a_time = pair[0].event_time.unwrap_or(Time::MIDNIGHT);
			let b_time = pair[1].event_time.unwrap_or(Time::MIDNIGHT);

			assert!(a_time <= b_time);
		}
	}
}

#[test]
fn merge_is_deterministic() {
	let records: Vec<TestRecord> = (0..8)
		.map(|i| {
			TestRecord::new(
				date!(2026 - 05 - 01),
				if i % 2 == 0 { Some(time!(12:00)) } else { None },
			)
		})
		.collect();
	let new_records = records[..5].to_vec();
	let existing = records[3..].to_vec();
	let first = merge::merge(new_records.clone(), existing.clone());
	let second = merge::merge(new_records, existing);

	assert_eq!(first, second);
}

#[test]
fn merge_prefers_the_fresh_copy_on_id_collision() {
	let id = Uuid::new_v4();
	let fresh =
		TestRecord { id, event_date: date!(2026 - 06 - 01), event_time: Some(time!(18:00)) };
	let stale = TestRecord { id, event_date: date!(2026 - 06 - 02), event_time: None };
	let merged = merge::merge(vec![fresh.clone()], vec![stale]);

	assert_eq!(merged, vec![fresh]);
}

#[test]
fn pagination_windows_cover_a_45_item_total() {
	let items: Vec<u32> = (0..45).collect();
	let page_1 = PageRequest::new(1, 20, 100).expect("Page 1 must validate.");
	let page_3 = PageRequest::new(3, 20, 100).expect("Page 3 must validate.");

	assert_eq!(page_1.take_page(items.clone()).len(), 20);
	assert!(page_1.has_more(45));
	assert_eq!(page_3.take_page(items.clone()), (40..45).collect::<Vec<u32>>());
	assert!(!page_3.has_more(45));
}

#[test]
fn pagination_past_the_end_is_empty_not_an_error() {
	let items: Vec<u32> = (0..3).collect();
	let page = PageRequest::new(5, 20, 100).expect("Page 5 must validate.");

	assert!(page.take_page(items).is_empty());
	assert!(!page.has_more(3));
}

#[test]
fn pagination_rejects_out_of_range_values() {
	assert_eq!(PageRequest::new(0, 20, 100), Err(PageReject::PageOutOfRange));
	assert_eq!(PageRequest::new(1, 0, 100), Err(PageReject::PerPageOutOfRange));
	assert_eq!(PageRequest::new(1, 101, 100), Err(PageReject::PerPageOutOfRange));
	assert!(PageRequest::new(1, 100, 100).is_ok());
}
