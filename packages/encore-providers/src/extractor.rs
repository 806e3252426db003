use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;
use time::{
	Date, Time,
	macros::format_description,
};

const MAX_CONTENT_CHARS: usize = 8_000;
const CATEGORIES: [&str; 4] = ["concert", "fanmeeting", "broadcast", "festival"];

const SYSTEM_PROMPT: &str =
	"You are an event extraction assistant. Always respond with valid JSON.";

const EXTRACTION_PROMPT: &str = "\
Extract all artist events (concerts, fanmeetings, broadcasts, festivals) from the content below.
For each event return: title, artist_name, category (one of concert, fanmeeting, broadcast, \
festival), event_date (YYYY-MM-DD), event_time (HH:MM, 24-hour, optional), venue, address \
(optional), city, country, timezone, price_currency (optional), price_min (optional), price_max \
(optional), ticket_url (optional), confidence (0.0 to 1.0).
Only extract events that are clearly about the searched artist. Skip events with unclear or \
incomplete information. Return a JSON object with an \"events\" array.";

/// One structured event candidate parsed out of a web document, not yet
/// persisted. `(lowercased title, event_date)` is the dedup key before a
/// stable record id exists.
#[derive(Debug, Clone)]
pub struct ExtractedEvent {
	pub title: String,
	pub artist_name: String,
	pub category: String,
	pub event_date: Date,
	pub event_time: Option<Time>,
	pub venue: String,
	pub address: Option<String>,
	pub city: String,
	pub country: String,
	pub timezone: String,
	pub price_currency: Option<String>,
	pub price_min: Option<f64>,
	pub price_max: Option<f64>,
	pub ticket_url: Option<String>,
	pub source_url: String,
	pub confidence: f32,
}

/// Extracts event candidates from one source document. An unconfigured
/// backend (empty api key) yields zero candidates, not an error.
pub async fn extract(
	cfg: &encore_config::LlmProviderConfig,
	query: &str,
	content: &str,
	source_url: &str,
) -> Result<Vec<ExtractedEvent>> {
	if cfg.api_key.trim().is_empty() {
		return Ok(Vec::new());
	}

	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let content: String = content.chars().take(MAX_CONTENT_CHARS).collect();
	let user_prompt = format!(
		"{EXTRACTION_PROMPT}\n\nSearch query: {query}\nSource URL: {source_url}\n\nContent:\n{content}"
	);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"response_format": { "type": "json_object" },
		"messages": [
			{ "role": "system", "content": SYSTEM_PROMPT },
			{ "role": "user", "content": user_prompt },
		],
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;
	let payload = parse_completion_json(json)?;

	Ok(parse_events(&payload, source_url))
}

fn parse_completion_json(json: Value) -> Result<Value> {
	if let Some(content) = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
	{
		let parsed: Value = serde_json::from_str(content)
			.map_err(|_| eyre::eyre!("Extractor content is not valid JSON."))?;

		return Ok(parsed);
	}

	if json.is_object() {
		return Ok(json);
	}

	Err(eyre::eyre!("Extractor response is missing JSON content."))
}

/// Accepts either a bare array or an object carrying an `events` array.
/// Entries with missing or malformed required fields are skipped; the rest
/// are returned in document order.
fn parse_events(payload: &Value, source_url: &str) -> Vec<ExtractedEvent> {
	let items = match payload {
		Value::Array(items) => items.as_slice(),
		Value::Object(_) => payload
			.get("events")
			.and_then(|v| v.as_array())
			.map(|items| items.as_slice())
			.unwrap_or_default(),
		_ => &[],
	};

	items.iter().filter_map(|item| parse_event(item, source_url)).collect()
}

fn parse_event(item: &Value, source_url: &str) -> Option<ExtractedEvent> {
	let category = required_string(item, "category")?;

	if !CATEGORIES.contains(&category.as_str()) {
		return None;
	}

	let event_date = parse_date(item.get("event_date")?.as_str()?)?;
	let event_time = item.get("event_time").and_then(|v| v.as_str()).and_then(parse_time);

	Some(ExtractedEvent {
		title: required_string(item, "title")?,
		artist_name: required_string(item, "artist_name")?,
		category,
		event_date,
		event_time,
		venue: required_string(item, "venue")?,
		address: optional_string(item, "address"),
		city: required_string(item, "city")?,
		country: required_string(item, "country")?,
		timezone: optional_string(item, "timezone").unwrap_or_else(|| "Asia/Seoul".to_string()),
		price_currency: optional_string(item, "price_currency"),
		price_min: item.get("price_min").and_then(|v| v.as_f64()),
		price_max: item.get("price_max").and_then(|v| v.as_f64()),
		ticket_url: optional_string(item, "ticket_url"),
		source_url: source_url.to_string(),
		confidence: item.get("confidence").and_then(|v| v.as_f64()).unwrap_or(0.5) as f32,
	})
}

fn parse_date(raw: &str) -> Option<Date> {
	Date::parse(raw, format_description!("[year]-[month]-[day]")).ok()
}

fn parse_time(raw: &str) -> Option<Time> {
	Time::parse(raw, format_description!("[hour]:[minute]")).ok()
}

fn required_string(item: &Value, key: &str) -> Option<String> {
	let value = item.get(key)?.as_str()?.trim();

	if value.is_empty() { None } else { Some(value.to_string()) }
}

fn optional_string(item: &Value, key: &str) -> Option<String> {
	item.get(key)
		.and_then(|v| v.as_str())
		.map(str::trim)
		.filter(|v| !v.is_empty())
		.map(str::to_string)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_choice_content_json() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "{\"events\": []}" } }
			]
		});
		let parsed = parse_completion_json(json).expect("parse failed");

		assert!(parsed.get("events").is_some());
	}

	#[test]
	fn parses_events_from_object_or_bare_array() {
		let event = serde_json::json!({
			"title": "BTS World Tour",
			"artist_name": "BTS",
			"category": "concert",
			"event_date": "2026-03-15",
			"event_time": "18:00",
			"venue": "Seoul Olympic Stadium",
			"city": "Seoul",
			"country": "South Korea",
			"confidence": 0.9
		});
		let wrapped = serde_json::json!({ "events": [event] });
		let bare = serde_json::json!([event]);
		let from_object = parse_events(&wrapped, "https://source.example/page");
		let from_array = parse_events(&bare, "https://source.example/page");

		assert_eq!(from_object.len(), 1);
		assert_eq!(from_array.len(), 1);
		assert_eq!(from_object[0].source_url, "https://source.example/page");
		assert_eq!(from_object[0].event_time, Some(time::macros::time!(18:00)));
		assert_eq!(from_object[0].timezone, "Asia/Seoul");
	}

	#[test]
	fn skips_entries_with_bad_dates_or_unknown_categories() {
		let payload = serde_json::json!({
			"events": [
				{
					"title": "Bad date",
					"artist_name": "BTS",
					"category": "concert",
					"event_date": "next friday",
					"venue": "V",
					"city": "Seoul",
					"country": "South Korea"
				},
				{
					"title": "Bad category",
					"artist_name": "BTS",
					"category": "afterparty",
					"event_date": "2026-03-15",
					"venue": "V",
					"city": "Seoul",
					"country": "South Korea"
				},
				{
					"title": "Good",
					"artist_name": "BTS",
					"category": "festival",
					"event_date": "2026-03-15",
					"venue": "V",
					"city": "Seoul",
					"country": "South Korea"
				}
			]
		});
		let events = parse_events(&payload, "https://source.example");

		assert_eq!(events.len(), 1);
		assert_eq!(events[0].title, "Good");
		assert_eq!(events[0].event_time, None);
	}

	#[test]
	fn malformed_time_is_dropped_but_event_survives() {
		let payload = serde_json::json!([{
			"title": "T",
			"artist_name": "A",
			"category": "concert",
			"event_date": "2026-01-02",
			"event_time": "evening",
			"venue": "V",
			"city": "C",
			"country": "K"
		}]);
		let events = parse_events(&payload, "https://source.example");

		assert_eq!(events.len(), 1);
		assert_eq!(events[0].event_time, None);
	}
}
