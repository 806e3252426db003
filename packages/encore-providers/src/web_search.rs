use std::time::Duration;

use color_eyre::Result;
use reqwest::Client;
use serde_json::Value;

/// One scored document returned by the web search backend.
#[derive(Debug, Clone)]
pub struct WebDocument {
	pub title: String,
	pub url: String,
	pub content: String,
	pub score: f32,
}

/// Searches the web for pages likely to mention events for `query`. An
/// unconfigured backend (empty api key) yields no documents rather than an
/// error; the caller treats that the same as an empty result page.
pub async fn search(
	cfg: &encore_config::WebSearchProviderConfig,
	query: &str,
	max_results: u32,
) -> Result<Vec<WebDocument>> {
	if cfg.api_key.trim().is_empty() {
		return Ok(Vec::new());
	}

	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"api_key": cfg.api_key,
		"query": format!("{query} concert event schedule"),
		"search_depth": "advanced",
		"max_results": max_results,
		"include_answer": false,
		"include_raw_content": false,
	});
	let res = client.post(url).json(&body).send().await?;
	let json: Value = res.error_for_status()?.json().await?;

	Ok(parse_search_response(json))
}

fn parse_search_response(json: Value) -> Vec<WebDocument> {
	let Some(items) = json.get("results").and_then(|v| v.as_array()) else {
		return Vec::new();
	};

	items
		.iter()
		.map(|item| WebDocument {
			title: string_field(item, "title"),
			url: string_field(item, "url"),
			content: string_field(item, "content"),
			score: item.get("score").and_then(|v| v.as_f64()).unwrap_or(0.0) as f32,
		})
		.collect()
}

fn string_field(item: &Value, key: &str) -> String {
	item.get(key).and_then(|v| v.as_str()).unwrap_or_default().to_string()
}
