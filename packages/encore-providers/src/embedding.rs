use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

const MAX_INPUT_CHARS: usize = 8_000;

/// Embeds `texts` in request order. When the backend is unconfigured (empty
/// api key) every text maps to an all-zero vector of the configured dimension,
/// so similarity ranking degrades instead of failing.
pub async fn embed(
	cfg: &encore_config::EmbeddingProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	if cfg.api_key.trim().is_empty() {
		return Ok(texts.iter().map(|_| vec![0.0; cfg.dimensions as usize]).collect());
	}

	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let input: Vec<String> = texts.iter().map(|text| clean_input(text)).collect();
	let body = serde_json::json!({
		"model": cfg.model,
		"input": input,
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_embedding_response(json)
}

fn clean_input(text: &str) -> String {
	let cleaned = text.replace('\n', " ");
	let cleaned = cleaned.trim();

	cleaned.chars().take(MAX_INPUT_CHARS).collect()
}

fn parse_embedding_response(json: Value) -> Result<Vec<Vec<f32>>> {
	let data = json
		.get("data")
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Embedding response is missing a data array."))?;
	let mut indexed = Vec::with_capacity(data.len());

	for (fallback_index, item) in data.iter().enumerate() {
		let index = item
			.get("index")
			.and_then(|v| v.as_u64())
			.map(|v| v as usize)
			.unwrap_or(fallback_index);
		let values = item
			.get("embedding")
			.and_then(|v| v.as_array())
			.ok_or_else(|| eyre::eyre!("Embedding item is missing an embedding array."))?;
		let mut vec = Vec::with_capacity(values.len());

		for value in values {
			let number = value
				.as_f64()
				.ok_or_else(|| eyre::eyre!("Embedding values must be numeric."))?;

			vec.push(number as f32);
		}

		indexed.push((index, vec));
	}

	indexed.sort_by_key(|(index, _)| *index);

	Ok(indexed.into_iter().map(|(_, vec)| vec).collect())
}
