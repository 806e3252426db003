use serde_json::Map;

use encore_config::{EmbeddingProviderConfig, LlmProviderConfig, WebSearchProviderConfig};

fn unconfigured_embedding() -> EmbeddingProviderConfig {
	EmbeddingProviderConfig {
		provider_id: "openai".to_string(),
		api_base: "https://api.openai.com".to_string(),
		api_key: String::new(),
		path: "/v1/embeddings".to_string(),
		model: "text-embedding-3-small".to_string(),
		dimensions: 4,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

#[tokio::test]
async fn unconfigured_embedding_returns_zero_vectors() {
	let cfg = unconfigured_embedding();
	let texts = vec!["first".to_string(), "second".to_string()];
	let vectors =
		encore_providers::embedding::embed(&cfg, &texts).await.expect("embed must not fail");

	assert_eq!(vectors, vec![vec![0.0; 4], vec![0.0; 4]]);
}

#[tokio::test]
async fn unconfigured_extractor_yields_no_candidates() {
	let cfg = LlmProviderConfig {
		provider_id: "openai".to_string(),
		api_base: "https://api.openai.com".to_string(),
		api_key: String::new(),
		path: "/v1/chat/completions".to_string(),
		model: "gpt-4o-mini".to_string(),
		temperature: 0.1,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	};
	let events = encore_providers::extractor::extract(&cfg, "BTS", "content", "https://a.example")
		.await
		.expect("extract must not fail");

	assert!(events.is_empty());
}

#[tokio::test]
async fn unconfigured_web_search_yields_no_documents() {
	let cfg = WebSearchProviderConfig {
		provider_id: "tavily".to_string(),
		api_base: "https://api.tavily.com".to_string(),
		api_key: String::new(),
		path: "/search".to_string(),
		timeout_ms: 1_000,
	};
	let docs = encore_providers::web_search::search(&cfg, "BTS", 10)
		.await
		.expect("search must not fail");

	assert!(docs.is_empty());
}
