use toml::Value;

use encore_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.")
}

fn sample_toml_with_search(key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let search = root
		.as_table_mut()
		.and_then(|table| table.get_mut("search"))
		.and_then(Value::as_table_mut)
		.expect("Template config must include [search].");

	search.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render template config.")
}

fn expect_validation_error(raw: &str) -> String {
	let cfg: Config = toml::from_str(raw).expect("Failed to parse config.");

	match encore_config::validate(&cfg) {
		Err(Error::Validation { message }) => message,
		other => panic!("Expected a validation error, got {other:?}."),
	}
}

#[test]
fn sample_config_validates() {
	let cfg = sample_config();

	encore_config::validate(&cfg).expect("Sample config must validate.");
	assert_eq!(cfg.search.cache_ttl_hours, 24);
	assert_eq!(cfg.search.max_per_page, 100);
}

#[test]
fn search_defaults_apply_when_section_is_absent() {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");

	root.as_table_mut().expect("Template config must be a table.").remove("search");

	let raw = toml::to_string(&root).expect("Failed to render template config.");
	let cfg: Config = toml::from_str(&raw).expect("Failed to parse config.");

	assert_eq!(cfg.search.cache_ttl_hours, 24);
	assert_eq!(cfg.search.max_web_results, 10);
	assert_eq!(cfg.search.default_per_page, 20);
	assert_eq!(cfg.search.max_per_page, 100);
}

#[test]
fn rejects_non_positive_cache_ttl() {
	let raw = sample_toml_with_search("cache_ttl_hours", Value::Integer(0));
	let message = expect_validation_error(&raw);

	assert!(message.contains("cache_ttl_hours"));
}

#[test]
fn rejects_zero_max_web_results() {
	let raw = sample_toml_with_search("max_web_results", Value::Integer(0));
	let message = expect_validation_error(&raw);

	assert!(message.contains("max_web_results"));
}

#[test]
fn rejects_max_per_page_below_default() {
	let raw = sample_toml_with_search("max_per_page", Value::Integer(5));
	let message = expect_validation_error(&raw);

	assert!(message.contains("max_per_page"));
}

#[test]
fn rejects_embedding_dimension_mismatch() {
	let mut cfg = sample_config();

	cfg.providers.embedding.dimensions = 768;

	match encore_config::validate(&cfg) {
		Err(Error::Validation { message }) => {
			assert!(message.contains("storage.vector_dim"));
		},
		other => panic!("Expected a validation error, got {other:?}."),
	}
}

#[test]
fn empty_provider_api_keys_are_allowed() {
	let cfg = sample_config();

	assert!(cfg.providers.embedding.api_key.is_empty());
	encore_config::validate(&cfg).expect("Unconfigured providers must still validate.");
}
