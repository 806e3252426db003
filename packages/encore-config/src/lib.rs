mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, LlmProviderConfig, Postgres, Providers, Search, Service,
	Storage, WebSearchProviderConfig,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.admin_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.admin_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.vector_dim.".to_string(),
		});
	}

	for (label, timeout_ms) in [
		("embedding", cfg.providers.embedding.timeout_ms),
		("llm_extractor", cfg.providers.llm_extractor.timeout_ms),
		("web_search", cfg.providers.web_search.timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("Provider {label} timeout_ms must be greater than zero."),
			});
		}
	}

	if cfg.search.cache_ttl_hours <= 0 {
		return Err(Error::Validation {
			message: "search.cache_ttl_hours must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_web_results == 0 {
		return Err(Error::Validation {
			message: "search.max_web_results must be greater than zero.".to_string(),
		});
	}
	if cfg.search.default_per_page == 0 {
		return Err(Error::Validation {
			message: "search.default_per_page must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_per_page < cfg.search.default_per_page {
		return Err(Error::Validation {
			message: "search.max_per_page must be at least search.default_per_page.".to_string(),
		});
	}

	Ok(())
}
