pub mod worker;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use encore_service::PgCacheStore;
use encore_storage::db::Db;

#[derive(Debug, Parser)]
#[command(rename_all = "kebab")]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: std::path::PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = encore_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let db = Arc::new(Db::connect(&config.storage.postgres).await?);

	db.ensure_schema(config.storage.vector_dim).await?;

	let state = worker::WorkerState { cache: Arc::new(PgCacheStore::new(db)) };

	worker::run_worker(state).await
}
