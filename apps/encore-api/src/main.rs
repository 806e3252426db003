use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = encore_api::Args::parse();

	encore_api::run(args).await
}
