use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = encore_worker::Args::parse();

	encore_worker::run(args).await
}
