use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = tissues_api::Args::parse();

	tissues_api::run(args).await
}
