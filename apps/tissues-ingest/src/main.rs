use clap::Parser;

fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = tissues_ingest::Args::parse();

	tissues_ingest::run(args)
}
