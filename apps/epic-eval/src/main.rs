// crates.io
use clap::Parser;
// self
use epic_eval::Args;

fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = Args::parse();
	epic_eval::run(args)
}
