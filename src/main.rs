use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use wellminder_icon::icon_gen;

#[derive(Debug, Parser)]
#[clap(
    name = "wellminder-icon",
    about = "Generate the WellMinder app icon and its resized PNG copies"
)]
struct Args {
    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    icon_gen::generate_icons(&args.output)?;
    Ok(())
}
