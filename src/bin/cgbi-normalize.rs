// Converts an iOS CgBI PNG into a standard PNG
// `cargo run -- AppIcon60x60@2x.png AppIcon.png`
use anyhow::{bail, Context, Result};
use cgbi_normalizer::{normalize_file, Options};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "cgbi-normalize")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert PNG files from iOS app bundles into standard PNG files")]
struct Cli {
    /// CgBI PNG to read
    input: PathBuf,

    /// Where to write the standard PNG, must not exist yet
    output: PathBuf,

    /// Reject chunks whose CRC-32 doesn't match their content
    #[arg(long)]
    verify_checksums: bool,

    /// zlib compression level for the rebuilt image data (0-9)
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(0..=9))]
    level: u32,

    /// Log more, repeat for even more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

    if cli.output.exists() {
        bail!("Target file '{}' already exists.", cli.output.display());
    }

    let options =
        Options::new().verify_checksums(cli.verify_checksums).compression_level(cli.level);
    normalize_file(&cli.input, &cli.output, &options)
        .with_context(|| format!("couldn't normalize '{}'", cli.input.display()))?;

    println!("File normalized successfully.");
    Ok(())
}
