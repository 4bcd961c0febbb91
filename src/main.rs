//! fimcheck CLI — one integrity pass over the watched directory.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "fimcheck",
    version,
    about = "Directory integrity scanner. Hashes the watched directory and alerts on new, changed and deleted files"
)]
struct Cli {
    /// Enable verbose output (mirror events to the console)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_target(false)
        .init();

    if let Err(e) = fimcheck::cli::dispatch(std::path::Path::new("."), cli.verbose) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
