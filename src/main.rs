use anyhow::Result;
use repo_scraper::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Diagnostics go to stderr, progress and the final count to stdout
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    cli.run()?;

    Ok(())
}
