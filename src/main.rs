use clap::Parser;

use docextract::infrastructure::observability::{TracingConfig, init_tracing};
use docextract::presentation::cli::{self, Cli};
use docextract::presentation::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (settings, environment) = Settings::load()?;

    init_tracing(&TracingConfig {
        environment: environment.to_string(),
        json_format: settings.logging.json,
    });
    tracing::info!(%environment, provider = %settings.vector_store.provider, "Starting docextract");

    let output = cli::run(cli, settings).await?;
    println!("{output}");
    Ok(())
}
