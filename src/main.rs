use anyhow::Result;
use apply_kit::cli::{run, Cli};
use apply_kit::logging;
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    logging::init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "CLI arguments parsed, invoking run");
    let result = run(cli).await;
    match &result {
        Ok(_) => tracing::info!("CLI completed successfully"),
        Err(e) => tracing::error!(error = %e, "CLI exited with error"),
    }
    result
}
