use std::io::{self, Write};
use std::process::ExitCode;

use dotenv::dotenv;
use gemini_json_probe::{GeminiClient, LlmError, ProbeConfig, ProbeOutcome, run_probe};
use tracing_subscriber::EnvFilter;

async fn probe() -> Result<ProbeOutcome, LlmError> {
    let config = ProbeConfig::from_env()?;
    let client = GeminiClient::from_config(&config)?;
    tracing::debug!(model = client.model(), "Client ready");

    run_probe(&client, &config.prompt).await
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match probe().await {
        Ok(outcome) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = outcome.render(&mut stdout).and_then(|_| stdout.flush()) {
                eprintln!("Failed to write report: {e}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
