//! Line-delimited JSON question-answering service.
//!
//! Reads `{"context": ..., "question": ...}` objects one per line from stdin and
//! writes one answer (or error) object per line to stdout. Designed to be
//! spawned by a parent process that owns both pipes, so stdout carries only
//! protocol lines and all diagnostics go to stderr.
//!
//! # Environment Variables
//!
//! - `QA_MODEL`: model repository to query
//! - `QA_ENDPOINT`: inference API base URL
//! - `HF_API_TOKEN` (or `HF_TOKEN`): inference API token
//! - `RUST_LOG`: logging level (trace, debug, info, warn, error)

use qabridge::qa::pipeline::{HostedQaPipeline, QaConfig};
use qabridge::qa::server;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("qabridge=info")),
        )
        .init();

    // The pipeline is acquired exactly once, before any request is read.
    let config = QaConfig::default();
    tracing::info!(model = %config.model, "starting question-answering service");

    let pipeline = match HostedQaPipeline::new(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("[qabridge::qa-stdio] failed to initialize pipeline: {e}");
            std::process::exit(1);
        }
    };

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    // The loop only fails when stdin or stdout breaks; request failures are
    // answered on the wire and never end the process.
    if let Err(e) = server::serve(stdin, stdout, &pipeline).await {
        eprintln!("[qabridge::qa-stdio] serve loop failed: {e}");
        std::process::exit(1);
    }
}
