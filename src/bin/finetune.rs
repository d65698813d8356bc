//! One-shot Gradient fine-tune run.
//!
//! Creates a model adapter from the `nous-hermes2` base model, fine-tunes it
//! on a fixed sample set, prints one completion for the given question, and
//! deletes the adapter before exiting.
//!
//! # Environment Variables
//!
//! - `GRADIENT_ACCESS_TOKEN`: workspace access token (required)
//! - `GRADIENT_WORKSPACE_ID`: workspace identifier (required)
//! - `GRADIENT_API_URL`: API base URL override
//!
//! Both required variables may also come from a `.env` file in the working
//! directory.

use clap::Parser;

use qabridge::gradient::client::{GradientClient, GradientConfig};
use qabridge::gradient::run::{prompt_for, run_finetune};
use qabridge::gradient::GradientError;

/// Fine-tune a hosted model adapter and answer one question with it
#[derive(Debug, Parser)]
#[command(name = "finetune", version)]
struct Cli {
    /// Question to ask the fine-tuned adapter
    question: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("qabridge=info")),
        )
        .init();

    let cli = Cli::parse();

    let Some(question) = cli.question else {
        println!("No question provided.");
        return;
    };

    // Optional; the process environment wins over the file.
    dotenvy::dotenv().ok();

    if let Err(e) = run(&question).await {
        match e {
            GradientError::Unauthorized => {
                eprintln!("Unauthorized: check your access token and permissions.");
            }
            other => eprintln!("An error occurred: {other}"),
        }
        std::process::exit(1);
    }
}

async fn run(question: &str) -> Result<(), GradientError> {
    let config = GradientConfig::from_env()?;
    let client = GradientClient::new(config)?;

    println!("Asking: {}", prompt_for(question));

    let completion = run_finetune(&client, question).await?;
    println!("Generated (after fine-tune): {completion}");

    Ok(())
}
