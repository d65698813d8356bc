//! One-shot fine-tune flow
//!
//! Creates an adapter from the base model, fine-tunes it on the fixed sample
//! set, generates one completion for the given question, and deletes the
//! adapter on every exit path, success or failure.

use crate::gradient::client::{GradientClient, ModelAdapter, Sample};
use crate::gradient::GradientError;

/// Base model the adapter is created from
pub const BASE_MODEL_SLUG: &str = "nous-hermes2";

/// Name of the throwaway adapter
pub const ADAPTER_NAME: &str = "test model 3";

/// Completion length cap
pub const MAX_GENERATED_TOKENS: u32 = 100;

/// Fixed instruction/response pairs the adapter is tuned on
const SAMPLES: [(&str, &str); 4] = [
    ("What is your branch", "Btech"),
    ("Skills ?", "Coding, Development"),
    ("Job?", "SDE at google"),
    ("What is your branch", "Mechanical Engineering"),
];

/// Render a question in the instruction template the samples use
pub fn prompt_for(question: &str) -> String {
    format!("### Instruction: {} \n\n### Response:", question)
}

/// The sample set in the service's input format
pub fn training_samples() -> Vec<Sample> {
    SAMPLES
        .iter()
        .map(|(instruction, response)| Sample {
            inputs: format!(
                "### Instruction: {} \n\n### Response: {}",
                instruction, response
            ),
        })
        .collect()
}

/// Run the whole flow for one question and return the generated completion.
///
/// The adapter is deleted whether or not tuning and completion succeeded; a
/// deletion failure after a successful run is logged, not propagated.
pub async fn run_finetune(
    client: &GradientClient,
    question: &str,
) -> Result<String, GradientError> {
    let base = client.base_model(BASE_MODEL_SLUG).await?;
    let adapter = client.create_model_adapter(&base.id, ADAPTER_NAME).await?;
    tracing::info!(adapter = %adapter.id, "created model adapter");

    let result = tune_and_complete(client, &adapter, question).await;

    if let Err(e) = client.delete_model_adapter(&adapter.id).await {
        tracing::warn!(adapter = %adapter.id, "failed to delete adapter: {}", e);
    }

    result
}

async fn tune_and_complete(
    client: &GradientClient,
    adapter: &ModelAdapter,
    question: &str,
) -> Result<String, GradientError> {
    client.fine_tune(&adapter.id, &training_samples()).await?;
    client
        .complete(&adapter.id, &prompt_for(question), MAX_GENERATED_TOKENS)
        .await
}
