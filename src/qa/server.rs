//! Line-delimited JSON serve loop
//!
//! Reads one request object per line, answers it with the configured
//! backend, and writes exactly one response object per line. The output
//! stream is the protocol channel: the parent process parses every line as
//! JSON, so responses are flushed immediately and diagnostics never go
//! there.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::qa::{QaBackend, QaError};
use crate::types::{ErrorResponse, QaAnswer, QaRequest};

/// Parse one input line and answer it.
///
/// Returns the typed outcome of the iteration; the loop serializes either
/// variant. Blank lines are handled by the caller and never reach this
/// function.
pub async fn process_line<B: QaBackend>(backend: &B, line: &str) -> Result<QaAnswer, QaError> {
    let request: QaRequest =
        serde_json::from_str(line).map_err(|e| QaError::BadRequest(e.to_string()))?;

    tracing::debug!(question = %request.question, "processing request");
    backend.answer(&request.context, &request.question).await
}

/// Run the request/response loop until the input stream closes.
///
/// Per iteration: one line in, at most one line out. Blank lines produce no
/// output and keep the process alive. Request failures of any kind are
/// converted to an `{"error": ...}` line and are never fatal; only a broken
/// input or output stream ends the loop.
pub async fn serve<R, W, B>(reader: R, mut writer: W, backend: &B) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    B: QaBackend,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let payload = match process_line(backend, &line).await {
            Ok(answer) => serde_json::to_string(&answer),
            Err(e) => {
                tracing::debug!("request failed: {}", e);
                serde_json::to_string(&ErrorResponse {
                    error: e.to_string(),
                })
            }
        }
        .unwrap_or_else(|e| format!(r#"{{"error":"failed to serialize response: {}"}}"#, e));

        // Flush per line: the consumer blocks on a line-by-line read, so a
        // buffered response would deadlock it.
        writer.write_all(payload.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    tracing::info!("input stream closed, shutting down");
    Ok(())
}
