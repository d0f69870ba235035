use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use serenity::all::{CommandInteraction, Context, CreateAttachment, EditInteractionResponse};
use thiserror::Error;

pub const UPLOAD_FAILED_MESSAGE: &str =
    "Failed to edit interaction response after multiple attempts.";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Gave up after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },
}

/// How often an operation is tried and how long to wait in between.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const UPLOAD: RetryPolicy = RetryPolicy {
        attempts: 5,
        delay: Duration::from_secs(1),
    };
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::UPLOAD
    }
}

/// Runs `operation` until it succeeds or `policy.attempts` is used up.
///
/// The operation receives the 1-based attempt number. The delay is only slept between attempts.
pub async fn with_retries<T, E, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<T, UploadError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = policy.attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match operation(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!("[UPLOAD] {} succeeded on attempt {}", label, attempt);
                }
                return Ok(value);
            }
            Err(e) => {
                tracing::warn!(
                    "[UPLOAD] {} attempt {}/{} failed: {}",
                    label,
                    attempt,
                    attempts,
                    e
                );
                last_error = e.to_string();
                if attempt < attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    Err(UploadError::Exhausted {
        attempts,
        last_error,
    })
}

/// Edits the deferred response to carry `bytes` as `file_name`, retrying on failure.
///
/// If every attempt fails the response is replaced with [`UPLOAD_FAILED_MESSAGE`].
pub async fn upload_png(
    context: &Context,
    interaction: &CommandInteraction,
    bytes: Vec<u8>,
    file_name: &str,
    content: &str,
) -> anyhow::Result<()> {
    let result = with_retries(RetryPolicy::UPLOAD, file_name, |_| {
        let edit = EditInteractionResponse::new()
            .content(content)
            .new_attachment(CreateAttachment::bytes(bytes.clone(), file_name));
        async move { interaction.edit_response(&context.http, edit).await }
    })
    .await;

    match result {
        Ok(_) => {
            tracing::info!("[UPLOAD] Sent {} ({} bytes)", file_name, bytes.len());
            Ok(())
        }
        Err(e) => {
            tracing::error!("[UPLOAD] Failed to send {}: {}", file_name, e);
            interaction
                .edit_response(
                    &context.http,
                    EditInteractionResponse::new().content(UPLOAD_FAILED_MESSAGE),
                )
                .await
                .map_err(|e| anyhow::anyhow!("Failed to report upload failure: {}", e))?;
            Ok(())
        }
    }
}
