use super::batch_submitter::BatchReceipt;
use eyre::Result;
use tokio::sync::watch;

pub const GENERIC_SUBMISSION_ERROR: &str = "Failed to send batch transaction";

/// Outcome of the latest submission attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// Nothing submitted yet.
    #[default]
    Idle,
    Pending,
    Succeeded(BatchReceipt),
    Failed { message: String },
}

impl SubmissionStatus {
    pub fn failed(error: impl ToString) -> Self {
        let message = error.to_string();
        if message.trim().is_empty() {
            Self::Failed {
                message: GENERIC_SUBMISSION_ERROR.to_string(),
            }
        } else {
            Self::Failed { message }
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed { .. })
    }
}

/// Waits until the submission watched by `receiver` succeeds or fails.
pub async fn wait_for_outcome(
    receiver: &mut watch::Receiver<SubmissionStatus>,
) -> Result<SubmissionStatus> {
    let status = receiver.wait_for(SubmissionStatus::is_final).await?;
    Ok(status.clone())
}
