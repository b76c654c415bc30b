use async_trait::async_trait;
use common::{ScoreSubmission, SubmissionOutcome};
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_SUBMIT_URL: &str = "https://customer-api.krea.se/coding-tests/api/squid-game";

/// Hands a final score to whoever keeps track of them.
#[async_trait]
pub trait ScoreSubmitter: Send + Sync {
    async fn submit(&self, submission: &ScoreSubmission) -> SubmissionOutcome;
}

#[derive(Debug)]
pub struct HttpSubmitter {
    url: String,
    client: reqwest::Client,
}

impl HttpSubmitter {
    pub fn new(url: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(HttpSubmitter {
            url: url.to_string(),
            client,
        })
    }

    async fn post(&self, submission: &ScoreSubmission) -> Result<Value, reqwest::Error> {
        let body = self
            .client
            .post(&self.url)
            .json(submission)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        // Keep non-JSON bodies as plain strings
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}

#[async_trait]
impl ScoreSubmitter for HttpSubmitter {
    async fn submit(&self, submission: &ScoreSubmission) -> SubmissionOutcome {
        match self.post(submission).await {
            Ok(data) => {
                info!(
                    "submitted score {} for {}",
                    submission.score,
                    submission.name.get()
                );
                SubmissionOutcome::Success { data }
            }
            Err(err) => {
                warn!("Score submission to {} failed: {}", self.url, err);
                SubmissionOutcome::Failure {
                    message: err.to_string(),
                }
            }
        }
    }
}
