use crate::bingo::score::Score;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const MIN_NAME_LEN: usize = 3;

#[derive(Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Name must be at least {min} characters, got {len}")]
    TooShort { len: usize, min: usize },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "String")]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(name: &str) -> Result<Self, NameError> {
        let len = name.chars().count();
        if len < MIN_NAME_LEN {
            return Err(NameError::TooShort {
                len,
                min: MIN_NAME_LEN,
            });
        }
        Ok(PlayerName(name.to_string()))
    }

    pub fn get(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = NameError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        PlayerName::new(&name)
    }
}

// Body sent to the remote score service
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScoreSubmission {
    #[serde(rename = "answer")]
    pub score: Score,
    pub name: PlayerName,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum SubmissionOutcome {
    Success { data: Value },
    Failure { message: String },
}

/// Message shown to the player after a submission attempt.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl From<&SubmissionOutcome> for Notification {
    fn from(outcome: &SubmissionOutcome) -> Self {
        match outcome {
            SubmissionOutcome::Success { .. } => Notification {
                title: "Hooray!".to_string(),
                message: "You submitted your score successfully.".to_string(),
            },
            SubmissionOutcome::Failure { message } => Notification {
                title: "Oops. An error has occured!".to_string(),
                message: message.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_player_name_length() {
        assert_eq!(
            PlayerName::new("Gr"),
            Err(NameError::TooShort { len: 2, min: 3 })
        );
        assert!(PlayerName::new("").is_err());
        assert_eq!(PlayerName::new("Greg").unwrap().get(), "Greg");
        // Counted in characters, not bytes
        assert!(PlayerName::new("åø").is_err());
        assert!(PlayerName::new("åøæ").is_ok());
    }

    #[test]
    fn test_submission_body() {
        let submission = ScoreSubmission {
            score: 1924,
            name: PlayerName::new("Greg").unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&submission).unwrap(),
            json!({"answer": 1924, "name": "Greg"})
        );
        assert!(serde_json::from_value::<ScoreSubmission>(json!({"answer": 1, "name": "x"})).is_err());
    }

    #[test]
    fn test_notifications() {
        let success = SubmissionOutcome::Success { data: json!({"ok": true}) };
        assert_eq!(Notification::from(&success).title, "Hooray!");

        let failure = SubmissionOutcome::Failure {
            message: "Network Error".to_string(),
        };
        let notification = Notification::from(&failure);
        assert_eq!(notification.title, "Oops. An error has occured!");
        assert_eq!(notification.message, "Network Error");
    }
}
