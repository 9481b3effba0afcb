use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// `Pending` is the only state that can be executed or cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendStatus {
    Pending,
    Executed,
    Failed,
    Cancelled,
}

impl SendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SendStatus::Pending => "PENDING",
            SendStatus::Executed => "EXECUTED",
            SendStatus::Failed => "FAILED",
            SendStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SendStatus::Pending)
    }
}

impl fmt::Display for SendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SendStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(SendStatus::Pending),
            "EXECUTED" => Ok(SendStatus::Executed),
            "FAILED" => Ok(SendStatus::Failed),
            "CANCELLED" => Ok(SendStatus::Cancelled),
            other => Err(format!("unknown send status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScheduledSendRow {
    pub id: Uuid,
    pub satellite_id: Option<Uuid>,
    pub scheduled_for: DateTime<Utc>,
    pub max_emails: Option<i32>,
    pub status: String,
    pub result: Option<Value>,
    pub executed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewScheduledSend {
    pub satellite_id: Uuid,
    pub scheduled_for: DateTime<Utc>,
    pub max_emails: i32,
    pub status: SendStatus,
    pub result: Option<Value>,
    pub executed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            SendStatus::Pending,
            SendStatus::Executed,
            SendStatus::Failed,
            SendStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<SendStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_only_pending_is_open() {
        assert!(!SendStatus::Pending.is_terminal());
        assert!(SendStatus::Executed.is_terminal());
        assert!(SendStatus::Failed.is_terminal());
        assert!(SendStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!("DONE".parse::<SendStatus>().is_err());
    }
}
