use chrono::{DateTime, Utc};
use serde::Serialize;

use gardepost_core::types::DisplayStatus;

/// Terminal result for one pharmacy in a generation run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Scheduled {
        post_id: String,
        fb_post_id: String,
    },
    Skipped {
        reason: String,
    },
    Failed {
        /// Machine-checkable cause, see [`crate::PublishError::code`].
        code: &'static str,
        /// Human-readable message, remote platform wording included.
        message: String,
    },
}

/// One pharmacy's outcome, in processing order.
#[derive(Debug, Clone, Serialize)]
pub struct EntityOutcome {
    pub pharmacy: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Full result of a generation run. The run itself only fails wholesale
/// when the shared message is missing or no pharmacies exist.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<EntityOutcome>,
}

impl BatchReport {
    pub fn scheduled(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Scheduled { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|e| pred(&e.outcome)).count()
    }
}

/// A post as shown to operators: persisted fields plus the derived
/// read-time status.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: String,
    pub pharmacy_name: Option<String>,
    pub image_path: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: DisplayStatus,
    pub fb_post_id: Option<String>,
}
