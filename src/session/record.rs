use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::{Language, Platform};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionOutcome {
    Ready,
    Errored,
}

/// Structured summary printed when a session reaches a terminal phase.
#[derive(Debug, Clone, Serialize)]
pub struct SessionRecord {
    pub article_id: String,
    pub platform: Platform,
    pub language: Language,
    pub outcome: SessionOutcome,
    pub submitted_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl SessionRecord {
    pub fn new(
        article_id: String,
        platform: Platform,
        language: Language,
        outcome: SessionOutcome,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let finished_at = Utc::now();
        let duration = finished_at - submitted_at;
        Self {
            article_id,
            platform,
            language,
            outcome,
            submitted_at,
            finished_at,
            duration_ms: duration.num_milliseconds(),
        }
    }
}
