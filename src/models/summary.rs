//! Aggregated usage data for one user and one time window.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Time spent on one category value (a language, an editor, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct SummaryItem {
    pub key: String,
    pub total_seconds: i64,
}

impl SummaryItem {
    pub fn new(key: impl Into<String>, total_seconds: i64) -> Self {
        Self {
            key: key.into(),
            total_seconds,
        }
    }
}

/// Usage grouped per category, each list ordered by descending time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub projects: Vec<SummaryItem>,
    pub languages: Vec<SummaryItem>,
    pub editors: Vec<SummaryItem>,
    pub operating_systems: Vec<SummaryItem>,
    pub machines: Vec<SummaryItem>,
}

impl Summary {
    pub fn empty(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from,
            to,
            projects: Vec::new(),
            languages: Vec::new(),
            editors: Vec::new(),
            operating_systems: Vec::new(),
            machines: Vec::new(),
        }
    }

    /// Total tracked time. Every category partitions the same durations, so
    /// the largest category sum is the total even if some are unpopulated.
    pub fn total_seconds(&self) -> i64 {
        [
            &self.projects,
            &self.languages,
            &self.editors,
            &self.operating_systems,
            &self.machines,
        ]
        .iter()
        .map(|items| items.iter().map(|i| i.total_seconds).sum::<i64>())
        .max()
        .unwrap_or(0)
    }
}
