//! PR and Team Record Module
//!
//! External data shapes consumed by the aggregations. Field names follow the
//! camelCase contract of the persisted JSON files; every field is defensive
//! (missing counts become zero, missing lists become empty).

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == PR Record ==
/// One pull request as persisted in `github_data.json`. Read-only input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub num_comments: u64,
    #[serde(default)]
    pub lifetime_days: Option<f64>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub assignees: Vec<String>,
    #[serde(default)]
    pub requested_reviewers: Vec<String>,
}

impl PrRecord {
    /// Whether the PR was merged (merge timestamp wins over the status string).
    pub fn is_merged(&self) -> bool {
        self.merged_at.is_some() || self.status.eq_ignore_ascii_case("merged")
    }

    /// Whether the PR is closed, merged or not.
    pub fn is_closed(&self) -> bool {
        self.is_merged() || self.closed_at.is_some() || self.status.eq_ignore_ascii_case("closed")
    }

    /// Lifetime in days: the stored value when present, otherwise derived
    /// from creation to close (or to now for open PRs).
    pub fn lifetime(&self) -> f64 {
        if let Some(days) = self.lifetime_days {
            return days;
        }
        let Some(created) = self.created_at else {
            return 0.0;
        };
        let end = self
            .closed_at
            .or(self.merged_at)
            .unwrap_or_else(Utc::now);
        let seconds = (end - created).num_seconds().max(0) as f64;
        seconds / 86_400.0
    }
}

// == Team Data ==
/// Team membership as persisted in `teams.json`: team name to member logins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamData {
    #[serde(flatten)]
    pub teams: HashMap<String, Vec<String>>,
}

impl TeamData {
    /// All members across teams, deduplicated.
    pub fn members(&self) -> HashSet<&str> {
        self.teams
            .values()
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// Whether `login` belongs to any team.
    pub fn is_member(&self, login: &str) -> bool {
        self.teams.values().any(|members| {
            members.iter().any(|member| member == login)
        })
    }
}
