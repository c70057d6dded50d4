//! Aggregation Module
//!
//! Pure reducers over PR collections: headline statistics, fixed-window
//! period bucketing, review efficiency and per-author contributions.
//! Deterministic, no I/O, tolerant of sparse records.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::analytics::{filter_non_members, PrRecord, TeamData};

// == Result Shapes ==
/// Headline counts and averages over a PR collection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PrStatistics {
    pub total: usize,
    pub open: usize,
    pub closed: usize,
    pub merged: usize,
    pub merge_rate_percent: f64,
    pub avg_lifetime_days: f64,
    pub avg_comments: f64,
}

/// Activity within one fixed time window.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodBucket {
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub opened: usize,
    pub merged: usize,
    pub closed: usize,
    pub avg_lifetime_days: f64,
}

/// Review activity summary.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewEfficiency {
    pub total: usize,
    pub reviewed: usize,
    pub unreviewed: usize,
    pub avg_comments_per_pr: f64,
    pub avg_days_to_close: f64,
}

/// One author's share of the work.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Contribution {
    pub opened: usize,
    pub merged: usize,
    pub total_comments: u64,
    pub avg_lifetime_days: f64,
}

// == Statistics ==
/// Counts PRs by state and averages lifetime and comment volume.
pub fn calculate_pr_statistics(prs: &[PrRecord]) -> PrStatistics {
    let total = prs.len();
    if total == 0 {
        return PrStatistics::default();
    }

    let merged = prs.iter().filter(|pr| pr.is_merged()).count();
    let closed = prs
        .iter()
        .filter(|pr| pr.is_closed() && !pr.is_merged())
        .count();
    let open = total - merged - closed;

    let lifetime_sum: f64 = prs.iter().map(PrRecord::lifetime).sum();
    let comment_sum: u64 = prs.iter().map(|pr| pr.num_comments).sum();

    PrStatistics {
        total,
        open,
        closed,
        merged,
        merge_rate_percent: round1(merged as f64 / total as f64 * 100.0),
        avg_lifetime_days: round1(lifetime_sum / total as f64),
        avg_comments: round1(comment_sum as f64 / total as f64),
    }
}

// == Period Bucketing ==
/// Buckets PR activity into fixed windows of `period_days`, oldest first.
///
/// Windows span from the earliest creation date through the latest; PRs
/// lacking a creation date are skipped. Returns an empty vector for empty
/// input or a non-positive window.
pub fn analyze_period_data(prs: &[PrRecord], period_days: i64) -> Vec<PeriodBucket> {
    if period_days <= 0 {
        return Vec::new();
    }
    let created: Vec<DateTime<Utc>> = prs.iter().filter_map(|pr| pr.created_at).collect();
    let (Some(&first), Some(&last)) = (created.iter().min(), created.iter().max()) else {
        return Vec::new();
    };

    let window = Duration::days(period_days);
    let mut buckets = Vec::new();
    let mut start = first;

    while start <= last {
        let end = start + window;
        let in_window =
            |ts: Option<DateTime<Utc>>| ts.map(|t| t >= start && t < end).unwrap_or(false);

        let opened: Vec<&PrRecord> = prs.iter().filter(|pr| in_window(pr.created_at)).collect();
        let lifetime_sum: f64 = opened.iter().map(|pr| pr.lifetime()).sum();
        let avg_lifetime_days = if opened.is_empty() {
            0.0
        } else {
            round1(lifetime_sum / opened.len() as f64)
        };

        buckets.push(PeriodBucket {
            period_start: start,
            period_end: end,
            opened: opened.len(),
            merged: prs.iter().filter(|pr| in_window(pr.merged_at)).count(),
            closed: prs.iter().filter(|pr| in_window(pr.closed_at)).count(),
            avg_lifetime_days,
        });
        start = end;
    }

    buckets
}

// == Review Efficiency ==
/// Splits PRs by review activity (any comment counts as a review touch)
/// and averages time-to-close over the closed subset.
pub fn analyze_review_efficiency(prs: &[PrRecord]) -> ReviewEfficiency {
    let total = prs.len();
    if total == 0 {
        return ReviewEfficiency::default();
    }

    let reviewed = prs.iter().filter(|pr| pr.num_comments > 0).count();
    let comment_sum: u64 = prs.iter().map(|pr| pr.num_comments).sum();

    let closed: Vec<&PrRecord> = prs.iter().filter(|pr| pr.is_closed()).collect();
    let avg_days_to_close = if closed.is_empty() {
        0.0
    } else {
        round1(closed.iter().map(|pr| pr.lifetime()).sum::<f64>() / closed.len() as f64)
    };

    ReviewEfficiency {
        total,
        reviewed,
        unreviewed: total - reviewed,
        avg_comments_per_pr: round1(comment_sum as f64 / total as f64),
        avg_days_to_close,
    }
}

// == Team Contributions ==
/// Per-author contribution summary, restricted to team members (bots and
/// non-members dropped; with no team data, bots alone are dropped).
pub fn analyze_team_contributions(
    prs: &[PrRecord],
    teams: Option<&TeamData>,
) -> BTreeMap<String, Contribution> {
    let eligible = filter_non_members(prs, teams);

    let mut by_author: BTreeMap<String, Vec<&PrRecord>> = BTreeMap::new();
    for pr in &eligible {
        by_author.entry(pr.author.clone()).or_default().push(pr);
    }

    by_author
        .into_iter()
        .map(|(author, prs)| {
            let opened = prs.len();
            let merged = prs.iter().filter(|pr| pr.is_merged()).count();
            let total_comments = prs.iter().map(|pr| pr.num_comments).sum();
            let lifetime_sum: f64 = prs.iter().map(|pr| pr.lifetime()).sum();
            (
                author,
                Contribution {
                    opened,
                    merged,
                    total_comments,
                    avg_lifetime_days: round1(lifetime_sum / opened as f64),
                },
            )
        })
        .collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
