//! Analytics Module
//!
//! Pure transformations over PR and team collections: bot filtering,
//! membership filtering, statistics and time-window aggregations, plus the
//! loader for the flat JSON data files they consume.

mod aggregate;
mod filters;
mod records;
mod storage;

// Re-export public types
pub use aggregate::{
    analyze_period_data, analyze_review_efficiency, analyze_team_contributions,
    calculate_pr_statistics, Contribution, PeriodBucket, PrStatistics, ReviewEfficiency,
};
pub use filters::{filter_bot_accounts, filter_non_members, is_bot_account};
pub use records::{PrRecord, TeamData};
pub use storage::{load_pr_records, load_teams, PR_DATA_FILE, TEAMS_FILE};
