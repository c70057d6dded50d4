//! Account Filter Module
//!
//! Bot-account detection and team-membership filtering over PR collections.
//! Pure functions, no I/O.

use std::collections::HashMap;

use crate::analytics::{PrRecord, TeamData};

// == Bot Detection ==
/// Known bot-name fragments, matched case-insensitively as substrings.
const BOT_NAME_FRAGMENTS: &[&str] = &[
    "bot",
    "[bot]",
    "dependabot",
    "github-actions",
    "renovate",
    "greenkeeper",
    "codecov",
    "snyk",
];

/// Whether an account name looks like a bot.
pub fn is_bot_account(name: &str) -> bool {
    let lower = name.to_lowercase();
    BOT_NAME_FRAGMENTS
        .iter()
        .any(|fragment| lower.contains(fragment))
}

/// Retains only the non-bot entries of an account-keyed map.
pub fn filter_bot_accounts<V: Clone>(accounts: &HashMap<String, V>) -> HashMap<String, V> {
    accounts
        .iter()
        .filter(|(name, _)| !is_bot_account(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

// == Membership Filter ==
/// Keeps PRs authored by team members that are not bots.
///
/// Without team data the filter falls back to bot-filtering alone.
pub fn filter_non_members(prs: &[PrRecord], teams: Option<&TeamData>) -> Vec<PrRecord> {
    prs.iter()
        .filter(|pr| !is_bot_account(&pr.author))
        .filter(|pr| match teams {
            Some(teams) => teams.is_member(&pr.author),
            None => true,
        })
        .cloned()
        .collect()
}
