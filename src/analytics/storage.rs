//! Flat-File Storage Module
//!
//! Loads the externally-produced JSON data files. Their shapes are an
//! external contract: a fetch script writes them, this module only reads.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::analytics::{PrRecord, TeamData};
use crate::error::Result;

/// File holding the fetched pull-request records.
pub const PR_DATA_FILE: &str = "github_data.json";

/// File holding team membership, produced separately and often absent.
pub const TEAMS_FILE: &str = "teams.json";

/// Reads PR records from `github_data.json` in `data_dir`.
///
/// Accepts either a bare array of records or an object wrapping them under
/// a `pullRequests` key.
pub fn load_pr_records(data_dir: &Path) -> Result<Vec<PrRecord>> {
    let path = data_dir.join(PR_DATA_FILE);
    let text = fs::read_to_string(&path)?;
    let value: Value = serde_json::from_str(&text)?;

    let records = match value {
        Value::Array(_) => value,
        other => other
            .get("pullRequests")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new())),
    };

    let parsed: Vec<PrRecord> = serde_json::from_value(records)?;
    debug!(count = parsed.len(), path = %path.display(), "loaded PR records");
    Ok(parsed)
}

/// Reads team membership from `teams.json` in `data_dir`.
///
/// A missing file is not an error: membership filtering simply falls back
/// to bot-filtering alone.
pub fn load_teams(data_dir: &Path) -> Result<Option<TeamData>> {
    let path = data_dir.join(TEAMS_FILE);
    if !path.exists() {
        debug!(path = %path.display(), "no team data file");
        return Ok(None);
    }
    let text = fs::read_to_string(&path)?;
    Ok(Some(serde_json::from_str(&text)?))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_pr_records_bare_array() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(PR_DATA_FILE),
            r#"[{"author": "alice", "numComments": 2}]"#,
        )
        .unwrap();

        let records = load_pr_records(dir.path()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].author, "alice");
        assert_eq!(records[0].num_comments, 2);
    }

    #[test]
    fn test_load_pr_records_wrapped_object() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(PR_DATA_FILE),
            r#"{"pullRequests": [{"author": "bob"}], "fetchedAt": "2024-03-01"}"#,
        )
        .unwrap();

        let records = load_pr_records(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].author, "bob");
    }

    #[test]
    fn test_load_pr_records_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        assert!(load_pr_records(dir.path()).is_err());
    }

    #[test]
    fn test_load_teams_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let teams = load_teams(dir.path()).unwrap();
        assert!(teams.is_none());
    }

    #[test]
    fn test_load_teams() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(TEAMS_FILE),
            r#"{"backend": ["alice", "bob"]}"#,
        )
        .unwrap();

        let teams = load_teams(dir.path()).unwrap().unwrap();
        assert!(teams.is_member("bob"));
    }
}
