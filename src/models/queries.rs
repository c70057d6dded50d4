//! Query DTOs for the dashboard API
//!
//! Defines the structure of incoming query strings.

use serde::Deserialize;

use crate::error::{DashboardError, Result};

/// Query parameters accepted by the analytics endpoints.
///
/// # Fields
/// - `repo`: restrict results to a single repository
/// - `days`: period window length for bucketed endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub days: Option<i64>,
}

impl AnalyticsQuery {
    /// Validates the query, rejecting nonsensical windows.
    pub fn validate(&self) -> Result<()> {
        match self.days {
            Some(days) if days < 1 || days > 3650 => Err(DashboardError::InvalidRequest(
                format!("days must be between 1 and 3650, got {}", days),
            )),
            _ => Ok(()),
        }
    }

    /// Cache-key parameters for this query, stable across field order.
    pub fn key_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(repo) = &self.repo {
            params.push(("repo".to_string(), repo.clone()));
        }
        if let Some(days) = self.days {
            params.push(("days".to_string(), days.to_string()));
        }
        params
    }
}

/// Query parameters for cache invalidation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvalidateQuery {
    /// Regex of keys to drop; omitting it clears the whole cache
    #[serde(default)]
    pub pattern: Option<String>,
}
