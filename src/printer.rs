//! Printer columns
//!
//! Renders resources as the `NAME READY SYNCED AGE` table a cluster client
//! would show for NopResources.

use crate::controller::{ManagedResource, resource_age};
use crate::models::condition::{TYPE_READY, TYPE_SYNCED};
use chrono::{DateTime, Utc};
use std::time::Duration;

const COLUMN_GAP: &str = "   ";

/// Short human-readable age (e.g., "45s", "3m", "2h", "4d")
pub fn short_age(age: Duration) -> String {
    let secs = age.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86_400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86_400)
    }
}

/// Render resources as an aligned table, one row per resource
pub fn render_table<R: ManagedResource>(resources: &[R], now: DateTime<Utc>) -> String {
    render_table_at(resources, |_| now)
}

/// Like [`render_table`], with the AGE column measured at a per-resource instant
pub fn render_table_at<R, F>(resources: &[R], now_of: F) -> String
where
    R: ManagedResource,
    F: Fn(&R) -> DateTime<Utc>,
{
    let mut rows: Vec<[String; 4]> = vec![[
        "NAME".to_string(),
        "READY".to_string(),
        "SYNCED".to_string(),
        "AGE".to_string(),
    ]];

    for resource in resources {
        let conditions = resource.conditions();
        let status = |condition_type: &str| {
            conditions
                .status_of(condition_type)
                .map(|s| s.to_string())
                .unwrap_or_default()
        };
        rows.push([
            resource.name().to_string(),
            status(TYPE_READY),
            status(TYPE_SYNCED),
            short_age(resource_age(resource.creation_timestamp(), now_of(resource))),
        ]);
    }

    let mut widths = [0usize; 4];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in &rows {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            line.push_str(cell);
            if i + 1 < row.len() {
                let pad = widths[i] - cell.chars().count();
                line.push_str(&" ".repeat(pad));
                line.push_str(COLUMN_GAP);
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_age() {
        assert_eq!(short_age(Duration::from_secs(0)), "0s");
        assert_eq!(short_age(Duration::from_secs(45)), "45s");
        assert_eq!(short_age(Duration::from_secs(200)), "3m");
        assert_eq!(short_age(Duration::from_secs(7300)), "2h");
        assert_eq!(short_age(Duration::from_secs(4 * 86_400 + 5)), "4d");
    }
}
