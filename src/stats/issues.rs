//! Issue health: open/closed tallies, resolution time, oldest open issue.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::{format_duration, NOT_APPLICABLE};
use crate::github::IssueInfo;

const RECENT_ISSUE_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Serialize, Clone)]
pub struct IssueStats {
    pub open_issues: usize,
    pub closed_issues: usize,
    /// Average time from creation to close, or "N/A" when no closed issue has
    /// both timestamps.
    pub avg_resolution_time: String,
    /// Creation date (no time component) of the oldest open issue, or "N/A".
    pub oldest_open_issue: String,
    pub issues_last_30_days: usize,
}

/// Calculates issue health metrics.
///
/// Issues that are really pull requests are excluded from every counter. The
/// 30-day creation tally applies to open and closed issues alike, checked
/// independently of the open/closed branch.
pub fn calculate(issues: &[IssueInfo], now: DateTime<Utc>) -> IssueStats {
    let mut open_count: usize = 0;
    let mut closed_count: usize = 0;
    let mut total_resolution_time = Duration::zero();
    let mut resolution_count: usize = 0;
    let mut oldest_open: Option<DateTime<Utc>> = None;
    let mut created_last_30_days: usize = 0;

    let window_start = now - Duration::days(RECENT_ISSUE_WINDOW_DAYS);

    for issue in issues {
        if issue.is_pull_request {
            continue;
        }

        if issue.is_open {
            open_count += 1;

            if let Some(created_at) = issue.created_at {
                // Strictly-earlier wins, so the first-seen issue keeps a tie.
                if oldest_open.is_none_or(|oldest| created_at < oldest) {
                    oldest_open = Some(created_at);
                }
            }
        } else {
            closed_count += 1;

            if let (Some(created_at), Some(closed_at)) = (issue.created_at, issue.closed_at) {
                total_resolution_time = total_resolution_time + (closed_at - created_at);
                resolution_count += 1;
            }
        }

        if issue.created_at.is_some_and(|created_at| created_at > window_start) {
            created_last_30_days += 1;
        }
    }

    let avg_resolution_time = if resolution_count > 0 {
        format_duration(total_resolution_time / resolution_count as i32)
    } else {
        NOT_APPLICABLE.to_string()
    };

    let oldest_open_issue = oldest_open
        .map(|created_at| created_at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| NOT_APPLICABLE.to_string());

    IssueStats {
        open_issues: open_count,
        closed_issues: closed_count,
        avg_resolution_time,
        oldest_open_issue,
        issues_last_30_days: created_last_30_days,
    }
}
