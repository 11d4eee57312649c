//! PR velocity: average merge time, open count, and recent-merge count.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::{format_duration, NOT_APPLICABLE};
use crate::github::{PrState, PullRequestInfo};

/// How recently a merge must have landed to count as "last week".
const RECENT_MERGE_WINDOW_DAYS: i64 = 7;

/// Velocity metrics for a repository's pull requests.
#[derive(Debug, Serialize, Clone)]
pub struct PrMetrics {
    /// Average time from creation to merge, or "N/A" when nothing was merged.
    pub avg_merge_time: String,
    /// Number of PRs currently open.
    pub open_prs: usize,
    /// Number of PRs merged within the last 7 days of `now`.
    pub merged_last_week: usize,
}

/// Calculates velocity metrics from a list of pull requests.
///
/// The open tally and the merge-time tally are two independent passes over the
/// same list: an open PR never contributes merge data, and merge bookkeeping
/// ignores state entirely.
pub fn calculate(prs: &[PullRequestInfo], now: DateTime<Utc>) -> PrMetrics {
    let mut total_merge_time = Duration::zero();
    let mut merged_count: usize = 0;
    let mut open_count: usize = 0;
    let mut merged_last_week: usize = 0;

    for pr in prs {
        if pr.state == PrState::Open {
            open_count += 1;
        }

        if let (Some(created_at), Some(merged_at)) = (pr.created_at, pr.merged_at) {
            total_merge_time = total_merge_time + (merged_at - created_at);
            merged_count += 1;

            if now - merged_at < Duration::days(RECENT_MERGE_WINDOW_DAYS) {
                merged_last_week += 1;
            }
        }
    }

    let avg_merge_time = if merged_count > 0 {
        format_duration(total_merge_time / merged_count as i32)
    } else {
        NOT_APPLICABLE.to_string()
    };

    PrMetrics {
        avg_merge_time,
        open_prs: open_count,
        merged_last_week,
    }
}
