//! Monthly activity trend: PR and issue counts bucketed by calendar month.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::Serialize;

use crate::github::{IssueInfo, PrState, PullRequestInfo};

/// Number of monthly buckets in the trend, current month included.
const TREND_MONTHS: u32 = 12;

/// Activity counts for one calendar month.
#[derive(Debug, Serialize, Clone)]
pub struct MonthData {
    /// Month label, e.g. "Jan 2026".
    pub month: String,
    pub open_prs: usize,
    pub merged_prs: usize,
    pub issues: usize,
}

/// Twelve months of activity, oldest first.
#[derive(Debug, Serialize, Clone)]
pub struct MonthlyStats {
    pub data: Vec<MonthData>,
}

/// Buckets PRs and issues into the 12 calendar months ending at `now`'s month.
///
/// Assignment is by (year, month) equality on `created_at`. A PR counts toward
/// `open_prs` when its state is open and toward `merged_prs` when it has a
/// merge timestamp; the two conditions are checked independently. PR-backed
/// issues and entities created outside the 12-month range are dropped.
pub fn calculate(
    prs: &[PullRequestInfo],
    issues: &[IssueInfo],
    now: DateTime<Utc>,
) -> MonthlyStats {
    let months: Vec<(i32, u32)> = (0..TREND_MONTHS)
        .rev()
        .map(|back| month_back(now.year(), now.month(), back))
        .collect();

    let mut data: Vec<MonthData> = months
        .iter()
        .map(|&(year, month)| MonthData {
            month: month_label(year, month),
            open_prs: 0,
            merged_prs: 0,
            issues: 0,
        })
        .collect();

    for pr in prs {
        let Some(created_at) = pr.created_at else {
            continue;
        };

        if let Some(index) = bucket_index(&months, created_at) {
            if pr.state == PrState::Open {
                data[index].open_prs += 1;
            }
            if pr.merged_at.is_some() {
                data[index].merged_prs += 1;
            }
        }
    }

    for issue in issues {
        if issue.is_pull_request {
            continue;
        }
        let Some(created_at) = issue.created_at else {
            continue;
        };

        if let Some(index) = bucket_index(&months, created_at) {
            data[index].issues += 1;
        }
    }

    MonthlyStats { data }
}

/// The (year, month) pair `back` months before the given one.
fn month_back(year: i32, month: u32, back: u32) -> (i32, u32) {
    let total = year * 12 + month as i32 - 1 - back as i32;
    (total.div_euclid(12), total.rem_euclid(12) as u32 + 1)
}

fn month_label(year: i32, month: u32) -> String {
    // The 1st always exists, so this cannot fail for a valid (year, month).
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .unwrap()
        .format("%b %Y")
        .to_string()
}

fn bucket_index(months: &[(i32, u32)], timestamp: DateTime<Utc>) -> Option<usize> {
    let key = (timestamp.year(), timestamp.month());
    months.iter().position(|&bucket| bucket == key)
}
