//! Contributor leaderboard and recent commit activity.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::github::{CommitInfo, ContributorInfo};

/// Leaderboard length.
const TOP_CONTRIBUTORS: usize = 5;

/// Window for the commit-activity figures.
const COMMIT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Serialize, Clone)]
pub struct ContributorData {
    pub username: String,
    pub contributions: u64,
    pub avatar_url: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct ContributorStats {
    pub total_contributors: usize,
    /// First min(5, total) contributors in the order the API returned them.
    /// Input-order-preserving, not value-sorted: the upstream ordering is
    /// trusted as "top contributors" and never re-derived here.
    pub top_contributors: Vec<ContributorData>,
    pub commits_last_30_days: usize,
    /// Always a number, 0.0 when there were no commits in the window.
    pub avg_commits_per_day: f64,
}

/// Builds the leaderboard and commit-activity figures.
///
/// A failed commit fetch is handled upstream by passing an empty slice, which
/// degrades the two commit-derived fields to zero without touching the
/// contributor data.
pub fn calculate(
    contributors: &[ContributorInfo],
    commits: &[CommitInfo],
    now: DateTime<Utc>,
) -> ContributorStats {
    let top_contributors = contributors
        .iter()
        .take(TOP_CONTRIBUTORS)
        .map(|contributor| ContributorData {
            username: contributor.login.clone(),
            contributions: contributor.contributions,
            avatar_url: contributor.avatar_url.clone(),
        })
        .collect();

    let window_start = now - Duration::days(COMMIT_WINDOW_DAYS);
    let commits_last_30_days = commits
        .iter()
        .filter(|commit| commit.authored_at > window_start)
        .count();

    ContributorStats {
        total_contributors: contributors.len(),
        top_contributors,
        commits_last_30_days,
        avg_commits_per_day: commits_last_30_days as f64 / COMMIT_WINDOW_DAYS as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn contributor(login: &str, contributions: u64) -> ContributorInfo {
        ContributorInfo {
            login: login.to_string(),
            contributions,
            avatar_url: format!("https://avatars.example/{login}"),
        }
    }

    #[test]
    fn test_top_n_preserves_input_order() {
        // Input-order-preserving, not value-sorted: entry "b" outranks "a"
        // numerically but the fetch order wins.
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let contributors = vec![
            contributor("a", 10),
            contributor("b", 500),
            contributor("c", 3),
        ];

        let stats = calculate(&contributors, &[], now);

        assert_eq!(stats.total_contributors, 3);
        let usernames: Vec<&str> = stats
            .top_contributors
            .iter()
            .map(|c| c.username.as_str())
            .collect();
        assert_eq!(usernames, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_top_n_truncates_to_five() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let contributors: Vec<ContributorInfo> = (0..7)
            .map(|i| contributor(&format!("user{i}"), 100 - i))
            .collect();

        let stats = calculate(&contributors, &[], now);

        assert_eq!(stats.total_contributors, 7);
        assert_eq!(stats.top_contributors.len(), 5);
        assert_eq!(stats.top_contributors[0].username, "user0");
        assert_eq!(stats.top_contributors[4].username, "user4");
    }

    #[test]
    fn test_commit_window() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let commits = vec![
            CommitInfo {
                authored_at: now - Duration::days(1),
            },
            CommitInfo {
                authored_at: now - Duration::days(29),
            },
            CommitInfo {
                authored_at: now - Duration::days(31),
            },
        ];

        let stats = calculate(&[], &commits, now);

        assert_eq!(stats.commits_last_30_days, 2);
        assert!((stats.avg_commits_per_day - 2.0 / 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_commits_yields_zero_not_sentinel() {
        // Matches the degraded path taken when the commit fetch fails: the
        // leaderboard survives and commit-derived fields are zero.
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let contributors: Vec<ContributorInfo> =
            (0..7).map(|i| contributor(&format!("user{i}"), i)).collect();

        let stats = calculate(&contributors, &[], now);

        assert_eq!(stats.total_contributors, 7);
        assert_eq!(stats.top_contributors.len(), 5);
        assert_eq!(stats.commits_last_30_days, 0);
        assert_eq!(stats.avg_commits_per_day, 0.0);
    }
}
