//! PR size and review distribution, layered on top of the velocity metrics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::pr_velocity::{self, PrMetrics};
use crate::github::{PrState, PullRequestInfo};

/// A PR touching fewer files than this is small.
const SMALL_PR_MAX_FILES: u64 = 10;
/// A PR touching more files than this is large; in between is medium.
const MEDIUM_PR_MAX_FILES: u64 = 30;

/// Velocity metrics plus size/review distribution.
#[derive(Debug, Serialize, Clone)]
pub struct DetailedPrStats {
    #[serde(flatten)]
    pub metrics: PrMetrics,
    pub small_prs: usize,
    pub medium_prs: usize,
    pub large_prs: usize,
    /// Average comment count over PRs with at least one comment, truncated.
    /// Zero when nothing was commented on; no sentinel here.
    pub avg_comments: u64,
    /// Closed PRs that never received a review comment.
    pub prs_without_review: usize,
}

/// Calculates the detailed PR metrics.
///
/// PRs with an unknown changed-file count are skipped entirely. The velocity
/// portion is re-derived from the same list rather than shared with the basic
/// endpoint.
pub fn calculate(prs: &[PullRequestInfo], now: DateTime<Utc>) -> DetailedPrStats {
    let metrics = pr_velocity::calculate(prs, now);

    let mut small_prs: usize = 0;
    let mut medium_prs: usize = 0;
    let mut large_prs: usize = 0;
    let mut prs_without_review: usize = 0;
    let mut total_comments: u64 = 0;
    let mut prs_with_comments: u64 = 0;

    for pr in prs {
        let Some(changed_files) = pr.changed_files else {
            continue;
        };

        if changed_files < SMALL_PR_MAX_FILES {
            small_prs += 1;
        } else if changed_files <= MEDIUM_PR_MAX_FILES {
            medium_prs += 1;
        } else {
            large_prs += 1;
        }

        if pr.review_comments == Some(0) && pr.state == PrState::Closed {
            prs_without_review += 1;
        }

        if let Some(comments) = pr.comments {
            if comments > 0 {
                total_comments += comments;
                prs_with_comments += 1;
            }
        }
    }

    let avg_comments = if prs_with_comments > 0 {
        total_comments / prs_with_comments
    } else {
        0
    };

    DetailedPrStats {
        metrics,
        small_prs,
        medium_prs,
        large_prs,
        avg_comments,
        prs_without_review,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pr(changed_files: Option<u64>) -> PullRequestInfo {
        PullRequestInfo {
            state: PrState::Open,
            created_at: None,
            merged_at: None,
            changed_files,
            review_comments: None,
            comments: None,
        }
    }

    #[test]
    fn test_size_bucket_boundaries() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let prs = vec![pr(Some(9)), pr(Some(10)), pr(Some(30)), pr(Some(31)), pr(None)];

        let stats = calculate(&prs, now);

        assert_eq!(stats.small_prs, 1);
        assert_eq!(stats.medium_prs, 2);
        assert_eq!(stats.large_prs, 1);
    }

    #[test]
    fn test_unknown_file_count_skips_pr_entirely() {
        // A closed, unreviewed, commented PR without a file count contributes
        // to none of the detail counters.
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let prs = vec![PullRequestInfo {
            state: PrState::Closed,
            created_at: None,
            merged_at: None,
            changed_files: None,
            review_comments: Some(0),
            comments: Some(4),
        }];

        let stats = calculate(&prs, now);

        assert_eq!(stats.small_prs + stats.medium_prs + stats.large_prs, 0);
        assert_eq!(stats.prs_without_review, 0);
        assert_eq!(stats.avg_comments, 0);
    }

    #[test]
    fn test_prs_without_review_requires_closed_state() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let prs = vec![
            PullRequestInfo {
                state: PrState::Closed,
                created_at: None,
                merged_at: None,
                changed_files: Some(5),
                review_comments: Some(0),
                comments: None,
            },
            PullRequestInfo {
                state: PrState::Open,
                created_at: None,
                merged_at: None,
                changed_files: Some(5),
                review_comments: Some(0),
                comments: None,
            },
        ];

        let stats = calculate(&prs, now);
        assert_eq!(stats.prs_without_review, 1);
    }

    #[test]
    fn test_avg_comments_truncates() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let prs = vec![
            PullRequestInfo {
                state: PrState::Open,
                created_at: None,
                merged_at: None,
                changed_files: Some(1),
                review_comments: None,
                comments: Some(3),
            },
            PullRequestInfo {
                state: PrState::Open,
                created_at: None,
                merged_at: None,
                changed_files: Some(1),
                review_comments: None,
                comments: Some(4),
            },
            // Zero comments: excluded from the denominator.
            PullRequestInfo {
                state: PrState::Open,
                created_at: None,
                merged_at: None,
                changed_files: Some(1),
                review_comments: None,
                comments: Some(0),
            },
        ];

        let stats = calculate(&prs, now);
        assert_eq!(stats.avg_comments, 3); // (3 + 4) / 2, truncated
    }

    #[test]
    fn test_embeds_velocity_metrics() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let now = created + chrono::Duration::days(10);

        let prs = vec![PullRequestInfo {
            state: PrState::Closed,
            created_at: Some(created),
            merged_at: Some(created + chrono::Duration::days(2)),
            changed_files: Some(12),
            review_comments: Some(1),
            comments: None,
        }];

        let stats = calculate(&prs, now);

        assert_eq!(stats.metrics.avg_merge_time, "2d 0h 0m");
        assert_eq!(stats.metrics.open_prs, 0);
        assert_eq!(stats.medium_prs, 1);
    }
}
