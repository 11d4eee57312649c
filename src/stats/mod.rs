//! The statistics aggregation engine.
//!
//! Six independent, stateless computations over already-fetched entity lists.
//! Each function here is pure: it takes immutable slices plus an explicit
//! `now` timestamp and produces one metrics record. All I/O and failure
//! handling live in the fetch and orchestration layers.

pub mod contributors;
pub mod issues;
pub mod monthly;
pub mod pr_detail;
pub mod pr_velocity;
pub mod repo;

pub use contributors::{ContributorData, ContributorStats};
pub use issues::IssueStats;
pub use monthly::{MonthData, MonthlyStats};
pub use pr_detail::DetailedPrStats;
pub use pr_velocity::PrMetrics;
pub use repo::RepoStats;

use chrono::Duration;

/// Explicit not-applicable marker for averaged duration/date fields whose
/// denominator is zero. Distinct from numeric zero, which downstream consumers
/// read as "zero activity".
pub const NOT_APPLICABLE: &str = "N/A";

/// Renders a duration as a short human-readable string, e.g. "6d 0h 0m",
/// "3h 12m", "45m".
pub fn format_duration(duration: Duration) -> String {
    let total_minutes = duration.num_minutes();
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
