//! Service layer for querying repository statistics.
//!
//! This module implements `StatsQuerier`, the entry point for each stats
//! operation. Every method follows the same shape:
//! 1. Fetch one page of raw entities from GitHub.
//! 2. Hand the lists to the pure stats engine together with the current time.
//! 3. Return the resulting metrics record.
//!
//! The operations are independent; none reuses another's fetched data.

use anyhow::Result;
use chrono::{Duration, Utc};

use crate::config::{AppConfig, RepoId};
use crate::github::GitHubClient;
use crate::stats::{
    self, ContributorStats, DetailedPrStats, IssueStats, MonthlyStats, PrMetrics, RepoStats,
};

/// Days of commit history backing the contributor activity figures.
const COMMIT_LOOKBACK_DAYS: i64 = 30;

#[derive(Clone)]
pub struct StatsQuerier {
    client: GitHubClient,
}

impl StatsQuerier {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            client: GitHubClient::new(config)?,
        })
    }

    pub async fn pr_metrics(&self, repo_id: &RepoId) -> Result<PrMetrics> {
        let prs = self.client.fetch_pull_requests(repo_id).await?;
        Ok(stats::pr_velocity::calculate(&prs, Utc::now()))
    }

    pub async fn monthly_stats(&self, repo_id: &RepoId) -> Result<MonthlyStats> {
        let prs = self.client.fetch_pull_requests(repo_id).await?;
        let issues = self.client.fetch_issues(repo_id).await?;
        Ok(stats::monthly::calculate(&prs, &issues, Utc::now()))
    }

    pub async fn repo_stats(&self, repo_id: &RepoId) -> Result<RepoStats> {
        let snapshot = self.client.fetch_repository(repo_id).await?;
        Ok(stats::repo::extract(&snapshot))
    }

    /// Contributor stats degrade gracefully: a failed commit fetch zeroes the
    /// commit-derived fields instead of failing the whole request.
    pub async fn contributor_stats(&self, repo_id: &RepoId) -> Result<ContributorStats> {
        let contributors = self.client.fetch_contributors(repo_id).await?;

        let now = Utc::now();
        let since = now - Duration::days(COMMIT_LOOKBACK_DAYS);
        let commits = match self.client.fetch_commits_since(repo_id, since).await {
            Ok(commits) => commits,
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch commits for {}: {}. Commit activity defaults to zero.",
                    repo_id,
                    e
                );
                Vec::new()
            }
        };

        Ok(stats::contributors::calculate(&contributors, &commits, now))
    }

    pub async fn issue_stats(&self, repo_id: &RepoId) -> Result<IssueStats> {
        let issues = self.client.fetch_issues(repo_id).await?;
        Ok(stats::issues::calculate(&issues, Utc::now()))
    }

    pub async fn detailed_pr_stats(&self, repo_id: &RepoId) -> Result<DetailedPrStats> {
        let prs = self.client.fetch_pull_requests(repo_id).await?;
        Ok(stats::pr_detail::calculate(&prs, Utc::now()))
    }
}
