//! Entity fetcher for the GitHub API.
//!
//! `GitHubClient` retrieves one page of raw entities (pull requests, issues,
//! contributors, commits) or a single repository record, and converts the API
//! models into the plain entity types the stats engine consumes. The engine
//! never touches the network; everything it sees comes from here.

use anyhow::Result;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, RepoId};

/// State of a pull request as reported by the GitHub API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrState {
    Open,
    Closed,
    Unknown,
}

/// One pull request, reduced to the fields the stats engine reads.
#[derive(Clone, Debug)]
pub struct PullRequestInfo {
    pub state: PrState,
    pub created_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    /// Not populated by the list endpoint for every repository; `None` means
    /// the PR is excluded from size bucketing.
    pub changed_files: Option<u64>,
    pub review_comments: Option<u64>,
    pub comments: Option<u64>,
}

/// One issue. Issues that are really pull requests carry `is_pull_request`
/// and must be excluded from issue stats.
#[derive(Clone, Debug)]
pub struct IssueInfo {
    pub is_open: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub is_pull_request: bool,
}

/// One contributor, in the order the GitHub API returned it.
#[derive(Clone, Debug, Deserialize)]
pub struct ContributorInfo {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub contributions: u64,
    #[serde(default)]
    pub avatar_url: String,
}

/// One commit; only the author timestamp matters for windowed counting.
#[derive(Clone, Copy, Debug)]
pub struct CommitInfo {
    pub authored_at: DateTime<Utc>,
}

/// Point-in-time repository record (1:1 with the GitHub repo endpoint).
#[derive(Clone, Debug)]
pub struct RepoSnapshot {
    pub stars: u32,
    pub forks: u32,
    pub watchers: u32,
    pub size_kb: u32,
    pub language: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct PageQuery {
    per_page: u8,
}

#[derive(Serialize)]
struct CommitsQuery {
    since: String,
    per_page: u8,
}

/// Raw shape of the commits list endpoint; octocrab has no typed builder for
/// the subset we need.
#[derive(Deserialize)]
struct CommitRecord {
    commit: CommitDetail,
}

#[derive(Deserialize)]
struct CommitDetail {
    author: Option<CommitSignature>,
}

#[derive(Deserialize)]
struct CommitSignature {
    date: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
    page_size: u8,
}

impl GitHubClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut builder = Octocrab::builder();
        if let Some(token) = &config.github_token {
            builder = builder.personal_token(token.clone());
        }

        Ok(Self {
            octocrab: builder.build()?,
            page_size: config.page_size,
        })
    }

    /// Retrieves one page of pull requests (all states, newest first).
    pub async fn fetch_pull_requests(&self, repo_id: &RepoId) -> Result<Vec<PullRequestInfo>> {
        let (owner, repo) = sanitize(repo_id);

        let page = self
            .octocrab
            .pulls(owner, repo)
            .list()
            .state(octocrab::params::State::All)
            .sort(octocrab::params::pulls::Sort::Created)
            .direction(octocrab::params::Direction::Descending)
            .per_page(self.page_size)
            .page(1u32)
            .send()
            .await?;

        let prs = page
            .items
            .iter()
            .map(|pr| {
                let state = match pr.state {
                    Some(octocrab::models::IssueState::Open) => PrState::Open,
                    Some(octocrab::models::IssueState::Closed) => PrState::Closed,
                    _ => PrState::Unknown,
                };

                PullRequestInfo {
                    state,
                    created_at: pr.created_at,
                    merged_at: pr.merged_at,
                    changed_files: pr.changed_files,
                    review_comments: pr.review_comments,
                    comments: pr.comments,
                }
            })
            .collect();

        Ok(prs)
    }

    /// Retrieves one page of issues (all states). The GitHub issues endpoint
    /// interleaves pull requests; those are flagged, not dropped, so the stats
    /// engine can apply its own exclusion rule.
    pub async fn fetch_issues(&self, repo_id: &RepoId) -> Result<Vec<IssueInfo>> {
        let (owner, repo) = sanitize(repo_id);

        let page = self
            .octocrab
            .issues(owner, repo)
            .list()
            .state(octocrab::params::State::All)
            .per_page(self.page_size)
            .send()
            .await?;

        let issues = page
            .items
            .iter()
            .map(|issue| IssueInfo {
                is_open: issue.state == octocrab::models::IssueState::Open,
                created_at: Some(issue.created_at),
                closed_at: issue.closed_at,
                is_pull_request: issue.pull_request.is_some(),
            })
            .collect();

        Ok(issues)
    }

    /// Retrieves one page of contributors, preserving the API's own ordering.
    pub async fn fetch_contributors(&self, repo_id: &RepoId) -> Result<Vec<ContributorInfo>> {
        let (owner, repo) = sanitize(repo_id);

        let route = format!("/repos/{owner}/{repo}/contributors");
        let query = PageQuery {
            per_page: self.page_size,
        };

        let contributors: Vec<ContributorInfo> =
            self.octocrab.get(route, Some(&query)).await?;

        Ok(contributors)
    }

    /// Retrieves one page of commits authored since `since`.
    pub async fn fetch_commits_since(
        &self,
        repo_id: &RepoId,
        since: DateTime<Utc>,
    ) -> Result<Vec<CommitInfo>> {
        let (owner, repo) = sanitize(repo_id);

        let route = format!("/repos/{owner}/{repo}/commits");
        let query = CommitsQuery {
            since: since.to_rfc3339(),
            per_page: self.page_size,
        };

        let records: Vec<CommitRecord> = self.octocrab.get(route, Some(&query)).await?;

        let commits = records
            .into_iter()
            .filter_map(|record| {
                let date = record.commit.author?.date?;
                Some(CommitInfo { authored_at: date })
            })
            .collect();

        Ok(commits)
    }

    /// Retrieves the repository record itself.
    pub async fn fetch_repository(&self, repo_id: &RepoId) -> Result<RepoSnapshot> {
        let (owner, repo) = sanitize(repo_id);

        let repository = self.octocrab.repos(owner, repo).get().await?;

        Ok(RepoSnapshot {
            stars: repository.stargazers_count.unwrap_or_default(),
            forks: repository.forks_count.unwrap_or_default(),
            watchers: repository.watchers_count.unwrap_or_default(),
            size_kb: repository.size.unwrap_or_default(),
            language: repository
                .language
                .as_ref()
                .and_then(|value| value.as_str())
                .map(str::to_owned),
            last_updated: repository.updated_at,
        })
    }
}

/// Sanitize inputs to prevent path traversal or unintended endpoint access.
fn sanitize(repo_id: &RepoId) -> (String, String) {
    (
        repo_id.owner.trim().replace("..", ""),
        repo_id.repo.trim().replace("..", ""),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_traversal() {
        let repo_id = RepoId {
            owner: " ../evil ".to_string(),
            repo: "repo".to_string(),
        };
        let (owner, repo) = sanitize(&repo_id);
        assert_eq!(owner, "/evil");
        assert_eq!(repo, "repo");
    }

    #[test]
    fn test_commit_record_deserialization() {
        let json = r#"[
            {"sha": "abc", "commit": {"author": {"name": "a", "date": "2024-03-01T10:00:00Z"}}},
            {"sha": "def", "commit": {"author": null}}
        ]"#;
        let records: Vec<CommitRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].commit.author.as_ref().unwrap().date.is_some());
        assert!(records[1].commit.author.is_none());
    }

    #[test]
    fn test_contributor_deserialization_defaults() {
        // Anonymous contributors come back without a login or avatar.
        let json = r#"[{"contributions": 3}]"#;
        let contributors: Vec<ContributorInfo> = serde_json::from_str(json).unwrap();
        assert_eq!(contributors[0].login, "");
        assert_eq!(contributors[0].contributions, 3);
    }
}
