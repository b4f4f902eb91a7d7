use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::template::OrgSource;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub rollout: RolloutConfig,
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub git: GitConfig,
}

#[derive(Deserialize, Clone, Default)]
pub struct GitHubConfig {
    /// Bearer token for API calls and HTTPS git transport.
    pub token: Option<String>,
    /// Override for GitHub Enterprise or a mock server.
    pub api_base_url: Option<String>,
}

// Manual Debug impl to avoid leaking the token
impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// How a change reaches the hosting platform.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ProposalMode {
    /// Commit and push from a local clone, then open a PR from the pushed branch.
    #[default]
    PrePushedBranch,
    /// Create branch, tree and commit through the API; no local clone.
    ApiCommit,
}

/// What a dry run is allowed to touch.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum DryRunScope {
    /// Push branches and create remote commits; only the pull request is skipped.
    #[default]
    ProposalOnly,
    /// No remote mutation at all.
    NoMutation,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BranchNaming {
    /// `<prefix>-<YYYYMMDDHHMMSS>`
    #[default]
    Timestamp,
    /// `<prefix>` as-is, reused across runs.
    Fixed,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RolloutConfig {
    #[serde(default = "default_artifact_path")]
    pub artifact_path: String,
    #[serde(default = "default_commit_message")]
    pub commit_message: String,
    #[serde(default = "default_branch_prefix")]
    pub branch_prefix: String,
    #[serde(default)]
    pub branch_naming: BranchNaming,
    #[serde(default = "default_pr_title")]
    pub pr_title: String,
    #[serde(default = "default_pr_body")]
    pub pr_body: String,
    #[serde(default)]
    pub proposal_mode: ProposalMode,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub dry_run_scope: DryRunScope,
    /// Target branch for proposals; the repository default when unset.
    pub base_branch: Option<String>,
    #[serde(default)]
    pub org_source: OrgSource,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            artifact_path: default_artifact_path(),
            commit_message: default_commit_message(),
            branch_prefix: default_branch_prefix(),
            branch_naming: BranchNaming::default(),
            pr_title: default_pr_title(),
            pr_body: default_pr_body(),
            proposal_mode: ProposalMode::default(),
            dry_run: false,
            dry_run_scope: DryRunScope::default(),
            base_branch: None,
            org_source: OrgSource::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorkspaceConfig {
    #[serde(default = "default_workspace_dir")]
    pub base_dir: PathBuf,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            base_dir: default_workspace_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GitConfig {
    #[serde(default = "default_author_name")]
    pub author_name: String,
    #[serde(default = "default_author_email")]
    pub author_email: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            author_name: default_author_name(),
            author_email: default_author_email(),
        }
    }
}

fn default_artifact_path() -> String {
    "config.yaml".to_string()
}

fn default_commit_message() -> String {
    "Update configuration".to_string()
}

fn default_branch_prefix() -> String {
    "config-rollout".to_string()
}

fn default_pr_title() -> String {
    "Update configuration".to_string()
}

fn default_pr_body() -> String {
    "This pull request updates the repository configuration file.\n\n---\n*Automated by rollout*"
        .to_string()
}

fn default_workspace_dir() -> PathBuf {
    std::env::temp_dir()
}

fn default_author_name() -> String {
    "Rollout Bot".to_string()
}

fn default_author_email() -> String {
    "rollout-bot@users.noreply.github.com".to_string()
}

impl AppConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        } else {
            builder = builder.add_source(config::File::with_name("rollout").required(false));
        }

        // Environment variable overrides with ROLLOUT_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("ROLLOUT")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))
    }

    /// Token from configuration, falling back to `GITHUB_TOKEN`.
    pub fn github_token(&self) -> Option<String> {
        self.github
            .token
            .clone()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
            .filter(|t| !t.is_empty())
    }
}
