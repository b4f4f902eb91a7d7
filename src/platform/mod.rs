pub mod github;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;
use types::*;

/// Hosting-platform operations needed to propose a change.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Name of the repository's default branch.
    async fn default_branch(&self, owner: &str, repo: &str) -> Result<String>;

    /// Look up a branch by name and return its tip.
    async fn get_branch(&self, owner: &str, repo: &str, branch: &str) -> Result<BranchHead>;

    /// Create `refs/heads/<branch>` pointing at `sha`.
    async fn create_ref(&self, owner: &str, repo: &str, branch: &str, sha: &str) -> Result<()>;

    /// Create a tree on top of `base_tree` containing the given files.
    async fn create_tree(
        &self,
        owner: &str,
        repo: &str,
        base_tree: &str,
        files: &[TreeFile],
    ) -> Result<String>;

    /// Create a commit object and return its SHA.
    async fn create_commit(
        &self,
        owner: &str,
        repo: &str,
        message: &str,
        tree: &str,
        parent: &str,
    ) -> Result<String>;

    /// Move `refs/heads/<branch>` to `sha`.
    async fn update_ref(&self, owner: &str, repo: &str, branch: &str, sha: &str) -> Result<()>;

    /// Create a pull request.
    async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr: &CreatePullRequest,
    ) -> Result<PullRequest>;
}
