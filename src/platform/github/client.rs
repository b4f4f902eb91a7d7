use async_trait::async_trait;
use octocrab::Octocrab;
use serde_json::{json, Value};

use crate::config::GitHubConfig;
use crate::error::{AppError, Result};
use crate::platform::types::*;
use crate::platform::Platform;

use super::mapper;

/// GitHub REST client authenticated with a bearer token.
pub struct GitHubPlatform {
    client: Octocrab,
}

impl GitHubPlatform {
    pub fn new(config: &GitHubConfig, token: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder();
        if let Some(token) = token {
            builder = builder.personal_token(token);
        }
        if let Some(base) = config.api_base_url.as_deref() {
            builder = builder
                .base_uri(base)
                .map_err(|e| AppError::Config(format!("Invalid GitHub API URL {base}: {e}")))?;
        }

        let client = builder
            .build()
            .map_err(|e| AppError::GitHubApi(format!("Failed to build octocrab client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Platform for GitHubPlatform {
    async fn default_branch(&self, owner: &str, repo: &str) -> Result<String> {
        let url = format!("/repos/{owner}/{repo}");
        let response: Value = self.client.get(&url, None::<&()>).await?;
        mapper::map_default_branch(&response)
    }

    async fn get_branch(&self, owner: &str, repo: &str, branch: &str) -> Result<BranchHead> {
        let url = format!(
            "/repos/{owner}/{repo}/branches/{}",
            urlencoding::encode(branch)
        );
        let response: Value = self.client.get(&url, None::<&()>).await?;
        mapper::map_branch_head(&response)
    }

    async fn create_ref(&self, owner: &str, repo: &str, branch: &str, sha: &str) -> Result<()> {
        let url = format!("/repos/{owner}/{repo}/git/refs");
        let body = json!({ "ref": format!("refs/heads/{branch}"), "sha": sha });
        let _: Value = self.client.post(&url, Some(&body)).await?;
        Ok(())
    }

    async fn create_tree(
        &self,
        owner: &str,
        repo: &str,
        base_tree: &str,
        files: &[TreeFile],
    ) -> Result<String> {
        let url = format!("/repos/{owner}/{repo}/git/trees");
        let entries: Vec<Value> = files
            .iter()
            .map(|f| {
                json!({
                    "path": f.path,
                    "mode": "100644",
                    "type": "blob",
                    "content": f.content,
                })
            })
            .collect();
        let body = json!({ "base_tree": base_tree, "tree": entries });
        let response: Value = self.client.post(&url, Some(&body)).await?;
        mapper::map_object_sha(&response)
    }

    async fn create_commit(
        &self,
        owner: &str,
        repo: &str,
        message: &str,
        tree: &str,
        parent: &str,
    ) -> Result<String> {
        let url = format!("/repos/{owner}/{repo}/git/commits");
        let body = json!({ "message": message, "tree": tree, "parents": [parent] });
        let response: Value = self.client.post(&url, Some(&body)).await?;
        mapper::map_object_sha(&response)
    }

    async fn update_ref(&self, owner: &str, repo: &str, branch: &str, sha: &str) -> Result<()> {
        let url = format!("/repos/{owner}/{repo}/git/refs/heads/{branch}");
        let body = json!({ "sha": sha, "force": false });
        let _: Value = self.client.patch(&url, Some(&body)).await?;
        Ok(())
    }

    async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr: &CreatePullRequest,
    ) -> Result<PullRequest> {
        let url = format!("/repos/{owner}/{repo}/pulls");
        let body = json!({
            "title": pr.title,
            "body": pr.body,
            "head": pr.head_branch,
            "base": pr.base_branch,
        });
        let response: Value = self.client.post(&url, Some(&body)).await?;
        mapper::map_pull_request(&response)
    }
}
