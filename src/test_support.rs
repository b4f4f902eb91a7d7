//! Local bare repositories standing in for hosted remotes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use git2::{Oid, Repository, Signature};
use tempfile::TempDir;

use crate::error::{AppError, Result};
use crate::platform::types::{BranchHead, CreatePullRequest, PullRequest, TreeFile};
use crate::platform::Platform;

pub struct TestRemote {
    _dir: TempDir,
    pub path: PathBuf,
    pub url: String,
}

pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// A bare repository at `<tmp>/<owner>/<name>.git` with one commit on `main`.
pub fn bare_remote(owner: &str, name: &str) -> TestRemote {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(owner).join(format!("{name}.git"));
    let repo = Repository::init_bare(&path).unwrap();

    let blob = repo.blob(b"# test repository\n").unwrap();
    let mut builder = repo.treebuilder(None).unwrap();
    builder.insert("README.md", blob, 0o100644).unwrap();
    let tree_oid = builder.write().unwrap();
    let tree = repo.find_tree(tree_oid).unwrap();

    let sig = Signature::now("Seed", "seed@example.com").unwrap();
    repo.commit(Some("refs/heads/main"), &sig, &sig, "Initial commit", &tree, &[])
        .unwrap();
    repo.set_head("refs/heads/main").unwrap();

    let url = file_url(&path);
    TestRemote {
        _dir: dir,
        path,
        url,
    }
}

/// Add `file` on top of `main` as a new commit on `branch` in the remote.
pub fn commit_on_branch(remote: &TestRemote, branch: &str, file: &str, content: &str) -> Oid {
    let repo = Repository::open_bare(&remote.path).unwrap();
    let parent = repo
        .find_reference("refs/heads/main")
        .unwrap()
        .peel_to_commit()
        .unwrap();

    let blob = repo.blob(content.as_bytes()).unwrap();
    let mut builder = repo.treebuilder(Some(&parent.tree().unwrap())).unwrap();
    builder.insert(file, blob, 0o100644).unwrap();
    let tree = repo.find_tree(builder.write().unwrap()).unwrap();

    let sig = Signature::now("Seed", "seed@example.com").unwrap();
    repo.commit(
        Some(&format!("refs/heads/{branch}")),
        &sig,
        &sig,
        &format!("Add {file}"),
        &tree,
        &[&parent],
    )
    .unwrap()
}

/// In-memory `Platform` that records every call.
#[derive(Default)]
pub struct FakePlatform {
    calls: std::sync::Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl FakePlatform {
    pub fn failing_on(operation: &'static str) -> Self {
        Self {
            fail_on: Some(operation),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &str, detail: String) -> Result<()> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(format!("{operation} {detail}"));
        if self.fail_on == Some(operation) {
            return Err(AppError::GitHubApi(format!(
                "{operation} rejected"
            )));
        }
        Ok(())
    }

    fn pull_requests(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with("create_pull_request"))
            .count()
    }
}

#[async_trait]
impl Platform for FakePlatform {
    async fn default_branch(&self, owner: &str, repo: &str) -> Result<String> {
        self.record("default_branch", format!("{owner}/{repo}"))?;
        Ok("main".to_string())
    }

    async fn get_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<BranchHead> {
        self.record("get_branch", format!("{owner}/{repo} {branch}"))?;
        Ok(BranchHead {
            commit_sha: format!("commit-{branch}"),
            tree_sha: format!("tree-{branch}"),
        })
    }

    async fn create_ref(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        sha: &str,
    ) -> Result<()> {
        self.record("create_ref", format!("{owner}/{repo} {branch}@{sha}"))
    }

    async fn create_tree(
        &self,
        owner: &str,
        repo: &str,
        base_tree: &str,
        files: &[TreeFile],
    ) -> Result<String> {
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        self.record(
            "create_tree",
            format!("{owner}/{repo} {base_tree} [{}]", paths.join(",")),
        )?;
        Ok("tree-new".to_string())
    }

    async fn create_commit(
        &self,
        owner: &str,
        repo: &str,
        _message: &str,
        tree: &str,
        parent: &str,
    ) -> Result<String> {
        self.record("create_commit", format!("{owner}/{repo} {tree}^{parent}"))?;
        Ok("commit-new".to_string())
    }

    async fn update_ref(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        sha: &str,
    ) -> Result<()> {
        self.record("update_ref", format!("{owner}/{repo} {branch}@{sha}"))
    }

    async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr: &CreatePullRequest,
    ) -> Result<PullRequest> {
        self.record(
            "create_pull_request",
            format!("{owner}/{repo} {}->{}", pr.head_branch, pr.base_branch),
        )?;
        let number = self.pull_requests() as u64;
        Ok(PullRequest {
            number,
            html_url: format!("https://github.com/{owner}/{repo}/pull/{number}"),
        })
    }
}
