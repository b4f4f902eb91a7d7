use std::path::{Component, Path, PathBuf};

use tempfile::TempDir;

use crate::config::{GitConfig, WorkspaceConfig};
use crate::error::{AppError, Result};
use crate::workspace::git::{self, Author, BranchOutcome};

/// Manages scratch clones for the rollout.
pub struct WorkspaceManager {
    base_dir: PathBuf,
    token: Option<String>,
    author: Author,
    commit_message: String,
}

/// A cloned repository in a uniquely named temporary directory.
///
/// The directory is removed when the workspace is released or dropped,
/// whichever happens first.
pub struct Workspace {
    dir: TempDir,
    pub default_branch: String,
}

/// What `publish_change` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedBranch {
    pub name: String,
    pub outcome: BranchOutcome,
    pub pushed: bool,
}

impl Workspace {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl WorkspaceManager {
    pub fn new(
        config: &WorkspaceConfig,
        git: &GitConfig,
        commit_message: &str,
        token: Option<String>,
    ) -> Self {
        Self {
            base_dir: config.base_dir.clone(),
            token,
            author: Author {
                name: git.author_name.clone(),
                email: git.author_email.clone(),
            },
            commit_message: commit_message.to_string(),
        }
    }

    /// Clone `url` into a fresh temporary directory.
    pub async fn acquire(&self, url: &str) -> Result<Workspace> {
        tokio::fs::create_dir_all(&self.base_dir).await.map_err(|e| AppError::Clone {
            url: url.to_string(),
            message: format!("Failed to create workspace dir: {e}"),
        })?;

        let dir = tempfile::Builder::new()
            .prefix("rollout-")
            .tempdir_in(&self.base_dir)
            .map_err(|e| AppError::Clone {
                url: url.to_string(),
                message: format!("Failed to create workspace dir: {e}"),
            })?;

        git::clone(url, dir.path(), self.token.as_deref()).await?;
        let default_branch = git::current_branch(dir.path()).await.map_err(|e| AppError::Clone {
            url: url.to_string(),
            message: format!("Cloned repository has no default branch: {e}"),
        })?;

        tracing::debug!(url = url, path = %dir.path().display(), "Cloned repository");

        Ok(Workspace {
            dir,
            default_branch,
        })
    }

    /// Write `content` to `relative` inside the clone, replacing any existing file.
    pub async fn write_artifact(
        &self,
        workspace: &Workspace,
        relative: &Path,
        content: &str,
    ) -> Result<()> {
        let full_path = Self::verify_path(workspace.path(), relative)?;

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Write(format!("{}: {e}", relative.display())))?;
        }
        tokio::fs::write(&full_path, content)
            .await
            .map_err(|e| AppError::Write(format!("{}: {e}", relative.display())))
    }

    /// Switch to (or create) `branch`, commit `relative` and optionally push.
    ///
    /// A new branch starts from `origin/<base>` when `base` is given, else
    /// from the clone's HEAD. Sub-steps run in order checkout, add, commit, push; the first failure
    /// stops the sequence.
    pub async fn publish_change(
        &self,
        workspace: &Workspace,
        branch: &str,
        base: Option<&str>,
        relative: &Path,
        push: bool,
    ) -> Result<PublishedBranch> {
        let path = workspace.path();

        let outcome = git::ensure_branch(path, branch, base).await?;
        tracing::debug!(branch = branch, outcome = ?outcome, "Working branch ready");

        git::add_path(path, relative).await?;
        git::commit(path, &self.commit_message, &self.author).await?;

        if push {
            git::push(path, branch, self.token.as_deref()).await?;
        }

        Ok(PublishedBranch {
            name: branch.to_string(),
            outcome,
            pushed: push,
        })
    }

    /// Remove the clone. Failures are logged, never returned.
    pub fn release(&self, workspace: Workspace) {
        let path = workspace.path().to_path_buf();
        if let Err(e) = workspace.dir.close() {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove workspace");
        }
    }

    /// Resolve `requested` under `root`, rejecting absolute paths and `..`.
    pub fn verify_path(root: &Path, requested: &Path) -> Result<PathBuf> {
        let escapes = requested.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes || requested.as_os_str().is_empty() {
            return Err(AppError::Write(format!(
                "Path is outside workspace: {}",
                requested.display()
            )));
        }
        Ok(root.join(requested))
    }
}
