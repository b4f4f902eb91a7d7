use crate::config::DryRunScope;
use crate::error::{AppError, ProposalStep, Result};
use crate::platform::types::{CreatePullRequest, PullRequest, TreeFile};
use crate::platform::Platform;

/// Dry-run switch together with how far it reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DryRun {
    pub enabled: bool,
    pub scope: DryRunScope,
}

impl DryRun {
    pub fn off() -> Self {
        Self::default()
    }

    pub fn on(scope: DryRunScope) -> Self {
        Self {
            enabled: true,
            scope,
        }
    }

    /// Whether pushes and remote branch/tree/commit writes may run.
    pub fn allows_mutation(&self) -> bool {
        !self.enabled || self.scope == DryRunScope::ProposalOnly
    }

    /// Whether the pull request itself may be opened.
    pub fn allows_proposal(&self) -> bool {
        !self.enabled
    }
}

/// Result of a proposal attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposalOutcome {
    Created(PullRequest),
    /// Dry run: everything up to the pull request ran, nothing was opened.
    DryRun { branch: String, base_branch: String },
}

/// Target of a proposal.
#[derive(Debug, Clone)]
pub struct ProposalTarget<'a> {
    pub owner: &'a str,
    pub repo: &'a str,
    pub branch: &'a str,
}

/// Opens pull requests on the hosting platform.
pub struct ProposalClient<P> {
    platform: P,
    dry_run: DryRun,
    title: String,
    body: String,
    commit_message: String,
}

impl<P: Platform> ProposalClient<P> {
    pub fn new(platform: P, dry_run: DryRun, title: &str, body: &str, commit_message: &str) -> Self {
        Self {
            platform,
            dry_run,
            title: title.to_string(),
            body: body.to_string(),
            commit_message: commit_message.to_string(),
        }
    }

    pub fn dry_run(&self) -> DryRun {
        self.dry_run
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Open a pull request from a branch that was already pushed.
    pub async fn propose_pushed_branch(
        &self,
        target: &ProposalTarget<'_>,
        base_branch: &str,
    ) -> Result<ProposalOutcome> {
        self.open_pull_request(target, base_branch).await
    }

    /// Create the branch, tree and commit through the API, then open a pull
    /// request. `base_branch` falls back to the repository default.
    pub async fn propose_via_api(
        &self,
        target: &ProposalTarget<'_>,
        base_branch: Option<&str>,
        file: TreeFile,
    ) -> Result<ProposalOutcome> {
        let ProposalTarget {
            owner,
            repo,
            branch,
        } = *target;

        let base_branch = match base_branch {
            Some(b) => b.to_string(),
            None => self
                .platform
                .default_branch(owner, repo)
                .await
                .map_err(|e| AppError::proposal(ProposalStep::RefLookup, e))?,
        };

        let head = self
            .platform
            .get_branch(owner, repo, &base_branch)
            .await
            .map_err(|e| AppError::proposal(ProposalStep::RefLookup, e))?;

        if !self.dry_run.allows_mutation() {
            tracing::info!(
                repo = %format!("{owner}/{repo}"),
                base = %base_branch,
                head = %head.commit_sha,
                "Dry run: skipping remote branch, commit and pull request"
            );
            return Ok(ProposalOutcome::DryRun {
                branch: branch.to_string(),
                base_branch,
            });
        }

        self.platform
            .create_ref(owner, repo, branch, &head.commit_sha)
            .await
            .map_err(|e| AppError::proposal(ProposalStep::RefCreation, e))?;

        let tree = self
            .platform
            .create_tree(owner, repo, &head.tree_sha, std::slice::from_ref(&file))
            .await
            .map_err(|e| AppError::proposal(ProposalStep::TreeCreation, e))?;

        let commit = self
            .platform
            .create_commit(owner, repo, &self.commit_message, &tree, &head.commit_sha)
            .await
            .map_err(|e| AppError::proposal(ProposalStep::CommitCreation, e))?;

        self.platform
            .update_ref(owner, repo, branch, &commit)
            .await
            .map_err(|e| AppError::proposal(ProposalStep::RefUpdate, e))?;

        tracing::debug!(branch = branch, commit = %commit, "Remote branch updated");

        self.open_pull_request(target, &base_branch).await
    }

    async fn open_pull_request(
        &self,
        target: &ProposalTarget<'_>,
        base_branch: &str,
    ) -> Result<ProposalOutcome> {
        if !self.dry_run.allows_proposal() {
            tracing::info!(
                repo = %format!("{}/{}", target.owner, target.repo),
                branch = target.branch,
                base = base_branch,
                "Dry run: pull request not created"
            );
            return Ok(ProposalOutcome::DryRun {
                branch: target.branch.to_string(),
                base_branch: base_branch.to_string(),
            });
        }

        let pr = self
            .platform
            .create_pull_request(
                target.owner,
                target.repo,
                &CreatePullRequest {
                    title: self.title.clone(),
                    body: self.body.clone(),
                    head_branch: target.branch.to_string(),
                    base_branch: base_branch.to_string(),
                },
            )
            .await
            .map_err(|e| AppError::proposal(ProposalStep::PullRequestCreation, e))?;

        Ok(ProposalOutcome::Created(pr))
    }
}
