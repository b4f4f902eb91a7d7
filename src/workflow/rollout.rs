use std::path::Path;

use crate::config::{ProposalMode, RolloutConfig};
use crate::error::Result;
use crate::platform::types::TreeFile;
use crate::platform::Platform;
use crate::proposal::{ProposalClient, ProposalOutcome, ProposalTarget};
use crate::repository::{RepoCoordinates, RepositoryDescriptor};
use crate::template::{self, OrgSource};
use crate::workflow::branch::BranchNamer;
use crate::workflow::types::{ProposalRecord, RepositoryOutcome, Stage, WorkflowOutcome};
use crate::workspace::{Workspace, WorkspaceManager};

/// Per-run pipeline knobs.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub artifact_path: String,
    pub mode: ProposalMode,
    pub base_branch: Option<String>,
    pub org_source: OrgSource,
    pub branches: BranchNamer,
}

impl PipelineSettings {
    pub fn from_config(config: &RolloutConfig) -> Self {
        Self {
            artifact_path: config.artifact_path.clone(),
            mode: config.proposal_mode,
            base_branch: config.base_branch.clone(),
            org_source: config.org_source,
            branches: BranchNamer::new(&config.branch_prefix, config.branch_naming),
        }
    }
}

/// Everything a batch produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<RepositoryOutcome>,
    /// Created pull requests in completion order.
    pub proposals: Vec<ProposalRecord>,
}

#[derive(Debug, Clone)]
struct Progress {
    reached: Stage,
    attempting: Stage,
    trail: Vec<Stage>,
}

impl Progress {
    fn new() -> Self {
        Self {
            reached: Stage::Start,
            attempting: Stage::Start,
            trail: vec![Stage::Start],
        }
    }

    fn attempt(&mut self, stage: Stage) {
        self.attempting = stage;
    }

    fn enter(&mut self) {
        self.reached = self.attempting;
        self.trail.push(self.attempting);
    }

    /// Cleanup has run; reachable from every state.
    fn finish(&mut self) {
        self.trail.push(Stage::Cleaned);
    }
}

/// Drives each repository through clone, render, write, publish and propose.
pub struct Orchestrator<P> {
    workspaces: WorkspaceManager,
    proposals: ProposalClient<P>,
    settings: PipelineSettings,
}

impl<P: Platform> Orchestrator<P> {
    pub fn new(
        workspaces: WorkspaceManager,
        proposals: ProposalClient<P>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            workspaces,
            proposals,
            settings,
        }
    }

    pub fn proposals(&self) -> &ProposalClient<P> {
        &self.proposals
    }

    /// Process every repository in order. A failing repository never stops
    /// the batch.
    pub async fn run(&self, repos: &[RepositoryDescriptor], template: &str) -> RunSummary {
        let mut summary = RunSummary::default();

        for repo in repos {
            let outcome = self.process(repo, template).await;
            if let WorkflowOutcome::PullRequestCreated { url, .. } = &outcome.outcome {
                summary.proposals.push(ProposalRecord { url: url.clone() });
            }
            summary.outcomes.push(outcome);
        }

        summary
    }

    /// Run the pipeline for one repository. Errors are logged here and
    /// folded into the returned outcome.
    pub async fn process(&self, repo: &RepositoryDescriptor, template: &str) -> RepositoryOutcome {
        tracing::info!(repo = %repo.url, tier = repo.tier, "Processing repository");

        let mut progress = Progress::new();
        let result = match repo.coordinates() {
            Ok(coords) => match self.settings.mode {
                ProposalMode::PrePushedBranch => {
                    self.run_local(repo, &coords, template, &mut progress).await
                }
                ProposalMode::ApiCommit => {
                    self.run_api(repo, &coords, template, &mut progress).await
                }
            },
            Err(e) => Err(e),
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    repo = %repo.url,
                    stage = %progress.attempting,
                    error = %e,
                    "Repository skipped"
                );
                WorkflowOutcome::Failed {
                    stage: progress.attempting,
                    error: e.to_string(),
                }
            }
        };

        progress.finish();
        RepositoryOutcome {
            repo: repo.url.clone(),
            reached: progress.reached,
            trail: progress.trail,
            outcome,
        }
    }

    async fn run_local(
        &self,
        repo: &RepositoryDescriptor,
        coords: &RepoCoordinates,
        template: &str,
        progress: &mut Progress,
    ) -> Result<WorkflowOutcome> {
        progress.attempt(Stage::Cloned);
        let workspace = self.workspaces.acquire(&repo.url).await?;
        progress.enter();

        let result = self
            .publish_and_propose(repo, coords, template, &workspace, progress)
            .await;

        self.workspaces.release(workspace);
        result
    }

    async fn publish_and_propose(
        &self,
        repo: &RepositoryDescriptor,
        coords: &RepoCoordinates,
        template: &str,
        workspace: &Workspace,
        progress: &mut Progress,
    ) -> Result<WorkflowOutcome> {
        let artifact = Path::new(&self.settings.artifact_path);

        progress.attempt(Stage::Rendered);
        let content = template::render_with(template, repo, self.settings.org_source)?;
        progress.enter();

        progress.attempt(Stage::Written);
        self.workspaces
            .write_artifact(workspace, artifact, &content)
            .await?;
        progress.enter();

        progress.attempt(Stage::Published);
        let branch = self.settings.branches.next();
        let push = self.proposals.dry_run().allows_mutation();
        let published = self
            .workspaces
            .publish_change(
                workspace,
                &branch,
                self.settings.base_branch.as_deref(),
                artifact,
                push,
            )
            .await?;
        progress.enter();

        progress.attempt(Stage::ProposalAttempted);
        let base_branch = self
            .settings
            .base_branch
            .clone()
            .unwrap_or_else(|| workspace.default_branch.clone());
        let target = ProposalTarget {
            owner: &coords.owner,
            repo: &coords.name,
            branch: &published.name,
        };
        let result = self
            .proposals
            .propose_pushed_branch(&target, &base_branch)
            .await;
        progress.enter();

        Ok(Self::proposal_outcome(repo, result))
    }

    async fn run_api(
        &self,
        repo: &RepositoryDescriptor,
        coords: &RepoCoordinates,
        template: &str,
        progress: &mut Progress,
    ) -> Result<WorkflowOutcome> {
        progress.attempt(Stage::Rendered);
        let content = template::render_with(template, repo, self.settings.org_source)?;
        progress.enter();

        progress.attempt(Stage::ProposalAttempted);
        let branch = self.settings.branches.next();
        let target = ProposalTarget {
            owner: &coords.owner,
            repo: &coords.name,
            branch: &branch,
        };
        let file = TreeFile {
            path: self.settings.artifact_path.clone(),
            content,
        };
        let result = self
            .proposals
            .propose_via_api(&target, self.settings.base_branch.as_deref(), file)
            .await;
        progress.enter();

        Ok(Self::proposal_outcome(repo, result))
    }

    /// Any proposal result is a valid end state; failures are logged only.
    fn proposal_outcome(
        repo: &RepositoryDescriptor,
        result: Result<ProposalOutcome>,
    ) -> WorkflowOutcome {
        match result {
            Ok(ProposalOutcome::Created(pr)) => {
                tracing::info!(repo = %repo.url, url = %pr.html_url, "Pull request created");
                WorkflowOutcome::PullRequestCreated {
                    number: pr.number,
                    url: pr.html_url,
                }
            }
            Ok(ProposalOutcome::DryRun { branch, .. }) => WorkflowOutcome::DryRun { branch },
            Err(e) => {
                tracing::error!(
                    repo = %repo.url,
                    stage = %Stage::ProposalAttempted,
                    error = %e,
                    "Proposal failed"
                );
                WorkflowOutcome::ProposalFailed {
                    error: e.to_string(),
                }
            }
        }
    }
}
