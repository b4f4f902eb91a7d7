use std::fmt;

/// Pipeline states for one repository, in order. There are no backward
/// transitions; any failure jumps straight to `Cleaned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Start,
    Cloned,
    Rendered,
    Written,
    Published,
    ProposalAttempted,
    Cleaned,
}

impl Stage {
    /// The operation that moves a pipeline into this state.
    pub fn action(&self) -> &'static str {
        match self {
            Stage::Start => "parse",
            Stage::Cloned => "clone",
            Stage::Rendered => "render",
            Stage::Written => "write",
            Stage::Published => "publish",
            Stage::ProposalAttempted => "propose",
            Stage::Cleaned => "cleanup",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

/// Outcome of a workflow execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// Pull request opened.
    PullRequestCreated { number: u64, url: String },
    /// Dry run reached the proposal step; nothing was opened.
    DryRun { branch: String },
    /// Change was published but the proposal call failed.
    ProposalFailed { error: String },
    /// The pipeline stopped while trying to reach `stage`.
    Failed { stage: Stage, error: String },
}

/// Final record for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOutcome {
    pub repo: String,
    /// Last state successfully entered before cleanup.
    pub reached: Stage,
    /// Every state entered, in order; always ends with `Cleaned`.
    pub trail: Vec<Stage>,
    pub outcome: WorkflowOutcome,
}

/// A created pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalRecord {
    pub url: String,
}
