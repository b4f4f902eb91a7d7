use std::fmt;

use thiserror::Error;

/// Discrete sub-steps of publishing a local change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VcsStep {
    Checkout,
    Add,
    Commit,
    Push,
}

impl fmt::Display for VcsStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VcsStep::Checkout => "checkout",
            VcsStep::Add => "add",
            VcsStep::Commit => "commit",
            VcsStep::Push => "push",
        };
        f.write_str(name)
    }
}

/// Remote API calls made while proposing a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalStep {
    RefLookup,
    RefCreation,
    TreeCreation,
    CommitCreation,
    RefUpdate,
    PullRequestCreation,
}

impl fmt::Display for ProposalStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProposalStep::RefLookup => "ref lookup",
            ProposalStep::RefCreation => "ref creation",
            ProposalStep::TreeCreation => "tree creation",
            ProposalStep::CommitCreation => "commit creation",
            ProposalStep::RefUpdate => "ref update",
            ProposalStep::PullRequestCreation => "PR creation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Setup failed: {0}")]
    FatalSetup(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid repository URL {url}: {reason}")]
    Parse { url: String, reason: String },

    #[error("Clone of {url} failed: {message}")]
    Clone { url: String, message: String },

    #[error("Failed to write artifact: {0}")]
    Write(String),

    #[error("Git {step} failed: {output}")]
    Vcs { step: VcsStep, output: String },

    #[error("Proposal {step} failed: {message}")]
    Proposal { step: ProposalStep, message: String },

    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    #[error("Git operation failed: {0}")]
    Git(String),
}

impl AppError {
    /// Errors that make the whole run meaningless rather than a single repository.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::FatalSetup(_) | AppError::Config(_))
    }

    /// Tag an arbitrary error with the publish sub-step it happened in.
    pub fn vcs(step: VcsStep, err: impl fmt::Display) -> Self {
        AppError::Vcs {
            step,
            output: err.to_string(),
        }
    }

    /// Tag an arbitrary error with the remote call it happened in.
    pub fn proposal(step: ProposalStep, err: impl fmt::Display) -> Self {
        AppError::Proposal {
            step,
            message: err.to_string(),
        }
    }
}

impl From<octocrab::Error> for AppError {
    fn from(e: octocrab::Error) -> Self {
        match &e {
            octocrab::Error::GitHub { source, .. } => AppError::GitHubApi(source.message.clone()),
            _ => AppError::GitHubApi(e.to_string()),
        }
    }
}

impl From<git2::Error> for AppError {
    fn from(e: git2::Error) -> Self {
        AppError::Git(e.message().to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
