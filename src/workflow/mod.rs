pub mod branch;
pub mod rollout;
pub mod types;

pub use rollout::{Orchestrator, PipelineSettings, RunSummary};
pub use types::{ProposalRecord, RepositoryOutcome, Stage, WorkflowOutcome};
