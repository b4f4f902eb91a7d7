pub mod git;
pub mod manager;

pub use manager::{PublishedBranch, Workspace, WorkspaceManager};
