use serde_json::Value;

use crate::error::{AppError, Result};
use crate::platform::types;

fn str_at<'a>(value: &'a Value, pointer: &str) -> Result<&'a str> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::GitHubApi(format!("Missing `{pointer}` in response")))
}

/// `sha` of a created git object (tree or commit).
pub fn map_object_sha(value: &Value) -> Result<String> {
    str_at(value, "/sha").map(str::to_string)
}

/// Map a `GET /repos/{owner}/{repo}/branches/{branch}` response.
pub fn map_branch_head(value: &Value) -> Result<types::BranchHead> {
    Ok(types::BranchHead {
        commit_sha: str_at(value, "/commit/sha")?.to_string(),
        tree_sha: str_at(value, "/commit/commit/tree/sha")?.to_string(),
    })
}

pub fn map_default_branch(value: &Value) -> Result<String> {
    str_at(value, "/default_branch").map(str::to_string)
}

pub fn map_pull_request(value: &Value) -> Result<types::PullRequest> {
    Ok(types::PullRequest {
        number: value
            .get("number")
            .and_then(Value::as_u64)
            .ok_or_else(|| AppError::GitHubApi("Missing `number` in response".to_string()))?,
        html_url: str_at(value, "/html_url")?.to_string(),
    })
}
