use serde::Deserialize;

use crate::error::Result;
use crate::repository::RepositoryDescriptor;

pub const REPO_TIER: &str = "${REPO_TIER}";
pub const REPO_NAME: &str = "${REPO_NAME}";
pub const REPO_FULL_NAME: &str = "${REPO_FULL_NAME}";
pub const REPO_DESCRIPTION: &str = "${REPO_DESCRIPTION}";

/// Where the organization half of `${REPO_FULL_NAME}` comes from.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrgSource {
    /// URL host with `www.` removed (`github.com/widget`).
    #[default]
    Host,
    /// Owner path segment (`acme/widget`).
    Owner,
}

/// Render `template` for one repository using the host-derived organization.
pub fn render(template: &str, repo: &RepositoryDescriptor) -> Result<String> {
    render_with(template, repo, OrgSource::Host)
}

/// Substitute the four repository placeholders. Any other text, including
/// unknown `${...}` placeholders, passes through unchanged.
pub fn render_with(template: &str, repo: &RepositoryDescriptor, org: OrgSource) -> Result<String> {
    let coords = repo.coordinates()?;

    let org = match org {
        OrgSource::Host => coords.host_org(),
        OrgSource::Owner => coords.owner.as_str(),
    };
    let full_name = if org.is_empty() {
        coords.name.clone()
    } else {
        format!("{org}/{}", coords.name)
    };
    let description = coords.name.replace('_', " ");

    let rendered = template
        .replace(REPO_TIER, &format!("tier_{}", repo.tier))
        .replace(REPO_FULL_NAME, &full_name)
        .replace(REPO_NAME, &coords.name)
        .replace(REPO_DESCRIPTION, &description);

    tracing::debug!(repo = %repo.url, rendered = %rendered, "Rendered template");

    Ok(rendered)
}
