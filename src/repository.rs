use url::Url;

use crate::error::{AppError, Result};

/// One manifest row: a repository and the tier it is classified under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDescriptor {
    pub url: String,
    pub tier: u32,
}

/// Everything derivable from a well-formed repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinates {
    pub host: String,
    pub owner: String,
    pub name: String,
}

impl RepositoryDescriptor {
    pub fn new(url: impl Into<String>, tier: u32) -> Self {
        Self {
            url: url.into(),
            tier,
        }
    }

    /// Parse the URL into host, owner and name.
    ///
    /// Owner and name are the last two non-empty path segments, percent-decoded;
    /// a trailing `.git` is dropped from the name.
    pub fn coordinates(&self) -> Result<RepoCoordinates> {
        let parse_err = |reason: &str| AppError::Parse {
            url: self.url.clone(),
            reason: reason.to_string(),
        };

        let url = Url::parse(&self.url).map_err(|e| parse_err(&e.to_string()))?;

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        if segments.len() < 2 {
            return Err(parse_err("expected at least owner and name path segments"));
        }

        let decode = |seg: &str| {
            urlencoding::decode(seg)
                .map(|s| s.into_owned())
                .map_err(|e| parse_err(&e.to_string()))
        };
        let owner = decode(segments[segments.len() - 2])?;
        let raw_name = decode(segments[segments.len() - 1])?;
        let name = raw_name
            .strip_suffix(".git")
            .unwrap_or(raw_name.as_str())
            .to_string();
        if name.is_empty() {
            return Err(parse_err("empty repository name"));
        }

        Ok(RepoCoordinates {
            host: url.host_str().unwrap_or_default().to_string(),
            owner,
            name,
        })
    }
}

impl RepoCoordinates {
    /// Organization approximated from the URL host with any `www.` removed.
    pub fn host_org(&self) -> &str {
        self.host.strip_prefix("www.").unwrap_or(&self.host)
    }

    /// `owner/name` as the hosting platform knows it.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}
