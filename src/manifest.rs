use std::path::Path;

use crate::error::{AppError, Result};
use crate::repository::RepositoryDescriptor;

/// Read a manifest file of `repositoryURL,tier` rows.
pub async fn load(path: &Path) -> Result<Vec<RepositoryDescriptor>> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::FatalSetup(format!("Failed to read manifest {}: {e}", path.display()))
    })?;
    Ok(parse(&content))
}

/// Parse manifest text. Blank lines, rows without exactly two columns and
/// rows whose tier is not a non-negative integer are skipped.
pub fn parse(content: &str) -> Vec<RepositoryDescriptor> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(idx, line)| {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != 2 {
                tracing::debug!(line = idx + 1, "Skipping manifest row with wrong column count");
                return None;
            }
            match fields[1].parse::<u32>() {
                Ok(tier) => Some(RepositoryDescriptor::new(fields[0], tier)),
                Err(_) => {
                    tracing::debug!(line = idx + 1, tier = fields[1], "Skipping manifest row with invalid tier");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_rows() {
        let rows = parse("https://github.com/acme/widget,2\nhttps://github.com/acme/gadget, 0\n");
        assert_eq!(
            rows,
            vec![
                RepositoryDescriptor::new("https://github.com/acme/widget", 2),
                RepositoryDescriptor::new("https://github.com/acme/gadget", 0),
            ]
        );
    }

    #[test]
    fn test_parse_skips_malformed_rows() {
        let content = "\
https://github.com/acme/widget,2
https://github.com/acme,notanumber
https://github.com/acme/only-one-column
https://github.com/acme/three,1,extra
https://github.com/acme/negative,-1

https://github.com/acme/last,7";
        let rows = parse(content);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].url, "https://github.com/acme/widget");
        assert_eq!(rows[1].tier, 7);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_fatal() {
        let err = load(Path::new("/nonexistent/manifest.csv")).await.unwrap_err();
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repos.csv");
        std::fs::write(&path, "https://github.com/acme/widget,2\n").unwrap();
        let rows = load(&path).await.unwrap();
        assert_eq!(rows.len(), 1);
    }
}
