use std::path::{Path, PathBuf};

use git2::{Repository, Signature};
use tempfile::TempDir;

pub struct TestRemote {
    _dir: TempDir,
    pub path: PathBuf,
    pub url: String,
}

/// A bare repository at `<tmp>/<owner>/<name>.git` with one commit on `main`.
pub fn bare_remote(owner: &str, name: &str) -> TestRemote {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(owner).join(format!("{name}.git"));
    let repo = Repository::init_bare(&path).unwrap();

    let blob = repo.blob(b"# test repository\n").unwrap();
    let mut builder = repo.treebuilder(None).unwrap();
    builder.insert("README.md", blob, 0o100644).unwrap();
    let tree = repo.find_tree(builder.write().unwrap()).unwrap();

    let sig = Signature::now("Seed", "seed@example.com").unwrap();
    repo.commit(Some("refs/heads/main"), &sig, &sig, "Initial commit", &tree, &[])
        .unwrap();
    repo.set_head("refs/heads/main").unwrap();

    let url = format!("file://{}", path.display());
    TestRemote {
        _dir: dir,
        path,
        url,
    }
}

/// Content of `file` at the tip of `branch` in a bare remote.
pub fn file_on_branch(remote: &Path, branch: &str, file: &str) -> Option<String> {
    let repo = Repository::open_bare(remote).ok()?;
    let commit = repo
        .find_reference(&format!("refs/heads/{branch}"))
        .ok()?
        .peel_to_commit()
        .ok()?;
    let id = commit.tree().ok()?.get_name(file)?.id();
    let blob = repo.find_blob(id).ok()?;
    Some(String::from_utf8_lossy(blob.content()).into_owned())
}
