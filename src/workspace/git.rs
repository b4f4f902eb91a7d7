use std::path::Path;

use git2::{
    build::RepoBuilder, BranchType, Cred, ErrorCode, FetchOptions, PushOptions, RemoteCallbacks,
    Repository, ResetType, Signature,
};

use crate::error::{AppError, Result, VcsStep};

/// Result of making sure the working branch exists and is checked out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchOutcome {
    Created,
    Reused,
}

/// Commit author for local commits.
#[derive(Debug, Clone)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// Validate a branch name to prevent argument injection.
/// Rejects names starting with `-` as defence in depth.
fn validate_branch_name(name: &str) -> Result<()> {
    if name.is_empty() || name.starts_with('-') {
        return Err(AppError::vcs(
            VcsStep::Checkout,
            format!("Invalid branch name: {name:?}"),
        ));
    }
    Ok(())
}

fn make_callbacks(token: Option<&str>) -> RemoteCallbacks<'_> {
    let mut callbacks = RemoteCallbacks::new();
    if let Some(token) = token {
        callbacks.credentials(move |_url, _username_from_url, _allowed_types| {
            Cred::userpass_plaintext("x-access-token", token)
        });
    }
    callbacks
}

/// Build `FetchOptions` that authenticate via credential callback.
/// The token is captured by the closure and never written to disk.
fn make_fetch_options(token: Option<&str>) -> FetchOptions<'_> {
    let mut opts = FetchOptions::new();
    opts.remote_callbacks(make_callbacks(token));
    opts
}

/// Build `PushOptions` that authenticate via credential callback and turn
/// per-ref rejections into errors.
fn make_push_options(token: Option<&str>) -> PushOptions<'_> {
    let mut callbacks = make_callbacks(token);
    callbacks.push_update_reference(|refname, status| match status {
        Some(msg) => Err(git2::Error::from_str(&format!(
            "remote rejected {refname}: {msg}"
        ))),
        None => Ok(()),
    });
    let mut opts = PushOptions::new();
    opts.remote_callbacks(callbacks);
    opts
}

/// Clone a repository into the target directory.
///
/// The remote URL stored in `.git/config` will be the **plain** URL
/// (no credentials). Authentication is handled via credential callback only.
pub async fn clone(url: &str, target: &Path, token: Option<&str>) -> Result<()> {
    if !(url.starts_with("https://") || url.starts_with("file://")) {
        return Err(AppError::Clone {
            url: url.to_string(),
            message: "Expected an https:// or file:// clone URL".to_string(),
        });
    }

    let url = url.to_string();
    let target = target.to_path_buf();
    let token = token.map(str::to_string);

    tokio::task::spawn_blocking(move || {
        let fetch_opts = make_fetch_options(token.as_deref());
        RepoBuilder::new()
            .fetch_options(fetch_opts)
            .clone(&url, &target)
            .map_err(|e| AppError::Clone {
                url: url.clone(),
                message: e.message().to_string(),
            })?;
        Ok(())
    })
    .await
    .map_err(|e| AppError::Git(format!("Clone task panicked: {e}")))?
}

/// Short name of the branch HEAD points at.
pub async fn current_branch(dir: &Path) -> Result<String> {
    let dir = dir.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let repo = Repository::open(&dir)?;
        let head = repo.head()?;
        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| AppError::Git("HEAD is not a named branch".to_string()))
    })
    .await
    .map_err(|e| AppError::Git(format!("Current-branch task panicked: {e}")))?
}

/// Switch to `branch_name`, creating it if needed.
///
/// A local branch of that name is reused as-is; a remote-tracking
/// `origin/<branch_name>` is adopted as the starting point; otherwise the
/// branch is created at `origin/<start_point>` when given, or at HEAD. The
/// working tree is left untouched so files written before the switch are
/// carried over.
pub async fn ensure_branch(
    dir: &Path,
    branch_name: &str,
    start_point: Option<&str>,
) -> Result<BranchOutcome> {
    validate_branch_name(branch_name)?;
    if let Some(start) = start_point {
        validate_branch_name(start)?;
    }

    let dir = dir.to_path_buf();
    let branch_name = branch_name.to_string();
    let start_point = start_point.map(str::to_string);

    tokio::task::spawn_blocking(move || {
        ensure_branch_blocking(&dir, &branch_name, start_point.as_deref())
            .map_err(|e| AppError::vcs(VcsStep::Checkout, e))
    })
    .await
    .map_err(|e| AppError::Git(format!("Ensure-branch task panicked: {e}")))?
}

fn ensure_branch_blocking(
    dir: &Path,
    branch_name: &str,
    start_point: Option<&str>,
) -> std::result::Result<BranchOutcome, git2::Error> {
    let repo = Repository::open(dir)?;

    let outcome = match repo.find_branch(branch_name, BranchType::Local) {
        Ok(_) => BranchOutcome::Reused,
        Err(e) if e.code() == ErrorCode::NotFound => {
            let remote_name = format!("origin/{branch_name}");
            match repo.find_branch(&remote_name, BranchType::Remote) {
                Ok(remote) => {
                    let commit = remote.get().peel_to_commit()?;
                    repo.branch(branch_name, &commit, false)?;
                    BranchOutcome::Reused
                }
                Err(e) if e.code() == ErrorCode::NotFound => {
                    let commit = match start_point {
                        Some(start) => repo
                            .find_branch(&format!("origin/{start}"), BranchType::Remote)?
                            .get()
                            .peel_to_commit()?,
                        None => repo.head()?.peel_to_commit()?,
                    };
                    repo.branch(branch_name, &commit, false)?;
                    BranchOutcome::Created
                }
                Err(e) => return Err(e),
            }
        }
        Err(e) => return Err(e),
    };

    let refname = format!("refs/heads/{branch_name}");
    repo.set_head(&refname)?;
    let tip = repo.revparse_single(&refname)?;
    repo.reset(&tip, ResetType::Mixed, None)?;

    Ok(outcome)
}

/// Stage a single path relative to the repository root.
pub async fn add_path(dir: &Path, relative: &Path) -> Result<()> {
    let dir = dir.to_path_buf();
    let relative = relative.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let stage = || -> std::result::Result<(), git2::Error> {
            let repo = Repository::open(&dir)?;
            let mut index = repo.index()?;
            index.add_path(&relative)?;
            index.write()
        };
        stage().map_err(|e| AppError::vcs(VcsStep::Add, e))
    })
    .await
    .map_err(|e| AppError::Git(format!("Add task panicked: {e}")))?
}

/// Commit the index on top of HEAD.
pub async fn commit(dir: &Path, message: &str, author: &Author) -> Result<()> {
    let dir = dir.to_path_buf();
    let message = message.to_string();
    let author = author.clone();

    tokio::task::spawn_blocking(move || {
        let commit = || -> std::result::Result<(), git2::Error> {
            let repo = Repository::open(&dir)?;
            let sig = Signature::now(&author.name, &author.email)?;
            let mut index = repo.index()?;
            let tree_oid = index.write_tree()?;
            let tree = repo.find_tree(tree_oid)?;
            let parent = repo.head()?.peel_to_commit()?;
            repo.commit(Some("HEAD"), &sig, &sig, &message, &tree, &[&parent])?;
            Ok(())
        };
        commit().map_err(|e| AppError::vcs(VcsStep::Commit, e))
    })
    .await
    .map_err(|e| AppError::Git(format!("Commit task panicked: {e}")))?
}

/// Push the branch to origin and record origin as its upstream.
pub async fn push(dir: &Path, branch_name: &str, token: Option<&str>) -> Result<()> {
    validate_branch_name(branch_name)?;

    let dir = dir.to_path_buf();
    let branch_name = branch_name.to_string();
    let token = token.map(str::to_string);

    tokio::task::spawn_blocking(move || {
        let push = || -> std::result::Result<(), git2::Error> {
            let repo = Repository::open(&dir)?;
            let mut remote = repo.find_remote("origin")?;
            let refspec = format!("refs/heads/{branch_name}:refs/heads/{branch_name}");
            let mut push_opts = make_push_options(token.as_deref());
            remote.push(&[&refspec], Some(&mut push_opts))?;

            // Same tracking config `git push -u` writes
            let mut config = repo.config()?;
            config.set_str(&format!("branch.{branch_name}.remote"), "origin")?;
            config.set_str(
                &format!("branch.{branch_name}.merge"),
                &format!("refs/heads/{branch_name}"),
            )?;
            Ok(())
        };
        push().map_err(|e| AppError::vcs(VcsStep::Push, e))
    })
    .await
    .map_err(|e| AppError::Git(format!("Push task panicked: {e}")))?
}
