//! Publish a local directory to a fresh remote with the `git` binary.

use super::HelperError;
use std::path::Path;
use std::process::Command;
use tracing::info;

pub const DEFAULT_COMMIT_MESSAGE: &str = "Initial commit";

/// The `git` invocations, in order, that initialise and push a directory.
pub fn publish_steps(remote_url: &str, commit_message: &str) -> Vec<Vec<String>> {
    [
        vec!["init"],
        vec!["add", "--all"],
        vec!["commit", "-m", commit_message],
        vec!["branch", "-M", "main"],
        vec!["remote", "add", "origin", remote_url],
        vec!["push", "-u", "origin", "main"],
    ]
    .into_iter()
    .map(|args| args.into_iter().map(str::to_string).collect())
    .collect()
}

/// Initialise `local_dir` as a repository, commit everything and push it to
/// `remote_url`. Stops at the first command that fails.
///
/// Remote authentication (SSH keys, credential helpers) must already be set
/// up; nothing here handles prompts.
pub fn init_and_push_local_repo(
    local_dir: &Path,
    remote_url: &str,
    commit_message: &str,
) -> Result<(), HelperError> {
    if !local_dir.exists() {
        return Err(HelperError::MissingPath(local_dir.to_path_buf()));
    }
    let dir = local_dir.canonicalize().map_err(|source| HelperError::Io {
        path: local_dir.to_path_buf(),
        source,
    })?;

    for args in publish_steps(remote_url, commit_message) {
        run_step(&dir, "git", &args)?;
    }

    info!(dir = %dir.display(), remote_url, "Pushed local repository");
    Ok(())
}

fn run_step(dir: &Path, program: &str, args: &[String]) -> Result<(), HelperError> {
    let command = std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");
    info!(%command, "Running");

    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .map_err(|source| HelperError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(HelperError::CommandFailed { command, status })
    }
}
