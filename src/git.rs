use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

use crate::repo::{RepositoryIdentity, parse_repository};

const GIT_TIMEOUT: Duration = Duration::from_secs(10);

/// A version-control tool that may or may not be installed.
#[allow(async_fn_in_trait)]
pub trait RemoteSource {
    async fn is_available(&self) -> bool;
    /// URL of the default remote.
    async fn remote_url(&self) -> Result<String>;
}

/// Repository of the default remote, `None` when the tool is missing or fails.
pub async fn repository_from_remote<R: RemoteSource>(remote: &R) -> Option<RepositoryIdentity> {
    if !remote.is_available().await {
        log::debug!("git not found on PATH, skipping remote lookup");
        return None;
    }

    match remote.remote_url().await {
        Ok(url) => parse_repository(Some(&url)),
        Err(e) => {
            log::debug!("could not read git remote: {e:#}");
            None
        }
    }
}

/// The `git` executable, run in `cwd`.
pub struct GitCli {
    program: String,
    cwd: PathBuf,
    search_path: Option<OsString>,
}

impl GitCli {
    /// `git` looked up on the current `PATH`.
    pub fn from_env(cwd: impl Into<PathBuf>) -> Self {
        Self::new("git", cwd, std::env::var_os("PATH"))
    }

    pub fn new(
        program: impl Into<String>,
        cwd: impl Into<PathBuf>,
        search_path: Option<OsString>,
    ) -> Self {
        Self {
            program: program.into(),
            cwd: cwd.into(),
            search_path,
        }
    }

    fn candidate_names(&self) -> Vec<String> {
        if cfg!(windows) {
            vec![format!("{}.exe", self.program), self.program.clone()]
        } else {
            vec![self.program.clone()]
        }
    }
}

impl RemoteSource for GitCli {
    async fn is_available(&self) -> bool {
        let Some(paths) = &self.search_path else {
            return false;
        };

        for dir in std::env::split_paths(paths) {
            for name in self.candidate_names() {
                if is_executable(&dir.join(name)).await {
                    return true;
                }
            }
        }
        false
    }

    async fn remote_url(&self) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(["remote", "get-url", "origin"])
            .current_dir(&self.cwd)
            .kill_on_drop(true);

        let output = tokio::time::timeout(GIT_TIMEOUT, cmd.output())
            .await
            .context("git timed out")?
            .with_context(|| format!("failed to run {}", self.program))?;

        if !output.status.success() {
            anyhow::bail!(
                "git exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let url = String::from_utf8(output.stdout).context("git printed non UTF-8 output")?;
        Ok(url.trim().to_string())
    }
}

async fn is_executable(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_file() && has_exec_bit(&meta),
        Err(_) => false,
    }
}

#[cfg(unix)]
fn has_exec_bit(meta: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn has_exec_bit(_meta: &Metadata) -> bool {
    true
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    pub(crate) struct FakeRemote {
        available: bool,
        url: Option<String>,
        calls: Cell<usize>,
    }

    impl FakeRemote {
        pub(crate) fn missing() -> Self {
            Self {
                available: false,
                url: None,
                calls: Cell::new(0),
            }
        }

        pub(crate) fn returning(url: &str) -> Self {
            Self {
                available: true,
                url: Some(url.to_string()),
                calls: Cell::new(0),
            }
        }

        pub(crate) fn broken() -> Self {
            Self {
                available: true,
                ..Self::missing()
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.get()
        }
    }

    impl RemoteSource for FakeRemote {
        async fn is_available(&self) -> bool {
            self.available
        }

        async fn remote_url(&self) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            self.url.clone().context("git error")
        }
    }

    #[tokio::test]
    async fn missing_binary_is_never_invoked() {
        let remote = FakeRemote::missing();
        assert_eq!(repository_from_remote(&remote).await, None);
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn git_error_is_none() {
        let remote = FakeRemote::broken();
        assert_eq!(repository_from_remote(&remote).await, None);
        assert_eq!(remote.calls(), 1);
    }

    #[tokio::test]
    async fn parses_remote_url() {
        let remote = FakeRemote::returning("git@github.com:user/repo.git\n");
        assert_eq!(
            repository_from_remote(&remote).await,
            Some(RepositoryIdentity::new("user", "repo"))
        );
    }

    #[tokio::test]
    async fn availability_follows_search_path() {
        let empty = TempDir::new().unwrap();
        let git = GitCli::new("git", empty.path(), Some(empty.path().as_os_str().to_owned()));
        assert!(!git.is_available().await);

        let no_path = GitCli::new("git", empty.path(), None);
        assert!(!no_path.is_available().await);

        let bin = TempDir::new().unwrap();
        let exe = bin.path().join(if cfg!(windows) { "git.exe" } else { "git" });
        fs::write(&exe, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
        }

        let search = std::env::join_paths([empty.path(), bin.path()]).unwrap();
        let git = GitCli::new("git", empty.path(), Some(search));
        assert!(git.is_available().await);
    }

    #[tokio::test]
    async fn missing_program_fails_to_run() {
        let dir = TempDir::new().unwrap();
        let git = GitCli::new("devto-test-no-such-binary", dir.path(), None);
        assert!(git.remote_url().await.is_err());
    }
}
