//! repo.rs
//!
//! Works out which hosted repository the current project belongs to, as a
//! `user/name` pair. Sources are tried in order and the first hit wins:
//!
//!   1. the explicit `--repo` value, or failing that the `DEVTO_REPO` value
//!   2. the `repository` field of `package.json` (optionally in ancestors)
//!   3. the `origin` remote of the local git checkout
//!
//! Every source is lazy: the filesystem walk and the git subprocess only run
//! when everything before them came up empty. Nothing here returns an error;
//! a source that can't answer yields `None` and the chain moves on.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use url::Url;

use crate::git::{self, RemoteSource};
use crate::manifest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryIdentity {
    pub user: String,
    pub name: String,
}

impl RepositoryIdentity {
    pub fn new(user: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            name: name.into(),
        }
    }
}

/// Shorthand form, `user/name`.
impl fmt::Display for RepositoryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user, self.name)
    }
}

/// Parse a repository reference. Accepted forms:
///
/// - shorthand `user/name`
/// - npm hosted shorthand `github:user/name`
/// - any URL with a scheme whose path ends in `user/name[.git]`
/// - scp-like SSH `git@host:user/name[.git]`
///
/// Anything else is `None`. Case is kept as given.
pub fn parse_repository(input: Option<&str>) -> Option<RepositoryIdentity> {
    let input = input?.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(rest) = input.strip_prefix("github:") {
        return parse_shorthand(rest);
    }
    if input.contains("://") {
        return parse_url(input);
    }
    if let Some(path) = scp_path(input) {
        return from_url_path(path);
    }
    parse_shorthand(input)
}

/// Exactly one slash, both halves non-empty, nothing that looks like a host.
fn parse_shorthand(s: &str) -> Option<RepositoryIdentity> {
    let (user, name) = s.split_once('/')?;
    let valid = |part: &str| {
        !part.is_empty()
            && !part
                .chars()
                .any(|c| c == '/' || c == ':' || c == '@' || c.is_whitespace())
    };
    if valid(user) && valid(name) {
        Some(RepositoryIdentity::new(user, name))
    } else {
        None
    }
}

fn parse_url(s: &str) -> Option<RepositoryIdentity> {
    let url = Url::parse(s).ok()?;
    url.host_str()?;
    from_url_path(url.path())
}

/// `git@host:user/name.git` -> `user/name.git`
fn scp_path(s: &str) -> Option<&str> {
    let (login, rest) = s.split_once('@')?;
    let (host, path) = rest.split_once(':')?;
    if login.is_empty() || host.is_empty() || login.contains('/') || host.contains('/') {
        return None;
    }
    Some(path)
}

/// Last two path segments, with a trailing `.git` dropped from the name.
fn from_url_path(path: &str) -> Option<RepositoryIdentity> {
    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let mut segments = path.rsplit('/');
    let name = segments.next().filter(|s| !s.is_empty())?;
    let user = segments.next().filter(|s| !s.is_empty())?;
    Some(RepositoryIdentity::new(user, name))
}

/// The fallback chain. `env_repo` is the value of `DEVTO_REPO` as read by the
/// CLI layer; `cwd` should be absolute so ancestor search can reach the root.
pub struct RepositoryResolver<R> {
    cwd: PathBuf,
    env_repo: Option<String>,
    remote: R,
}

impl<R: RemoteSource> RepositoryResolver<R> {
    pub fn new(cwd: impl Into<PathBuf>, env_repo: Option<String>, remote: R) -> Self {
        Self {
            cwd: cwd.into(),
            env_repo,
            remote,
        }
    }

    pub async fn resolve(
        &self,
        explicit: Option<&str>,
        search_parent_dirs: bool,
    ) -> Option<RepositoryIdentity> {
        if let Some(repo) = self.from_string_or_env(explicit) {
            log::debug!("repository {repo} from argument/environment");
            return Some(repo);
        }

        if let Some(repo) = manifest::repository_from_manifest(&self.cwd, search_parent_dirs).await
        {
            log::debug!("repository {repo} from package manifest");
            return Some(repo);
        }

        let repo = git::repository_from_remote(&self.remote).await;
        match &repo {
            Some(repo) => log::debug!("repository {repo} from git remote"),
            None => log::debug!("no repository found in any source"),
        }
        repo
    }

    /// An explicit value is parsed on its own; the environment is only consulted
    /// when no (non-empty) explicit value was given.
    pub fn from_string_or_env(&self, explicit: Option<&str>) -> Option<RepositoryIdentity> {
        match explicit.filter(|s| !s.trim().is_empty()) {
            Some(s) => parse_repository(Some(s)),
            None => parse_repository(self.env_repo.as_deref()),
        }
    }
}
