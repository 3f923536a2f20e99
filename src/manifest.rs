use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;

use crate::repo::{RepositoryIdentity, parse_repository};

pub const MANIFEST_FILE: &str = "package.json";

#[derive(Deserialize)]
struct Manifest {
    repository: Option<RepositoryField>,
}

/// `"repository": "user/name"` or `"repository": { "type": "git", "url": "..." }`
#[derive(Deserialize)]
#[serde(untagged)]
enum RepositoryField {
    Url(String),
    Object { url: Option<String> },
}

/// Repository named by the manifest in `dir`, or, with `search_parent_dirs`,
/// by the nearest ancestor manifest that has a usable `repository` field.
pub async fn repository_from_manifest(
    dir: &Path,
    search_parent_dirs: bool,
) -> Option<RepositoryIdentity> {
    let depth = if search_parent_dirs { usize::MAX } else { 1 };

    for candidate in dir.ancestors().take(depth) {
        if let Some(repo) = read_repository(&candidate.join(MANIFEST_FILE)).await {
            return Some(repo);
        }
    }
    None
}

async fn read_repository(path: &Path) -> Option<RepositoryIdentity> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            log::debug!("skipping unreadable {}: {e}", path.display());
            return None;
        }
    };

    let manifest: Manifest = match serde_json::from_str(&text) {
        Ok(m) => m,
        Err(e) => {
            log::debug!("skipping malformed {}: {e}", path.display());
            return None;
        }
    };

    let url = match manifest.repository? {
        RepositoryField::Url(url) => url,
        RepositoryField::Object { url } => url?,
    };
    parse_repository(Some(&url))
}
