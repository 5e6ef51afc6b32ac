//! Repository scan: which files each enabled manager would pick up.
//!
//! Files are enumerated with a recursive glob under the repository root,
//! then matched against every enabled manager in parallel. Results are
//! sorted by file, then manager, so output is deterministic.

use crate::error::{Error, Result};
use crate::matching::FileMatcher;
use crate::models::{BotConfig, Manager};
use glob::{glob, Pattern};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directories never descended into.
const SKIP_DIRS: &[&str] = &[".git", "node_modules"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanHit {
    pub manager: Manager,
    pub file: String,
}

/// Scan `root` for files handled by the enabled managers of `cfg`.
///
/// `exclude` holds glob patterns matched against repository-relative paths.
pub fn run_scan(root: &Path, cfg: &BotConfig, exclude: &[String]) -> Result<Vec<ScanHit>> {
    let excludes = exclude
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| Error::Glob {
                pattern: p.clone(),
                message: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let matchers: Vec<FileMatcher> = cfg
        .enabled_managers
        .iter()
        .copied()
        .filter(|m| cfg.manager_enabled(*m))
        .map(|m| FileMatcher::for_manager(cfg, m))
        .collect();

    let files = list_files(root)?;
    debug!(files = files.len(), managers = matchers.len(), "scanning repository");

    let mut hits: Vec<ScanHit> = files
        .par_iter()
        .filter(|rel| !excludes.iter().any(|p| p.matches(rel)))
        .flat_map_iter(|rel| {
            matchers
                .iter()
                .filter(|m| m.is_match(rel))
                .map(|m| ScanHit {
                    manager: m.manager,
                    file: rel.clone(),
                })
                .collect::<Vec<_>>()
        })
        .collect();
    hits.sort_by(|a, b| a.file.cmp(&b.file).then(a.manager.cmp(&b.manager)));
    hits.dedup();
    Ok(hits)
}

/// Repository-relative paths of regular files below `root`, `/`-separated.
fn list_files(root: &Path) -> Result<Vec<String>> {
    let pattern = format!(
        "{}/**/*",
        Pattern::escape(&root.to_string_lossy()).trim_end_matches('/')
    );
    let entries = glob(&pattern).map_err(|e| Error::Glob {
        pattern: pattern.clone(),
        message: e.to_string(),
    })?;
    let mut out = Vec::new();
    for entry in entries {
        let path: PathBuf = match entry {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "skipping unreadable path");
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        let Some(rel) = pathdiff::diff_paths(&path, root) else {
            continue;
        };
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>();
        if rel.iter().any(|c| SKIP_DIRS.iter().any(|d| c == d)) {
            continue;
        }
        out.push(rel.join("/"));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::{load_str, Format};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, "").unwrap();
    }

    fn hit(manager: Manager, file: &str) -> ScanHit {
        ScanHit {
            manager,
            file: file.to_string(),
        }
    }

    #[test]
    fn scans_repository_with_enabled_managers() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        for f in [
            "requirements.txt",
            "requirements.txt.bak",
            "backend/requirements.txt",
            "backend/requirements-dev.txt",
            "Dockerfile",
            "docker-compose.yml",
            ".github/workflows/ci.yml",
            "frontend/package.json",
            "frontend/node_modules/x/package.json",
            "Cargo.toml",
            "README.md",
        ] {
            touch(root, f);
        }
        let cfg = load_str(include_str!("../fixtures/renovate-config.js"), Format::JsModule)
            .unwrap();
        let hits = run_scan(root, &cfg, &[]).unwrap();
        assert_eq!(
            hits,
            vec![
                hit(Manager::GithubActions, ".github/workflows/ci.yml"),
                hit(Manager::Dockerfile, "Dockerfile"),
                hit(Manager::PipRequirements, "backend/requirements.txt"),
                hit(Manager::DockerCompose, "docker-compose.yml"),
                hit(Manager::Npm, "frontend/package.json"),
                hit(Manager::PipRequirements, "requirements.txt"),
            ]
        );
    }

    #[test]
    fn honors_excludes_and_disabled_blocks() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(root, "a/package.json");
        touch(root, "vendor/b/package.json");
        touch(root, "Cargo.toml");
        let cfg = load_str(
            r#"{
                "platform": "github",
                "endpoint": "https://api.github.com/",
                "repositories": ["o/r"],
                "enabledManagers": ["npm", "cargo"],
                "cargo": {"enabled": false}
            }"#,
            Format::Json,
        )
        .unwrap();
        let hits = run_scan(root, &cfg, &["vendor/**".to_string()]).unwrap();
        assert_eq!(hits, vec![hit(Manager::Npm, "a/package.json")]);

        let err = run_scan(root, &cfg, &["[".to_string()]).unwrap_err();
        assert!(matches!(err, Error::Glob { .. }));
    }
}
