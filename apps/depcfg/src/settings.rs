//! Tool settings discovery and effective settings resolution.
//!
//! depcfg reads `depcfg.toml|yaml|yml` from the repository root (or closest
//! ancestor) and merges it with CLI flags to produce an `Effective` value.
//! Defaults:
//! - `config`: first file found by `load::discover`
//! - `output`: `human`
//! - `strict`: false
//! - `scan.exclude`: empty
//!
//! Overrides precedence: CLI > settings file > defaults.

use crate::load;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const SETTINGS_FILES: &[&str] = &["depcfg.toml", "depcfg.yaml", "depcfg.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Root settings loaded from `depcfg.toml|yaml`.
pub struct Settings {
    /// Bot configuration path, relative to the repository root.
    pub config: Option<String>,
    pub output: Option<String>,
    pub strict: Option<bool>,
    #[serde(default)]
    pub scan: Option<ScanSettings>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// `[scan]` section.
pub struct ScanSettings {
    /// Glob patterns of repository paths to leave out of `depcfg scan`.
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved settings used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    /// Bot configuration file; `None` when nothing was configured or found.
    pub config: Option<PathBuf>,
    pub output: String,
    pub strict: bool,
    pub exclude: Vec<String>,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a settings file or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if SETTINGS_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `Settings` from `depcfg.toml` or `depcfg.yaml|yml` if present.
///
/// A settings file that fails to parse is reported and ignored.
pub fn load_settings(root: &Path) -> Option<Settings> {
    let path = SETTINGS_FILES
        .iter()
        .map(|f| root.join(f))
        .find(|p| p.exists())?;
    let s = fs::read_to_string(&path).ok()?;
    let parsed = if path.extension().is_some_and(|e| e == "toml") {
        toml::from_str::<Settings>(&s).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str::<Settings>(&s).map_err(|e| e.to_string())
    };
    match parsed {
        Ok(settings) => {
            debug!(path = %path.display(), "loaded settings");
            Some(settings)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring invalid settings file");
            None
        }
    }
}

/// Resolve `Effective` by merging CLI flags, discovered settings, and defaults.
///
/// Relative paths given on the command line resolve against the current
/// directory; a relative `config` from the settings file resolves against the
/// repository root.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_config: Option<&str>,
    cli_output: Option<&str>,
    cli_strict: Option<bool>,
) -> Effective {
    let cwd = std::env::current_dir().unwrap_or_else(|e| {
        warn!(error = %e, "current directory unavailable; using `.`");
        PathBuf::from(".")
    });
    resolve_effective_in(&cwd, cli_repo_root, cli_config, cli_output, cli_strict)
}

/// `resolve_effective` with an explicit working directory.
pub fn resolve_effective_in(
    cwd: &Path,
    cli_repo_root: Option<&str>,
    cli_config: Option<&str>,
    cli_output: Option<&str>,
    cli_strict: Option<bool>,
) -> Effective {
    let start = cwd.join(cli_repo_root.unwrap_or(""));
    let repo_root = detect_repo_root(&start);
    let settings = load_settings(&repo_root).unwrap_or_default();

    let config = match cli_config {
        Some(p) => Some(cwd.join(p)),
        None => settings
            .config
            .map(|p| repo_root.join(p))
            .or_else(|| load::discover(&repo_root)),
    };

    let output = cli_output
        .map(|s| s.to_string())
        .or(settings.output)
        .unwrap_or_else(|| "human".to_string());

    let strict = cli_strict.or(settings.strict).unwrap_or(false);

    let exclude = settings.scan.map(|s| s.exclude).unwrap_or_default();

    Effective {
        repo_root,
        config,
        output,
        strict,
        exclude,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("depcfg.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
config = "bot/config.js"
output = "json"
strict = true
[scan]
exclude = ["vendor/**"]
    "#
        )
        .unwrap();

        // Resolve using explicit repo_root to avoid global CWD races
        let eff = resolve_effective(root.to_str(), None, None, None);
        assert_eq!(eff.config, Some(root.join("bot/config.js")));
        assert_eq!(eff.output, "json");
        assert!(eff.strict);
        assert_eq!(eff.exclude, vec!["vendor/**".to_string()]);
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("depcfg.yaml"), "output: human\n").unwrap();
        fs::write(root.join("renovate.json"), "{}").unwrap();

        let eff = resolve_effective(root.to_str(), None, None, None);
        assert_eq!(eff.output, "human");
        assert!(!eff.strict);
        // falls back to discovery when no config path is set
        assert_eq!(eff.config, Some(root.join("renovate.json")));
    }

    #[test]
    fn test_cli_takes_precedence() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("depcfg.toml"),
            "config = \"a.json\"\noutput = \"json\"\nstrict = true\n",
        )
        .unwrap();
        let eff = resolve_effective_in(root, None, Some("b.json"), Some("human"), Some(false));
        assert_eq!(eff.config, Some(root.join("b.json")));
        assert_eq!(eff.output, "human");
        assert!(!eff.strict);
    }

    #[test]
    fn test_invalid_settings_are_ignored() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("depcfg.toml"), "strict = \"very\"\n").unwrap();
        assert!(load_settings(root).is_none());
        let eff = resolve_effective(root.to_str(), None, None, None);
        assert!(!eff.strict);
        assert_eq!(eff.config, None);
    }

    #[test]
    fn test_discovers_root_config_from_subdirectory() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("renovate.json"), "{}").unwrap();

        let cwd = root.join("a/b");
        let eff = resolve_effective_in(&cwd, None, None, None, None);
        assert_eq!(eff.repo_root, root.to_path_buf());
        assert_eq!(eff.config, Some(root.join("renovate.json")));

        let eff = resolve_effective_in(&cwd, Some("../.."), None, None, None);
        assert_eq!(eff.repo_root, cwd.join("../.."));
        assert_eq!(eff.config, Some(cwd.join("../..").join("renovate.json")));
    }

    #[test]
    fn test_cli_config_is_relative_to_cwd() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("depcfg.toml"), "config = \"bot/renovate.json\"\n").unwrap();

        let cwd = root.join("sub");
        let eff = resolve_effective_in(&cwd, None, Some("local.json"), None, None);
        assert_eq!(eff.config, Some(cwd.join("local.json")));
        let eff = resolve_effective_in(&cwd, None, None, None, None);
        assert_eq!(eff.config, Some(root.join("bot/renovate.json")));
    }

    #[test]
    fn test_repo_root_walks_up_to_git() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("a/b")).unwrap();
        assert_eq!(detect_repo_root(&root.join("a/b")), root.to_path_buf());
    }
}
