//! Which repository files a manager scans.
//!
//! A manager block's `managerFilePatterns` replace the manager's built-in
//! defaults; without a block the defaults apply. Paths are matched in
//! repository-relative form with `/` separators.

use crate::models::{BotConfig, FilePattern, Manager};
use std::borrow::Cow;

#[derive(Debug, Clone)]
pub struct FileMatcher {
    pub manager: Manager,
    pub patterns: Vec<FilePattern>,
    /// True when the patterns come from the configuration.
    pub overridden: bool,
}

impl FileMatcher {
    pub fn defaults(manager: Manager) -> Self {
        Self {
            manager,
            patterns: manager
                .default_patterns()
                .iter()
                .filter_map(|p| FilePattern::new(p).ok())
                .collect(),
            overridden: false,
        }
    }

    pub fn for_manager(cfg: &BotConfig, manager: Manager) -> Self {
        match cfg
            .managers
            .get(&manager)
            .and_then(|m| m.manager_file_patterns.as_ref())
        {
            Some(patterns) => Self {
                manager,
                patterns: patterns.clone(),
                overridden: true,
            },
            None => Self::defaults(manager),
        }
    }

    pub fn is_match(&self, path: &str) -> bool {
        let path = normalize_path(path);
        self.patterns.iter().any(|p| p.is_match(&path))
    }
}

impl BotConfig {
    /// Effective file patterns for `manager`.
    pub fn file_patterns(&self, manager: Manager) -> Vec<FilePattern> {
        FileMatcher::for_manager(self, manager).patterns
    }

    /// Whether `manager` would scan `path`. Ignores whether it is enabled.
    pub fn matches_file(&self, manager: Manager, path: &str) -> bool {
        FileMatcher::for_manager(self, manager).is_match(path)
    }
}

/// Convert to `/` separators and drop a leading `./`.
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    let path = path.strip_prefix("./").unwrap_or(path);
    if path.contains('\\') {
        Cow::Owned(path.replace('\\', "/"))
    } else {
        Cow::Borrowed(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::{load_str, Format};

    fn canonical() -> BotConfig {
        load_str(include_str!("../fixtures/renovate-config.js"), Format::JsModule).unwrap()
    }

    #[test]
    fn requirements_override_matches_nested_files_only() {
        let cfg = canonical();
        let m = Manager::PipRequirements;
        assert!(cfg.matches_file(m, "requirements.txt"));
        assert!(cfg.matches_file(m, "sub/dir/requirements.txt"));
        assert!(!cfg.matches_file(m, "requirements.txt.bak"));
        assert!(!cfg.matches_file(m, "subrequirements.txt"));
        // the override replaces the broader default
        assert!(!cfg.matches_file(m, "requirements-dev.txt"));
        assert!(FileMatcher::defaults(m).is_match("requirements-dev.txt"));
        assert!(FileMatcher::for_manager(&cfg, m).overridden);
    }

    #[test]
    fn defaults_apply_without_override() {
        let cfg = canonical();
        assert!(cfg.matches_file(Manager::Dockerfile, "Dockerfile"));
        assert!(cfg.matches_file(Manager::Dockerfile, "backend/Dockerfile.prod"));
        assert!(cfg.matches_file(Manager::DockerCompose, "docker-compose.yml"));
        assert!(cfg.matches_file(Manager::DockerCompose, "deploy/compose.prod.yaml"));
        assert!(cfg.matches_file(Manager::GithubActions, ".github/workflows/ci.yml"));
        assert!(!cfg.matches_file(Manager::GithubActions, "docs/ci.yml"));
        assert!(cfg.matches_file(Manager::Npm, "frontend/package.json"));
        assert!(!cfg.matches_file(Manager::Npm, "frontend/package-lock.json"));
        assert!(!FileMatcher::for_manager(&cfg, Manager::Npm).overridden);
    }

    #[test]
    fn file_patterns_prefer_override_over_defaults() {
        let cfg = canonical();
        let pip: Vec<String> = cfg
            .file_patterns(Manager::PipRequirements)
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();
        assert_eq!(pip, vec![r"(^|/)requirements\.txt$".to_string()]);

        let docker = cfg.file_patterns(Manager::Dockerfile);
        assert!(!docker.is_empty());
        assert_eq!(docker, FileMatcher::defaults(Manager::Dockerfile).patterns);
    }

    #[test]
    fn windows_and_dot_prefixed_paths() {
        let cfg = canonical();
        assert!(cfg.matches_file(Manager::PipRequirements, r"sub\dir\requirements.txt"));
        assert!(cfg.matches_file(Manager::PipRequirements, "./requirements.txt"));
        assert_eq!(normalize_path("a/b"), Cow::Borrowed("a/b"));
    }
}
