//! Soft invariant checks over a loaded configuration.
//!
//! `validate` never fails hard: it collects every violation so callers can
//! report them together. Warnings come out in schema order, independent of
//! how keys were laid out in the source: `endpoint`, `repositories`,
//! `onboardingConfig`, `baseBranches`, `extends`, `enabledManagers`, manager
//! blocks in the order `depcfg managers` lists them, `packageRules` by index,
//! then unknown top-level keys.

use crate::models::rule::package_regex;
use crate::models::{BotConfig, Manager};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    /// Stable check identifier, e.g. `rule-manager-not-enabled`.
    pub code: &'static str,
    pub path: String,
    pub message: String,
}

pub type ValidationResult = Result<(), Vec<ValidationWarning>>;

/// Check the soft invariants of `cfg`.
pub fn validate(cfg: &BotConfig) -> ValidationResult {
    let mut v = Validator::default();

    v.endpoint(&cfg.endpoint);

    v.non_empty("repositories", cfg.repositories.is_empty());
    v.duplicates("repositories", &cfg.repositories);
    for (i, repo) in cfg.repositories.iter().enumerate() {
        if !is_repository_id(repo) {
            v.push(
                "repository-format",
                format!("repositories[{i}]"),
                format!("`{repo}` is not of the form owner/name"),
            );
        }
    }

    if let Some(onboarding) = &cfg.onboarding_config {
        if let Some(extends) = &onboarding.extends {
            v.presets("onboardingConfig.extends", extends);
        }
        v.unknown_keys("onboardingConfig", onboarding.other.keys());
    }

    if let Some(branches) = &cfg.base_branches {
        v.non_empty("baseBranches", branches.is_empty());
        v.duplicates("baseBranches", branches);
        for (i, b) in branches.iter().enumerate() {
            v.blank(&format!("baseBranches[{i}]"), b);
        }
    }

    if let Some(extends) = &cfg.extends {
        v.presets("extends", extends);
    }

    v.non_empty("enabledManagers", cfg.enabled_managers.is_empty());
    v.duplicates("enabledManagers", &cfg.enabled_managers);

    for (manager, block) in &cfg.managers {
        let path = manager.as_str();
        if !cfg.enabled_managers.contains(manager) {
            v.push(
                "manager-not-enabled",
                path.to_string(),
                format!("settings for `{manager}` have no effect: it is not in enabledManagers"),
            );
        }
        if let Some(patterns) = &block.manager_file_patterns {
            let p = format!("{path}.managerFilePatterns");
            v.non_empty(&p, patterns.is_empty());
            v.duplicates(&p, patterns);
        }
        v.unknown_keys(path, block.other.keys());
    }

    for (i, rule) in cfg.rules().iter().enumerate() {
        let base = format!("packageRules[{i}]");
        if let Some(managers) = &rule.match_managers {
            let p = format!("{base}.matchManagers");
            v.non_empty(&p, managers.is_empty());
            v.duplicates(&p, managers);
            for (j, m) in managers.iter().enumerate() {
                v.rule_manager(cfg, &format!("{p}[{j}]"), *m);
            }
        }
        if let Some(types) = &rule.match_update_types {
            let p = format!("{base}.matchUpdateTypes");
            v.non_empty(&p, types.is_empty());
            v.duplicates(&p, types);
        }
        if let Some(names) = &rule.match_package_names {
            let p = format!("{base}.matchPackageNames");
            v.non_empty(&p, names.is_empty());
            v.duplicates(&p, names);
            for (j, name) in names.iter().enumerate() {
                if let Some(Err(e)) = package_regex(name) {
                    v.push(
                        "invalid-pattern",
                        format!("{p}[{j}]"),
                        format!("`{name}` is not a valid regular expression: {e}"),
                    );
                }
            }
        }
        if let Some(group) = &rule.group_name {
            v.blank(&format!("{base}.groupName"), group);
        }
        if !rule.has_effect() {
            v.push(
                "ineffective-rule",
                base.clone(),
                "rule sets none of groupName, automerge, enabled".to_string(),
            );
        }
        v.unknown_keys(&base, rule.other.keys());
    }

    v.unknown_keys("", cfg.other.keys());

    v.finish()
}

/// `owner/name`, with extra segments allowed for nested groups.
fn is_repository_id(s: &str) -> bool {
    let segments: Vec<&str> = s.split('/').collect();
    segments.len() >= 2
        && segments.iter().all(|seg| {
            !seg.is_empty()
                && seg
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        })
}

#[derive(Default)]
struct Validator {
    warnings: Vec<ValidationWarning>,
}

impl Validator {
    fn push(&mut self, code: &'static str, path: String, message: String) {
        self.warnings.push(ValidationWarning {
            code,
            path,
            message,
        });
    }

    fn finish(self) -> ValidationResult {
        if self.warnings.is_empty() {
            Ok(())
        } else {
            Err(self.warnings)
        }
    }

    fn endpoint(&mut self, endpoint: &str) {
        // Url normalizes an empty path to `/`, so check the raw text.
        match url::Url::parse(endpoint) {
            Ok(_) if !endpoint.ends_with('/') => self.push(
                "endpoint-trailing-slash",
                "endpoint".into(),
                format!("`{endpoint}` should end with `/`"),
            ),
            Ok(_) => {}
            Err(e) => self.push(
                "invalid-endpoint",
                "endpoint".into(),
                format!("`{endpoint}` is not a valid URL: {e}"),
            ),
        }
    }

    fn non_empty(&mut self, path: &str, empty: bool) {
        if empty {
            self.push("empty-list", path.to_string(), "list is empty".to_string());
        }
    }

    fn duplicates<T: PartialEq>(&mut self, path: &str, items: &[T]) {
        for (i, item) in items.iter().enumerate() {
            if let Some(first) = items[..i].iter().position(|x| x == item) {
                self.push(
                    "duplicate-entry",
                    format!("{path}[{i}]"),
                    format!("duplicate of {path}[{first}]"),
                );
            }
        }
    }

    fn blank(&mut self, path: &str, value: &str) {
        if value.trim().is_empty() {
            self.push("blank-string", path.to_string(), "value is blank".to_string());
        }
    }

    fn presets(&mut self, path: &str, presets: &[String]) {
        self.duplicates(path, presets);
        for (i, preset) in presets.iter().enumerate() {
            if preset.is_empty() || preset.chars().any(char::is_whitespace) {
                self.push(
                    "preset-format",
                    format!("{path}[{i}]"),
                    format!("`{preset}` is not a valid preset name"),
                );
            }
        }
    }

    fn rule_manager(&mut self, cfg: &BotConfig, path: &str, manager: Manager) {
        if !cfg.enabled_managers.contains(&manager) {
            self.push(
                "rule-manager-not-enabled",
                path.to_string(),
                format!("`{manager}` is not in enabledManagers; the rule never applies to it"),
            );
        }
    }

    fn unknown_keys<'a>(&mut self, parent: &str, keys: impl Iterator<Item = &'a String>) {
        for key in keys {
            let path = if parent.is_empty() {
                key.clone()
            } else {
                format!("{parent}.{key}")
            };
            self.push(
                "unknown-option",
                path,
                format!("`{key}` is not a recognized option"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::{load_str, load_value, Format};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn codes(result: ValidationResult) -> Vec<(&'static str, String)> {
        result
            .unwrap_err()
            .into_iter()
            .map(|w| (w.code, w.path))
            .collect()
    }

    #[test]
    fn canonical_config_is_clean() {
        let cfg = load_str(include_str!("../fixtures/renovate-config.js"), Format::JsModule)
            .unwrap();
        assert_eq!(validate(&cfg), Ok(()));
    }

    #[test]
    fn rule_manager_outside_enabled_is_a_warning() {
        let cfg = load_value(&json!({
            "platform": "github",
            "endpoint": "https://api.github.com/",
            "repositories": ["o/r"],
            "enabledManagers": ["pip_requirements", "npm"],
            "packageRules": [
                {"matchManagers": ["pip_requirements", "cargo"], "automerge": true}
            ]
        }))
        .unwrap();
        let warnings = validate(&cfg).unwrap_err();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, "rule-manager-not-enabled");
        assert_eq!(warnings[0].path, "packageRules[0].matchManagers[1]");
    }

    #[test]
    fn collects_every_violation_in_schema_order() {
        let cfg = load_value(&json!({
            "platform": "github",
            "endpoint": "https://api.github.com",
            "repositories": ["o/r", "o/r", "no-owner"],
            "onboardingConfig": {"extends": ["config:recommended", "bad preset"]},
            "baseBranches": ["main", " "],
            "enabledManagers": ["npm", "npm"],
            "cargo": {"managerFilePatterns": []},
            "packageRules": [
                {"matchManagers": [], "matchPackageNames": ["/(x/"]},
                {"groupName": "", "matchUpdateTypes": ["patch", "patch"]}
            ],
            "labels": ["deps"]
        }))
        .unwrap();
        assert_eq!(
            codes(validate(&cfg)),
            vec![
                ("endpoint-trailing-slash", "endpoint".to_string()),
                ("duplicate-entry", "repositories[1]".to_string()),
                ("repository-format", "repositories[2]".to_string()),
                ("preset-format", "onboardingConfig.extends[1]".to_string()),
                ("blank-string", "baseBranches[1]".to_string()),
                ("duplicate-entry", "enabledManagers[1]".to_string()),
                ("manager-not-enabled", "cargo".to_string()),
                ("empty-list", "cargo.managerFilePatterns".to_string()),
                ("empty-list", "packageRules[0].matchManagers".to_string()),
                ("invalid-pattern", "packageRules[0].matchPackageNames[0]".to_string()),
                ("ineffective-rule", "packageRules[0]".to_string()),
                ("duplicate-entry", "packageRules[1].matchUpdateTypes[1]".to_string()),
                ("blank-string", "packageRules[1].groupName".to_string()),
                ("unknown-option", "labels".to_string()),
            ]
        );
    }

    #[test]
    fn key_layout_does_not_change_warning_order() {
        let cfg = load_value(&json!({
            "labels": ["deps"],
            "packageRules": [{"matchManagers": ["npm"]}],
            "npm": {"managerFilePatterns": []},
            "cargo": {},
            "extends": ["bad preset"],
            "enabledManagers": ["npm"],
            "repositories": ["o/r"],
            "endpoint": "https://api.github.com/",
            "platform": "github"
        }))
        .unwrap();
        assert_eq!(
            codes(validate(&cfg)),
            vec![
                ("preset-format", "extends[0]".to_string()),
                ("empty-list", "npm.managerFilePatterns".to_string()),
                ("manager-not-enabled", "cargo".to_string()),
                ("ineffective-rule", "packageRules[0]".to_string()),
                ("unknown-option", "labels".to_string()),
            ]
        );
    }

    #[test]
    fn programmatic_configs_are_checked_too() {
        let cfg = BotConfig::new(crate::models::Platform::Github, "::", Vec::new());
        assert_eq!(
            codes(validate(&cfg)),
            vec![
                ("invalid-endpoint", "endpoint".to_string()),
                ("empty-list", "repositories".to_string()),
                ("empty-list", "enabledManagers".to_string()),
            ]
        );
    }

    #[test]
    fn repository_ids() {
        assert!(is_repository_id("fsusak03/Vigar"));
        assert!(is_repository_id("group/sub/project"));
        assert!(!is_repository_id("Vigar"));
        assert!(!is_repository_id("o//r"));
        assert!(!is_repository_id("o/r name"));
    }
}
