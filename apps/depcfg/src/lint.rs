//! Lint runner: load a configuration file and report every problem.
//!
//! A load failure becomes a single `error` issue; each validation warning
//! becomes a `warning` issue. In strict mode the caller treats warnings as
//! failures.

use crate::error::Error;
use crate::load::load_path;
use crate::models::{BotConfig, Issue, LintResult, Severity, Summary};
use crate::validate::validate;
use std::path::Path;
use tracing::debug;

/// Lint one configuration file.
pub fn run_lint(path: &Path) -> LintResult {
    let file = path.to_string_lossy().to_string();
    let issues = match load_path(path) {
        Ok(cfg) => lint_config(&file, &cfg),
        Err(e) => vec![load_issue(&file, &e)],
    };
    debug!(file = %file, issues = issues.len(), "lint finished");
    summarize(issues, 1)
}

/// Validation warnings of an already loaded configuration, as issues.
pub fn lint_config(file: &str, cfg: &BotConfig) -> Vec<Issue> {
    match validate(cfg) {
        Ok(()) => Vec::new(),
        Err(warnings) => warnings
            .into_iter()
            .map(|w| Issue {
                file: file.to_string(),
                rule: w.code.to_string(),
                severity: Severity::Warning,
                path: issue_path(&w.path),
                message: w.message,
            })
            .collect(),
    }
}

fn load_issue(file: &str, err: &Error) -> Issue {
    let (rule, path) = match err {
        Error::Schema(e) => ("schema", issue_path(e.path())),
        Error::Syntax { .. } => ("parse-config", "$".to_string()),
        _ => ("load-config", "$".to_string()),
    };
    Issue {
        file: file.to_string(),
        rule: rule.to_string(),
        severity: Severity::Error,
        path,
        message: err.to_string(),
    }
}

fn issue_path(path: &str) -> String {
    if path.is_empty() {
        "$".to_string()
    } else {
        format!("$.{path}")
    }
}

fn summarize(issues: Vec<Issue>, files: usize) -> LintResult {
    let errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    let warnings = issues.len() - errors;
    LintResult {
        issues,
        summary: Summary {
            errors,
            warnings,
            files,
        },
    }
}

impl LintResult {
    /// Whether the run should fail CI.
    pub fn failed(&self, strict: bool) -> bool {
        self.summary.errors > 0 || (strict && self.summary.warnings > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn clean_config_has_no_issues() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("renovate-config.js");
        fs::write(&p, include_str!("../fixtures/renovate-config.js")).unwrap();
        let res = run_lint(&p);
        assert!(res.issues.is_empty());
        assert_eq!(res.summary.files, 1);
        assert!(!res.failed(true));
    }

    #[test]
    fn schema_error_becomes_one_error_issue() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("renovate.json");
        fs::write(
            &p,
            r#"{"platform":"github","endpoint":"https://api.github.com/","repositories":[],"enabledManagers":["npm"]}"#,
        )
        .unwrap();
        let res = run_lint(&p);
        assert_eq!(res.summary.errors, 1);
        assert_eq!(res.issues[0].rule, "schema");
        assert_eq!(res.issues[0].path, "$.repositories");
        assert!(res.failed(false));
    }

    #[test]
    fn warnings_fail_only_in_strict_mode() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("renovate.json");
        fs::write(
            &p,
            r#"{
                "platform": "github",
                "endpoint": "https://api.github.com/",
                "repositories": ["o/r"],
                "enabledManagers": ["npm"],
                "packageRules": [{"matchManagers": ["cargo"], "automerge": true}]
            }"#,
        )
        .unwrap();
        let res = run_lint(&p);
        assert_eq!(res.summary.errors, 0);
        assert_eq!(res.summary.warnings, 1);
        assert_eq!(res.issues[0].rule, "rule-manager-not-enabled");
        assert_eq!(res.issues[0].path, "$.packageRules[0].matchManagers[0]");
        assert!(!res.failed(false));
        assert!(res.failed(true));
    }

    #[test]
    fn syntax_and_io_errors() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("config.js");
        fs::write(&p, "module.exports = { platform: process.env.X }").unwrap();
        assert_eq!(run_lint(&p).issues[0].rule, "parse-config");
        let res = run_lint(&dir.path().join("missing.json"));
        assert_eq!(res.issues[0].rule, "load-config");
        assert_eq!(res.issues[0].severity, Severity::Error);
    }
}
