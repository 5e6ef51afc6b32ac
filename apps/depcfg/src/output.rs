//! Output rendering for validate, resolve, scan, and managers commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-item fields and a top-level summary.

use crate::models::{LintResult, Manager, Severity};
use crate::resolve::Resolution;
use crate::scan::ScanHit;
use crate::utils::use_colors;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn print_json(value: &JsonVal) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("{} {}", crate::utils::error_prefix(), e),
    }
}

/// Print lint results in the requested format.
pub fn print_lint(res: &LintResult, output: &str) {
    match output {
        "json" => print_json(&compose_lint_json(res)),
        _ => {
            let color = use_colors(output);
            for is in &res.issues {
                let (icon, sev) = match is.severity {
                    Severity::Error => ("✖", "⟦error⟧"),
                    Severity::Warning => ("▲", "⟦warn⟧"),
                };
                if color {
                    let (icon, sev) = match is.severity {
                        Severity::Error => (icon.red().to_string(), sev.red().bold().to_string()),
                        Severity::Warning => {
                            (icon.yellow().to_string(), sev.yellow().bold().to_string())
                        }
                    };
                    println!(
                        "{} {} {} ❲{}❳ {} — {}",
                        icon,
                        sev,
                        is.file.bold(),
                        is.rule,
                        is.path,
                        is.message
                    );
                } else {
                    println!(
                        "{} {} {} ❲{}❳ {} — {}",
                        icon, sev, is.file, is.rule, is.path, is.message
                    );
                }
            }
            let summary = format!(
                "— Summary — errors={} warnings={} files={}",
                res.summary.errors, res.summary.warnings, res.summary.files
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Print one rule resolution.
pub fn print_resolution(res: &Resolution, output: &str) {
    match output {
        "json" => print_json(&compose_resolution_json(res)),
        _ => {
            let color = use_colors(output);
            let subject = match &res.package {
                Some(p) => format!("{} {} ({})", res.manager, res.update_type, p),
                None => format!("{} {}", res.manager, res.update_type),
            };
            if color {
                println!("{}", subject.bold());
            } else {
                println!("{}", subject);
            }
            println!("  enabled:   {}", res.enabled);
            println!("  automerge: {}", res.automerge);
            println!(
                "  group:     {}",
                res.group_name.as_deref().unwrap_or("(none)")
            );
            let rules = if res.matched_rules.is_empty() {
                "(none)".to_string()
            } else {
                res.matched_rules
                    .iter()
                    .map(|i| format!("packageRules[{i}]"))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            println!("  rules:     {}", rules);
        }
    }
}

/// Print one line per (manager, file) hit, sorted by file.
pub fn print_scan(hits: &[ScanHit], output: &str) {
    match output {
        "json" => print_json(&compose_scan_json(hits)),
        _ => {
            let color = use_colors(output);
            for h in hits {
                if color {
                    println!("{} {}", format!("[{}]", h.manager).cyan(), h.file);
                } else {
                    println!("[{}] {}", h.manager, h.file);
                }
            }
            let summary = format!("— Summary — files={}", hits.len());
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Print the manager catalogue with default file patterns.
pub fn print_managers(output: &str) {
    match output {
        "json" => print_json(&compose_managers_json()),
        _ => {
            let color = use_colors(output);
            for m in Manager::ALL {
                if color {
                    println!("{} {}", format!("{:<18}", m.as_str()).bold(), m.describe());
                } else {
                    println!("{:<18} {}", m.as_str(), m.describe());
                }
                for p in m.default_patterns() {
                    println!("    {}", p);
                }
            }
        }
    }
}

/// Compose lint JSON object (pure) for testing/snapshot purposes.
pub fn compose_lint_json(res: &LintResult) -> JsonVal {
    json!({
        "issues": res.issues,
        "summary": res.summary,
    })
}

/// Compose resolution JSON object (pure) for testing/snapshot purposes.
pub fn compose_resolution_json(res: &Resolution) -> JsonVal {
    json!(res)
}

/// Compose scan JSON object (pure) for testing/snapshot purposes.
pub fn compose_scan_json(hits: &[ScanHit]) -> JsonVal {
    let mut per_manager = serde_json::Map::new();
    for h in hits {
        let n = per_manager
            .entry(h.manager.as_str())
            .or_insert_with(|| json!(0));
        *n = json!(n.as_u64().unwrap_or(0) + 1);
    }
    json!({
        "results": hits,
        "summary": {"files": hits.len(), "managers": per_manager},
    })
}

/// Compose the manager catalogue (pure).
pub fn compose_managers_json() -> JsonVal {
    let items: Vec<_> = Manager::ALL
        .iter()
        .map(|m| {
            json!({
                "manager": m,
                "description": m.describe(),
                "defaultPatterns": m.default_patterns(),
            })
        })
        .collect();
    json!(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Issue, Summary, UpdateType};

    #[test]
    fn test_compose_lint_json_shape() {
        let res = LintResult {
            issues: vec![Issue {
                file: "renovate.json".into(),
                rule: "rule-manager-not-enabled".into(),
                severity: Severity::Warning,
                path: "$.packageRules[0].matchManagers[0]".into(),
                message: "msg".into(),
            }],
            summary: Summary {
                errors: 0,
                warnings: 1,
                files: 1,
            },
        };
        let out = compose_lint_json(&res);
        assert_eq!(out["summary"]["warnings"], 1);
        assert_eq!(out["issues"][0]["severity"], "warning");
        assert_eq!(out["issues"][0]["path"], "$.packageRules[0].matchManagers[0]");
    }

    #[test]
    fn test_compose_resolution_json_uses_camel_case() {
        let res = Resolution {
            manager: Manager::PipRequirements,
            update_type: UpdateType::Minor,
            package: None,
            enabled: true,
            automerge: true,
            group_name: Some("python dependencies".into()),
            matched_rules: vec![0],
        };
        let out = compose_resolution_json(&res);
        assert_eq!(out["manager"], "pip_requirements");
        assert_eq!(out["updateType"], "minor");
        assert_eq!(out["groupName"], "python dependencies");
        assert_eq!(out["matchedRules"][0], 0);
    }

    #[test]
    fn test_compose_scan_json_counts_per_manager() {
        let hits = vec![
            ScanHit {
                manager: Manager::Npm,
                file: "a/package.json".into(),
            },
            ScanHit {
                manager: Manager::Npm,
                file: "package.json".into(),
            },
            ScanHit {
                manager: Manager::Dockerfile,
                file: "Dockerfile".into(),
            },
        ];
        let out = compose_scan_json(&hits);
        assert_eq!(out["summary"]["files"], 3);
        assert_eq!(out["summary"]["managers"]["npm"], 2);
        assert_eq!(out["summary"]["managers"]["dockerfile"], 1);
        assert_eq!(out["results"][2]["file"], "Dockerfile");
    }

    #[test]
    fn test_compose_managers_json_lists_all() {
        let out = compose_managers_json();
        assert_eq!(out.as_array().map(Vec::len), Some(Manager::ALL.len()));
        assert_eq!(out[0]["manager"], "pip_requirements");
    }
}
