//! Loading bot configurations from text, files, and repository checkouts.
//!
//! Every source format is first parsed into a JSON value, then checked
//! field by field into a `BotConfig`. Schema failures carry the path of the
//! offending field so callers can point at it. Keys that are neither schema
//! fields nor manager ids are kept verbatim in `other` maps; `validate`
//! reports them.

use crate::error::{Error, Result, SchemaError};
use crate::jsmodule;
use crate::models::{
    BotConfig, FilePattern, Identifier, Manager, ManagerConfig, OnboardingConfig, PackageRule,
    Platform, UpdateType,
};
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file names probed by `discover`, in priority order.
pub const CONFIG_CANDIDATES: &[&str] = &[
    "renovate.json",
    ".github/renovate.json",
    ".gitlab/renovate.json",
    ".renovaterc",
    ".renovaterc.json",
    "renovate-config.js",
    "config.js",
];

/// Source format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Toml,
    JsModule,
}

impl Format {
    /// Detect the format from a file extension. Extensionless rc files are JSON.
    pub fn from_path(path: &Path) -> Format {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Format::Yaml,
            Some("toml") => Format::Toml,
            Some("js" | "cjs" | "mjs") => Format::JsModule,
            _ => Format::Json,
        }
    }

    pub fn parse(s: &str) -> Option<Format> {
        match s {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "toml" => Some(Format::Toml),
            "js" => Some(Format::JsModule),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Json => "JSON",
            Format::Yaml => "YAML",
            Format::Toml => "TOML",
            Format::JsModule => "JavaScript",
        })
    }
}

/// Find the first known config file under `root`.
pub fn discover(root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES.iter().find_map(|name| {
        let p = root.join(name);
        debug!(path = %p.display(), "probing for configuration");
        p.is_file().then_some(p)
    })
}

/// Parse source text into a generic JSON value.
pub fn parse_text(text: &str, format: Format) -> Result<Json> {
    let syntax = |message: String| Error::Syntax { format, message };
    match format {
        Format::Json => serde_json::from_str(text).map_err(|e| syntax(e.to_string())),
        Format::Yaml => serde_yaml::from_str(text).map_err(|e| syntax(e.to_string())),
        Format::Toml => toml::from_str(text).map_err(|e| syntax(e.to_string())),
        Format::JsModule => jsmodule::parse_module(text).map_err(|e| syntax(e.to_string())),
    }
}

/// Load a configuration from text in the given format.
pub fn load_str(text: &str, format: Format) -> Result<BotConfig> {
    let value = parse_text(text, format)?;
    Ok(load_value(&value)?)
}

/// Load a configuration file, detecting its format from the extension.
pub fn load_path(path: &Path) -> Result<BotConfig> {
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let format = Format::from_path(path);
    debug!(path = %path.display(), %format, "loading configuration");
    load_str(&text, format)
}

/// Discover and load the configuration of a repository checkout.
pub fn load_repo(root: &Path) -> Result<(PathBuf, BotConfig)> {
    let path = discover(root).ok_or_else(|| Error::NotFound {
        root: root.to_path_buf(),
    })?;
    let cfg = load_path(&path)?;
    Ok((path, cfg))
}

/// Serialize a configuration back to text.
pub fn to_string(cfg: &BotConfig, format: Format) -> Result<String> {
    let render = |message: String| Error::Render { format, message };
    match format {
        Format::Json => serde_json::to_string_pretty(cfg)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| render(e.to_string())),
        Format::Yaml => serde_yaml::to_string(cfg).map_err(|e| render(e.to_string())),
        Format::Toml => toml::to_string_pretty(cfg).map_err(|e| render(e.to_string())),
        Format::JsModule => serde_json::to_value(cfg)
            .and_then(|v| jsmodule::render_module(&v))
            .map_err(|e| render(e.to_string())),
    }
}

const TOP_LEVEL_KEYS: &[&str] = &[
    "platform",
    "endpoint",
    "repositories",
    "onboarding",
    "onboardingConfig",
    "dependencyDashboard",
    "baseBranches",
    "extends",
    "automerge",
    "enabledManagers",
    "packageRules",
];

/// Check a parsed document against the schema.
pub fn load_value(root: &Json) -> std::result::Result<BotConfig, SchemaError> {
    let obj = object(root, "")?;

    let platform = ident::<Platform>(required(obj, "platform", "")?, "platform")?;
    let endpoint = endpoint(required(obj, "endpoint", "")?, "endpoint")?;
    let repositories = string_list(required(obj, "repositories", "")?, "repositories")?;
    if repositories.is_empty() {
        return Err(SchemaError::Empty {
            path: "repositories".into(),
        });
    }
    let enabled_managers =
        ident_list::<Manager>(required(obj, "enabledManagers", "")?, "enabledManagers")?;

    let mut cfg = BotConfig::new(platform, &endpoint, repositories);
    cfg.enabled_managers = enabled_managers;
    cfg.onboarding = optional(obj, "onboarding")
        .map(|v| boolean(v, "onboarding"))
        .transpose()?;
    cfg.onboarding_config = optional(obj, "onboardingConfig")
        .map(|v| onboarding_config(v, "onboardingConfig"))
        .transpose()?;
    cfg.dependency_dashboard = optional(obj, "dependencyDashboard")
        .map(|v| boolean(v, "dependencyDashboard"))
        .transpose()?;
    cfg.base_branches = optional(obj, "baseBranches")
        .map(|v| string_list(v, "baseBranches"))
        .transpose()?;
    cfg.extends = optional(obj, "extends")
        .map(|v| string_list(v, "extends"))
        .transpose()?;
    cfg.automerge = optional(obj, "automerge")
        .map(|v| boolean(v, "automerge"))
        .transpose()?;
    cfg.package_rules = optional(obj, "packageRules")
        .map(|v| package_rules(v, "packageRules"))
        .transpose()?;

    for (key, value) in obj {
        if TOP_LEVEL_KEYS.contains(&key.as_str()) {
            continue;
        }
        match Manager::parse(key) {
            Some(manager) => {
                if !value.is_null() {
                    cfg.managers.insert(manager, manager_config(value, key)?);
                }
            }
            None => {
                if !value.is_null() {
                    cfg.other.insert(key.clone(), value.clone());
                }
            }
        }
    }
    Ok(cfg)
}

fn child(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn kind(v: &Json) -> &'static str {
    match v {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn type_error(v: &Json, path: &str, expected: &'static str) -> SchemaError {
    SchemaError::Type {
        path: path.to_string(),
        expected,
        found: kind(v),
    }
}

/// `null` counts as absent.
fn optional<'a>(obj: &'a Map<String, Json>, key: &str) -> Option<&'a Json> {
    obj.get(key).filter(|v| !v.is_null())
}

fn required<'a>(
    obj: &'a Map<String, Json>,
    key: &str,
    parent: &str,
) -> std::result::Result<&'a Json, SchemaError> {
    optional(obj, key).ok_or_else(|| SchemaError::Missing {
        path: child(parent, key),
    })
}

fn object<'a>(v: &'a Json, path: &str) -> std::result::Result<&'a Map<String, Json>, SchemaError> {
    v.as_object().ok_or_else(|| type_error(v, path, "object"))
}

fn array<'a>(v: &'a Json, path: &str) -> std::result::Result<&'a Vec<Json>, SchemaError> {
    v.as_array().ok_or_else(|| type_error(v, path, "array"))
}

fn string(v: &Json, path: &str) -> std::result::Result<String, SchemaError> {
    v.as_str()
        .map(str::to_string)
        .ok_or_else(|| type_error(v, path, "string"))
}

fn boolean(v: &Json, path: &str) -> std::result::Result<bool, SchemaError> {
    v.as_bool().ok_or_else(|| type_error(v, path, "boolean"))
}

fn string_list(v: &Json, path: &str) -> std::result::Result<Vec<String>, SchemaError> {
    array(v, path)?
        .iter()
        .enumerate()
        .map(|(i, item)| string(item, &format!("{path}[{i}]")))
        .collect()
}

fn ident<T: Identifier>(v: &Json, path: &str) -> std::result::Result<T, SchemaError> {
    let s = string(v, path)?;
    T::parse(&s).ok_or(SchemaError::Unknown {
        path: path.to_string(),
        kind: T::KIND,
        value: s,
    })
}

fn ident_list<T: Identifier>(v: &Json, path: &str) -> std::result::Result<Vec<T>, SchemaError> {
    array(v, path)?
        .iter()
        .enumerate()
        .map(|(i, item)| ident::<T>(item, &format!("{path}[{i}]")))
        .collect()
}

fn pattern_list(v: &Json, path: &str) -> std::result::Result<Vec<FilePattern>, SchemaError> {
    let sources = string_list(v, path)?;
    sources
        .iter()
        .enumerate()
        .map(|(i, src)| {
            FilePattern::new(src).map_err(|source| SchemaError::Pattern {
                path: format!("{path}[{i}]"),
                pattern: src.clone(),
                source,
            })
        })
        .collect()
}

fn endpoint(v: &Json, path: &str) -> std::result::Result<String, SchemaError> {
    let s = string(v, path)?;
    let bad = |reason: String| SchemaError::Url {
        path: path.to_string(),
        value: s.clone(),
        reason,
    };
    let url = url::Url::parse(&s).map_err(|e| bad(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(bad(format!("unsupported scheme `{}`", url.scheme())));
    }
    Ok(s)
}

fn passthrough(obj: &Map<String, Json>, known: &[&str]) -> BTreeMap<String, Json> {
    obj.iter()
        .filter(|(k, v)| !v.is_null() && !known.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn onboarding_config(v: &Json, path: &str) -> std::result::Result<OnboardingConfig, SchemaError> {
    let obj = object(v, path)?;
    Ok(OnboardingConfig {
        extends: optional(obj, "extends")
            .map(|e| string_list(e, &child(path, "extends")))
            .transpose()?,
        other: passthrough(obj, &["extends"]),
    })
}

fn manager_config(v: &Json, path: &str) -> std::result::Result<ManagerConfig, SchemaError> {
    let obj = object(v, path)?;
    // `fileMatch` is the older spelling; the newer key wins when both are set.
    let patterns = match (optional(obj, "managerFilePatterns"), optional(obj, "fileMatch")) {
        (Some(p), _) => Some(pattern_list(p, &child(path, "managerFilePatterns"))?),
        (None, Some(p)) => Some(pattern_list(p, &child(path, "fileMatch"))?),
        (None, None) => None,
    };
    Ok(ManagerConfig {
        enabled: optional(obj, "enabled")
            .map(|e| boolean(e, &child(path, "enabled")))
            .transpose()?,
        manager_file_patterns: patterns,
        other: passthrough(obj, &["enabled", "managerFilePatterns", "fileMatch"]),
    })
}

const RULE_KEYS: &[&str] = &[
    "description",
    "matchManagers",
    "matchUpdateTypes",
    "matchPackageNames",
    "groupName",
    "automerge",
    "enabled",
];

fn package_rules(v: &Json, path: &str) -> std::result::Result<Vec<PackageRule>, SchemaError> {
    array(v, path)?
        .iter()
        .enumerate()
        .map(|(i, item)| package_rule(item, &format!("{path}[{i}]")))
        .collect()
}

fn package_rule(v: &Json, path: &str) -> std::result::Result<PackageRule, SchemaError> {
    let obj = object(v, path)?;
    let field = |key: &str| child(path, key);
    Ok(PackageRule {
        description: optional(obj, "description")
            .map(|d| string(d, &field("description")))
            .transpose()?,
        match_managers: optional(obj, "matchManagers")
            .map(|m| ident_list::<Manager>(m, &field("matchManagers")))
            .transpose()?,
        match_update_types: optional(obj, "matchUpdateTypes")
            .map(|m| ident_list::<UpdateType>(m, &field("matchUpdateTypes")))
            .transpose()?,
        match_package_names: optional(obj, "matchPackageNames")
            .map(|m| string_list(m, &field("matchPackageNames")))
            .transpose()?,
        group_name: optional(obj, "groupName")
            .map(|g| string(g, &field("groupName")))
            .transpose()?,
        automerge: optional(obj, "automerge")
            .map(|a| boolean(a, &field("automerge")))
            .transpose()?,
        enabled: optional(obj, "enabled")
            .map(|e| boolean(e, &field("enabled")))
            .transpose()?,
        other: passthrough(obj, RULE_KEYS),
    })
}
