//! Package rules: conditional policies over managers, update types, and
//! package names.

use super::Manager;
use regex::Regex;
use serde::Serialize;
use serde_json::Value as Json;
use std::collections::BTreeMap;

identifier_enum! {
    /// Severity class of a proposed update.
    pub enum UpdateType: "update type" {
        Major => "major",
        Minor => "minor",
        Patch => "patch",
        Pin => "pin",
        Digest => "digest",
        PinDigest => "pinDigest",
        LockFileMaintenance => "lockFileMaintenance",
        Rollback => "rollback",
        Bump => "bump",
        Replacement => "replacement",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_managers: Option<Vec<Manager>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_update_types: Option<Vec<UpdateType>>,
    /// Exact package names, or `/regex/` (optionally `/regex/i`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_package_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automerge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Json>,
}

impl PackageRule {
    /// True when the rule sets at least one action field.
    pub fn has_effect(&self) -> bool {
        self.group_name.is_some() || self.automerge.is_some() || self.enabled.is_some()
    }
}

/// Compile a `/regex/` or `/regex/i` package-name pattern.
///
/// Returns `None` for plain names, which match exactly.
pub fn package_regex(pattern: &str) -> Option<Result<Regex, regex::Error>> {
    let body = pattern.strip_prefix('/')?;
    let (inner, flags) = body.rsplit_once('/')?;
    match flags {
        "" => Some(Regex::new(inner)),
        "i" => Some(Regex::new(&format!("(?i){inner}"))),
        _ => None,
    }
}

/// Match one `matchPackageNames` entry against a package name.
pub fn package_name_matches(pattern: &str, name: &str) -> bool {
    match package_regex(pattern) {
        Some(Ok(re)) => re.is_match(name),
        Some(Err(_)) => false,
        None => pattern == name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_patterns() {
        assert!(package_name_matches("django", "django"));
        assert!(!package_name_matches("django", "djangorestframework"));
        assert!(package_name_matches("/^django/", "djangorestframework"));
        assert!(package_name_matches("/^REACT$/i", "react"));
        assert!(!package_name_matches("/^REACT$/", "react"));
        // unsupported flag falls back to a literal comparison
        assert!(package_name_matches("/x/g", "/x/g"));
        assert!(package_name_matches("/", "/"));
        assert!(matches!(package_regex("/(oops/"), Some(Err(_))));
        assert!(!package_name_matches("/(oops/", "(oops"));
    }

    #[test]
    fn has_effect_requires_an_action() {
        let mut rule = PackageRule {
            match_managers: Some(vec![Manager::Npm]),
            ..Default::default()
        };
        assert!(!rule.has_effect());
        rule.automerge = Some(false);
        assert!(rule.has_effect());
    }

    #[test]
    fn update_type_ids_are_camel_case() {
        assert_eq!(UpdateType::LockFileMaintenance.as_str(), "lockFileMaintenance");
        assert_eq!(UpdateType::parse("pinDigest"), Some(UpdateType::PinDigest));
        assert_eq!(UpdateType::parse("Patch"), None);
    }
}
