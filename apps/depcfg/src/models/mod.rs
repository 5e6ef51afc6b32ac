//! Data models for the bot configuration and for lint output.
//!
//! `BotConfig` is the typed form of one update-bot configuration document.
//! It is built by `crate::load` and never mutated afterwards. Serialization
//! reproduces the document's field names (`camelCase`, manager ids as
//! top-level keys) so a loaded config can be written back and reloaded.

use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value as Json;
use std::collections::BTreeMap;

/// A closed set of string identifiers parsed from configuration text.
pub trait Identifier: Sized + Copy + 'static {
    /// Human label used in error messages (e.g. "manager").
    const KIND: &'static str;
    fn parse(s: &str) -> Option<Self>;
}

macro_rules! identifier_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $id:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $id),+
                }
            }

            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($id => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl $crate::models::Identifier for $name {
            const KIND: &'static str = $kind;
            fn parse(s: &str) -> Option<Self> {
                $name::parse(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::parse(s).ok_or_else(|| format!("unknown {} `{}`", $kind, s))
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                $name::parse(&s).ok_or_else(|| {
                    serde::de::Error::custom(format!("unknown {} `{}`", $kind, s))
                })
            }
        }
    };
}

pub mod manager;
pub mod rule;

pub use manager::{Manager, Platform};
pub use rule::{PackageRule, UpdateType};

/// A file-matching regular expression, kept with its source text.
///
/// Equality and serialization use the source text only.
#[derive(Debug, Clone)]
pub struct FilePattern {
    source: String,
    regex: Regex,
}

impl FilePattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            source: source.to_string(),
            regex: Regex::new(source)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

impl PartialEq for FilePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for FilePattern {}

impl Serialize for FilePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

/// Fragment applied to the onboarding pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OnboardingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<Vec<String>>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Json>,
}

/// Per-manager override block, keyed by manager id at the top level.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_file_patterns: Option<Vec<FilePattern>>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Json>,
}

/// Root configuration consumed by the update bot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    pub platform: Platform,
    pub endpoint: String,
    pub repositories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding_config: Option<OnboardingConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependency_dashboard: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_branches: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automerge: Option<bool>,
    pub enabled_managers: Vec<Manager>,
    #[serde(flatten)]
    pub managers: BTreeMap<Manager, ManagerConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_rules: Option<Vec<PackageRule>>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Json>,
}

impl BotConfig {
    /// Minimal configuration with only the required fields set.
    pub fn new(platform: Platform, endpoint: &str, repositories: Vec<String>) -> Self {
        Self {
            platform,
            endpoint: endpoint.to_string(),
            repositories,
            onboarding: None,
            onboarding_config: None,
            dependency_dashboard: None,
            base_branches: None,
            extends: None,
            automerge: None,
            enabled_managers: Vec::new(),
            managers: BTreeMap::new(),
            package_rules: None,
            other: BTreeMap::new(),
        }
    }

    /// A manager is active when listed in `enabledManagers` and its block
    /// does not set `enabled = false`.
    pub fn manager_enabled(&self, manager: Manager) -> bool {
        self.enabled_managers.contains(&manager)
            && self
                .managers
                .get(&manager)
                .and_then(|m| m.enabled)
                .unwrap_or(true)
    }

    pub fn rules(&self) -> &[PackageRule] {
        self.package_rules.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single lint issue with severity and location.
pub struct Issue {
    pub file: String,
    pub rule: String,
    pub severity: Severity,
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
/// Aggregated lint summary used by printers.
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub files: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Lint results container.
pub struct LintResult {
    pub issues: Vec<Issue>,
    pub summary: Summary,
}
