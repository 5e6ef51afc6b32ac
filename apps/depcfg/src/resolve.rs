//! Package-rule evaluation for a single proposed update.
//!
//! Rules are visited in insertion order. A rule matches when every match
//! list it sets contains the query's value; an absent list matches
//! anything. Each matching rule overwrites the fields it sets, so the last
//! match wins per field.

use crate::models::rule::package_name_matches;
use crate::models::{BotConfig, Manager, PackageRule, UpdateType};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateQuery {
    pub manager: Manager,
    pub update_type: UpdateType,
    pub package: Option<String>,
}

impl UpdateQuery {
    pub fn new(manager: Manager, update_type: UpdateType) -> Self {
        Self {
            manager,
            update_type,
            package: None,
        }
    }

    pub fn with_package(mut self, name: impl Into<String>) -> Self {
        self.package = Some(name.into());
        self
    }
}

/// Effective policy for one update after applying all matching rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub manager: Manager,
    pub update_type: UpdateType,
    pub package: Option<String>,
    pub enabled: bool,
    pub automerge: bool,
    pub group_name: Option<String>,
    /// Indices into `packageRules` of the rules that matched.
    pub matched_rules: Vec<usize>,
}

pub fn rule_matches(rule: &PackageRule, query: &UpdateQuery) -> bool {
    if let Some(managers) = &rule.match_managers {
        if !managers.contains(&query.manager) {
            return false;
        }
    }
    if let Some(types) = &rule.match_update_types {
        if !types.contains(&query.update_type) {
            return false;
        }
    }
    if let Some(names) = &rule.match_package_names {
        let Some(package) = query.package.as_deref() else {
            return false;
        };
        if !names.iter().any(|p| package_name_matches(p, package)) {
            return false;
        }
    }
    true
}

pub fn resolve(cfg: &BotConfig, query: &UpdateQuery) -> Resolution {
    let mut out = Resolution {
        manager: query.manager,
        update_type: query.update_type,
        package: query.package.clone(),
        enabled: cfg.manager_enabled(query.manager),
        automerge: cfg.automerge.unwrap_or(false),
        group_name: None,
        matched_rules: Vec::new(),
    };
    for (i, rule) in cfg.rules().iter().enumerate() {
        if !rule_matches(rule, query) {
            continue;
        }
        out.matched_rules.push(i);
        if let Some(automerge) = rule.automerge {
            out.automerge = automerge;
        }
        if let Some(group) = &rule.group_name {
            out.group_name = Some(group.clone());
        }
        if let Some(enabled) = rule.enabled {
            out.enabled = enabled;
        }
    }
    out
}
