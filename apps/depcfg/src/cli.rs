//! CLI argument parsing via `clap`.

use crate::models::{Manager, UpdateType};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "depcfg",
    version,
    about = "Dependency-update bot configuration checker",
    long_about = "depcfg — load, validate, and query the configuration of a dependency-update bot.\n\nSettings precedence: CLI > depcfg.toml > defaults.",
    after_help = "Examples:\n  depcfg validate --config renovate-config.js\n  depcfg resolve --manager pip_requirements --update-type minor\n  depcfg scan --repo-root . --output json\n  depcfg print --to yaml",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current depcfg version.")]
    Version,
    /// Load and validate a configuration
    #[command(
        about = "Validate a bot configuration",
        long_about = "Load the configuration, report schema errors and validation warnings. Schema errors fail the run; warnings fail it only with --strict.",
        after_help = "Examples:\n  depcfg validate\n  depcfg validate --config .github/renovate.json --strict --output json"
    )]
    Validate {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Configuration file (default: discovered)")]
        config: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Treat warnings as failures")]
        strict: bool,
    },
    /// Evaluate package rules for one update
    #[command(
        about = "Resolve package rules for an update",
        long_about = "Apply packageRules in order to one (manager, update type, package) and print the effective automerge/group settings.",
        after_help = "Examples:\n  depcfg resolve --manager npm --update-type patch\n  depcfg resolve --manager npm --update-type major --package react"
    )]
    Resolve {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Configuration file (default: discovered)")]
        config: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Manager id, e.g. pip_requirements")]
        manager: Manager,
        #[arg(long, help = "Update type, e.g. patch|minor|major")]
        update_type: UpdateType,
        #[arg(long, help = "Package name matched against matchPackageNames")]
        package: Option<String>,
    },
    /// List files the enabled managers would scan
    #[command(
        about = "Scan repository files",
        long_about = "Walk the repository and list files matched by each enabled manager's file patterns.",
        after_help = "Examples:\n  depcfg scan\n  depcfg scan --repo-root ../service --output json"
    )]
    Scan {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Configuration file (default: discovered)")]
        config: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Print the normalized configuration
    #[command(
        about = "Print normalized configuration",
        long_about = "Load the configuration and write it back out in the requested format.",
        after_help = "Examples:\n  depcfg print --to json\n  depcfg print --config renovate-config.js --to toml"
    )]
    Print {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Configuration file (default: discovered)")]
        config: Option<String>,
        #[arg(long, default_value = "json", help = "Target format: json|yaml|toml|js")]
        to: String,
    },
    /// List known managers
    #[command(
        about = "List managers",
        long_about = "List recognized manager ids with their default file patterns."
    )]
    Managers {
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}
