//! depcfg CLI binary entry point.
//! Delegates to library modules for validate/resolve/scan/print and prints results.

use clap::Parser;
use depcfg::cli::{Cli, Commands};
use depcfg::load::{self, Format};
use depcfg::models::BotConfig;
use depcfg::resolve::{resolve, UpdateQuery};
use depcfg::settings::{self, Effective};
use depcfg::utils::{error_prefix, info_prefix, init_tracing, note_prefix, warn_prefix};
use depcfg::{lint, output, scan};
use std::path::PathBuf;
use std::process::exit;
use tracing::debug;

/// Return the configured config path or exit with a usage error.
fn require_config(eff: &Effective) -> PathBuf {
    match &eff.config {
        Some(p) => p.clone(),
        None => {
            eprintln!(
                "{} No configuration found under {}. Pass --config or set `config` in depcfg.toml.",
                error_prefix(),
                eff.repo_root.to_string_lossy()
            );
            exit(2);
        }
    }
}

/// Load the configuration or print the error and exit.
fn load_or_exit(eff: &Effective) -> BotConfig {
    let path = require_config(eff);
    if eff.output != "json" {
        eprintln!(
            "{} Using configuration {}",
            info_prefix(),
            path.to_string_lossy()
        );
    }
    match load::load_path(&path) {
        Ok(cfg) => {
            if let Err(warnings) = depcfg::validate::validate(&cfg) {
                eprintln!(
                    "{} configuration has {} validation warning(s); run `depcfg validate` for details",
                    warn_prefix(),
                    warnings.len()
                );
            }
            cfg
        }
        Err(e) => {
            eprintln!("{} {}", error_prefix(), e);
            exit(2);
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Validate {
            repo_root,
            config,
            output,
            strict,
        } => {
            let eff = settings::resolve_effective(
                repo_root.as_deref(),
                config.as_deref(),
                output.as_deref(),
                if strict { Some(true) } else { None },
            );
            let path = require_config(&eff);
            if eff.output != "json" && settings::load_settings(&eff.repo_root).is_none() {
                eprintln!("{} No depcfg.toml found; using defaults.", note_prefix());
            }
            debug!(path = %path.display(), strict = eff.strict, "validating");
            let result = lint::run_lint(&path);
            output::print_lint(&result, &eff.output);
            if result.failed(eff.strict) {
                exit(1);
            }
        }
        Commands::Resolve {
            repo_root,
            config,
            output,
            manager,
            update_type,
            package,
        } => {
            let eff = settings::resolve_effective(
                repo_root.as_deref(),
                config.as_deref(),
                output.as_deref(),
                None,
            );
            let cfg = load_or_exit(&eff);
            let mut query = UpdateQuery::new(manager, update_type);
            query.package = package;
            let res = resolve(&cfg, &query);
            output::print_resolution(&res, &eff.output);
        }
        Commands::Scan {
            repo_root,
            config,
            output,
        } => {
            let eff = settings::resolve_effective(
                repo_root.as_deref(),
                config.as_deref(),
                output.as_deref(),
                None,
            );
            let cfg = load_or_exit(&eff);
            match scan::run_scan(&eff.repo_root, &cfg, &eff.exclude) {
                Ok(hits) => output::print_scan(&hits, &eff.output),
                Err(e) => {
                    eprintln!("{} {}", error_prefix(), e);
                    exit(2);
                }
            }
        }
        Commands::Print {
            repo_root,
            config,
            to,
        } => {
            let Some(format) = Format::parse(&to) else {
                eprintln!(
                    "{} unknown format `{}` (expected json|yaml|toml|js)",
                    error_prefix(),
                    to
                );
                exit(2);
            };
            let eff = settings::resolve_effective(
                repo_root.as_deref(),
                config.as_deref(),
                Some("json"),
                None,
            );
            let cfg = load_or_exit(&eff);
            match load::to_string(&cfg, format) {
                Ok(text) => print!("{}", text),
                Err(e) => {
                    eprintln!("{} {}", error_prefix(), e);
                    exit(2);
                }
            }
        }
        Commands::Managers { output } => {
            let eff = settings::resolve_effective(None, None, output.as_deref(), None);
            output::print_managers(&eff.output);
        }
    }
}
