//! depcfg core library.
//!
//! This crate exposes programmatic APIs for loading, validating, and querying
//! the declarative configuration of a dependency-update bot.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `models`: Configuration data model and lint output structs.
//! - `load`: Parsing JSON/YAML/TOML/JS sources into `BotConfig`, discovery,
//!   and serialization back to text.
//! - `jsmodule`: Reader for `module.exports = { ... }` config files.
//! - `validate`: Soft invariant checks returning every violation.
//! - `resolve`: Package-rule evaluation for one update.
//! - `matching`: Manager file-pattern matching.
//! - `scan`: Repository walk listing files per enabled manager.
//! - `lint`: Load + validate as a CI-friendly report.
//! - `settings`: Tool settings discovery and precedence.
//! - `output`: Human/JSON printers.
//! - `utils`: Message prefixes and logging setup.
pub mod cli;
pub mod error;
pub mod jsmodule;
pub mod lint;
pub mod load;
pub mod matching;
pub mod models;
pub mod output;
pub mod resolve;
pub mod scan;
pub mod settings;
pub mod utils;
pub mod validate;

pub use error::{Error, SchemaError};
pub use load::{load_path, load_str, load_value, Format};
pub use models::BotConfig;
pub use resolve::{resolve, Resolution, UpdateQuery};
pub use validate::{validate, ValidationResult, ValidationWarning};
