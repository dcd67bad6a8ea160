//! # partexp
//!
//! Turns a declarative `Experiment.toml` into the shell scripts that run a
//! graph partitioning benchmark campaign.
//!
//! ## Usage
//!
//! ```bash
//! partexp [-C dir] [-c Experiment.toml] [generate [--dry-run] [--json] | validate [--json]]
//! ```
//!
//! ## Modules
//!
//! - `config` - Typed, validated view of `Experiment.toml`
//! - `algorithm` - Source identity, fetch and build of one algorithm variant
//! - `experiment` - Experiments with resolved graph directories
//! - `plan` - Sweep expansion and command wrapping
//! - `script` - Script rendering and writing
//! - `generate` - The generation run tying everything together
//! - `layout` - File naming below the working root
//! - `subprocess` - Testable git and cmake invocation
//! - `error` - Crate-wide error type with error codes
pub mod algorithm;
pub mod cli;
pub mod config;
pub mod error;
pub mod experiment;
pub mod generate;
pub mod layout;
pub mod plan;
pub mod script;
pub mod subprocess;

pub use error::{PartexpError, Result};
