//! # CLI Behavior
//!
//! This is **one possible UI client** for docstash, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, prompts and
//! output formatting. For the overall architecture, see the library docs.
//!
//! ## Data Directory
//!
//! Everything lives in one directory: the two collections, accounts, the session,
//! uploads and `config.json`. It is chosen in this order:
//!
//! 1. `--data-dir DIR`
//! 2. `$DOCSTASH_HOME`
//! 3. The platform data directory (`directories`)
//!
//! ## Naked Execution
//!
//! Running `docstash` with no command lists records, newest first unless
//! `default_sort` says otherwise.
//!
//! ## Confirmation
//!
//! `delete` and `tag delete` ask before doing anything unless `--yes` is given.
//! Anything other than `y` or `yes` cancels.
//!
//! ## Logging
//!
//! `tracing` output goes to stderr. `--verbose` turns on debug events for docstash;
//! otherwise `RUST_LOG` applies, defaulting to warnings only.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup and per-command handlers
//! - `print`: Output formatting (lists, full records, messages)
//! - `setup`: Argument parsing via clap

mod commands;
mod print;
pub mod setup;

pub use commands::run;
