//! # Docstash Architecture
//!
//! Docstash is a **UI-agnostic document depository**: short records (documents and
//! knowledge notes) registered under one or more tags, filtered and sorted from a
//! session working set, and persisted through pluggable providers. The CLI is one
//! client of the library, not the other way around.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prompts, formats output                │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Auth gate, configured policies                           │
//! │  - Owns the working set and the providers                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Validate, write through the provider, refetch            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                 ┌────────────┴────────────┐
//!                 ▼                         ▼
//! ┌───────────────────────────┐ ┌───────────────────────────────┐
//! │  Working Set (store.rs)   │ │  Providers (providers/)       │
//! │  - RecordStore, queries   │ │  - Persistence, auth, blobs   │
//! │  - Pure, in memory        │ │  - Fs* (production), Mem*     │
//! └───────────────────────────┘ └───────────────────────────────┘
//! ```
//!
//! ## The Working Set
//!
//! The [`store::RecordStore`] is a cache of the provider's two collections
//! (`documents` and `custom_tags`). It is never merged incrementally: after every
//! successful write the commands refetch both collections and replace it wholesale,
//! so the last fetch wins.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust arguments and returns
//! `Result<CmdResult>`. It never writes to stdout or stderr and never exits the
//! process. Diagnostics go through `tracing`; the binary decides where they end up.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`store`]: The working set and its policies
//! - [`query`]: Filtering and sorting
//! - [`model`]: Records, categories, drafts and Q&A bodies
//! - [`tags`]: Tag registry entries and name validation
//! - [`providers`]: Persistence, auth and blob storage backends
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod providers;
pub mod query;
pub mod store;
pub mod tags;
