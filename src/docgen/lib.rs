//! # Docgen Architecture
//!
//! Docgen manages the working directories of a document-generation deployment: where
//! DOCX/ODT templates live, where generated output is staged, and how both move when an
//! administrator renames them. Rendering itself belongs to an external generator; this
//! crate prepares and guards everything around it.
//!
//! Docgen is a library that happens to have a CLI client, not the other way around.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs, print.rs)                     │
//! │  - Parses arguments, formats output, installs logging       │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Admin capability + anti-forgery token check (auth.rs)    │
//! │  - Thin facade over commands                                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Settings controller, migration endpoints, lifecycle      │
//! │  - Returns CmdResult, never prints                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Filesystem Layer                                           │
//! │  validator.rs → handler.rs → migration.rs, template.rs      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - SettingsStore trait                                      │
//! │  - FileSettingsStore (production), InMemorySettingsStore    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Safety Rules
//!
//! Every directory the tool touches must pass [`validator::DirectoryValidator`]: inside
//! the site, content or uploads root, no `..` segments, and writable. Migration
//! destinations are held to the stricter uploads-only rule. Each managed directory gets
//! an empty `index.php` guard so the web server never lists it.
//!
//! ## Testing Strategy
//!
//! 1. **Filesystem layer**: unit tests against `tempfile` site trees.
//! 2. **Commands**: the bulk of behaviour, run against `InMemorySettingsStore`.
//! 3. **API**: authorization and dispatch only.
//! 4. **CLI**: `tests/cli.rs` drives the binary with `assert_cmd`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`auth`]: Admin capability and token checks
//! - [`commands`]: Business logic for each command
//! - [`validator`], [`handler`], [`migration`]: Directory safety, operations and moves
//! - [`template`]: DOCX/ODT structural sniffing
//! - [`provider`]: Document data providers for the external generator
//! - [`modules`]: Registry of document modules and their activation state
//! - [`store`]: Settings persistence
//! - [`config`]: Site layout and logging configuration
//! - [`logging`]: `tracing` subscriber setup
//! - [`model`], [`paths`], [`error`]: Shared types and helpers

pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod handler;
pub mod logging;
pub mod migration;
pub mod model;
pub mod modules;
pub mod paths;
pub mod provider;
pub mod store;
pub mod template;
pub mod validator;
