//! Local memory for a text-completion command line.
//!
//! shellmind keeps two kinds of state on disk between invocations:
//!
//! | Store | Format | Addressing | Missing file |
//! |-------|--------|------------|--------------|
//! | **Interaction history** | JSON array of records | Reverse index, 0 = most recent | Error (run `init`) |
//! | **Fact memory** | One `HH:MM:SS DD/MM/YYYY <fact>` line per fact | Full-text scan | Empty |
//!
//! Before facts are injected into a prompt they pass through a relevance filter
//! that ranks each line against the query with a sentence-similarity service
//! and keeps the best matches.
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`memory`] — The two stores and the [`Memory`](memory::Memory) façade
//! - [`relevance`] — Fact ranking against a query via an external scorer

pub mod config;
pub mod memory;
pub mod relevance;
