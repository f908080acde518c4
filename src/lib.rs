//! Purpose: Library crate behind the `jsonmap` CLI: save and load JSON mappings as files.
//! Exports: `api` (stable surface) plus root re-exports of `save`, `load`, and error types.
//! Role: Thin, stateless wrapper over serde_json with atomic file replacement on save.
//! Invariants: Every call is self-contained; no process-wide state is kept.
//! Invariants: Documents on disk are single JSON objects, two-space indented by default.
pub mod api;
mod core;
mod json;

pub use api::{Error, ErrorKind, Mapping, load, save};
