//! Purpose: Define the public Rust API boundary for jsonmap.
//! Exports: Save/load operations, options, and error types used by the CLI and callers.
//! Role: Additive-only surface; hides the internal encoding and parsing modules.
//! Invariants: This module is the only public path to the core operations.

#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::format::{DEFAULT_INDENT, Durability, SaveOptions};
pub use crate::core::store::{
    Mapping, load, load_as, parse_mapping, save, save_serializable, save_serializable_with,
    save_with,
};
pub use serde_json::Value;
