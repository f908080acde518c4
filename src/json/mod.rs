//! Purpose: Internal JSON decoding boundary shared by the load paths.
//! Exports: `parse` module with decode and failure-classification helpers.
//! Role: Single seam for decoder details so callsites avoid ad hoc error mapping.
//! Invariants: Every document read from disk is decoded through this module.

pub(crate) mod parse;
