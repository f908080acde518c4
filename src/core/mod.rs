// Core modules implementing document encoding, file storage, and error modeling.
pub mod error;
pub mod format;
pub mod store;
