//! Common contract utilities.
pub mod introspection;
