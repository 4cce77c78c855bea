//! Stuff related to ERC-165 introspection.
pub mod erc165;
