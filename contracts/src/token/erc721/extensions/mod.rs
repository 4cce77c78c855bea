//! Common extensions to the ERC-721 standard.
pub mod burnable;
pub mod metadata;

pub use burnable::IErc721Burnable;
pub use metadata::{Erc721Metadata, IErc721Metadata};
