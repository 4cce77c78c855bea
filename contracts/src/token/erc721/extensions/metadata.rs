//! Optional Metadata of the ERC-721 standard.

use alloy_primitives::{FixedBytes, U256};
use alloy_sol_types::SolCall;

use crate::{
    token::erc721::{
        abi::IErc721Metadata::{nameCall, symbolCall, tokenURICall},
        Erc721, Error,
    },
    utils::introspection::erc165::{self, IErc165},
};

/// Identifier of the ERC-721 metadata interface, `0x5b5e139f`.
pub const INTERFACE_ID: u32 = erc165::interface_id(&[
    nameCall::SELECTOR,
    symbolCall::SELECTOR,
    tokenURICall::SELECTOR,
]);

/// Metadata of an [`Erc721`] token.
#[derive(Clone, Debug, Default)]
pub struct Erc721Metadata {
    name: String,
    symbol: String,
    base_uri: String,
}

/// Interface for the optional metadata functions from the ERC-721 standard.
pub trait IErc721Metadata {
    /// Returns the token collection name.
    fn name(&self) -> String;

    /// Returns token collection symbol.
    fn symbol(&self) -> String;

    /// Returns the base of Uniform Resource Identifier (URI) for tokens'
    /// collection.
    fn base_uri(&self) -> String;

    /// Returns the Uniform Resource Identifier (URI) for `token_id` token,
    /// the base URI followed by the decimal token id, or an empty string if
    /// no base URI is set.
    ///
    /// # Errors
    ///
    /// * [`Error::NonexistentToken`] - If the token does not exist.
    fn token_uri(&self, erc721: &Erc721, token_id: U256)
        -> Result<String, Error>;
}

impl Erc721Metadata {
    /// Creates metadata for a collection called `name` with ticker `symbol`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        base_uri: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            base_uri: base_uri.into(),
        }
    }
}

impl IErc721Metadata for Erc721Metadata {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn symbol(&self) -> String {
        self.symbol.clone()
    }

    fn base_uri(&self) -> String {
        self.base_uri.clone()
    }

    fn token_uri(
        &self,
        erc721: &Erc721,
        token_id: U256,
    ) -> Result<String, Error> {
        erc721._require_owned(token_id)?;

        if self.base_uri.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("{}{token_id}", self.base_uri))
    }
}

impl IErc165 for Erc721Metadata {
    fn supports_interface(interface_id: FixedBytes<4>) -> bool {
        INTERFACE_ID == u32::from_be_bytes(*interface_id)
    }
}
