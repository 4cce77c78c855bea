//! Optional Burnable extension of the ERC-721 standard.

use alloy_primitives::{Address, U256};

use crate::{
    host::Host,
    token::erc721::{self, Erc721},
};

/// An [`Erc721`] token that can be burned (destroyed).
pub trait IErc721Burnable {
    /// The error type associated to this trait implementation.
    type Error: Into<Vec<u8>>;

    /// Burns `token_id`.
    /// The approval is cleared when the token is burned.
    ///
    /// # Errors
    ///
    /// * [`erc721::Error::NonexistentToken`] - If token does not exist.
    /// * [`erc721::Error::InsufficientApproval`] - If the caller does not have
    ///   the right to approve.
    ///
    /// # Events
    ///
    /// * [`erc721::Transfer`].
    fn burn(
        &mut self,
        host: &mut dyn Host,
        token_id: U256,
    ) -> Result<(), Self::Error>;
}

impl IErc721Burnable for Erc721 {
    type Error = erc721::Error;

    fn burn(
        &mut self,
        host: &mut dyn Host,
        token_id: U256,
    ) -> Result<(), Self::Error> {
        // Setting an "auth" argument enables the `_is_authorized` check,
        // which verifies that the token exists.
        let auth = host.msg_sender();
        self._update(host, Address::ZERO, token_id, auth)?;
        Ok(())
    }
}
