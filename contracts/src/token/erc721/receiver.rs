//! Interface required for a contract to receive ERC-721 token transfers.

use alloy_primitives::{aliases::B32, Address, Bytes, U256};
use alloy_sol_types::SolCall;

use super::abi::IErc721Receiver::onERC721ReceivedCall;
use crate::host::Host;

/// The expected value returned from [`IErc721Receiver::on_erc721_received`],
/// `0x150b7a02`.
pub const RECEIVER_FN_SELECTOR: [u8; 4] = onERC721ReceivedCall::SELECTOR;

/// [`super::IErc721`] token receiver trait.
///
/// Interface for any contract that wants to support
/// [`super::IErc721::safe_transfer_from`] and
/// [`super::IErc721::safe_transfer_from_with_data`] from ERC-721 asset
/// contracts.
pub trait IErc721Receiver {
    /// This function is called whenever an [`super::Erc721`] `token_id`
    /// token is transferred to this contract via
    /// [`super::IErc721::safe_transfer_from`] or
    /// [`super::IErc721::safe_transfer_from_with_data`].
    ///
    /// It must return its Solidity selector to confirm the token transfer.
    /// If any other value is returned or the interface is not implemented
    /// by the recipient, the transfer will be reverted.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `host` - Environment of the call; the message sender is the token.
    /// * `operator` - Account of the operator.
    /// * `from` - Account of the sender.
    /// * `token_id` - Token id as a number.
    /// * `data` - Additional data with no specified format.
    ///
    /// # Errors
    ///
    /// * May return a custom error as ABI-encoded revert data.
    fn on_erc721_received(
        &mut self,
        host: &mut dyn Host,
        operator: Address,
        from: Address,
        token_id: U256,
        data: Bytes,
    ) -> Result<B32, Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::RECEIVER_FN_SELECTOR;

    #[test]
    fn receiver_selector() {
        assert_eq!(RECEIVER_FN_SELECTOR, hex!("150b7a02"));
    }
}
