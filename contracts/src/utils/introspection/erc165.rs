//! Trait and implementation of the ERC-165 standard, as defined in the [ERC].
//!
//! [ERC]: https://eips.ethereum.org/EIPS/eip-165

use alloy_primitives::FixedBytes;
use alloy_sol_types::SolCall;

use crate::token::erc721::abi::IErc165::supportsInterfaceCall;

/// Identifier of the ERC-165 interface itself, `0x01ffc9a7`.
pub const INTERFACE_ID: u32 = interface_id(&[supportsInterfaceCall::SELECTOR]);

/// Identifier that no contract may claim to support, `0xffffffff`.
pub const INVALID_INTERFACE_ID: u32 = 0xffff_ffff;

/// Computes an interface identifier as the XOR of all function `selectors`
/// in the interface.
///
/// [ERC]: https://eips.ethereum.org/EIPS/eip-165#how-interfaces-are-identified
#[must_use]
pub const fn interface_id(selectors: &[[u8; 4]]) -> u32 {
    let mut id = 0;
    let mut i = 0;
    while i < selectors.len() {
        id ^= u32::from_be_bytes(selectors[i]);
        i += 1;
    }
    id
}

/// Interface of the ERC-165 standard, as defined in the [ERC].
///
/// Implementers can declare support of contract interfaces, which others can
/// query.
///
/// For an implementation, see [`Erc165`].
///
/// [ERC]: https://eips.ethereum.org/EIPS/eip-165
pub trait IErc165 {
    /// Returns true if this contract implements the interface defined by
    /// `interface_id`. See the corresponding [ERC] to learn more about how
    /// these ids are created.
    ///
    /// # Arguments
    ///
    /// * `interface_id` - The interface identifier, as specified in the [ERC].
    ///
    /// [ERC]: https://eips.ethereum.org/EIPS/eip-165#how-interfaces-are-identified
    fn supports_interface(interface_id: FixedBytes<4>) -> bool;
}

/// Implementation of the [`IErc165`] trait.
///
/// Contracts that want to support ERC-165 should implement the [`IErc165`]
/// trait for the additional interface id that will be supported and call
/// [`Erc165::supports_interface`] like:
///
/// ```rust,ignore
/// impl IErc165 for Erc721 {
///     fn supports_interface(interface_id: FixedBytes<4>) -> bool {
///         erc721::INTERFACE_ID == u32::from_be_bytes(*interface_id)
///             || Erc165::supports_interface(interface_id)
///     }
/// }
/// ```
pub struct Erc165;

impl IErc165 for Erc165 {
    fn supports_interface(interface_id: FixedBytes<4>) -> bool {
        let id = u32::from_be_bytes(*interface_id);
        // `0xffffffff` is reserved and must never be reported.
        id != INVALID_INTERFACE_ID && id == INTERFACE_ID
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::fixed_bytes;

    use super::{interface_id, Erc165, IErc165, INTERFACE_ID};

    #[test]
    fn interface_id_is_xor_of_selectors() {
        assert_eq!(interface_id(&[]), 0);
        assert_eq!(
            interface_id(&[[0x01, 0x02, 0x03, 0x04], [0x01, 0x02, 0x03, 0x04]]),
            0
        );
        assert_eq!(
            interface_id(&[[0xf0, 0x00, 0x00, 0x0f], [0x0f, 0x00, 0x00, 0xf0]]),
            0xff00_00ff
        );
    }

    #[test]
    fn erc165_interface_id() {
        assert_eq!(INTERFACE_ID, 0x01ff_c9a7);
    }

    #[test]
    fn supports_interface() {
        assert!(Erc165::supports_interface(fixed_bytes!("01ffc9a7")));
        assert!(!Erc165::supports_interface(fixed_bytes!("ffffffff")));
        assert!(!Erc165::supports_interface(fixed_bytes!("88888888")));
    }
}
