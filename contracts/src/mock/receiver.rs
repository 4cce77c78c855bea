//! Configurable [`IErc721Receiver`] implementations.

use alloy_primitives::{aliases::B32, fixed_bytes, Address, Bytes, U256};
use alloy_sol_types::{Panic, PanicKind, Revert, SolCall, SolError};

use crate::{
    host::{self, Host, Router},
    token::erc721::{
        abi::IErc721Receiver::onERC721ReceivedCall, utils::Erc721Holder,
        IErc721Receiver,
    },
};

pub use sol::*;
mod sol {
    use alloy_sol_types::sol;

    sol! {
        /// Emitted by [`super::Erc721ReceiverMock`] for every accepted token.
        #[derive(Debug, PartialEq, Eq)]
        #[allow(missing_docs)]
        event Received(address operator, address from, uint256 tokenId, bytes data);
    }
}

/// Revert reason of a [`Behaviour::Reject`] receiver.
pub const REJECT_REASON: &str = "ERC721ReceiverMock: reverting";

/// Value returned by a [`Behaviour::WrongSelector`] receiver.
pub const WRONG_SELECTOR: B32 = fixed_bytes!("deadbeef");

/// How an [`Erc721ReceiverMock`] answers `onERC721Received`.
///
/// The discriminant is the mock's constructor argument when it is deployed
/// as bytecode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Behaviour {
    /// Returns the expected selector.
    #[default]
    Accept = 0,
    /// Reverts with [`REJECT_REASON`].
    Reject = 1,
    /// Returns [`WRONG_SELECTOR`].
    WrongSelector = 2,
    /// Panics with a division by zero.
    Panic = 3,
}

impl From<u8> for Behaviour {
    fn from(value: u8) -> Self {
        match value {
            1 => Behaviour::Reject,
            2 => Behaviour::WrongSelector,
            3 => Behaviour::Panic,
            _ => Behaviour::Accept,
        }
    }
}

impl From<Behaviour> for u8 {
    fn from(value: Behaviour) -> Self {
        value as u8
    }
}

/// Receiver whose answer to `onERC721Received` is chosen at construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Erc721ReceiverMock {
    behaviour: Behaviour,
    holder: Erc721Holder,
}

impl Erc721ReceiverMock {
    /// Creates a receiver answering with `behaviour`.
    #[must_use]
    pub fn new(behaviour: Behaviour) -> Self {
        Self { behaviour, holder: Erc721Holder }
    }

    /// Behaviour the receiver was constructed with.
    #[must_use]
    pub fn behaviour(&self) -> Behaviour {
        self.behaviour
    }
}

impl IErc721Receiver for Erc721ReceiverMock {
    fn on_erc721_received(
        &mut self,
        host: &mut dyn Host,
        operator: Address,
        from: Address,
        token_id: U256,
        data: Bytes,
    ) -> Result<B32, Vec<u8>> {
        match self.behaviour {
            Behaviour::Accept => {
                let event = Received {
                    operator,
                    from,
                    tokenId: token_id,
                    data: data.clone(),
                };
                host::log(host, &event);
                self.holder
                    .on_erc721_received(host, operator, from, token_id, data)
            }
            Behaviour::Reject => Err(Revert::from(REJECT_REASON).abi_encode()),
            Behaviour::WrongSelector => Ok(WRONG_SELECTOR),
            Behaviour::Panic => {
                Err(Panic::from(PanicKind::DivisionByZero).abi_encode())
            }
        }
    }
}

impl Router for Erc721ReceiverMock {
    fn route(
        &mut self,
        host: &mut dyn Host,
        calldata: &[u8],
    ) -> Result<Vec<u8>, Vec<u8>> {
        let call =
            onERC721ReceivedCall::abi_decode(calldata).map_err(|_| Vec::new())?;
        let selector = self.on_erc721_received(
            host,
            call.operator,
            call.from,
            call.tokenId,
            call.data,
        )?;
        Ok(onERC721ReceivedCall::abi_encode_returns(&selector))
    }
}

/// A contract with code that implements no receiver hook at all.
///
/// Every call reverts without data, like a Solidity contract without a
/// matching function or fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonReceiver;

impl Router for NonReceiver {
    fn route(
        &mut self,
        _host: &mut dyn Host,
        _calldata: &[u8],
    ) -> Result<Vec<u8>, Vec<u8>> {
        Err(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, Address, Bytes, U256};
    use alloy_sol_types::{SolCall, SolError};

    use super::*;
    use crate::{
        host::Router, test_utils::TestHost, token::erc721::RECEIVER_FN_SELECTOR,
    };

    const TOKEN: Address = address!("7e57000000000000000000000000000000000001");
    const ALICE: Address = address!("A11CEacF9aa32246d767FCCD72e02d6bCbcC375d");

    fn calldata() -> Vec<u8> {
        onERC721ReceivedCall {
            operator: ALICE,
            from: ALICE,
            tokenId: U256::from(7),
            data: Bytes::from_static(&[0xff, 0x56]),
        }
        .abi_encode()
    }

    #[test]
    fn behaviour_round_trips_through_constructor_argument() {
        for behaviour in [
            Behaviour::Accept,
            Behaviour::Reject,
            Behaviour::WrongSelector,
            Behaviour::Panic,
        ] {
            assert_eq!(Behaviour::from(u8::from(behaviour)), behaviour);
        }
        assert_eq!(Behaviour::from(42), Behaviour::Accept);
    }

    #[test]
    fn accepting_receiver_returns_selector_and_emits() {
        let mut host = TestHost::new(TOKEN);
        let output = Erc721ReceiverMock::new(Behaviour::Accept)
            .route(&mut host, &calldata())
            .expect("should accept the token");

        let selector = onERC721ReceivedCall::abi_decode_returns(&output)
            .expect("should decode the selector");
        assert_eq!(selector.0, RECEIVER_FN_SELECTOR);
        assert_eq!(
            host.events::<Received>(),
            vec![Received {
                operator: ALICE,
                from: ALICE,
                tokenId: U256::from(7),
                data: Bytes::from_static(&[0xff, 0x56]),
            }]
        );
    }

    #[test]
    fn rejecting_receiver_reverts_with_reason() {
        let mut host = TestHost::new(TOKEN);
        let err = Erc721ReceiverMock::new(Behaviour::Reject)
            .route(&mut host, &calldata())
            .expect_err("should reject the token");
        assert_eq!(err, Revert::from(REJECT_REASON).abi_encode());
        assert!(host.logs.is_empty());
    }

    #[test]
    fn wrong_selector_receiver_returns_other_value() {
        let mut host = TestHost::new(TOKEN);
        let output = Erc721ReceiverMock::new(Behaviour::WrongSelector)
            .route(&mut host, &calldata())
            .expect("should return a value");
        let selector = onERC721ReceivedCall::abi_decode_returns(&output)
            .expect("should decode the selector");
        assert_eq!(selector, WRONG_SELECTOR);
    }

    #[test]
    fn panicking_receiver_reverts_with_panic() {
        let mut host = TestHost::new(TOKEN);
        let err = Erc721ReceiverMock::new(Behaviour::Panic)
            .route(&mut host, &calldata())
            .expect_err("should panic");
        assert_eq!(err[..4], Panic::SELECTOR);
    }

    #[test]
    fn non_receiver_reverts_without_data() {
        let mut host = TestHost::new(TOKEN);
        let err = NonReceiver
            .route(&mut host, &calldata())
            .expect_err("should revert");
        assert!(err.is_empty());
    }
}
