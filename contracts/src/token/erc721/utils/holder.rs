//! Implementation of the [`IErc721Receiver`] trait.

use alloy_primitives::{aliases::B32, Address, Bytes, U256};
use alloy_sol_types::SolCall;

use crate::{
    host::{Host, Router},
    token::erc721::{
        abi::IErc721Receiver::onERC721ReceivedCall, IErc721Receiver,
        RECEIVER_FN_SELECTOR,
    },
};

/// The expected value returned from [`IErc721Receiver::on_erc721_received`].
const SELECTOR: B32 = B32::new(RECEIVER_FN_SELECTOR);

/// Default implementation of the [`IErc721Receiver`] trait, accepting every
/// token.
#[derive(Clone, Copy, Debug, Default)]
pub struct Erc721Holder;

impl IErc721Receiver for Erc721Holder {
    fn on_erc721_received(
        &mut self,
        _host: &mut dyn Host,
        _operator: Address,
        _from: Address,
        _token_id: U256,
        _data: Bytes,
    ) -> Result<B32, Vec<u8>> {
        Ok(SELECTOR)
    }
}

impl Router for Erc721Holder {
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

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, Address, U256};
    use alloy_sol_types::SolCall;

    use super::{Erc721Holder, SELECTOR};
    use crate::{
        host::Router,
        test_utils::TestHost,
        token::erc721::{
            abi::IErc721Receiver::onERC721ReceivedCall, IErc721Receiver,
        },
    };

    const ALICE: Address = address!("A11CEacF9aa32246d767FCCD72e02d6bCbcC375d");

    #[test]
    fn holder_returns_proper_selector() {
        let mut host = TestHost::new(ALICE);
        assert_eq!(
            Erc721Holder.on_erc721_received(
                &mut host,
                ALICE,
                ALICE,
                U256::from(1),
                vec![].into()
            ),
            Ok(SELECTOR)
        );
    }

    #[test]
    fn holder_routes_receiver_hook() {
        let mut host = TestHost::new(ALICE);
        let calldata = onERC721ReceivedCall {
            operator: ALICE,
            from: Address::ZERO,
            tokenId: U256::from(1),
            data: vec![0xff].into(),
        }
        .abi_encode();

        let output = Erc721Holder
            .route(&mut host, &calldata)
            .expect("should accept the token");
        let selector = onERC721ReceivedCall::abi_decode_returns(&output)
            .expect("should decode the selector");
        assert_eq!(selector, SELECTOR);
    }

    #[test]
    fn holder_reverts_on_unknown_selector() {
        let mut host = TestHost::new(ALICE);
        let err = Erc721Holder
            .route(&mut host, &[0xde, 0xad, 0xbe, 0xef])
            .expect_err("should revert on unknown function");
        assert!(err.is_empty());
    }
}
