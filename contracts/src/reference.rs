//! The reference token: [`Erc721`] with metadata, burning and a public mint
//! hook, exposed through its Solidity ABI.

use alloy_primitives::{Address, FixedBytes, U256};
use alloy_sol_types::{SolCall, SolInterface};

use crate::{
    host::{Host, Router},
    token::erc721::{
        abi::{
            IErc165::{self, IErc165Calls},
            IErc721::{self, IErc721Calls},
            IErc721Metadata::{self, IErc721MetadataCalls},
            IErc721Supply::IErc721SupplyCalls,
        },
        extensions::{Erc721Metadata, IErc721Burnable, IErc721Metadata as _},
        Erc721, Error, IErc721 as _,
    },
    utils::introspection::erc165::IErc165 as _,
};

/// Default collection name.
pub const NAME: &str = "Test Token";
/// Default collection symbol.
pub const SYMBOL: &str = "NFT";
/// Default base URI.
pub const BASE_URI: &str = "https://nft.example/";

/// ERC-721 token with the metadata and burnable extensions.
#[derive(Clone, Debug)]
pub struct ReferenceToken {
    erc721: Erc721,
    metadata: Erc721Metadata,
}

impl Default for ReferenceToken {
    fn default() -> Self {
        Self::new(NAME, SYMBOL, BASE_URI)
    }
}

impl ReferenceToken {
    /// Creates an empty collection.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        base_uri: impl Into<String>,
    ) -> Self {
        Self {
            erc721: Erc721::default(),
            metadata: Erc721Metadata::new(name, symbol, base_uri),
        }
    }

    /// Token state.
    #[must_use]
    pub fn erc721(&self) -> &Erc721 {
        &self.erc721
    }

    /// Mutable token state.
    pub fn erc721_mut(&mut self) -> &mut Erc721 {
        &mut self.erc721
    }

    /// Mints `token_id` to `to`.
    ///
    /// # Errors
    ///
    /// See [`Erc721::_mint`].
    pub fn mint(
        &mut self,
        host: &mut dyn Host,
        to: Address,
        token_id: U256,
    ) -> Result<(), Error> {
        self.erc721._mint(host, to, token_id)
    }

    /// Whether the token implements the interface `interface_id`.
    #[must_use]
    pub fn supports_interface(interface_id: FixedBytes<4>) -> bool {
        Erc721::supports_interface(interface_id)
            || Erc721Metadata::supports_interface(interface_id)
    }

    fn route_erc721(
        &mut self,
        host: &mut dyn Host,
        call: IErc721Calls,
    ) -> Result<Vec<u8>, Error> {
        use IErc721::*;

        let token = &mut self.erc721;
        let output = match call {
            IErc721Calls::balanceOf(c) => {
                balanceOfCall::abi_encode_returns(&token.balance_of(c.owner)?)
            }
            IErc721Calls::ownerOf(c) => {
                ownerOfCall::abi_encode_returns(&token.owner_of(c.tokenId)?)
            }
            IErc721Calls::safeTransferFrom_0(c) => {
                token.safe_transfer_from(host, c.from, c.to, c.tokenId)?;
                Vec::new()
            }
            IErc721Calls::safeTransferFrom_1(c) => {
                token.safe_transfer_from_with_data(
                    host, c.from, c.to, c.tokenId, c.data,
                )?;
                Vec::new()
            }
            IErc721Calls::transferFrom(c) => {
                token.transfer_from(host, c.from, c.to, c.tokenId)?;
                Vec::new()
            }
            IErc721Calls::approve(c) => {
                token.approve(host, c.to, c.tokenId)?;
                Vec::new()
            }
            IErc721Calls::setApprovalForAll(c) => {
                token.set_approval_for_all(host, c.operator, c.approved)?;
                Vec::new()
            }
            IErc721Calls::getApproved(c) => getApprovedCall::abi_encode_returns(
                &token.get_approved(c.tokenId)?,
            ),
            IErc721Calls::isApprovedForAll(c) => {
                isApprovedForAllCall::abi_encode_returns(
                    &token.is_approved_for_all(c.owner, c.operator),
                )
            }
        };
        Ok(output)
    }

    fn route_metadata(
        &self,
        call: &IErc721MetadataCalls,
    ) -> Result<Vec<u8>, Error> {
        use IErc721Metadata::*;

        let output = match call {
            IErc721MetadataCalls::name(_) => {
                nameCall::abi_encode_returns(&self.metadata.name())
            }
            IErc721MetadataCalls::symbol(_) => {
                symbolCall::abi_encode_returns(&self.metadata.symbol())
            }
            IErc721MetadataCalls::tokenURI(c) => {
                let uri = self.metadata.token_uri(&self.erc721, c.tokenId)?;
                tokenURICall::abi_encode_returns(&uri)
            }
        };
        Ok(output)
    }

    fn route_supply(
        &mut self,
        host: &mut dyn Host,
        call: IErc721SupplyCalls,
    ) -> Result<Vec<u8>, Error> {
        match call {
            IErc721SupplyCalls::mint(c) => self.mint(host, c.to, c.tokenId)?,
            IErc721SupplyCalls::burn(c) => self.erc721.burn(host, c.tokenId)?,
        }
        Ok(Vec::new())
    }
}

impl Router for ReferenceToken {
    fn route(
        &mut self,
        host: &mut dyn Host,
        calldata: &[u8],
    ) -> Result<Vec<u8>, Vec<u8>> {
        let Some(selector) = calldata.get(..4) else {
            return Err(Vec::new());
        };
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(selector);

        let result = if IErc721Calls::valid_selector(bytes) {
            let call =
                IErc721Calls::abi_decode(calldata).map_err(|_| Vec::new())?;
            self.route_erc721(host, call)
        } else if IErc721MetadataCalls::valid_selector(bytes) {
            let call = IErc721MetadataCalls::abi_decode(calldata)
                .map_err(|_| Vec::new())?;
            self.route_metadata(&call)
        } else if IErc165Calls::valid_selector(bytes) {
            let call = IErc165::supportsInterfaceCall::abi_decode(calldata)
                .map_err(|_| Vec::new())?;
            Ok(IErc165::supportsInterfaceCall::abi_encode_returns(
                &Self::supports_interface(call.interfaceId),
            ))
        } else if IErc721SupplyCalls::valid_selector(bytes) {
            let call = IErc721SupplyCalls::abi_decode(calldata)
                .map_err(|_| Vec::new())?;
            self.route_supply(host, call)
        } else {
            tracing::trace!(selector = %FixedBytes(bytes), "unknown selector");
            return Err(Vec::new());
        };

        result.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, fixed_bytes, uint, Address, U256};
    use alloy_sol_types::{SolCall, SolError};

    use super::ReferenceToken;
    use crate::{
        host::Router,
        test_utils::TestHost,
        token::erc721::{
            abi::{IErc165, IErc721, IErc721Metadata, IErc721Supply},
            ERC721InvalidOwner, ERC721NonexistentToken, Transfer,
        },
    };

    const ALICE: Address = address!("A11CEacF9aa32246d767FCCD72e02d6bCbcC375d");
    const BOB: Address = address!("F4EaCDAbEf3c8f1EdE91b6f2A6840bc2E4DD3526");
    const TOKEN_ID: U256 = uint!(7_U256);

    fn call<C: SolCall>(
        token: &mut ReferenceToken,
        host: &mut TestHost,
        call: &C,
    ) -> Result<C::Return, Vec<u8>> {
        let output = token.route(host, &call.abi_encode())?;
        Ok(C::abi_decode_returns(&output).expect("should decode returns"))
    }

    #[test]
    fn mints_through_abi() {
        let mut token = ReferenceToken::default();
        let mut host = TestHost::new(ALICE);

        call(
            &mut token,
            &mut host,
            &IErc721Supply::mintCall { to: BOB, tokenId: TOKEN_ID },
        )
        .expect("should mint");

        let owner = call(
            &mut token,
            &mut host,
            &IErc721::ownerOfCall { tokenId: TOKEN_ID },
        )
        .expect("should return the owner");
        assert_eq!(owner, BOB);
        assert_eq!(
            host.events::<Transfer>(),
            vec![Transfer { from: Address::ZERO, to: BOB, tokenId: TOKEN_ID }]
        );
    }

    #[test]
    fn reverts_with_encoded_error() {
        let mut token = ReferenceToken::default();
        let mut host = TestHost::new(ALICE);

        let err = call(
            &mut token,
            &mut host,
            &IErc721::balanceOfCall { owner: Address::ZERO },
        )
        .expect_err("should revert");
        assert_eq!(
            err,
            ERC721InvalidOwner { owner: Address::ZERO }.abi_encode()
        );

        let err = call(
            &mut token,
            &mut host,
            &IErc721Metadata::tokenURICall { tokenId: TOKEN_ID },
        )
        .expect_err("should revert");
        assert_eq!(
            err,
            ERC721NonexistentToken { token_id: TOKEN_ID }.abi_encode()
        );
    }

    #[test]
    fn reverts_without_data_on_unknown_or_malformed_call() {
        let mut token = ReferenceToken::default();
        let mut host = TestHost::new(ALICE);

        let err = token
            .route(&mut host, &[0x88, 0x88, 0x88, 0x88])
            .expect_err("should revert");
        assert!(err.is_empty());

        let err = token.route(&mut host, &[0x01]).expect_err("should revert");
        assert!(err.is_empty());

        let selector = IErc721::ownerOfCall::SELECTOR;
        let err = token.route(&mut host, &selector).expect_err("should revert");
        assert!(err.is_empty());
    }

    #[test]
    fn serves_metadata() {
        let mut token = ReferenceToken::default();
        let mut host = TestHost::new(ALICE);
        token.mint(&mut host, ALICE, TOKEN_ID).expect("should mint");

        let name = call(&mut token, &mut host, &IErc721Metadata::nameCall)
            .expect("should return the name");
        let symbol = call(&mut token, &mut host, &IErc721Metadata::symbolCall)
            .expect("should return the symbol");
        let uri = call(
            &mut token,
            &mut host,
            &IErc721Metadata::tokenURICall { tokenId: TOKEN_ID },
        )
        .expect("should return the token uri");

        assert_eq!(name, super::NAME);
        assert_eq!(symbol, super::SYMBOL);
        assert_eq!(uri, format!("{}7", super::BASE_URI));
    }

    #[test]
    fn supports_interfaces() {
        let mut token = ReferenceToken::default();
        let mut host = TestHost::new(ALICE);

        for (id, expected) in [
            (fixed_bytes!("01ffc9a7"), true),
            (fixed_bytes!("80ac58cd"), true),
            (fixed_bytes!("5b5e139f"), true),
            (fixed_bytes!("88888888"), false),
            (fixed_bytes!("ffffffff"), false),
        ] {
            let supported = call(
                &mut token,
                &mut host,
                &IErc165::supportsInterfaceCall { interfaceId: id },
            )
            .expect("should answer");
            assert_eq!(supported, expected, "interface {id}");
        }
    }

    #[test]
    fn burns_through_abi() {
        let mut token = ReferenceToken::default();
        let mut host = TestHost::new(ALICE);
        token.mint(&mut host, ALICE, TOKEN_ID).expect("should mint");
        host.logs.clear();

        call(
            &mut token,
            &mut host,
            &IErc721Supply::burnCall { tokenId: TOKEN_ID },
        )
        .expect("should burn");

        assert_eq!(
            host.events::<Transfer>(),
            vec![Transfer { from: ALICE, to: Address::ZERO, tokenId: TOKEN_ID }]
        );
    }
}
