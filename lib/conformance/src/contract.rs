//! Typed access to the standard ABI of the contract under test.
use alloy_primitives::{Address, Bytes, FixedBytes, U256};
use alloy_sol_types::SolCall;
use erc721_reference::token::erc721::abi::{IErc165, IErc721, IErc721Metadata};
use eyre::WrapErr;

use crate::{
    receipt::Receipt,
    target::{Invocation, Target},
    Error, Result,
};

/// Optional payload of `safeTransferFrom`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// The three-argument overload, without `data`.
    None,
    /// The four-argument overload with empty `data`.
    Empty,
    /// The four-argument overload with the given `data`.
    Data(Bytes),
}

impl Payload {
    /// Short name used to label cases.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Payload::None => "without data",
            Payload::Empty => "with empty data",
            Payload::Data(_) => "with data",
        }
    }
}

/// Handle to an ERC-721 contract behind a [`Target`].
#[derive(Clone, Copy)]
pub struct Erc721<'a> {
    target: &'a dyn Target,
}

impl<'a> Erc721<'a> {
    /// Wraps `target`.
    #[must_use]
    pub fn new(target: &'a dyn Target) -> Self {
        Self { target }
    }

    /// Address of the contract.
    #[must_use]
    pub fn address(&self) -> Address {
        self.target.address()
    }

    /// Performs `call` as a read-only call from `from` and decodes its
    /// return value.
    ///
    /// # Errors
    ///
    /// Fails if the contract reverts or the output cannot be decoded.
    pub async fn call<C: SolCall>(
        &self,
        from: Address,
        call: &C,
    ) -> Result<C::Return> {
        let output = self.target.call(from, call.abi_encode().into()).await?;
        C::abi_decode_returns(&output)
            .wrap_err_with(|| format!("decode output of {}", C::SIGNATURE))
            .map_err(Error::Transport)
    }

    /// Sends `call` in a transaction signed by `from`.
    ///
    /// # Errors
    ///
    /// Fails if the transaction reverts.
    pub async fn send<C: SolCall>(
        &self,
        from: Address,
        call: &C,
    ) -> Result<Receipt> {
        self.target.send(from, call.abi_encode().into()).await
    }

    /// Invokes `call` in the requested form, discarding the outcome.
    ///
    /// # Errors
    ///
    /// Fails if the contract reverts.
    pub async fn invoke<C: SolCall>(
        &self,
        invocation: Invocation,
        from: Address,
        call: &C,
    ) -> Result<()> {
        match invocation {
            Invocation::Call => self.call(from, call).await.map(|_| ()),
            Invocation::Transaction => self.send(from, call).await.map(|_| ()),
        }
    }

    /// `ownerOf(tokenId)`.
    ///
    /// # Errors
    ///
    /// Fails if the contract reverts.
    pub async fn owner_of(&self, token_id: U256) -> Result<Address> {
        self.call(Address::ZERO, &IErc721::ownerOfCall { tokenId: token_id })
            .await
    }

    /// `balanceOf(owner)`.
    ///
    /// # Errors
    ///
    /// Fails if the contract reverts.
    pub async fn balance_of(&self, owner: Address) -> Result<U256> {
        self.call(Address::ZERO, &IErc721::balanceOfCall { owner }).await
    }

    /// `getApproved(tokenId)`.
    ///
    /// # Errors
    ///
    /// Fails if the contract reverts.
    pub async fn get_approved(&self, token_id: U256) -> Result<Address> {
        let call = IErc721::getApprovedCall { tokenId: token_id };
        self.call(Address::ZERO, &call).await
    }

    /// `isApprovedForAll(owner, operator)`.
    ///
    /// # Errors
    ///
    /// Fails if the contract reverts.
    pub async fn is_approved_for_all(
        &self,
        owner: Address,
        operator: Address,
    ) -> Result<bool> {
        self.call(
            Address::ZERO,
            &IErc721::isApprovedForAllCall { owner, operator },
        )
        .await
    }

    /// `supportsInterface(interfaceId)`.
    ///
    /// # Errors
    ///
    /// Fails if the contract reverts.
    pub async fn supports_interface(&self, interface_id: u32) -> Result<bool> {
        let interface_id = FixedBytes::from(interface_id.to_be_bytes());
        let call = IErc165::supportsInterfaceCall { interfaceId: interface_id };
        self.call(Address::ZERO, &call).await
    }

    /// `tokenURI(tokenId)`.
    ///
    /// # Errors
    ///
    /// Fails if the contract reverts.
    pub async fn token_uri(&self, token_id: U256) -> Result<String> {
        self.call(
            Address::ZERO,
            &IErc721Metadata::tokenURICall { tokenId: token_id },
        )
        .await
    }

    /// `transferFrom(from, to, tokenId)` sent by `sender`.
    ///
    /// # Errors
    ///
    /// Fails if the transaction reverts.
    pub async fn transfer_from(
        &self,
        sender: Address,
        from: Address,
        to: Address,
        token_id: U256,
    ) -> Result<Receipt> {
        let call = IErc721::transferFromCall { from, to, tokenId: token_id };
        self.send(sender, &call).await
    }

    /// `safeTransferFrom(from, to, tokenId[, data])` sent by `sender`.
    ///
    /// # Errors
    ///
    /// Fails if the transaction reverts.
    pub async fn safe_transfer_from(
        &self,
        sender: Address,
        from: Address,
        to: Address,
        token_id: U256,
        payload: &Payload,
    ) -> Result<Receipt> {
        let data = match payload {
            Payload::None => {
                return self
                    .send(
                        sender,
                        &IErc721::safeTransferFrom_0Call {
                            from,
                            to,
                            tokenId: token_id,
                        },
                    )
                    .await;
            }
            Payload::Empty => Bytes::new(),
            Payload::Data(data) => data.clone(),
        };
        let call = IErc721::safeTransferFrom_1Call {
            from,
            to,
            tokenId: token_id,
            data,
        };
        self.send(sender, &call).await
    }

    /// `approve(to, tokenId)` sent by `sender`.
    ///
    /// # Errors
    ///
    /// Fails if the transaction reverts.
    pub async fn approve(
        &self,
        sender: Address,
        to: Address,
        token_id: U256,
    ) -> Result<Receipt> {
        self.send(sender, &IErc721::approveCall { to, tokenId: token_id }).await
    }

    /// `setApprovalForAll(operator, approved)` sent by `sender`.
    ///
    /// # Errors
    ///
    /// Fails if the transaction reverts.
    pub async fn set_approval_for_all(
        &self,
        sender: Address,
        operator: Address,
        approved: bool,
    ) -> Result<Receipt> {
        self.send(
            sender,
            &IErc721::setApprovalForAllCall { operator, approved },
        )
        .await
    }
}
