//! Implementation of the [`Erc721`] token standard.
use std::collections::HashMap;

use alloy_primitives::{Address, Bytes, FixedBytes, U256};
use alloy_sol_types::{SolCall, SolError};

use crate::{
    host::{self, Host},
    utils::introspection::erc165::{self, Erc165, IErc165},
};

pub mod abi;
pub mod extensions;
#[cfg(test)]
mod invariants;
mod receiver;
pub mod utils;

pub use abi::IErc721::{Approval, ApprovalForAll, Transfer};
pub use receiver::{IErc721Receiver, RECEIVER_FN_SELECTOR};

/// Identifier of the ERC-721 interface, `0x80ac58cd`.
pub const INTERFACE_ID: u32 = {
    use abi::IErc721::{
        approveCall, balanceOfCall, getApprovedCall, isApprovedForAllCall,
        ownerOfCall, safeTransferFrom_0Call, safeTransferFrom_1Call,
        setApprovalForAllCall, transferFromCall,
    };
    erc165::interface_id(&[
        balanceOfCall::SELECTOR,
        ownerOfCall::SELECTOR,
        safeTransferFrom_0Call::SELECTOR,
        safeTransferFrom_1Call::SELECTOR,
        transferFromCall::SELECTOR,
        approveCall::SELECTOR,
        setApprovalForAllCall::SELECTOR,
        getApprovedCall::SELECTOR,
        isApprovedForAllCall::SELECTOR,
    ])
};

pub use sol::*;
mod sol {
    use alloy_sol_types::sol;

    sol! {
        /// Indicates that an address can't be an owner.
        /// For example, `Address::ZERO` is a forbidden owner in [`super::Erc721`].
        /// Used in balance queries.
        ///
        /// * `owner` - The address deemed to be an invalid owner.
        #[derive(Debug, PartialEq, Eq)]
        #[allow(missing_docs)]
        error ERC721InvalidOwner(address owner);

        /// Indicates a `token_id` whose `owner` is the zero address.
        ///
        /// * `token_id` - Token id as a number.
        #[derive(Debug, PartialEq, Eq)]
        #[allow(missing_docs)]
        error ERC721NonexistentToken(uint256 token_id);

        /// Indicates an error related to the ownership over a particular token.
        /// Used in transfers.
        ///
        /// * `sender` - Address whose tokens are being transferred.
        /// * `token_id` - Token id as a number.
        /// * `owner` - Address of the owner of the token.
        #[derive(Debug, PartialEq, Eq)]
        #[allow(missing_docs)]
        error ERC721IncorrectOwner(address sender, uint256 token_id, address owner);

        /// Indicates a failure with the token `sender`. Used in transfers.
        ///
        /// * `sender` - An address whose token is being transferred.
        #[derive(Debug, PartialEq, Eq)]
        #[allow(missing_docs)]
        error ERC721InvalidSender(address sender);

        /// Indicates a failure with the token `receiver`. Used in transfers.
        ///
        /// * `receiver` - Address that receives the token.
        #[derive(Debug, PartialEq, Eq)]
        #[allow(missing_docs)]
        error ERC721InvalidReceiver(address receiver);

        /// Indicates a failure with the `operator`’s approval. Used in transfers.
        ///
        /// * `operator` - Address that may be allowed to operate on tokens
        ///   without being their owner.
        /// * `token_id` - Token id as a number.
        #[derive(Debug, PartialEq, Eq)]
        #[allow(missing_docs)]
        error ERC721InsufficientApproval(address operator, uint256 token_id);

        /// Indicates a failure with the `approver` of a token to be approved.
        /// Used in approvals.
        ///
        /// * `approver` - Address initiating an approval operation.
        #[derive(Debug, PartialEq, Eq)]
        #[allow(missing_docs)]
        error ERC721InvalidApprover(address approver);

        /// Indicates a failure with the `operator` to be approved.
        /// Used in approvals.
        ///
        /// * `operator` - Address that may be allowed to operate on tokens
        ///   without being their owner.
        #[derive(Debug, PartialEq, Eq)]
        #[allow(missing_docs)]
        error ERC721InvalidOperator(address operator);
    }
}

/// An [`Erc721`] error defined as described in [ERC-6093].
///
/// [ERC-6093]: https://eips.ethereum.org/EIPS/eip-6093
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Indicates that an address can't be an owner.
    /// For example, `Address::ZERO` is a forbidden owner in [`Erc721`].
    /// Used in balance queries.
    InvalidOwner(ERC721InvalidOwner),
    /// Indicates a `token_id` whose `owner` is the zero address.
    NonexistentToken(ERC721NonexistentToken),
    /// Indicates an error related to the ownership over a particular token.
    /// Used in transfers.
    IncorrectOwner(ERC721IncorrectOwner),
    /// Indicates a failure with the token `sender`. Used in transfers.
    InvalidSender(ERC721InvalidSender),
    /// Indicates a failure with the token `receiver`. Used in transfers.
    InvalidReceiver(ERC721InvalidReceiver),
    /// Indicates a failure with the token `receiver`, with the reason
    /// specified by it.
    ///
    /// The receiver's revert data is bubbled up unchanged, so this error is
    /// usually encoded as `Error(string)`, `Panic(uint256)` or a custom error
    /// of the receiver.
    InvalidReceiverWithReason(Bytes),
    /// Indicates a failure with the `operator`’s approval. Used in transfers.
    InsufficientApproval(ERC721InsufficientApproval),
    /// Indicates a failure with the `approver` of a token to be approved. Used
    /// in approvals.
    InvalidApprover(ERC721InvalidApprover),
    /// Indicates a failure with the `operator` to be approved. Used in
    /// approvals.
    InvalidOperator(ERC721InvalidOperator),
}

macro_rules! impl_from_sol_error {
    ($($variant:ident($error:ty)),* $(,)?) => {
        $(
            impl From<$error> for Error {
                fn from(value: $error) -> Self {
                    Error::$variant(value)
                }
            }
        )*

        impl From<Error> for Vec<u8> {
            fn from(value: Error) -> Self {
                match value {
                    $(Error::$variant(e) => e.abi_encode(),)*
                    Error::InvalidReceiverWithReason(reason) => reason.into(),
                }
            }
        }
    };
}

impl_from_sol_error!(
    InvalidOwner(ERC721InvalidOwner),
    NonexistentToken(ERC721NonexistentToken),
    IncorrectOwner(ERC721IncorrectOwner),
    InvalidSender(ERC721InvalidSender),
    InvalidReceiver(ERC721InvalidReceiver),
    InsufficientApproval(ERC721InsufficientApproval),
    InvalidApprover(ERC721InvalidApprover),
    InvalidOperator(ERC721InvalidOperator),
);

/// State of an [`Erc721`] token.
#[derive(Clone, Debug, Default)]
pub struct Erc721 {
    /// Maps tokens to owners.
    pub(crate) owners: HashMap<U256, Address>,
    /// Maps users to balances.
    pub(crate) balances: HashMap<Address, U256>,
    /// Maps tokens to approvals.
    pub(crate) token_approvals: HashMap<U256, Address>,
    /// Maps owners to a mapping of operator approvals.
    pub(crate) operator_approvals: HashMap<Address, HashMap<Address, bool>>,
}

/// Required interface of an [`Erc721`] compliant contract.
///
/// Functions that change state receive the [`Host`] of the current call
/// frame, which provides the message sender and collects emitted events.
pub trait IErc721 {
    /// The error type associated to this ERC-721 trait implementation.
    type Error: Into<Vec<u8>>;

    /// Returns the number of tokens in `owner`'s account.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidOwner`] - If owner address is `Address::ZERO`.
    fn balance_of(&self, owner: Address) -> Result<U256, Self::Error>;

    /// Returns the owner of the `token_id` token.
    ///
    /// # Errors
    ///
    /// * [`Error::NonexistentToken`] - If the token does not exist.
    fn owner_of(&self, token_id: U256) -> Result<Address, Self::Error>;

    /// Safely transfers `token_id` token from `from` to `to`, checking first
    /// that contract recipients are aware of the ERC-721 protocol to
    /// prevent tokens from being forever locked.
    ///
    /// # Errors
    ///
    /// Same as [`IErc721::safe_transfer_from_with_data`].
    fn safe_transfer_from(
        &mut self,
        host: &mut dyn Host,
        from: Address,
        to: Address,
        token_id: U256,
    ) -> Result<(), Self::Error>;

    /// Safely transfers `token_id` token from `from` to `to`, passing `data`
    /// to the receiver's `onERC721Received` hook.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidReceiver`] - If `to` is `Address::ZERO`, or if `to`
    ///   has code and does not return [`RECEIVER_FN_SELECTOR`].
    /// * [`Error::InvalidReceiverWithReason`] - If `to` reverted with a
    ///   reason.
    /// * [`Error::NonexistentToken`] - If the token does not exist.
    /// * [`Error::InsufficientApproval`] - If the sender is not allowed to
    ///   move the token.
    /// * [`Error::IncorrectOwner`] - If `from` does not own the token.
    ///
    /// # Events
    ///
    /// * [`Transfer`].
    fn safe_transfer_from_with_data(
        &mut self,
        host: &mut dyn Host,
        from: Address,
        to: Address,
        token_id: U256,
        data: Bytes,
    ) -> Result<(), Self::Error>;

    /// Transfers `token_id` token from `from` to `to` without checking
    /// whether `to` can receive it.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidReceiver`] - If `to` is `Address::ZERO`.
    /// * [`Error::NonexistentToken`] - If the token does not exist.
    /// * [`Error::InsufficientApproval`] - If the sender is not allowed to
    ///   move the token.
    /// * [`Error::IncorrectOwner`] - If `from` does not own the token.
    ///
    /// # Events
    ///
    /// * [`Transfer`].
    fn transfer_from(
        &mut self,
        host: &mut dyn Host,
        from: Address,
        to: Address,
        token_id: U256,
    ) -> Result<(), Self::Error>;

    /// Gives permission to `to` to transfer `token_id` token to another
    /// account. `Address::ZERO` clears the previous approval.
    ///
    /// # Errors
    ///
    /// * [`Error::NonexistentToken`] - If the token does not exist.
    /// * [`Error::InvalidApprover`] - If the sender is neither the owner nor
    ///   an operator of the owner.
    ///
    /// # Events
    ///
    /// * [`Approval`].
    fn approve(
        &mut self,
        host: &mut dyn Host,
        to: Address,
        token_id: U256,
    ) -> Result<(), Self::Error>;

    /// Approves or removes `operator` as an operator for the sender.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidOperator`] - If `operator` is `Address::ZERO`.
    ///
    /// # Events
    ///
    /// * [`ApprovalForAll`].
    fn set_approval_for_all(
        &mut self,
        host: &mut dyn Host,
        operator: Address,
        approved: bool,
    ) -> Result<(), Self::Error>;

    /// Returns the account approved for `token_id` token.
    ///
    /// # Errors
    ///
    /// * [`Error::NonexistentToken`] - If the token does not exist.
    fn get_approved(&self, token_id: U256) -> Result<Address, Self::Error>;

    /// Returns whether the `operator` is allowed to manage all the assets of
    /// `owner`.
    fn is_approved_for_all(&self, owner: Address, operator: Address) -> bool;
}

impl IErc721 for Erc721 {
    type Error = Error;

    fn balance_of(&self, owner: Address) -> Result<U256, Error> {
        if owner.is_zero() {
            return Err(ERC721InvalidOwner { owner: Address::ZERO }.into());
        }
        Ok(self.balances.get(&owner).copied().unwrap_or_default())
    }

    fn owner_of(&self, token_id: U256) -> Result<Address, Error> {
        self._require_owned(token_id)
    }

    fn safe_transfer_from(
        &mut self,
        host: &mut dyn Host,
        from: Address,
        to: Address,
        token_id: U256,
    ) -> Result<(), Error> {
        self.safe_transfer_from_with_data(
            host,
            from,
            to,
            token_id,
            Bytes::new(),
        )
    }

    fn safe_transfer_from_with_data(
        &mut self,
        host: &mut dyn Host,
        from: Address,
        to: Address,
        token_id: U256,
        data: Bytes,
    ) -> Result<(), Error> {
        self.transfer_from(host, from, to, token_id)?;
        let operator = host.msg_sender();
        self._check_on_erc721_received(
            host, operator, from, to, token_id, &data,
        )
    }

    fn transfer_from(
        &mut self,
        host: &mut dyn Host,
        from: Address,
        to: Address,
        token_id: U256,
    ) -> Result<(), Error> {
        if to.is_zero() {
            return Err(
                ERC721InvalidReceiver { receiver: Address::ZERO }.into()
            );
        }

        // Setting an "auth" argument enables the `_is_authorized` check which
        // verifies that the token exists (`from != 0`).
        let auth = host.msg_sender();
        let previous_owner = self._update(host, to, token_id, auth)?;
        if previous_owner != from {
            return Err(ERC721IncorrectOwner {
                sender: from,
                token_id,
                owner: previous_owner,
            }
            .into());
        }
        Ok(())
    }

    fn approve(
        &mut self,
        host: &mut dyn Host,
        to: Address,
        token_id: U256,
    ) -> Result<(), Error> {
        let auth = host.msg_sender();
        self._approve(Some(host), to, token_id, auth)
    }

    fn set_approval_for_all(
        &mut self,
        host: &mut dyn Host,
        operator: Address,
        approved: bool,
    ) -> Result<(), Error> {
        let owner = host.msg_sender();
        self._set_approval_for_all(host, owner, operator, approved)
    }

    fn get_approved(&self, token_id: U256) -> Result<Address, Error> {
        self._require_owned(token_id)?;
        Ok(self._get_approved(token_id))
    }

    fn is_approved_for_all(&self, owner: Address, operator: Address) -> bool {
        self.operator_approvals
            .get(&owner)
            .and_then(|operators| operators.get(&operator))
            .copied()
            .unwrap_or_default()
    }
}

impl IErc165 for Erc721 {
    fn supports_interface(interface_id: FixedBytes<4>) -> bool {
        INTERFACE_ID == u32::from_be_bytes(*interface_id)
            || Erc165::supports_interface(interface_id)
    }
}

impl Erc721 {
    /// Returns the owner of the `token_id`. Does NOT revert if the token
    /// doesn't exist.
    #[must_use]
    pub fn _owner_of(&self, token_id: U256) -> Address {
        self.owners.get(&token_id).copied().unwrap_or_default()
    }

    /// Returns the approved address for `token_id`. Returns `Address::ZERO`
    /// if `token_id` is not minted.
    #[must_use]
    pub fn _get_approved(&self, token_id: U256) -> Address {
        self.token_approvals.get(&token_id).copied().unwrap_or_default()
    }

    /// Returns whether `spender` is allowed to manage `owner`'s tokens, or
    /// `token_id` in particular (ignoring whether it is owned by `owner`).
    ///
    /// WARNING: This function assumes that `owner` is the actual owner of
    /// `token_id` and does not verify this assumption.
    #[must_use]
    pub fn _is_authorized(
        &self,
        owner: Address,
        spender: Address,
        token_id: U256,
    ) -> bool {
        !spender.is_zero()
            && (owner == spender
                || self.is_approved_for_all(owner, spender)
                || self._get_approved(token_id) == spender)
    }

    /// Checks if `operator` can operate on `token_id`, assuming the provided
    /// `owner` is the actual owner.
    ///
    /// # Errors
    ///
    /// * [`Error::NonexistentToken`] - If `owner` is `Address::ZERO`.
    /// * [`Error::InsufficientApproval`] - If `operator` is not authorized.
    pub fn _check_authorized(
        &self,
        owner: Address,
        operator: Address,
        token_id: U256,
    ) -> Result<(), Error> {
        if self._is_authorized(owner, operator, token_id) {
            return Ok(());
        }

        if owner.is_zero() {
            Err(ERC721NonexistentToken { token_id }.into())
        } else {
            Err(ERC721InsufficientApproval { operator, token_id }.into())
        }
    }

    /// Transfers `token_id` from its current owner to `to`, or alternatively
    /// mints (or burns) if the current owner (or `to`) is `Address::ZERO`.
    /// Returns the owner of the `token_id` before the update.
    ///
    /// The `auth` argument is optional. If the value passed is non-zero, then
    /// this function will check that `auth` is either the owner of the token,
    /// or approved to operate on the token (by the owner).
    ///
    /// The single-token approval is cleared silently on every move.
    ///
    /// # Errors
    ///
    /// * [`Error::NonexistentToken`] - If token does not exist and `auth` is
    ///   not `Address::ZERO`.
    /// * [`Error::InsufficientApproval`] - If `auth` is not authorized.
    ///
    /// # Events
    ///
    /// * [`Transfer`].
    pub fn _update(
        &mut self,
        host: &mut dyn Host,
        to: Address,
        token_id: U256,
        auth: Address,
    ) -> Result<Address, Error> {
        let from = self._owner_of(token_id);

        // Perform (optional) operator check.
        if !auth.is_zero() {
            self._check_authorized(from, auth, token_id)?;
        }

        // Execute the update.
        if !from.is_zero() {
            // Clear approval. No need to re-authorize or emit the `Approval`
            // event.
            self._approve(None, Address::ZERO, token_id, Address::ZERO)?;
            let balance = self.balances.entry(from).or_default();
            *balance = balance.saturating_sub(U256::from(1));
        }

        if to.is_zero() {
            self.owners.remove(&token_id);
        } else {
            *self.balances.entry(to).or_default() += U256::from(1);
            self.owners.insert(token_id, to);
        }

        host::log(host, &Transfer { from, to, tokenId: token_id });
        Ok(from)
    }

    /// Mints `token_id` and transfers it to `to`.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidReceiver`] - If `to` is `Address::ZERO`.
    /// * [`Error::InvalidSender`] - If `token_id` already exists.
    ///
    /// # Events
    ///
    /// * [`Transfer`].
    pub fn _mint(
        &mut self,
        host: &mut dyn Host,
        to: Address,
        token_id: U256,
    ) -> Result<(), Error> {
        if to.is_zero() {
            return Err(
                ERC721InvalidReceiver { receiver: Address::ZERO }.into()
            );
        }

        let previous_owner = self._update(host, to, token_id, Address::ZERO)?;
        if !previous_owner.is_zero() {
            return Err(ERC721InvalidSender { sender: Address::ZERO }.into());
        }
        Ok(())
    }

    /// Destroys `token_id`. The approval is cleared when the token is burned.
    ///
    /// # Errors
    ///
    /// * [`Error::NonexistentToken`] - If token does not exist.
    ///
    /// # Events
    ///
    /// * [`Transfer`].
    pub fn _burn(
        &mut self,
        host: &mut dyn Host,
        token_id: U256,
    ) -> Result<(), Error> {
        let previous_owner =
            self._update(host, Address::ZERO, token_id, Address::ZERO)?;
        if previous_owner.is_zero() {
            return Err(ERC721NonexistentToken { token_id }.into());
        }
        Ok(())
    }

    /// Approve `to` to operate on `token_id`.
    ///
    /// The `auth` argument is optional. If the value passed is non-zero, then
    /// this function will check that `auth` is either the owner of the token,
    /// or approved to operate on all tokens held by this owner.
    ///
    /// The [`Approval`] event is emitted through `host` when one is given,
    /// and the approval is changed silently otherwise.
    ///
    /// # Errors
    ///
    /// * [`Error::NonexistentToken`] - If the token does not exist.
    /// * [`Error::InvalidApprover`] - If `auth` does not have a right to
    ///   approve this token.
    ///
    /// # Events
    ///
    /// * [`Approval`].
    pub fn _approve(
        &mut self,
        host: Option<&mut dyn Host>,
        to: Address,
        token_id: U256,
        auth: Address,
    ) -> Result<(), Error> {
        // Avoid reading the owner unless necessary.
        if host.is_some() || !auth.is_zero() {
            let owner = self._require_owned(token_id)?;

            // We do not use [`Self::_is_authorized`] because single-token
            // approvals should not be able to call `approve`.
            if !auth.is_zero()
                && owner != auth
                && !self.is_approved_for_all(owner, auth)
            {
                return Err(ERC721InvalidApprover { approver: auth }.into());
            }

            if let Some(host) = host {
                let event = Approval { owner, approved: to, tokenId: token_id };
                host::log(host, &event);
            }
        }

        if to.is_zero() {
            self.token_approvals.remove(&token_id);
        } else {
            self.token_approvals.insert(token_id, to);
        }
        Ok(())
    }

    /// Approve `operator` to operate on all of `owner`'s tokens.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidOperator`] - If `operator` is `Address::ZERO`.
    ///
    /// # Events
    ///
    /// * [`ApprovalForAll`].
    pub fn _set_approval_for_all(
        &mut self,
        host: &mut dyn Host,
        owner: Address,
        operator: Address,
        approved: bool,
    ) -> Result<(), Error> {
        if operator.is_zero() {
            return Err(ERC721InvalidOperator { operator }.into());
        }

        self.operator_approvals
            .entry(owner)
            .or_default()
            .insert(operator, approved);
        host::log(host, &ApprovalForAll { owner, operator, approved });
        Ok(())
    }

    /// Returns the owner of `token_id`.
    ///
    /// # Errors
    ///
    /// * [`Error::NonexistentToken`] - If the token does not exist.
    pub fn _require_owned(&self, token_id: U256) -> Result<Address, Error> {
        let owner = self._owner_of(token_id);
        if owner.is_zero() {
            return Err(ERC721NonexistentToken { token_id }.into());
        }
        Ok(owner)
    }

    /// Performs an acceptance check for the provided `operator` by calling
    /// [`IErc721Receiver::on_erc721_received`] on the `to` address. The
    /// `operator` is generally the address that initiated the token
    /// transfer (i.e. the message sender).
    ///
    /// The call is not executed if the target address is not a contract.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidReceiver`] - If the receiver reverted without a
    ///   reason or returned anything but [`RECEIVER_FN_SELECTOR`].
    /// * [`Error::InvalidReceiverWithReason`] - If the receiver reverted with
    ///   a reason.
    pub fn _check_on_erc721_received(
        &mut self,
        host: &mut dyn Host,
        operator: Address,
        from: Address,
        to: Address,
        token_id: U256,
        data: &Bytes,
    ) -> Result<(), Error> {
        if !host.has_code(to) {
            return Ok(());
        }

        let call = abi::IErc721Receiver::onERC721ReceivedCall {
            operator,
            from,
            tokenId: token_id,
            data: data.clone(),
        };

        let output = match host.call(to, &call.abi_encode()) {
            Ok(output) => output,
            Err(reason) if !reason.is_empty() => {
                tracing::debug!(
                    %to,
                    %token_id,
                    "receiver reverted with reason"
                );
                return Err(Error::InvalidReceiverWithReason(reason));
            }
            Err(_) => {
                return Err(ERC721InvalidReceiver { receiver: to }.into());
            }
        };

        // Token rejected.
        match abi::IErc721Receiver::onERC721ReceivedCall::abi_decode_returns(
            &output,
        ) {
            Ok(id) if id.0 == RECEIVER_FN_SELECTOR => Ok(()),
            _ => Err(ERC721InvalidReceiver { receiver: to }.into()),
        }
    }
}
