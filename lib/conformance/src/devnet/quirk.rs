//! Deliberate deviations from the standard, used to check that the battery
//! catches them.
use alloy_primitives::{Address, Bytes, LogData, U256};
use alloy_sol_types::{SolCall, SolInterface};
use erc721_reference::{
    host::{self, Host, Router},
    reference::ReferenceToken,
    token::erc721::{
        abi::{
            IErc721::{self, IErc721Calls},
            IErc721Metadata::{self, IErc721MetadataCalls},
            IErc721Supply::IErc721SupplyCalls,
        },
        Approval, IErc721 as _,
    },
};

/// A known way of breaking the standard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quirk {
    /// Transfers leave the single-token approval in place.
    KeepApprovalOnTransfer,
    /// Transfers emit an `Approval` event for the cleared approval.
    EmitApprovalOnTransfer,
    /// `safeTransferFrom` behaves like `transferFrom`.
    SkipReceiverCheck,
    /// `approve(0, id)` clears the approval without an event.
    SilentApprovalRemoval,
    /// `balanceOf(0)` returns zero instead of reverting.
    AllowBalanceOfZero,
    /// `setApprovalForAll` is silent when the flag does not change.
    NoEventOnRedundantApprovalForAll,
    /// `burn` emits no `Transfer` event.
    BurnWithoutEvent,
    /// `Approval` names the caller as owner when an operator approves.
    ApprovalNamesCaller,
    /// Re-setting an operator flag to its current value flips it.
    ToggleOnRedundantApprovalForAll,
    /// `tokenURI` answers with an empty string for unminted tokens.
    TokenUriOfNonexistentToken,
}

impl Quirk {
    /// Every quirk.
    pub const ALL: [Quirk; 10] = [
        Quirk::KeepApprovalOnTransfer,
        Quirk::EmitApprovalOnTransfer,
        Quirk::SkipReceiverCheck,
        Quirk::SilentApprovalRemoval,
        Quirk::AllowBalanceOfZero,
        Quirk::NoEventOnRedundantApprovalForAll,
        Quirk::BurnWithoutEvent,
        Quirk::ApprovalNamesCaller,
        Quirk::ToggleOnRedundantApprovalForAll,
        Quirk::TokenUriOfNonexistentToken,
    ];
}

/// The reference token with some [`Quirk`]s applied on top.
#[derive(Clone, Debug, Default)]
pub struct QuirkyToken {
    token: ReferenceToken,
    quirks: Vec<Quirk>,
}

impl QuirkyToken {
    /// Wraps `token`, applying `quirks`.
    #[must_use]
    pub fn new(token: ReferenceToken, quirks: &[Quirk]) -> Self {
        Self { token, quirks: quirks.to_vec() }
    }

    fn has(&self, quirk: Quirk) -> bool {
        self.quirks.contains(&quirk)
    }

    fn route_erc721(
        &mut self,
        host: &mut dyn Host,
        calldata: &[u8],
        call: IErc721Calls,
    ) -> Result<Vec<u8>, Vec<u8>> {
        match call {
            IErc721Calls::balanceOf(c)
                if c.owner.is_zero() && self.has(Quirk::AllowBalanceOfZero) =>
            {
                Ok(IErc721::balanceOfCall::abi_encode_returns(&U256::ZERO))
            }
            IErc721Calls::approve(c)
                if c.to.is_zero() && self.has(Quirk::SilentApprovalRemoval) =>
            {
                let auth = host.msg_sender();
                self.token
                    .erc721_mut()
                    ._approve(None, Address::ZERO, c.tokenId, auth)?;
                Ok(Vec::new())
            }
            IErc721Calls::setApprovalForAll(c)
                if self.has(Quirk::NoEventOnRedundantApprovalForAll)
                    && self
                        .token
                        .erc721()
                        .is_approved_for_all(host.msg_sender(), c.operator)
                        == c.approved =>
            {
                Ok(Vec::new())
            }
            IErc721Calls::approve(c)
                if self.has(Quirk::ApprovalNamesCaller) =>
            {
                let auth = host.msg_sender();
                self.token
                    .erc721_mut()
                    ._approve(None, c.to, c.tokenId, auth)?;
                let event = Approval {
                    owner: auth,
                    approved: c.to,
                    tokenId: c.tokenId,
                };
                host::log(host, &event);
                Ok(Vec::new())
            }
            IErc721Calls::setApprovalForAll(c)
                if self.has(Quirk::ToggleOnRedundantApprovalForAll)
                    && self
                        .token
                        .erc721()
                        .is_approved_for_all(host.msg_sender(), c.operator)
                        == c.approved =>
            {
                let output = self.token.route(host, calldata)?;
                let owner = host.msg_sender();
                self.token.erc721_mut()._set_approval_for_all(
                    &mut Muted(host),
                    owner,
                    c.operator,
                    !c.approved,
                )?;
                Ok(output)
            }
            IErc721Calls::transferFrom(c) => {
                self.transfer(host, calldata, c.from, c.tokenId)
            }
            IErc721Calls::safeTransferFrom_0(IErc721::safeTransferFrom_0Call {
                from,
                to,
                tokenId,
            })
            | IErc721Calls::safeTransferFrom_1(IErc721::safeTransferFrom_1Call {
                from,
                to,
                tokenId,
                ..
            }) if self.has(Quirk::SkipReceiverCheck) => {
                let calldata = IErc721::transferFromCall { from, to, tokenId }
                    .abi_encode();
                self.transfer(host, &calldata, from, tokenId)
            }
            IErc721Calls::safeTransferFrom_0(c) => {
                self.transfer(host, calldata, c.from, c.tokenId)
            }
            IErc721Calls::safeTransferFrom_1(c) => {
                self.transfer(host, calldata, c.from, c.tokenId)
            }
            _ => self.token.route(host, calldata),
        }
    }

    fn transfer(
        &mut self,
        host: &mut dyn Host,
        calldata: &[u8],
        from: Address,
        token_id: U256,
    ) -> Result<Vec<u8>, Vec<u8>> {
        let approved = self.token.erc721()._get_approved(token_id);
        let output = self.token.route(host, calldata)?;

        if self.has(Quirk::KeepApprovalOnTransfer) && !approved.is_zero() {
            self.token
                .erc721_mut()
                ._approve(None, approved, token_id, Address::ZERO)?;
        }
        if self.has(Quirk::EmitApprovalOnTransfer) {
            let event = Approval {
                owner: from,
                approved: Address::ZERO,
                tokenId: token_id,
            };
            host::log(host, &event);
        }
        Ok(output)
    }
}

impl Router for QuirkyToken {
    fn route(
        &mut self,
        host: &mut dyn Host,
        calldata: &[u8],
    ) -> Result<Vec<u8>, Vec<u8>> {
        let selector = calldata
            .get(..4)
            .and_then(|selector| <[u8; 4]>::try_from(selector).ok());
        let Some(selector) = selector else {
            return self.token.route(host, calldata);
        };

        if self.has(Quirk::TokenUriOfNonexistentToken) {
            if let Ok(IErc721MetadataCalls::tokenURI(c)) =
                IErc721MetadataCalls::abi_decode(calldata)
            {
                if self.token.erc721()._owner_of(c.tokenId).is_zero() {
                    return Ok(IErc721Metadata::tokenURICall::abi_encode_returns(
                        &String::new(),
                    ));
                }
            }
        }

        if IErc721Calls::valid_selector(selector) {
            if let Ok(call) = IErc721Calls::abi_decode(calldata) {
                return self.route_erc721(host, calldata, call);
            }
        } else if self.has(Quirk::BurnWithoutEvent) {
            if let Ok(IErc721SupplyCalls::burn(_)) =
                IErc721SupplyCalls::abi_decode(calldata)
            {
                return self.token.route(&mut Muted(host), calldata);
            }
        }
        self.token.route(host, calldata)
    }
}

/// Forwards to the wrapped host but drops every emitted log.
struct Muted<'a>(&'a mut dyn Host);

impl Host for Muted<'_> {
    fn msg_sender(&self) -> Address {
        self.0.msg_sender()
    }

    fn emit(&mut self, _log: LogData) {}

    fn has_code(&self, account: Address) -> bool {
        self.0.has_code(account)
    }

    fn call(&mut self, to: Address, calldata: &[u8]) -> Result<Bytes, Bytes> {
        self.0.call(to, calldata)
    }
}
