//! Per-case setup of the contract under test.
use std::{fmt, sync::Arc};

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use eyre::bail;

use crate::{contract::Erc721, target::Target};

/// Accounts taking part in every case.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Accounts {
    /// Deployer of the contract and initial owner of minted tokens.
    pub creator: Address,
    /// First test user.
    pub user1: Address,
    /// Second test user.
    pub user2: Address,
    /// Third test user.
    pub user3: Address,
}

/// A fresh instance of the contract under test.
#[derive(Clone)]
pub struct Deployment {
    /// The deployed contract.
    pub target: Arc<dyn Target>,
    /// Accounts that can sign transactions against [`Deployment::target`].
    pub accounts: Accounts,
}

impl Deployment {
    /// Typed handle to the contract.
    #[must_use]
    pub fn token(&self) -> Erc721<'_> {
        Erc721::new(self.target.as_ref())
    }
}

impl fmt::Debug for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deployment")
            .field("address", &self.target.address())
            .field("accounts", &self.accounts)
            .finish()
    }
}

/// Contract deployed as the recipient of a safe transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiverKind {
    /// Implements `onERC721Received` and returns the expected selector.
    Accepting,
    /// Implements `onERC721Received` and reverts.
    Rejecting,
    /// Implements `onERC721Received` and returns some other value.
    WrongSelector,
    /// Has code but no `onERC721Received` at all.
    NonReceiver,
}

/// Produces fresh deployments and drives the non-standard parts of a token
/// contract: minting, burning and the receivers used by safe transfers.
#[async_trait]
pub trait Fixture: Send + Sync {
    /// Deploys a fresh instance of the contract under test.
    ///
    /// # Errors
    ///
    /// Fails if the contract cannot be deployed.
    async fn reset(&self) -> eyre::Result<Deployment>;

    /// Mints a new token to `to` and returns its id.
    ///
    /// # Errors
    ///
    /// Fails if minting reverts.
    async fn mint(
        &self,
        deployment: &Deployment,
        to: Address,
    ) -> eyre::Result<U256>;

    /// Whether [`Fixture::burn`] is available.
    fn supports_burn(&self) -> bool {
        false
    }

    /// Burns `token_id`, signing as its `owner`.
    ///
    /// # Errors
    ///
    /// Fails if burning reverts or is not supported.
    async fn burn(
        &self,
        deployment: &Deployment,
        owner: Address,
        token_id: U256,
    ) -> eyre::Result<()> {
        let _ = (deployment, owner, token_id);
        bail!("burning is not supported by this fixture")
    }

    /// Deploys a recipient contract of the given `kind` and returns its
    /// address.
    ///
    /// # Errors
    ///
    /// Fails if the receiver cannot be deployed.
    async fn deploy_receiver(
        &self,
        deployment: &Deployment,
        kind: ReceiverKind,
    ) -> eyre::Result<Address>;
}
