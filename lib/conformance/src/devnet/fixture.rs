use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use alloy_primitives::{address, Address, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use erc721_reference::{
    mock::{Behaviour, Erc721ReceiverMock, NonReceiver},
    reference::ReferenceToken,
    token::erc721::abi::IErc721Supply,
};

use super::{Devnet, DevnetTarget, Quirk, QuirkyToken};
use crate::fixture::{Accounts, Deployment, Fixture, ReceiverKind};

/// Accounts of every [`DevnetFixture`] deployment.
pub const DEVNET_ACCOUNTS: Accounts = Accounts {
    creator: address!("C4EA70A2a1C0D0a1C0a8B3e2A9D1d5F0b2c3e4f5"),
    user1: address!("0000000000000000000000000000000000007E01"),
    user2: address!("0000000000000000000000000000000000007E02"),
    user3: address!("0000000000000000000000000000000000007E03"),
};

/// Deploys a fresh reference token, optionally with [`Quirk`]s, on a shared
/// [`Devnet`] for every case.
///
/// Token ids are handed out sequentially starting from one.
#[derive(Debug)]
pub struct DevnetFixture {
    devnet: Arc<Devnet>,
    quirks: Vec<Quirk>,
    next_token_id: AtomicU64,
}

impl Default for DevnetFixture {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl DevnetFixture {
    /// A fixture deploying the reference token with `quirks` applied.
    #[must_use]
    pub fn new(quirks: &[Quirk]) -> Self {
        Self {
            devnet: Arc::new(Devnet::new()),
            quirks: quirks.to_vec(),
            next_token_id: AtomicU64::new(1),
        }
    }

    /// The chain deployments live on.
    #[must_use]
    pub fn devnet(&self) -> &Arc<Devnet> {
        &self.devnet
    }
}

#[async_trait]
impl Fixture for DevnetFixture {
    async fn reset(&self) -> eyre::Result<Deployment> {
        let token = QuirkyToken::new(ReferenceToken::default(), &self.quirks);
        let address = self.devnet.deploy(token).await;
        tracing::debug!(%address, quirks = ?self.quirks, "deployed token");

        let target = DevnetTarget::new(Arc::clone(&self.devnet), address);
        Ok(Deployment {
            target: Arc::new(target),
            accounts: DEVNET_ACCOUNTS,
        })
    }

    async fn mint(
        &self,
        deployment: &Deployment,
        to: Address,
    ) -> eyre::Result<U256> {
        let token_id =
            U256::from(self.next_token_id.fetch_add(1, Ordering::Relaxed));
        let call = IErc721Supply::mintCall { to, tokenId: token_id };
        deployment
            .target
            .send(deployment.accounts.creator, call.abi_encode().into())
            .await?;
        Ok(token_id)
    }

    fn supports_burn(&self) -> bool {
        true
    }

    async fn burn(
        &self,
        deployment: &Deployment,
        owner: Address,
        token_id: U256,
    ) -> eyre::Result<()> {
        let call = IErc721Supply::burnCall { tokenId: token_id };
        deployment.target.send(owner, call.abi_encode().into()).await?;
        Ok(())
    }

    async fn deploy_receiver(
        &self,
        _deployment: &Deployment,
        kind: ReceiverKind,
    ) -> eyre::Result<Address> {
        let address = match kind {
            ReceiverKind::Accepting => {
                self.devnet
                    .deploy(Erc721ReceiverMock::new(Behaviour::Accept))
                    .await
            }
            ReceiverKind::Rejecting => {
                self.devnet
                    .deploy(Erc721ReceiverMock::new(Behaviour::Reject))
                    .await
            }
            ReceiverKind::WrongSelector => {
                self.devnet
                    .deploy(Erc721ReceiverMock::new(Behaviour::WrongSelector))
                    .await
            }
            ReceiverKind::NonReceiver => self.devnet.deploy(NonReceiver).await,
        };
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;

    use super::{DevnetFixture, DEVNET_ACCOUNTS};
    use crate::{Fixture, ReceiverKind};

    #[tokio::test]
    async fn deployments_are_independent() {
        let fixture = DevnetFixture::default();
        let first = fixture.reset().await.expect("should deploy");
        let token_id = fixture
            .mint(&first, DEVNET_ACCOUNTS.user1)
            .await
            .expect("should mint");

        let second = fixture.reset().await.expect("should deploy");

        assert_ne!(first.target.address(), second.target.address());
        let owner = first.token().owner_of(token_id).await.expect("should own");
        assert_eq!(owner, DEVNET_ACCOUNTS.user1);
        assert_eq!(
            second
                .token()
                .balance_of(DEVNET_ACCOUNTS.user1)
                .await
                .expect("should query the balance"),
            U256::ZERO
        );
    }

    #[tokio::test]
    async fn hands_out_sequential_token_ids() {
        let fixture = DevnetFixture::default();
        let deployment = fixture.reset().await.expect("should deploy");

        let first = fixture
            .mint(&deployment, DEVNET_ACCOUNTS.creator)
            .await
            .expect("should mint");
        let second = fixture
            .mint(&deployment, DEVNET_ACCOUNTS.creator)
            .await
            .expect("should mint");

        assert_eq!(second, first + U256::from(1));
    }

    #[tokio::test]
    async fn receivers_get_distinct_addresses() {
        let fixture = DevnetFixture::default();
        let deployment = fixture.reset().await.expect("should deploy");

        let accepting = fixture
            .deploy_receiver(&deployment, ReceiverKind::Accepting)
            .await
            .expect("should deploy");
        let rejecting = fixture
            .deploy_receiver(&deployment, ReceiverKind::Rejecting)
            .await
            .expect("should deploy");

        assert_ne!(accepting, rejecting);
        assert_ne!(accepting, deployment.target.address());
    }
}
