use std::{path::Path, sync::Arc};

use alloy::{
    hex,
    network::TransactionBuilder,
    primitives::{Address, Bytes, U256},
    providers::DynProvider,
    rpc::types::TransactionRequest,
    sol_types::SolCall,
};
use async_trait::async_trait;
use erc721_reference::{mock::Behaviour, token::erc721::abi::IErc721Supply};
use eyre::{eyre, WrapErr};
use tracing::info;

use super::{connect, submit, RpcTarget};
use crate::{
    config::Config,
    fixture::{Accounts, Deployment, Fixture, ReceiverKind},
};

/// Deploys the token under test from its creation code for every case.
///
/// Tokens are minted through `mint(address,uint256)` with random ids and
/// burned through `burn(uint256)`.
#[derive(Clone, Debug)]
pub struct RpcFixture {
    provider: DynProvider,
    accounts: Accounts,
    erc721_code: Bytes,
    receiver_code: Bytes,
    non_receiver_code: Bytes,
    supports_burn: bool,
}

impl RpcFixture {
    /// Connects to the node and loads the creation code named by `config`.
    ///
    /// # Errors
    ///
    /// Fails if the node URL is invalid or a bytecode file cannot be read.
    pub async fn from_config(config: &Config) -> eyre::Result<Self> {
        let signers = &config.signers;
        let accounts = Accounts {
            creator: signers.creator.address(),
            user1: signers.user1.address(),
            user2: signers.user2.address(),
            user3: signers.user3.address(),
        };
        let provider = connect(
            &config.rpc_url,
            [
                signers.creator.clone(),
                signers.user1.clone(),
                signers.user2.clone(),
                signers.user3.clone(),
            ],
        )?;

        Ok(Self {
            provider,
            accounts,
            erc721_code: read_bytecode(&config.erc721_bytecode).await?,
            receiver_code: read_bytecode(&config.receiver_bytecode).await?,
            non_receiver_code: read_bytecode(&config.non_receiver_bytecode)
                .await?,
            supports_burn: config.supports_burn,
        })
    }

    /// Deploys `code` from the creator account.
    async fn deploy(&self, code: Bytes) -> eyre::Result<Address> {
        let tx = TransactionRequest::default()
            .with_from(self.accounts.creator)
            .with_deploy_code(code);
        let receipt =
            submit(&self.provider, tx).await.wrap_err("deploy contract")?;
        receipt.contract_address.ok_or_else(|| {
            eyre!(
                "receipt of {} has no contract address",
                receipt.transaction_hash
            )
        })
    }
}

/// Reads hex-encoded creation code, with or without a `0x` prefix.
async fn read_bytecode(path: &Path) -> eyre::Result<Bytes> {
    let text = tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("Read bytecode from {}", path.display()))?;
    let code = hex::decode(text.trim())
        .wrap_err_with(|| format!("Decode bytecode in {}", path.display()))?;
    Ok(code.into())
}

/// A random id above every id the battery uses for nonexistent tokens.
fn random_token_id() -> U256 {
    let num: u64 = rand::random();
    U256::from(num | (1 << 63))
}

#[async_trait]
impl Fixture for RpcFixture {
    async fn reset(&self) -> eyre::Result<Deployment> {
        let address = self.deploy(self.erc721_code.clone()).await?;
        info!(%address, "deployed token under test");

        Ok(Deployment {
            target: Arc::new(RpcTarget::new(self.provider.clone(), address)),
            accounts: self.accounts,
        })
    }

    async fn mint(
        &self,
        deployment: &Deployment,
        to: Address,
    ) -> eyre::Result<U256> {
        let token_id = random_token_id();
        let call = IErc721Supply::mintCall { to, tokenId: token_id };
        deployment
            .target
            .send(self.accounts.creator, call.abi_encode().into())
            .await
            .wrap_err_with(|| format!("mint token {token_id} to {to}"))?;
        Ok(token_id)
    }

    fn supports_burn(&self) -> bool {
        self.supports_burn
    }

    async fn burn(
        &self,
        deployment: &Deployment,
        owner: Address,
        token_id: U256,
    ) -> eyre::Result<()> {
        let call = IErc721Supply::burnCall { tokenId: token_id };
        deployment
            .target
            .send(owner, call.abi_encode().into())
            .await
            .wrap_err_with(|| format!("burn token {token_id}"))?;
        Ok(())
    }

    async fn deploy_receiver(
        &self,
        _deployment: &Deployment,
        kind: ReceiverKind,
    ) -> eyre::Result<Address> {
        let behaviour = match kind {
            ReceiverKind::Accepting => Behaviour::Accept,
            ReceiverKind::Rejecting => Behaviour::Reject,
            ReceiverKind::WrongSelector => Behaviour::WrongSelector,
            ReceiverKind::NonReceiver => {
                return self.deploy(self.non_receiver_code.clone()).await;
            }
        };

        // The mock takes its behaviour as a single `uint8` constructor
        // argument.
        let argument = U256::from(u8::from(behaviour)).to_be_bytes::<32>();
        let code = [self.receiver_code.as_ref(), &argument[..]].concat();
        self.deploy(code.into()).await
    }
}
