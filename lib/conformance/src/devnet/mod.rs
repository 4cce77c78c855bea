//! An in-memory chain executing contracts from `erc721-reference`.
//!
//! Every call frame snapshots its callee on entry and restores the snapshots
//! taken in its subtree when it reverts, so a reverted transaction leaves no
//! trace besides the mined block. Each transaction is mined in its own block.
use std::collections::{HashMap, HashSet};

use alloy_primitives::{Address, Bytes, LogData};
use async_trait::async_trait;
use erc721_reference::host::{Host, Router};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    receipt::{Log, Receipt},
    target::Target,
    Error, Result,
};

mod fixture;
mod quirk;

pub use fixture::{DevnetFixture, DEVNET_ACCOUNTS};
pub use quirk::{Quirk, QuirkyToken};

/// First address handed out by [`Devnet::deploy`].
const FIRST_CONTRACT: u64 = 0xC0DE_0000;

/// A contract that can live on a [`Devnet`].
///
/// Implemented for every cloneable [`Router`].
pub trait Contract: Router + Send {
    /// Copies the contract together with its state.
    fn clone_box(&self) -> Box<dyn Contract>;
}

impl<T: Router + Clone + Send + 'static> Contract for T {
    fn clone_box(&self) -> Box<dyn Contract> {
        Box::new(self.clone())
    }
}

type State = HashMap<Address, Box<dyn Contract>>;

/// Contracts as they were before a frame entered them, oldest first.
type Journal = Vec<(Address, Box<dyn Contract>)>;

#[derive(Default)]
struct Chain {
    contracts: State,
    code: HashSet<Address>,
    block_number: u64,
    logs: Vec<Log>,
    deployed: u64,
}

/// In-memory chain.
#[derive(Default)]
pub struct Devnet {
    chain: Mutex<Chain>,
}

impl std::fmt::Debug for Devnet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Devnet").finish_non_exhaustive()
    }
}

impl Devnet {
    /// Creates an empty chain at block zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `contract` at a fresh address and returns it.
    pub async fn deploy(&self, contract: impl Contract + 'static) -> Address {
        let mut chain = self.chain.lock().await;
        let address = Address::left_padding_from(
            &(FIRST_CONTRACT + chain.deployed).to_be_bytes(),
        );
        chain.deployed += 1;
        chain.contracts.insert(address, Box::new(contract));
        chain.code.insert(address);
        debug!(%address, "deployed contract");
        address
    }

    /// Executes `calldata` against `to` as `from` and discards every change.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Revert`] if the call reverts.
    pub async fn call(
        &self,
        from: Address,
        to: Address,
        calldata: &[u8],
    ) -> Result<Bytes> {
        let mut guard = self.chain.lock().await;
        let chain = &mut *guard;
        let (result, _, journal) =
            execute(&mut chain.contracts, &chain.code, from, to, calldata);
        rollback(&mut chain.contracts, journal);
        result.map_err(Error::Revert)
    }

    /// Executes `calldata` against `to` in a transaction sent by `from` and
    /// mines it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Revert`] if the transaction reverts, in which case
    /// the state is left untouched.
    pub async fn transact(
        &self,
        from: Address,
        to: Address,
        calldata: &[u8],
    ) -> Result<Receipt> {
        let mut guard = self.chain.lock().await;
        let chain = &mut *guard;
        chain.block_number += 1;
        let block_number = chain.block_number;

        let (result, logs, _) =
            execute(&mut chain.contracts, &chain.code, from, to, calldata);
        if let Err(data) = result {
            debug!(
                %from,
                %to,
                block_number,
                revert = %data,
                "transaction reverted"
            );
            return Err(Error::Revert(data));
        }

        let logs: Vec<_> = logs
            .into_iter()
            .map(|(address, data)| Log { address, block_number, data })
            .collect();
        chain.logs.extend(logs.iter().cloned());
        debug!(
            %from,
            %to,
            block_number,
            logs = logs.len(),
            "transaction mined"
        );
        Ok(Receipt { block_number, logs })
    }

    /// Number of the most recent block.
    pub async fn block_number(&self) -> u64 {
        self.chain.lock().await.block_number
    }

    /// Logs mined from `from_block` onwards.
    pub async fn logs(&self, from_block: u64) -> Vec<Log> {
        let chain = self.chain.lock().await;
        chain
            .logs
            .iter()
            .filter(|log| log.block_number >= from_block)
            .cloned()
            .collect()
    }
}

/// Runs a message from the externally owned account `from` to `to`.
///
/// A revert has already been rolled back on return. The journal holds the
/// state before every contract the message entered.
fn execute(
    state: &mut State,
    code: &HashSet<Address>,
    from: Address,
    to: Address,
    calldata: &[u8],
) -> (std::result::Result<Bytes, Bytes>, Vec<(Address, LogData)>, Journal) {
    let mut journal = Journal::new();
    let mut origin = Frame {
        sender: Address::ZERO,
        address: from,
        contracts: state,
        code,
        journal: &mut journal,
        logs: Vec::new(),
    };
    let result = origin.call(to, calldata);
    let logs = origin.logs;
    (result, logs, journal)
}

/// Restores `journal`, newest entry first, so that every contract ends up as
/// it was before it was first entered.
fn rollback(state: &mut State, journal: Journal) {
    for (address, snapshot) in journal.into_iter().rev() {
        state.insert(address, snapshot);
    }
}

/// A call frame.
///
/// The executing contract is taken out of `contracts` for the duration of the
/// frame, so it cannot be re-entered.
struct Frame<'a> {
    sender: Address,
    address: Address,
    contracts: &'a mut State,
    code: &'a HashSet<Address>,
    journal: &'a mut Journal,
    logs: Vec<(Address, LogData)>,
}

impl Host for Frame<'_> {
    fn msg_sender(&self) -> Address {
        self.sender
    }

    fn emit(&mut self, log: LogData) {
        self.logs.push((self.address, log));
    }

    fn has_code(&self, account: Address) -> bool {
        self.code.contains(&account)
    }

    fn call(
        &mut self,
        to: Address,
        calldata: &[u8],
    ) -> std::result::Result<Bytes, Bytes> {
        let Some(mut contract) = self.contracts.remove(&to) else {
            return Err(Bytes::new());
        };
        let mark = self.journal.len();
        self.journal.push((to, contract.clone_box()));

        let mut frame = Frame {
            sender: self.address,
            address: to,
            contracts: &mut *self.contracts,
            code: self.code,
            journal: &mut *self.journal,
            logs: Vec::new(),
        };
        let result = contract.route(&mut frame, calldata);
        let logs = frame.logs;

        self.contracts.insert(to, contract);
        match result {
            Ok(output) => {
                self.logs.extend(logs);
                Ok(output.into())
            }
            Err(data) => {
                let journal = self.journal.drain(mark..).collect();
                rollback(self.contracts, journal);
                Err(data.into())
            }
        }
    }
}

/// A contract deployed on a [`Devnet`].
#[derive(Clone, Debug)]
pub struct DevnetTarget {
    devnet: std::sync::Arc<Devnet>,
    address: Address,
}

impl DevnetTarget {
    /// The contract at `address` on `devnet`.
    #[must_use]
    pub fn new(devnet: std::sync::Arc<Devnet>, address: Address) -> Self {
        Self { devnet, address }
    }

    /// The chain the contract lives on.
    #[must_use]
    pub fn devnet(&self) -> &Devnet {
        &self.devnet
    }
}

#[async_trait]
impl Target for DevnetTarget {
    fn address(&self) -> Address {
        self.address
    }

    async fn call(&self, from: Address, calldata: Bytes) -> Result<Bytes> {
        self.devnet.call(from, self.address, &calldata).await
    }

    async fn send(&self, from: Address, calldata: Bytes) -> Result<Receipt> {
        self.devnet.transact(from, self.address, &calldata).await
    }

    async fn block_number(&self) -> Result<u64> {
        Ok(self.devnet.block_number().await)
    }

    async fn logs(&self, from_block: u64) -> Result<Vec<Log>> {
        Ok(self.devnet.logs(from_block).await)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy_primitives::{address, uint, Address, U256};
    use alloy_sol_types::SolCall;
    use erc721_reference::{
        host::{Host, Router},
        mock::{receiver::Received, Behaviour, Erc721ReceiverMock},
        reference::ReferenceToken,
        token::erc721::{
            abi::{IErc721, IErc721Supply},
            Transfer,
        },
    };

    use super::{Devnet, DevnetTarget};
    use crate::{events_in, expect_revert, ReceiptExt, Target};

    const ALICE: Address = address!("A11CEacF9aa32246d767FCCD72e02d6bCbcC375d");
    const BOB: Address = address!("B0B0cB49ec2e96DF5F5fFB081acaE66A2cBBc2e2");
    const TOKEN_ID: U256 = uint!(1_U256);

    /// Forwards its calldata to `target` and succeeds whatever the outcome.
    #[derive(Clone)]
    struct Forwarder {
        target: Address,
    }

    impl Router for Forwarder {
        fn route(
            &mut self,
            host: &mut dyn Host,
            calldata: &[u8],
        ) -> Result<Vec<u8>, Vec<u8>> {
            let _ = host.call(self.target, calldata);
            Ok(Vec::new())
        }
    }

    async fn token() -> DevnetTarget {
        let devnet = Arc::new(Devnet::new());
        let address = devnet.deploy(ReferenceToken::default()).await;
        DevnetTarget::new(devnet, address)
    }

    async fn mint(target: &DevnetTarget, to: Address) {
        let calldata =
            IErc721Supply::mintCall { to, tokenId: TOKEN_ID }.abi_encode();
        target.send(ALICE, calldata.into()).await.expect("should mint");
    }

    #[tokio::test]
    async fn mines_one_block_per_transaction() {
        let target = token().await;
        assert_eq!(target.block_number().await.expect("should query"), 0);

        mint(&target, ALICE).await;

        assert_eq!(target.block_number().await.expect("should query"), 1);
        let logs = target.logs(1).await.expect("should query");
        assert_eq!(
            events_in::<Transfer>(&logs, target.address()),
            vec![Transfer { from: Address::ZERO, to: ALICE, tokenId: TOKEN_ID }]
        );
        assert!(target.logs(2).await.expect("should query").is_empty());
    }

    #[tokio::test]
    async fn reverted_transaction_leaves_no_trace() {
        let target = token().await;
        mint(&target, ALICE).await;
        let receiver = target
            .devnet()
            .deploy(Erc721ReceiverMock::new(Behaviour::Reject))
            .await;

        let calldata = IErc721::safeTransferFrom_0Call {
            from: ALICE,
            to: receiver,
            tokenId: TOKEN_ID,
        }
        .abi_encode();
        expect_revert(target.send(ALICE, calldata.into()))
            .await
            .expect("should revert");

        let query = IErc721::ownerOfCall { tokenId: TOKEN_ID };
        let owner = target
            .call(ALICE, query.abi_encode().into())
            .await
            .expect("should query the owner");
        let owner = IErc721::ownerOfCall::abi_decode_returns(&owner)
            .expect("should decode the owner");
        assert_eq!(owner, ALICE);
        assert_eq!(target.logs(2).await.expect("should query").len(), 0);
    }

    #[tokio::test]
    async fn keeps_logs_of_nested_calls() {
        let target = token().await;
        mint(&target, ALICE).await;
        let receiver = target
            .devnet()
            .deploy(Erc721ReceiverMock::new(Behaviour::Accept))
            .await;

        let calldata = IErc721::safeTransferFrom_0Call {
            from: ALICE,
            to: receiver,
            tokenId: TOKEN_ID,
        }
        .abi_encode();
        let receipt =
            target.send(ALICE, calldata.into()).await.expect("should transfer");

        assert!(receipt.emits(
            target.address(),
            &Transfer { from: ALICE, to: receiver, tokenId: TOKEN_ID }
        ));
        assert_eq!(receipt.events::<Received>(receiver).len(), 1);
    }

    #[tokio::test]
    async fn calls_do_not_change_state() {
        let target = token().await;
        let mint = IErc721Supply::mintCall { to: BOB, tokenId: TOKEN_ID };
        let calldata = mint.abi_encode();

        target.call(ALICE, calldata.into()).await.expect("should simulate");

        let calldata = IErc721::ownerOfCall { tokenId: TOKEN_ID }.abi_encode();
        expect_revert(target.call(ALICE, calldata.into()))
            .await
            .expect("should not have minted");
        assert_eq!(target.block_number().await.expect("should query"), 0);
    }

    #[tokio::test]
    async fn reverted_nested_call_is_rolled_back() {
        let target = token().await;
        let forwarder = target
            .devnet()
            .deploy(Forwarder { target: target.address() })
            .await;
        mint(&target, forwarder).await;
        let receiver = target
            .devnet()
            .deploy(Erc721ReceiverMock::new(Behaviour::Reject))
            .await;

        let calldata = IErc721::safeTransferFrom_0Call {
            from: forwarder,
            to: receiver,
            tokenId: TOKEN_ID,
        }
        .abi_encode();
        let receipt = target
            .devnet()
            .transact(ALICE, forwarder, &calldata)
            .await
            .expect("forwarder should swallow the revert");

        assert!(receipt.events::<Transfer>(target.address()).is_empty());
        let query = IErc721::ownerOfCall { tokenId: TOKEN_ID };
        let owner = target
            .call(ALICE, query.abi_encode().into())
            .await
            .expect("should query the owner");
        let owner = IErc721::ownerOfCall::abi_decode_returns(&owner)
            .expect("should decode the owner");
        assert_eq!(owner, forwarder);
    }
}
