use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;

use crate::{
    receipt::{Log, Receipt},
    Result,
};

/// How a function of the contract under test is invoked.
///
/// Queries are exercised both ways because the standard requires them to
/// fail for invalid arguments whichever way they are invoked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Invocation {
    /// A read-only `eth_call`.
    Call,
    /// A transaction mined into a block.
    Transaction,
}

impl Invocation {
    /// Both invocation forms.
    pub const ALL: [Invocation; 2] =
        [Invocation::Call, Invocation::Transaction];
}

/// A deployed contract the battery can talk to.
#[async_trait]
pub trait Target: Send + Sync {
    /// Address of the contract.
    fn address(&self) -> Address;

    /// Executes `calldata` against the contract as `from` without changing
    /// state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Revert`] if the contract reverts.
    async fn call(&self, from: Address, calldata: Bytes) -> Result<Bytes>;

    /// Sends `calldata` to the contract in a transaction signed by `from` and
    /// waits until it is mined.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Revert`] if the transaction reverts.
    async fn send(&self, from: Address, calldata: Bytes) -> Result<Receipt>;

    /// Number of the most recent block.
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot be reached.
    async fn block_number(&self) -> Result<u64>;

    /// Logs emitted by any contract from `from_block` onwards, in order.
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot be reached.
    async fn logs(&self, from_block: u64) -> Result<Vec<Log>>;
}
