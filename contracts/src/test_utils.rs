//! Unit-testing utilities for the reference contracts.
use std::collections::HashMap;

use alloy_primitives::{address, Address, Bytes, LogData};
use alloy_sol_types::SolEvent;

use crate::host::{Host, Router};

/// Address the contract under test is assumed to be deployed at.
pub(crate) const CONTRACT: Address =
    address!("C0FFEE254729296a45a3885639AC7E10F9d54979");

/// A single-frame [`Host`] that records logs and routes calls to contracts
/// registered with [`TestHost::deploy`].
pub(crate) struct TestHost {
    pub(crate) sender: Address,
    pub(crate) address: Address,
    pub(crate) logs: Vec<LogData>,
    contracts: HashMap<Address, Box<dyn Router>>,
}

impl TestHost {
    /// Creates a host where `sender` calls [`CONTRACT`].
    pub(crate) fn new(sender: Address) -> Self {
        Self {
            sender,
            address: CONTRACT,
            logs: Vec::new(),
            contracts: HashMap::new(),
        }
    }

    /// Places `contract` at `at`.
    pub(crate) fn deploy(
        &mut self,
        at: Address,
        contract: impl Router + 'static,
    ) {
        self.contracts.insert(at, Box::new(contract));
    }

    /// Decodes every recorded log of type `E`.
    pub(crate) fn events<E: SolEvent>(&self) -> Vec<E> {
        self.logs
            .iter()
            .filter_map(|log| E::decode_log_data(log).ok())
            .collect()
    }
}

impl Host for TestHost {
    fn msg_sender(&self) -> Address {
        self.sender
    }

    fn emit(&mut self, log: LogData) {
        self.logs.push(log);
    }

    fn has_code(&self, account: Address) -> bool {
        self.contracts.contains_key(&account)
    }

    fn call(&mut self, to: Address, calldata: &[u8]) -> Result<Bytes, Bytes> {
        let Some(mut contract) = self.contracts.remove(&to) else {
            return Err(Bytes::new());
        };

        let mut frame = TestHost {
            sender: self.address,
            address: to,
            logs: Vec::new(),
            contracts: std::mem::take(&mut self.contracts),
        };
        let result = contract.route(&mut frame, calldata);

        self.contracts = frame.contracts;
        self.contracts.insert(to, contract);
        if result.is_ok() {
            self.logs.extend(frame.logs);
        }
        result.map(Bytes::from).map_err(Bytes::from)
    }
}
