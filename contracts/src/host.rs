//! Execution environment seen by a contract while it handles a call.
//!
//! A [`Host`] plays the role the EVM plays for a deployed contract: it knows
//! who sent the current message, records emitted logs and performs calls into
//! other accounts. Contracts expose their ABI through [`Router`].

use alloy_primitives::{Address, Bytes, LogData};
use alloy_sol_types::SolEvent;

/// Environment of the currently executing call frame.
pub trait Host {
    /// Account that sent the current message.
    fn msg_sender(&self) -> Address;

    /// Appends a log emitted by the current contract to the transaction's
    /// journal.
    fn emit(&mut self, log: LogData);

    /// Whether `account` has code deployed to it.
    fn has_code(&self, account: Address) -> bool;

    /// Calls `to` with `calldata` on behalf of the current contract.
    ///
    /// # Errors
    ///
    /// Returns the revert data if the callee reverts. Calling an account
    /// without code that does not understand the call reverts with empty
    /// data.
    fn call(&mut self, to: Address, calldata: &[u8]) -> Result<Bytes, Bytes>;
}

/// Emits `event` from the current contract.
pub fn log<E: SolEvent>(host: &mut (impl Host + ?Sized), event: &E) {
    host.emit(event.encode_log_data());
}

/// ABI entry point of a contract.
pub trait Router {
    /// Dispatches `calldata` to the matching public function.
    ///
    /// # Errors
    ///
    /// Returns ABI-encoded revert data when the function fails or when no
    /// function matches the selector.
    fn route(
        &mut self,
        host: &mut dyn Host,
        calldata: &[u8],
    ) -> Result<Vec<u8>, Vec<u8>>;
}
