//! Backend-independent transaction receipts.
use alloy_primitives::{Address, LogData};

/// A log entry appended by a mined transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Log {
    /// Contract that emitted the log.
    pub address: Address,
    /// Block the emitting transaction was mined in.
    pub block_number: u64,
    /// Topics and data of the log.
    pub data: LogData,
}

/// Receipt of a successfully mined transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Receipt {
    /// Block the transaction was mined in.
    pub block_number: u64,
    /// Logs emitted by the transaction, in order.
    pub logs: Vec<Log>,
}
