//! Contracts used to exercise safe transfers.
pub mod receiver;

pub use receiver::{Behaviour, Erc721ReceiverMock, NonReceiver};
