//! Decoding of typed events out of receipts and log ranges.
use alloy_primitives::Address;
use alloy_sol_types::SolEvent;

use crate::receipt::{Log, Receipt};

/// Decodes every log of type `E` that `contract` emitted in `logs`.
///
/// Logs of other contracts, and logs of `contract` that are not an `E`, are
/// skipped.
pub fn events_in<E: SolEvent>(logs: &[Log], contract: Address) -> Vec<E> {
    logs.iter()
        .filter(|log| log.address == contract)
        .filter_map(|log| E::decode_log_data(&log.data).ok())
        .collect()
}

/// Extension trait for inspecting the events of a [`Receipt`].
pub trait ReceiptExt {
    /// Events of type `E` emitted by `contract` in this transaction.
    fn events<E: SolEvent>(&self, contract: Address) -> Vec<E>;

    /// Asserts the contract emitted the `expected` event.
    fn emits<E: SolEvent + PartialEq>(
        &self,
        contract: Address,
        expected: &E,
    ) -> bool {
        self.events::<E>(contract).iter().any(|event| event == expected)
    }
}

impl ReceiptExt for Receipt {
    fn events<E: SolEvent>(&self, contract: Address) -> Vec<E> {
        events_in(&self.logs, contract)
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, uint, Address};
    use alloy_sol_types::SolEvent;
    use erc721_reference::token::erc721::{Approval, Transfer};

    use super::{events_in, ReceiptExt};
    use crate::receipt::{Log, Receipt};

    const TOKEN: Address = address!("C0FFEE254729296a45a3885639AC7E10F9d54979");
    const OTHER: Address = address!("5eC5fAbB4a8eD6e3C79f32C71D8e5A1FE8b1d3c0");
    const ALICE: Address = address!("A11CEacF9aa32246d767FCCD72e02d6bCbcC375d");

    fn log(address: Address, event: &impl SolEvent) -> Log {
        Log { address, block_number: 1, data: event.encode_log_data() }
    }

    #[test]
    fn decodes_events_of_the_given_contract_only() {
        let transfer =
            Transfer { from: Address::ZERO, to: ALICE, tokenId: uint!(1_U256) };
        let approval =
            Approval { owner: ALICE, approved: OTHER, tokenId: uint!(1_U256) };
        let receipt = Receipt {
            block_number: 1,
            logs: vec![
                log(TOKEN, &transfer),
                log(OTHER, &transfer),
                log(TOKEN, &approval),
            ],
        };

        assert_eq!(receipt.events::<Transfer>(TOKEN), vec![transfer.clone()]);
        assert_eq!(receipt.events::<Approval>(TOKEN), vec![approval.clone()]);
        assert!(receipt.emits(TOKEN, &approval));
        assert!(!receipt.emits(OTHER, &approval));
        assert_eq!(events_in::<Transfer>(&receipt.logs, OTHER).len(), 1);
    }
}
