//! Property tests of the [`Erc721`] state machine.

use alloy_primitives::{Address, U256};
use proptest::{collection::vec, prelude::*, prop_oneof};

use super::{Erc721, IErc721};
use crate::{
    test_utils::TestHost,
    token::erc721::extensions::IErc721Burnable,
};

const ACCOUNTS: [Address; 4] = [
    Address::repeat_byte(0x11),
    Address::repeat_byte(0x22),
    Address::repeat_byte(0x33),
    Address::repeat_byte(0x44),
];

#[derive(Clone, Debug)]
enum Op {
    Mint { to: usize, id: u8 },
    Burn { sender: usize, id: u8 },
    Transfer { sender: usize, from: usize, to: usize, id: u8 },
    Approve { sender: usize, to: Option<usize>, id: u8 },
    SetApprovalForAll { sender: usize, operator: usize, approved: bool },
}

fn op() -> impl Strategy<Value = Op> {
    let account = 0..ACCOUNTS.len();
    let id = 0u8..6;
    prop_oneof![
        (account.clone(), id.clone()).prop_map(|(to, id)| Op::Mint { to, id }),
        (account.clone(), id.clone())
            .prop_map(|(sender, id)| Op::Burn { sender, id }),
        (account.clone(), account.clone(), account.clone(), id.clone())
            .prop_map(|(sender, from, to, id)| Op::Transfer {
                sender,
                from,
                to,
                id
            }),
        (account.clone(), proptest::option::of(account.clone()), id)
            .prop_map(|(sender, to, id)| Op::Approve { sender, to, id }),
        (account.clone(), account, any::<bool>()).prop_map(
            |(sender, operator, approved)| Op::SetApprovalForAll {
                sender,
                operator,
                approved
            }
        ),
    ]
}

/// Applies `op` atomically: the state is left untouched when it fails.
fn apply(contract: &mut Erc721, op: &Op) -> bool {
    let mut next = contract.clone();
    let result = match *op {
        Op::Mint { to, id } => {
            let mut host = TestHost::new(ACCOUNTS[to]);
            next._mint(&mut host, ACCOUNTS[to], U256::from(id))
        }
        Op::Burn { sender, id } => {
            let mut host = TestHost::new(ACCOUNTS[sender]);
            next.burn(&mut host, U256::from(id))
        }
        Op::Transfer { sender, from, to, id } => {
            let mut host = TestHost::new(ACCOUNTS[sender]);
            next.transfer_from(
                &mut host,
                ACCOUNTS[from],
                ACCOUNTS[to],
                U256::from(id),
            )
        }
        Op::Approve { sender, to, id } => {
            let mut host = TestHost::new(ACCOUNTS[sender]);
            let to = to.map_or(Address::ZERO, |to| ACCOUNTS[to]);
            next.approve(&mut host, to, U256::from(id))
        }
        Op::SetApprovalForAll { sender, operator, approved } => {
            let mut host = TestHost::new(ACCOUNTS[sender]);
            next.set_approval_for_all(&mut host, ACCOUNTS[operator], approved)
        }
    };

    if result.is_ok() {
        *contract = next;
    }
    result.is_ok()
}

fn operator_flags(contract: &Erc721) -> Vec<bool> {
    ACCOUNTS
        .iter()
        .flat_map(|owner| {
            ACCOUNTS
                .iter()
                .map(|operator| contract.is_approved_for_all(*owner, *operator))
        })
        .collect()
}

proptest! {
    #[test]
    fn balances_add_up_to_existing_tokens(ops in vec(op(), 0..64)) {
        let mut contract = Erc721::default();
        for op in &ops {
            apply(&mut contract, op);

            let mut total = U256::ZERO;
            for account in ACCOUNTS {
                let balance = contract
                    .balance_of(account)
                    .expect("should return balance");
                let owned = (0u8..6)
                    .filter(|id| contract._owner_of(U256::from(*id)) == account)
                    .count();
                prop_assert_eq!(balance, U256::from(owned));
                total += balance;
            }
            prop_assert_eq!(total, U256::from(contract.owners.len()));
            prop_assert!(
                contract.owners.values().all(|owner| !owner.is_zero())
            );
        }
    }

    #[test]
    fn transfers_clear_approval_and_keep_operators(ops in vec(op(), 0..64)) {
        let mut contract = Erc721::default();
        for op in &ops {
            let flags = operator_flags(&contract);
            let applied = apply(&mut contract, op);

            match *op {
                Op::Transfer { to, id, .. } if applied => {
                    let id = U256::from(id);
                    prop_assert_eq!(contract._get_approved(id), Address::ZERO);
                    prop_assert_eq!(contract._owner_of(id), ACCOUNTS[to]);
                    prop_assert_eq!(operator_flags(&contract), flags);
                }
                Op::Mint { .. } | Op::Burn { .. } | Op::Approve { .. } => {
                    prop_assert_eq!(operator_flags(&contract), flags);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn only_authorized_accounts_transfer(
        ops in vec(op(), 0..32),
        sender in 0..ACCOUNTS.len(),
        to in 0..ACCOUNTS.len(),
        id in 0u8..6,
    ) {
        let mut contract = Erc721::default();
        for op in &ops {
            apply(&mut contract, op);
        }

        let token_id = U256::from(id);
        let owner = contract._owner_of(token_id);
        let authorized =
            contract._is_authorized(owner, ACCOUNTS[sender], token_id);
        let from = ACCOUNTS.iter().position(|a| *a == owner).unwrap_or(0);
        let applied =
            apply(&mut contract, &Op::Transfer { sender, from, to, id });
        prop_assert_eq!(applied, authorized && !owner.is_zero());
    }
}
