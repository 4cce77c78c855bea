/*!
# ERC-721 Conformance

A battery of behavioural checks for contracts implementing the [ERC-721]
non-fungible token standard.

The battery talks to the contract under test through a [`Target`], which
performs read-only calls and submits transactions, and obtains a fresh
instance for every case from a [`Fixture`]. Two backends ship with the crate:

- [`devnet::Devnet`] executes the reference token from `erc721-reference`
  in memory, optionally with [`devnet::Quirk`]s that break the standard on
  purpose.
- [`rpc::RpcTarget`] submits real transactions to a node through an `alloy`
  HTTP provider.

```ignore
use std::sync::Arc;

use erc721_conformance::{devnet::DevnetFixture, suite::Suite};

let report = Suite::new("reference").run(Arc::new(DevnetFixture::default())).await;
println!("{report}");
report.ensure_passed()?;
```

[ERC-721]: https://eips.ethereum.org/EIPS/eip-721
*/

pub mod config;
pub mod contract;
pub mod devnet;
mod error;
pub mod event;
pub mod fixture;
pub mod logging;
pub mod receipt;
pub mod rpc;
pub mod suite;
mod target;

pub use contract::Erc721;
pub use error::{expect_revert, Error, Result};
pub use event::{events_in, ReceiptExt};
pub use fixture::{Accounts, Deployment, Fixture, ReceiverKind};
pub use receipt::{Log, Receipt};
pub use target::{Invocation, Target};
