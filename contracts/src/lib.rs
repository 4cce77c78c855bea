/*!
# ERC-721 Reference

An in-memory reference implementation of the [ERC-721] non-fungible token
standard, together with the [ERC-165] introspection it relies on and the
receiver contracts needed to exercise safe transfers.

The state machine is the oracle the conformance suite is written against: it
is updated only through the standard's transition rules and talks to the
outside world exclusively through a [`host::Host`], which supplies the
message sender, collects emitted events and forwards calls to other
contracts.

```ignore
use erc721_reference::{host::Router, reference::ReferenceToken};

let mut token = ReferenceToken::new("Test Token", "NFT", "https://nft.example/");
let output = token.route(&mut host, &calldata)?;
```

[ERC-721]: https://eips.ethereum.org/EIPS/eip-721
[ERC-165]: https://eips.ethereum.org/EIPS/eip-165
*/

#![allow(clippy::pub_underscore_fields, clippy::module_name_repetitions)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod host;
pub mod mock;
pub mod reference;
pub mod token;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
