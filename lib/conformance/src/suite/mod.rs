//! The conformance battery.
//!
//! Cases are grouped the way the standard groups behaviour. Every case runs
//! against a fresh [`Deployment`] on which three tokens were minted to
//! [`Accounts::creator`].
use std::{fmt, sync::Arc};

use alloy_primitives::{Address, Bytes, U256};
use eyre::{bail, ensure};
use futures::future::BoxFuture;
use hex_literal::hex;
use tracing::{info, info_span, warn, Instrument};

use crate::{
    contract::{Erc721, Payload},
    fixture::{Accounts, Deployment, Fixture, ReceiverKind},
    target::Target,
};

mod approval_for_all;
mod approvals;
mod balance;
mod burning;
mod invalid_token;
mod metadata;
mod minting;
mod report;
mod safe_transfers;
mod supports_interface;
mod transfers;

pub use report::{CaseReport, Outcome, Report};

/// Payload of the `safeTransferFrom` group that passes non-empty `data`.
pub const SAFE_TRANSFER_DATA: [u8; 5] = hex!("ff56fe3422");

/// Number of tokens minted to the creator before each case.
pub const MINTED_TOKENS: usize = 3;

/// Body of a case.
pub(crate) type CaseFn = for<'a> fn(&'a Ctx) -> BoxFuture<'a, eyre::Result<()>>;

/// Turns an `async fn(&Ctx) -> eyre::Result<()>` into a [`Case`] named after
/// the function.
macro_rules! case {
    ($f:ident) => {{
        fn run(
            ctx: &$crate::suite::Ctx,
        ) -> ::futures::future::BoxFuture<'_, ::eyre::Result<()>> {
            ::futures::FutureExt::boxed($f(ctx))
        }
        $crate::suite::Case::new(stringify!($f), run)
    }};
}
pub(crate) use case;

/// A single named check.
#[derive(Clone)]
pub struct Case {
    name: &'static str,
    run: CaseFn,
}

impl Case {
    pub(crate) fn new(name: &'static str, run: CaseFn) -> Self {
        Self { name, run }
    }

    /// Name of the case, unique within its group.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Case").field("name", &self.name).finish()
    }
}

/// Cases sharing a topic and a `safeTransferFrom` payload.
#[derive(Clone, Debug)]
pub struct Group {
    name: String,
    payload: Payload,
    requires_burn: bool,
    cases: Vec<Case>,
}

impl Group {
    fn new(name: impl Into<String>, cases: Vec<Case>) -> Self {
        Self {
            name: name.into(),
            payload: Payload::None,
            requires_burn: false,
            cases,
        }
    }

    fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    fn requiring_burn(mut self) -> Self {
        self.requires_burn = true;
        self
    }

    /// Name of the group.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cases of the group, in execution order.
    #[must_use]
    pub fn cases(&self) -> &[Case] {
        &self.cases
    }
}

/// Every group of the battery, in execution order.
#[must_use]
pub fn battery() -> Vec<Group> {
    let mut groups = vec![
        Group::new("invalid_token", invalid_token::cases()),
        Group::new("balance", balance::cases()),
        Group::new("minting", minting::cases()),
        Group::new("burning", burning::cases()).requiring_burn(),
        Group::new("transfers", transfers::cases()),
    ];

    let payloads = [
        Payload::None,
        Payload::Empty,
        Payload::Data(Bytes::from_static(&SAFE_TRANSFER_DATA)),
    ];
    for payload in payloads {
        let name = format!("safe_transfers[{}]", payload.label());
        groups.push(
            Group::new(name, safe_transfers::cases()).with_payload(payload),
        );
    }

    groups.extend([
        Group::new("supports_interface", supports_interface::cases()),
        Group::new("metadata", metadata::cases()),
        Group::new("approvals", approvals::cases()),
        Group::new("approval_for_all", approval_for_all::cases()),
    ]);
    groups
}

/// Identifier of a case in reports and filters: `group::case`.
#[must_use]
pub fn case_id(group: &str, case: &str) -> String {
    format!("{group}::{case}")
}

/// State handed to a case: a fresh deployment with tokens already minted.
pub struct Ctx {
    fixture: Arc<dyn Fixture>,
    deployment: Deployment,
    tokens: [U256; MINTED_TOKENS],
    payload: Payload,
}

impl Ctx {
    /// Deploys a fresh contract and mints the initial tokens to the creator.
    async fn setup(
        fixture: Arc<dyn Fixture>,
        payload: Payload,
    ) -> eyre::Result<Self> {
        let deployment = fixture.reset().await?;
        let creator = deployment.accounts.creator;

        let mut tokens = [U256::ZERO; MINTED_TOKENS];
        for token in &mut tokens {
            *token = fixture.mint(&deployment, creator).await?;
        }

        Ok(Self { fixture, deployment, tokens, payload })
    }

    /// Typed handle to the contract under test.
    pub fn token(&self) -> Erc721<'_> {
        self.deployment.token()
    }

    /// The raw boundary to the contract under test.
    pub fn target(&self) -> &dyn Target {
        self.deployment.target.as_ref()
    }

    /// Accounts taking part in the case.
    pub fn accounts(&self) -> Accounts {
        self.deployment.accounts
    }

    /// The token most cases operate on, owned by the creator.
    pub fn token_id(&self) -> U256 {
        self.tokens[0]
    }

    /// All tokens minted to the creator during setup.
    pub fn tokens(&self) -> [U256; MINTED_TOKENS] {
        self.tokens
    }

    /// Payload of `safeTransferFrom` for the current group.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Mints a new token to `to`.
    ///
    /// # Errors
    ///
    /// Fails if the fixture cannot mint.
    pub async fn mint(&self, to: Address) -> eyre::Result<U256> {
        self.fixture.mint(&self.deployment, to).await
    }

    /// Burns `token_id` as its `owner`.
    ///
    /// # Errors
    ///
    /// Fails if the fixture cannot burn.
    pub async fn burn(
        &self,
        owner: Address,
        token_id: U256,
    ) -> eyre::Result<()> {
        self.fixture.burn(&self.deployment, owner, token_id).await
    }

    /// Deploys a recipient contract of the given `kind`.
    ///
    /// # Errors
    ///
    /// Fails if the fixture cannot deploy it.
    pub async fn receiver(&self, kind: ReceiverKind) -> eyre::Result<Address> {
        self.fixture.deploy_receiver(&self.deployment, kind).await
    }

    /// Asserts `ownerOf(token_id)` is `expected`.
    ///
    /// # Errors
    ///
    /// Fails on any other owner or if the query reverts.
    pub async fn ensure_owner(
        &self,
        token_id: U256,
        expected: Address,
    ) -> eyre::Result<()> {
        let owner = self.token().owner_of(token_id).await?;
        ensure!(
            owner == expected,
            "expected token {token_id} to be owned by {expected}, got {owner}"
        );
        Ok(())
    }

    /// Asserts `balanceOf(account)` is `expected`.
    ///
    /// # Errors
    ///
    /// Fails on any other balance or if the query reverts.
    pub async fn ensure_balance(
        &self,
        account: Address,
        expected: u64,
    ) -> eyre::Result<()> {
        let balance = self.token().balance_of(account).await?;
        ensure!(
            balance == U256::from(expected),
            "expected balance of {account} to be {expected}, got {balance}"
        );
        Ok(())
    }
}

/// Asserts `events` holds exactly `expected`.
pub(crate) fn ensure_single_event<E: fmt::Debug + PartialEq>(
    events: &[E],
    expected: &E,
) -> eyre::Result<()> {
    match events {
        [event] if event == expected => Ok(()),
        [event] => bail!("expected {expected:?}, got {event:?}"),
        _ => bail!(
            "expected exactly one event {expected:?}, got {}: {events:?}",
            events.len()
        ),
    }
}

/// Runs the battery, or the part of it selected by a filter.
#[derive(Clone, Debug)]
pub struct Suite {
    title: String,
    filter: Option<String>,
    groups: Vec<Group>,
}

impl Suite {
    /// The full battery, labelled `title` in the report.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), filter: None, groups: battery() }
    }

    /// Only runs cases whose `group::case` id contains `filter`.
    #[must_use]
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    fn selected(&self, id: &str) -> bool {
        self.filter.as_deref().map_or(true, |filter| id.contains(filter))
    }

    /// Runs the selected cases one after another, each against a fresh
    /// deployment obtained from `fixture`.
    pub async fn run(&self, fixture: Arc<dyn Fixture>) -> Report {
        let mut report = Report::new(&self.title);

        for group in &self.groups {
            for case in &group.cases {
                let id = case_id(&group.name, case.name);
                if !self.selected(&id) {
                    continue;
                }

                let outcome = if group.requires_burn && !fixture.supports_burn()
                {
                    Outcome::Skipped("fixture cannot burn".to_owned())
                } else {
                    let span = info_span!("case", %id);
                    run_case(Arc::clone(&fixture), group, case)
                        .instrument(span)
                        .await
                };

                report.push(CaseReport::new(id, outcome));
            }
        }

        info!(
            title = %self.title,
            passed = report.passed(),
            failed = report.failed().count(),
            skipped = report.skipped(),
            "suite finished"
        );
        report
    }
}

async fn run_case(
    fixture: Arc<dyn Fixture>,
    group: &Group,
    case: &Case,
) -> Outcome {
    let ctx = match Ctx::setup(fixture, group.payload.clone()).await {
        Ok(ctx) => ctx,
        Err(e) => {
            warn!(error = %format!("{e:#}"), "setup failed");
            return Outcome::Failed(format!("setup: {e:#}"));
        }
    };

    match (case.run)(&ctx).await {
        Ok(()) => {
            info!("passed");
            Outcome::Passed
        }
        Err(e) => {
            warn!(error = %format!("{e:#}"), "failed");
            Outcome::Failed(format!("{e:#}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{battery, case_id, ensure_single_event, Suite};

    #[test]
    fn case_ids_are_unique() {
        let ids: Vec<_> = battery()
            .iter()
            .flat_map(|group| {
                group
                    .cases()
                    .iter()
                    .map(|case| case_id(group.name(), case.name()))
            })
            .collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn safe_transfers_run_with_every_payload() {
        let names: Vec<_> = battery()
            .into_iter()
            .map(|group| group.name().to_owned())
            .filter(|name| name.starts_with("safe_transfers"))
            .collect();
        assert_eq!(
            names,
            [
                "safe_transfers[without data]",
                "safe_transfers[with empty data]",
                "safe_transfers[with data]",
            ]
        );
    }

    #[test]
    fn filter_selects_by_substring() {
        let suite = Suite::new("t").with_filter(Some("approvals::".to_owned()));
        assert!(suite.selected("approvals::emits_approval_event"));
        assert!(!suite.selected("approval_for_all::emits_event"));
        assert!(Suite::new("t").selected("anything"));
    }

    #[test]
    fn single_event_assertion() {
        assert!(ensure_single_event(&[1], &1).is_ok());
        assert!(ensure_single_event(&[2], &1).is_err());
        assert!(ensure_single_event(&[1, 1], &1).is_err());
        assert!(ensure_single_event::<u8>(&[], &1).is_err());
    }
}
