//! Helpers shared by the integration tests of the battery.
use std::{collections::BTreeSet, sync::Arc};

use erc721_conformance::{
    devnet::{DevnetFixture, Quirk},
    suite::{battery, case_id, Report, Suite},
};

/// Runs the whole battery against the reference token with `quirks` applied.
pub async fn run_on_devnet(quirks: &[Quirk]) -> Report {
    let title = if quirks.is_empty() {
        "reference".to_owned()
    } else {
        format!("{quirks:?}")
    };
    Suite::new(title).run(Arc::new(DevnetFixture::new(quirks))).await
}

/// Ids of the cases that failed in `report`.
#[must_use]
pub fn failed_ids(report: &Report) -> BTreeSet<String> {
    report.failed().map(|case| case.id().to_owned()).collect()
}

/// Ids of `case` in every group whose name starts with `group`.
///
/// The `safeTransferFrom` cases run once per payload, so their groups share
/// a prefix.
#[must_use]
pub fn ids_in_groups(group: &str, case: &str) -> BTreeSet<String> {
    battery()
        .iter()
        .filter(|candidate| candidate.name().starts_with(group))
        .map(|candidate| case_id(candidate.name(), case))
        .collect()
}

/// Asserts that exactly the cases in `expected` failed.
///
/// # Errors
///
/// Fails with both sets of ids if they differ.
pub fn ensure_failed_exactly(
    report: &Report,
    expected: &BTreeSet<String>,
) -> eyre::Result<()> {
    let failed = failed_ids(report);
    eyre::ensure!(
        &failed == expected,
        "expected failures {expected:#?}, got {failed:#?}\n{report}"
    );
    Ok(())
}
