use erc721_conformance::{logging::init_test_tracing, suite::battery};
use erc721_conformance_tests::run_on_devnet;

#[tokio::test]
async fn reference_token_passes_every_case() -> eyre::Result<()> {
    init_test_tracing();

    let report = run_on_devnet(&[]).await;

    let expected: usize =
        battery().iter().map(|group| group.cases().len()).sum();
    assert_eq!(report.cases().len(), expected);
    assert_eq!(report.skipped(), 0);
    report.ensure_passed()
}

#[tokio::test]
async fn safe_transfers_run_once_per_payload() {
    init_test_tracing();

    let report = run_on_devnet(&[]).await;

    for group in [
        "safe_transfers[without data]",
        "safe_transfers[with empty data]",
        "safe_transfers[with data]",
    ] {
        let id = format!("{group}::accepting_receiver_succeeds");
        assert!(report.outcome(&id).is_some(), "{id} should have run");
    }
}
