#![cfg(feature = "e2e")]

use std::sync::Arc;

use erc721_conformance::{
    config::Config,
    logging::init_test_tracing,
    rpc::RpcFixture,
    suite::Suite,
};

#[tokio::test]
async fn token_on_node_passes_every_case() -> eyre::Result<()> {
    init_test_tracing();
    let config = Config::from_env()?;
    let fixture = RpcFixture::from_config(&config).await?;

    let report = Suite::new("rpc")
        .with_filter(config.filter.clone())
        .run(Arc::new(fixture))
        .await;

    println!("{report}");
    report.ensure_passed()
}
