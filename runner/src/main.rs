//! Runs the conformance battery against the token named by the environment.
//!
//! See [`Config::from_env`] for the variables read.
use std::sync::Arc;

use erc721_conformance::{
    config::Config, logging::init_tracing, rpc::RpcFixture, suite::Suite,
};
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    info!(rpc_url = %config.rpc_url, "running the battery");
    let fixture = RpcFixture::from_config(&config).await?;

    let report = Suite::new("rpc")
        .with_filter(config.filter.clone())
        .run(Arc::new(fixture))
        .await;

    println!();
    println!("{report}");

    report.ensure_passed()
}
