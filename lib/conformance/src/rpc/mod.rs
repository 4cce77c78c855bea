//! Contracts deployed on a live node, reached through JSON-RPC.
use alloy::{
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::{Filter, TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
    transports::{http::reqwest::Url, RpcError, TransportErrorKind},
};
use async_trait::async_trait;
use eyre::{eyre, WrapErr};
use once_cell::sync::Lazy;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::{
    receipt::{Log, Receipt},
    target::Target,
    Error, Result,
};

mod fixture;

pub use fixture::RpcFixture;

/// Serializes transaction submission within the process.
///
/// Several suites may share the test accounts, and concurrent submissions
/// from the same account race for its nonce.
static SUBMISSIONS: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Connects to the node at `rpc_url` with a wallet holding every signer.
///
/// The `from` of each transaction selects the signing key.
///
/// # Errors
///
/// Fails if `rpc_url` is not a valid URL or `signers` is empty.
pub fn connect(
    rpc_url: &str,
    signers: impl IntoIterator<Item = PrivateKeySigner>,
) -> eyre::Result<DynProvider> {
    let url: Url =
        rpc_url.parse().wrap_err_with(|| format!("Parse {rpc_url} as a URL"))?;

    let mut signers = signers.into_iter();
    let mut wallet = EthereumWallet::from(
        signers.next().ok_or_else(|| eyre!("at least one signer is required"))?,
    );
    for signer in signers {
        wallet.register_signer(signer);
    }

    Ok(ProviderBuilder::new().wallet(wallet).connect_http(url).erased())
}

/// Classifies a failed RPC round-trip.
///
/// Nodes report reverts as an error response whose message mentions the
/// revert and whose data, when present, holds the revert data.
fn classify(err: RpcError<TransportErrorKind>) -> Error {
    if let Some(payload) = err.as_error_resp() {
        if let Some(data) = payload.as_revert_data() {
            return Error::Revert(data);
        }
        if payload.message.contains("revert") {
            return Error::Revert(Bytes::new());
        }
    }
    Error::Transport(eyre::Report::new(err).wrap_err("RPC request failed"))
}

/// Submits `tx` and waits for its receipt.
///
/// # Errors
///
/// Returns [`Error::Revert`] if the node refuses the transaction because it
/// reverts, or if it is mined with a failed status.
pub(crate) async fn submit(
    provider: &DynProvider,
    tx: TransactionRequest,
) -> Result<TransactionReceipt> {
    let _guard = SUBMISSIONS.lock().await;

    let pending = provider.send_transaction(tx).await.map_err(classify)?;
    let receipt = pending
        .get_receipt()
        .await
        .wrap_err("wait for the transaction receipt")?;

    if !receipt.status() {
        debug!(tx = %receipt.transaction_hash, "transaction reverted");
        return Err(Error::Revert(Bytes::new()));
    }
    Ok(receipt)
}

fn log_of(log: &alloy::rpc::types::Log) -> Log {
    Log {
        address: log.address(),
        block_number: log.block_number.unwrap_or_default(),
        data: log.data().clone(),
    }
}

/// A contract deployed on a live node.
#[derive(Clone, Debug)]
pub struct RpcTarget {
    provider: DynProvider,
    address: Address,
}

impl RpcTarget {
    /// The contract at `address`, reached through `provider`.
    #[must_use]
    pub fn new(provider: DynProvider, address: Address) -> Self {
        Self { provider, address }
    }

    fn request(&self, from: Address, calldata: Bytes) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(from)
            .with_to(self.address)
            .with_input(calldata)
    }
}

#[async_trait]
impl Target for RpcTarget {
    fn address(&self) -> Address {
        self.address
    }

    async fn call(&self, from: Address, calldata: Bytes) -> Result<Bytes> {
        trace!(to = %self.address, %calldata, "eth_call");
        self.provider.call(self.request(from, calldata)).await.map_err(classify)
    }

    async fn send(&self, from: Address, calldata: Bytes) -> Result<Receipt> {
        trace!(%from, to = %self.address, %calldata, "eth_sendTransaction");
        let request = self.request(from, calldata);
        let receipt = submit(&self.provider, request).await?;

        Ok(Receipt {
            block_number: receipt.block_number.unwrap_or_default(),
            logs: receipt.logs().iter().map(log_of).collect(),
        })
    }

    async fn block_number(&self) -> Result<u64> {
        self.provider.get_block_number().await.map_err(classify)
    }

    async fn logs(&self, from_block: u64) -> Result<Vec<Log>> {
        let filter = Filter::new().from_block(from_block);
        let logs = self.provider.get_logs(&filter).await.map_err(classify)?;
        Ok(logs.iter().map(log_of).collect())
    }
}

#[cfg(test)]
mod tests {
    use alloy::{
        rpc::json_rpc::ErrorPayload,
        transports::{RpcError, TransportErrorKind},
    };

    use super::classify;
    use crate::Error;

    fn error_response(message: &'static str) -> RpcError<TransportErrorKind> {
        RpcError::ErrorResp(ErrorPayload {
            code: 3,
            message: message.into(),
            data: None,
        })
    }

    #[test]
    fn revert_without_data() {
        let err = classify(error_response("execution reverted"));
        assert!(matches!(err, Error::Revert(data) if data.is_empty()));
    }

    #[test]
    fn other_errors_are_transport_failures() {
        let err = classify(error_response("insufficient funds for gas"));
        assert!(matches!(err, Error::Transport(_)));
    }

    #[test]
    fn transport_errors_are_not_reverts() {
        let err = classify(TransportErrorKind::backend_gone());
        assert!(matches!(err, Error::Transport(_)));
    }
}
