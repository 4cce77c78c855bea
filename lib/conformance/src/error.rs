use std::{fmt, future::Future};

use alloy_primitives::Bytes;
use eyre::bail;

/// Outcome of a failed round-trip to the contract under test.
#[derive(Debug)]
pub enum Error {
    /// The contract rejected the operation with the given revert data.
    Revert(Bytes),
    /// The operation never reached a verdict: the node was unreachable, the
    /// request was malformed or the response could not be decoded.
    Transport(eyre::Report),
}

/// Result of a round-trip to the contract under test.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Revert(data) if data.is_empty() => {
                write!(f, "execution reverted")
            }
            Error::Revert(data) => write!(f, "execution reverted: {data}"),
            Error::Transport(e) => write!(f, "transport error: {e:#}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<eyre::Report> for Error {
    fn from(value: eyre::Report) -> Self {
        Error::Transport(value)
    }
}

/// Awaits `operation` and asserts that the contract rejected it, returning
/// the revert data.
///
/// # Errors
///
/// Fails if the operation succeeded, or if it failed for a reason other than
/// a revert. Transport failures never count as an expected rejection.
pub async fn expect_revert<T: fmt::Debug>(
    operation: impl Future<Output = Result<T>>,
) -> eyre::Result<Bytes> {
    match operation.await {
        Ok(value) => {
            bail!(
                "expected the operation to revert, but it succeeded with \
                 {value:?}"
            )
        }
        Err(Error::Revert(data)) => Ok(data),
        Err(Error::Transport(e)) => {
            Err(e.wrap_err("expected a revert, got a transport failure"))
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Bytes;

    use super::{expect_revert, Error};

    #[tokio::test]
    async fn expect_revert_returns_revert_data() {
        let data = Bytes::from_static(&[0xde, 0xad]);
        let reverted =
            expect_revert(async { Err::<(), _>(Error::Revert(data.clone())) })
                .await
                .expect("should accept a revert");
        assert_eq!(reverted, data);
    }

    #[tokio::test]
    async fn expect_revert_fails_on_success() {
        let err = expect_revert(async { Ok::<_, Error>(42) })
            .await
            .expect_err("should reject a success");
        assert!(err.to_string().contains("succeeded with 42"));
    }

    #[tokio::test]
    async fn expect_revert_fails_on_transport_error() {
        let err = expect_revert(async {
            Err::<(), _>(Error::Transport(eyre::eyre!("connection refused")))
        })
        .await
        .expect_err("should not count a transport failure as a revert");
        assert!(format!("{err:#}").contains("connection refused"));
    }
}
