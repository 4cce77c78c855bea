//! Tracing setup shared by the runner and the integration tests.
use tracing_subscriber::{fmt, EnvFilter};

/// Where formatted events go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Output {
    /// Standard error, keeping standard output free for the report.
    Stderr,
    /// The test harness's captured output.
    Test,
}

/// Installs a `fmt` subscriber for the runner, writing to stderr.
///
/// See [`init_tracing_with`].
pub fn init_tracing() {
    init_tracing_with(Output::Stderr);
}

/// Installs a `fmt` subscriber whose output the test harness captures.
pub fn init_test_tracing() {
    init_tracing_with(Output::Test);
}

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `info`.
///
/// Calling it more than once is harmless: only the first subscriber is
/// installed. Returns whether this call installed it.
pub fn init_tracing_with(output: Output) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_target(true);

    match output {
        Output::Stderr => builder.with_writer(std::io::stderr).try_init(),
        Output::Test => builder.with_test_writer().try_init(),
    }
    .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installs_only_the_first_subscriber() {
        init_tracing_with(Output::Test);
        assert!(!init_tracing_with(Output::Test));
        assert!(!init_tracing_with(Output::Stderr));
    }
}
