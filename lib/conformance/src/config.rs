//! Configuration of a run against a live node, loaded from the environment.
use std::path::PathBuf;

use alloy::signers::local::PrivateKeySigner;
use dotenv::dotenv;
use eyre::Context;

const RPC_URL: &str = "RPC_URL";
const CREATOR_PRIV_KEY: &str = "CREATOR_PRIV_KEY";
const USER1_PRIV_KEY: &str = "USER1_PRIV_KEY";
const USER2_PRIV_KEY: &str = "USER2_PRIV_KEY";
const USER3_PRIV_KEY: &str = "USER3_PRIV_KEY";
const ERC721_BYTECODE: &str = "ERC721_BYTECODE";
const ERC721_RECEIVER_BYTECODE: &str = "ERC721_RECEIVER_BYTECODE";
const NON_RECEIVER_BYTECODE: &str = "NON_RECEIVER_BYTECODE";
const ERC721_SUPPORTS_BURN: &str = "ERC721_SUPPORTS_BURN";
const CONFORMANCE_FILTER: &str = "CONFORMANCE_FILTER";

/// Signers of the accounts taking part in every case.
#[derive(Clone, Debug)]
pub struct Signers {
    /// Deployer of every contract.
    pub creator: PrivateKeySigner,
    /// First test user.
    pub user1: PrivateKeySigner,
    /// Second test user.
    pub user2: PrivateKeySigner,
    /// Third test user.
    pub user3: PrivateKeySigner,
}

/// Everything needed to run the battery against a live node.
#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP endpoint of the node.
    pub rpc_url: String,
    /// Test accounts.
    pub signers: Signers,
    /// Creation code of the token under test, constructor arguments
    /// included.
    pub erc721_bytecode: PathBuf,
    /// Creation code of the receiver mock, without constructor arguments.
    pub receiver_bytecode: PathBuf,
    /// Creation code of a contract without `onERC721Received`.
    pub non_receiver_bytecode: PathBuf,
    /// Whether the token exposes `burn(uint256)`.
    pub supports_burn: bool,
    /// Only cases whose name contains this string are run.
    pub filter: Option<String>,
}

impl Config {
    /// Loads the configuration from the environment, reading `.env` first if
    /// present.
    ///
    /// # Errors
    ///
    /// Fails if a required variable is missing or malformed.
    pub fn from_env() -> eyre::Result<Self> {
        dotenv().ok();

        let signers = Signers {
            creator: signer(CREATOR_PRIV_KEY)?,
            user1: signer(USER1_PRIV_KEY)?,
            user2: signer(USER2_PRIV_KEY)?,
            user3: signer(USER3_PRIV_KEY)?,
        };

        let supports_burn = match std::env::var(ERC721_SUPPORTS_BURN) {
            Ok(value) => value.parse::<bool>().with_context(|| {
                format!("Parse {ERC721_SUPPORTS_BURN} env var as a boolean")
            })?,
            Err(_) => false,
        };

        Ok(Self {
            rpc_url: env(RPC_URL)?,
            signers,
            erc721_bytecode: env(ERC721_BYTECODE)?.into(),
            receiver_bytecode: env(ERC721_RECEIVER_BYTECODE)?.into(),
            non_receiver_bytecode: env(NON_RECEIVER_BYTECODE)?.into(),
            supports_burn,
            filter: std::env::var(CONFORMANCE_FILTER)
                .ok()
                .filter(|filter| !filter.is_empty()),
        })
    }
}

/// Load the `name` environment variable.
fn env(name: &str) -> eyre::Result<String> {
    std::env::var(name).with_context(|| format!("Load {name} env var"))
}

fn signer(name: &str) -> eyre::Result<PrivateKeySigner> {
    env(name)?
        .trim()
        .parse::<PrivateKeySigner>()
        .with_context(|| format!("Parse {name} env var as a private key"))
}
