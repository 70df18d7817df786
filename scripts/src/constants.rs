//! Constants used in the deploy scripts

/// Default REST endpoint, Aptos mainnet public fullnode
pub const DEFAULT_NODE_URL: &str = "https://fullnode.mainnet.aptoslabs.com";

/// Mainnet chain id
pub const MAINNET_CHAIN_ID: u8 = 1;

/// Hd derivation path for Aptos ed25519 accounts
pub const APTOS_DERIVATION_PATH: &str = "m/44'/637'/0'/0'/0'";

/// Max gas units the publish transaction may consume
pub const MAX_GAS_AMOUNT: u64 = 1_000_000;

/// Octas paid per gas unit
pub const GAS_UNIT_PRICE: u64 = 100;

/// Seconds between transaction construction and its expiration
pub const TXN_EXPIRATION_SECS: u64 = 600;

/// Name of the move manifest inside a package directory
pub const MOVE_MANIFEST: &str = "Move.toml";

/// Default file used to record deployments
pub const DEFAULT_OUTPUT_FILE: &str = "deployed.json";

/// The aptos CLI binary
pub const APTOS_CLI: &str = "aptos";

/// On chain module holding the code publishing entry function
pub const CODE_MODULE: &str = "0x1::code";

/// Entry function publishing a package
pub const PUBLISH_PACKAGE_FUNCTION: &str = "publish_package_txn";

/// Resource type holding the native coin balance
pub const APTOS_COIN_STORE: &str = "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>";

/// Domain separator prefix hashed in front of a raw transaction before signing
pub const RAW_TXN_SALT: &[u8] = b"APTOS::RawTransaction";
