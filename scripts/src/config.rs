//! Explicit configuration of a deployment run

use std::{
    fmt::{self, Debug, Formatter},
    path::PathBuf,
};

use clap::ValueEnum;

/// Which publish path a deployment run takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PublishMode {
    /// Compile, check the seed phrase, then publish with `aptos move publish`
    #[default]
    Cli,
    /// Compile and publish through a signed `publish_package_txn` transaction
    Api,
    /// Api publish, followed by the cli publish
    Both,
}

impl PublishMode {
    /// Whether the api publish path runs
    pub fn submits_transaction(self) -> bool {
        matches!(self, PublishMode::Api | PublishMode::Both)
    }

    /// Whether `aptos move publish` runs
    pub fn runs_cli_publish(self) -> bool {
        matches!(self, PublishMode::Cli | PublishMode::Both)
    }
}

/// Everything a deployment run needs, nothing is read from the environment past this point
#[derive(Clone)]
pub struct DeployConfig {
    /// BIP-39 phrase of the deployer, never logged
    pub seed_phrase: String,
    /// Fullnode REST url
    pub node_url: String,
    /// Directory holding `Move.toml`, commands run from there
    pub package_dir: PathBuf,
    /// File published as the package bytes, relative to `package_dir`
    pub package_file: PathBuf,
    /// Deployment record, `None` to skip it
    pub output_file: Option<PathBuf>,
    /// Publish path
    pub mode: PublishMode,
}

impl Debug for DeployConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployConfig")
            .field("seed_phrase", &"<redacted>")
            .field("node_url", &self.node_url)
            .field("package_dir", &self.package_dir)
            .field("package_file", &self.package_file)
            .field("output_file", &self.output_file)
            .field("mode", &self.mode)
            .finish()
    }
}
