//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::{
    commands::{deploy, show_account, show_balance},
    config::{DeployConfig, PublishMode},
    constants::{DEFAULT_NODE_URL, DEFAULT_OUTPUT_FILE, MOVE_MANIFEST},
    errors::ScriptError,
};

/// Scripts for compiling & publishing a Move package on Aptos mainnet
#[derive(Parser)]
pub struct Cli {
    /// Arguments shared by every command
    #[command(flatten)]
    pub globals: GlobalArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Arguments shared by every command
#[derive(Args)]
pub struct GlobalArgs {
    /// BIP-39 seed phrase of the deployer
    #[arg(long, env = "SEED_PHRASE", hide_env_values = true)]
    pub seed_phrase: String,

    /// Fullnode REST url
    #[arg(short, long, env = "APTOS_NODE_URL", default_value = DEFAULT_NODE_URL)]
    pub node_url: String,

    /// Directory of the move package
    #[arg(short, long, default_value = ".")]
    pub package_dir: PathBuf,
}

/// The possible CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// Compile and publish the package
    Deploy(DeployArgs),
    /// Print the deployer address
    Account,
    /// Print the deployer coin balance
    Balance,
}

impl Command {
    /// Run the command
    pub async fn run(self, globals: GlobalArgs) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => {
                info!(mode = ?args.mode, "Deploying package...");
                deploy(args.into_config(globals)).await
            }
            Command::Account => show_account(&globals.seed_phrase),
            Command::Balance => show_balance(&globals.seed_phrase, &globals.node_url).await,
        }
    }
}

/// Deploy the package
#[derive(Args)]
pub struct DeployArgs {
    /// Publish path to take
    #[arg(short, long, value_enum, default_value_t = PublishMode::Cli)]
    pub mode: PublishMode,

    /// File sent as the package bytes, relative to the package dir
    #[arg(long, default_value = MOVE_MANIFEST)]
    pub package_file: PathBuf,

    /// Json file recording api deployments
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Do not record the deployment
    #[arg(long)]
    pub no_output: bool,
}

impl DeployArgs {
    /// Merge with the global args into the run configuration
    pub fn into_config(self, globals: GlobalArgs) -> DeployConfig {
        DeployConfig {
            seed_phrase: globals.seed_phrase,
            node_url: globals.node_url,
            package_dir: globals.package_dir,
            package_file: self.package_file,
            output_file: (!self.no_output).then_some(self.output),
            mode: self.mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn deploy_defaults_to_cli_mode() {
        let cli = Cli::try_parse_from(["move-deploy", "--seed-phrase", "words", "deploy"]).unwrap();
        let Command::Deploy(args) = cli.command else {
            panic!("expected deploy");
        };
        let config = args.into_config(cli.globals);
        assert_eq!(config.mode, PublishMode::Cli);
        assert_eq!(config.package_file, PathBuf::from("Move.toml"));
        assert_eq!(config.output_file, Some(PathBuf::from("deployed.json")));
        assert_eq!(config.package_dir, PathBuf::from("."));
    }

    #[test]
    fn parses_api_mode_and_paths() {
        let cli = Cli::try_parse_from([
            "move-deploy",
            "--seed-phrase",
            "words",
            "--node-url",
            "https://node.example",
            "--package-dir",
            "move",
            "deploy",
            "--mode",
            "both",
            "--no-output",
        ])
        .unwrap();
        let Command::Deploy(args) = cli.command else {
            panic!("expected deploy");
        };
        let config = args.into_config(cli.globals);
        assert_eq!(config.mode, PublishMode::Both);
        assert_eq!(config.node_url, "https://node.example");
        assert_eq!(config.package_dir, PathBuf::from("move"));
        assert_eq!(config.output_file, None);
    }
}
