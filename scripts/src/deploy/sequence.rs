//! The ordered deployment sequence

use std::path::Path;

use tracing::{info, warn};

use crate::{
    account::DeployerAccount,
    build::MovePackage,
    config::DeployConfig,
    errors::ScriptError,
    output_writer::{write_output_file, OutputKeys},
    tx::{
        client::{CommittedTransaction, NodeApi},
        sender::send_publish_package,
        types::AccountAddress,
    },
    utils::CommandRunner,
};

/// What a deployment run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    /// Address of the deployer account
    pub address: AccountAddress,
    /// The publish transaction, when the api path ran
    pub committed: Option<CommittedTransaction>,
    /// Whether `aptos move publish` ran
    pub cli_published: bool,
}

/// Run the deployment sequence.
///
/// Steps run strictly in order: compile, derive the account, then depending on
/// the publish mode submit a publish transaction and/or run the cli publish.
/// The first failing step stops the run, nothing after it is attempted.
pub async fn deploy_package<N, R>(
    config: &DeployConfig,
    client: &N,
    runner: &R,
) -> Result<DeployOutcome, ScriptError>
where
    N: NodeApi + ?Sized,
    R: CommandRunner + ?Sized,
{
    let package = MovePackage::new(&config.package_dir);

    // Build the package
    info!(dir = %package.dir().display(), "Compiling move package...");
    package.compile(runner)?;
    info!("Compiled with success");

    // Derive the deployer, before any network interaction
    let account = DeployerAccount::from_seed_phrase(&config.seed_phrase)?;
    info!(address = %account.address(), "Derived deployer account");

    let mut outcome = DeployOutcome {
        address: account.address(),
        committed: None,
        cli_published: false,
    };

    if config.mode.submits_transaction() {
        info!("Deploying move package to Aptos mainnet...");
        let package_bytes = package.read_package_file(&config.package_file)?;
        let committed = send_publish_package(client, &account, &package_bytes).await?;
        info!(hash = %committed.hash, "Move package deployed with success");

        if let Some(output_file) = &config.output_file {
            record_deployment(&package, output_file, &account, &committed)?;
        }
        outcome.committed = Some(committed);
    }

    if config.mode.runs_cli_publish() {
        info!("Publishing with the aptos cli...");
        package.publish_with_cli(runner)?;
        outcome.cli_published = true;
    }

    Ok(outcome)
}

/// Write the publish hash and sender under the package name
fn record_deployment(
    package: &MovePackage,
    output_file: &Path,
    account: &DeployerAccount,
    committed: &CommittedTransaction,
) -> Result<(), ScriptError> {
    let name = match package.manifest() {
        Ok(manifest) => manifest.name,
        Err(e) => {
            // Fall back to the directory name
            warn!(error = %e, "Could not read package manifest");
            package
                .dir()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| String::from("package"))
        }
    };

    write_output_file(
        output_file,
        OutputKeys::Publish {
            package: name.clone(),
        },
        &committed.hash,
    )?;
    write_output_file(
        output_file,
        OutputKeys::Sender { package: name },
        &account.address().to_string(),
    )?;
    info!(file = %output_file.display(), "Recorded deployment");

    Ok(())
}
