//! Entry points of the cli commands

use tracing::info;

use crate::{
    account::DeployerAccount,
    config::DeployConfig,
    deploy::deploy_package,
    errors::ScriptError,
    tx::{client::RestClient, reader::get_coin_balance},
    utils::SystemCommandRunner,
};

/// Deploy the move package
pub async fn deploy(config: DeployConfig) -> Result<(), ScriptError> {
    // No request is sent until the sequence needs one
    let client = RestClient::new(&config.node_url)?;

    let outcome = deploy_package(&config, &client, &SystemCommandRunner).await?;
    match &outcome.committed {
        Some(committed) => info!(
            address = %outcome.address,
            hash = %committed.hash,
            version = committed.version,
            cli_published = outcome.cli_published,
            "Deployment done"
        ),
        None => info!(
            address = %outcome.address,
            cli_published = outcome.cli_published,
            "Deployment done"
        ),
    }

    Ok(())
}

/// Log the deployer address
pub fn show_account(seed_phrase: &str) -> Result<(), ScriptError> {
    let account = DeployerAccount::from_seed_phrase(seed_phrase)?;
    info!(address = %account.address(), "Deployer account");
    Ok(())
}

/// Log the deployer balance
pub async fn show_balance(seed_phrase: &str, node_url: &str) -> Result<(), ScriptError> {
    let account = DeployerAccount::from_seed_phrase(seed_phrase)?;
    let client = RestClient::new(node_url)?;

    let balance = get_coin_balance(&client, account.address()).await?;
    info!(address = %account.address(), balance, "Deployer balance (octas)");
    Ok(())
}
