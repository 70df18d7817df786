//! Read helpers over the node client

use tracing::info;

use crate::{
    constants::APTOS_COIN_STORE,
    errors::ScriptError,
    tx::{client::NodeApi, types::AccountAddress},
};

/// Fetch the current sequence number of `address`
///
/// This is a point in time read, any other transaction sent by the same
/// account before submission will make the returned value stale.
pub async fn get_sequence_number<N: NodeApi + ?Sized>(
    client: &N,
    address: AccountAddress,
) -> Result<u64, ScriptError> {
    let account = client.get_account(address).await?;
    Ok(account.sequence_number)
}

/// Get the native coin balance of `address`, in octas
pub async fn get_coin_balance<N: NodeApi + ?Sized>(
    client: &N,
    address: AccountAddress,
) -> Result<u64, ScriptError> {
    let data = client
        .get_account_resource(address, APTOS_COIN_STORE)
        .await?;
    info!(%address, balance = %data, "Fetched coin store");

    // u64 values are rendered as json strings by the node
    data["coin"]["value"]
        .as_str()
        .ok_or_else(|| ScriptError::ResourceFetching(format!("no coin value in {data}")))?
        .parse::<u64>()
        .map_err(|e| ScriptError::ResourceFetching(format!("bad coin value: {e}")))
}
