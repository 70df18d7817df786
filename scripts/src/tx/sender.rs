//! Signing and submission of the publish transaction

use tracing::info;

use crate::{
    account::DeployerAccount,
    constants::MAINNET_CHAIN_ID,
    errors::ScriptError,
    tx::{
        client::{CommittedTransaction, NodeApi},
        payload::publish_package_payload,
        reader::get_sequence_number,
        types::{
            Ed25519PublicKey, Ed25519Signature, RawTransaction, SignedTransaction,
            TransactionAuthenticator,
        },
    },
    utils::unix_now,
};

/// Sign `raw_txn` with the deployer key
pub fn sign_transaction(
    account: &DeployerAccount,
    raw_txn: RawTransaction,
) -> Result<SignedTransaction, ScriptError> {
    let signature = account.sign(&raw_txn.signing_message()?);
    let authenticator = TransactionAuthenticator::Ed25519 {
        public_key: Ed25519PublicKey(account.public_key()),
        signature: Ed25519Signature(signature),
    };
    Ok(SignedTransaction::new(raw_txn, authenticator))
}

/// Publish a package through `0x1::code::publish_package_txn`, waiting for it to be committed
pub async fn send_publish_package<N: NodeApi + ?Sized>(
    client: &N,
    account: &DeployerAccount,
    package_bytes: &[u8],
) -> Result<CommittedTransaction, ScriptError> {
    // Build the payload
    let payload = publish_package_payload(package_bytes)?;

    // Refuse to sign a mainnet transaction for another network
    let chain_id = client.get_chain_id().await?;
    if chain_id != MAINNET_CHAIN_ID {
        return Err(ScriptError::ClientInitialization(format!(
            "node is on chain {chain_id}, expected mainnet ({MAINNET_CHAIN_ID})"
        )));
    }

    // Fresh sequence number, right before building the tx
    let sequence_number = get_sequence_number(client, account.address()).await?;
    info!(address = %account.address(), sequence_number, "Fetched sequence number");

    let raw_txn = RawTransaction::new(account.address(), sequence_number, payload, unix_now());
    let expiration = raw_txn.expiration_timestamp_secs();
    let signed_txn = sign_transaction(account, raw_txn)?;

    // Send it
    let pending_txn = client.submit_transaction(&signed_txn).await?;
    info!(hash = %pending_txn.hash, "Transaction submitted");

    // Wait for the transaction to be included
    let committed = client
        .wait_for_transaction(&pending_txn.hash, expiration)
        .await?;
    if !committed.success {
        return Err(ScriptError::TransactionConfirmation(format!(
            "transaction {} failed with status {}",
            committed.hash, committed.vm_status
        )));
    }
    info!(hash = %committed.hash, version = committed.version, "Publish tx committed");

    Ok(committed)
}
