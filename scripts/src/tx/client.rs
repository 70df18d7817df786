//! Fullnode REST client: ledger info, account reads, submission and
//! confirmation polling.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    errors::ScriptError,
    tx::types::{AccountAddress, SignedTransaction},
    utils::unix_now,
};

/// Content type of a bcs encoded signed transaction submission
const SIGNED_TXN_BCS: &str = "application/x.aptos.signed_transaction+bcs";

/// Ledger timestamp header returned on every response, in microseconds
const LEDGER_TIMESTAMP_HEADER: &str = "x-aptos-ledger-timestampusec";

/// Delay between two transaction lookups
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// On chain state of an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    /// Sequence number the next transaction must carry
    pub sequence_number: u64,
}

/// Node acknowledgement of a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PendingTransaction {
    /// Transaction hash, `0x` prefixed
    pub hash: String,
}

/// A transaction that reached a terminal state on chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedTransaction {
    /// Transaction hash
    pub hash: String,
    /// Ledger version it was committed at
    pub version: u64,
    /// Whether the VM executed it successfully
    pub success: bool,
    /// VM status, `Executed successfully` or the abort reason
    pub vm_status: String,
}

/// The fullnode operations needed by the deploy scripts
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Chain id reported by the node
    async fn get_chain_id(&self) -> Result<u8, ScriptError>;

    /// Current sequence number of `address`
    async fn get_account(&self, address: AccountAddress) -> Result<AccountInfo, ScriptError>;

    /// The `data` field of one resource stored under `address`
    async fn get_account_resource(
        &self,
        address: AccountAddress,
        resource_type: &str,
    ) -> Result<Value, ScriptError>;

    /// Submit a signed transaction, bcs encoded
    async fn submit_transaction(
        &self,
        txn: &SignedTransaction,
    ) -> Result<PendingTransaction, ScriptError>;

    /// Block until `hash` is committed, or until the ledger passes `expiration_timestamp_secs`
    async fn wait_for_transaction(
        &self,
        hash: &str,
        expiration_timestamp_secs: u64,
    ) -> Result<CommittedTransaction, ScriptError>;
}

/// `GET /v1`
#[derive(Deserialize)]
struct LedgerInfoResponse {
    /// Chain id of the network
    chain_id: u8,
}

/// `GET /v1/accounts/{address}`
#[derive(Deserialize)]
struct AccountResponse {
    /// u64 as a decimal string
    sequence_number: String,
}

/// `GET /v1/accounts/{address}/resource/{type}`
#[derive(Deserialize)]
struct ResourceResponse {
    /// Resource fields
    data: Value,
}

/// A committed user transaction, as returned by `by_hash`
#[derive(Deserialize)]
struct UserTransactionResponse {
    /// Transaction hash
    hash: String,
    /// u64 as a decimal string
    version: String,
    /// Execution outcome
    success: bool,
    /// VM status
    vm_status: String,
}

/// Lookup state of a transaction hash
enum TransactionLookup {
    /// Unknown to the node, or still in the mempool
    Pending {
        /// Ledger clock of the answering node, if it sent one
        ledger_timestamp_secs: Option<u64>,
    },
    /// Reached a terminal state
    Committed(CommittedTransaction),
}

/// Http client over the fullnode REST api
#[derive(Debug, Clone)]
pub struct RestClient {
    /// Shared http client
    http: Client,
    /// Node url without the `/v1` suffix
    base_url: String,
    /// Delay between two confirmation lookups
    poll_interval: Duration,
}

impl RestClient {
    /// Build a client for the node at `node_url`, either the root or the `/v1` url
    pub fn new(node_url: &str) -> Result<Self, ScriptError> {
        let trimmed = node_url.trim_end_matches('/');
        let base_url = trimmed.strip_suffix("/v1").unwrap_or(trimmed).to_string();
        // Validate it once here, endpoints are built from it afterwards
        Url::parse(&base_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

        Ok(Self {
            http: Client::new(),
            base_url,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Absolute url of `path` under `/v1`
    fn endpoint(&self, path: &str) -> Result<Url, ScriptError> {
        let url = if path.is_empty() {
            format!("{}/v1", self.base_url)
        } else {
            format!("{}/v1/{}", self.base_url, path)
        };
        Url::parse(&url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))
    }

    /// One `by_hash` lookup
    async fn lookup_transaction(&self, hash: &str) -> Result<TransactionLookup, ScriptError> {
        let url = self.endpoint(&format!("transactions/by_hash/{hash}"))?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ScriptError::TransactionConfirmation(e.to_string()))?;
        let ledger_timestamp_secs = ledger_time_secs(&response);

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(TransactionLookup::Pending {
                ledger_timestamp_secs,
            });
        }
        let body: Value = checked(response, ScriptError::TransactionConfirmation)
            .await?
            .json()
            .await
            .map_err(|e| ScriptError::TransactionConfirmation(e.to_string()))?;

        if body["type"] == "pending_transaction" {
            return Ok(TransactionLookup::Pending {
                ledger_timestamp_secs,
            });
        }

        let txn: UserTransactionResponse = serde_json::from_value(body)
            .map_err(|e| ScriptError::TransactionConfirmation(e.to_string()))?;
        let version = txn
            .version
            .parse::<u64>()
            .map_err(|e| ScriptError::TransactionConfirmation(format!("bad version: {e}")))?;

        Ok(TransactionLookup::Committed(CommittedTransaction {
            hash: txn.hash,
            version,
            success: txn.success,
            vm_status: txn.vm_status,
        }))
    }
}

#[async_trait]
impl NodeApi for RestClient {
    async fn get_chain_id(&self) -> Result<u8, ScriptError> {
        let response = self
            .http
            .get(self.endpoint("")?)
            .send()
            .await
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
        let ledger: LedgerInfoResponse = checked(response, ScriptError::ClientInitialization)
            .await?
            .json()
            .await
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

        info!(chain_id = ledger.chain_id, "Connected to node");
        Ok(ledger.chain_id)
    }

    async fn get_account(&self, address: AccountAddress) -> Result<AccountInfo, ScriptError> {
        let response = self
            .http
            .get(self.endpoint(&format!("accounts/{address}"))?)
            .send()
            .await
            .map_err(|e| ScriptError::SequenceNumberFetching(e.to_string()))?;
        let account: AccountResponse = checked(response, ScriptError::SequenceNumberFetching)
            .await?
            .json()
            .await
            .map_err(|e| ScriptError::SequenceNumberFetching(e.to_string()))?;

        let sequence_number = account
            .sequence_number
            .parse::<u64>()
            .map_err(|e| ScriptError::SequenceNumberFetching(format!("bad sequence number: {e}")))?;

        Ok(AccountInfo { sequence_number })
    }

    async fn get_account_resource(
        &self,
        address: AccountAddress,
        resource_type: &str,
    ) -> Result<Value, ScriptError> {
        let url = self.endpoint(&format!("accounts/{address}/resource/{resource_type}"))?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ScriptError::ResourceFetching(e.to_string()))?;
        let resource: ResourceResponse = checked(response, ScriptError::ResourceFetching)
            .await?
            .json()
            .await
            .map_err(|e| ScriptError::ResourceFetching(e.to_string()))?;

        Ok(resource.data)
    }

    async fn submit_transaction(
        &self,
        txn: &SignedTransaction,
    ) -> Result<PendingTransaction, ScriptError> {
        let response = self
            .http
            .post(self.endpoint("transactions")?)
            .header(CONTENT_TYPE, SIGNED_TXN_BCS)
            .body(txn.to_bcs()?)
            .send()
            .await
            .map_err(|e| ScriptError::TransactionSubmission(e.to_string()))?;

        checked(response, ScriptError::TransactionSubmission)
            .await?
            .json()
            .await
            .map_err(|e| ScriptError::TransactionSubmission(e.to_string()))
    }

    async fn wait_for_transaction(
        &self,
        hash: &str,
        expiration_timestamp_secs: u64,
    ) -> Result<CommittedTransaction, ScriptError> {
        loop {
            match self.lookup_transaction(hash).await? {
                TransactionLookup::Committed(txn) => return Ok(txn),
                TransactionLookup::Pending {
                    ledger_timestamp_secs,
                } => {
                    let now = ledger_timestamp_secs.unwrap_or_else(unix_now);
                    if now > expiration_timestamp_secs {
                        return Err(ScriptError::TransactionConfirmation(format!(
                            "transaction {hash} expired before being committed"
                        )));
                    }
                    debug!(hash, "Transaction still pending");
                }
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Turn a non success response into `on_error`, carrying the node message
async fn checked(
    response: Response,
    on_error: fn(String) -> ScriptError,
) -> Result<Response, ScriptError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(on_error(format!("node answered {status}: {body}")))
}

/// Ledger timestamp of a response, in seconds
fn ledger_time_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(LEDGER_TIMESTAMP_HEADER)?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()
        .map(|usecs| usecs / 1_000_000)
}
