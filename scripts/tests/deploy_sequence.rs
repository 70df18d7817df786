//! Drives the full deployment sequence against in memory node and process doubles

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use async_trait::async_trait;
use scripts::{
    config::{DeployConfig, PublishMode},
    deploy::deploy_package,
    errors::ScriptError,
    output_writer::{read_output_file, OutputKeys},
    tx::{
        client::{AccountInfo, CommittedTransaction, NodeApi, PendingTransaction},
        types::{AccountAddress, SignedTransaction, TransactionPayload},
    },
    utils::{unix_now, CommandRunner, ExternalCommand},
};
use serde_json::{json, Value};
use tempfile::TempDir;

const MANIFEST: &str = "[package]\nname = \"hello_blockchain\"\nversion = \"0.0.1\"\n";

fn valid_phrase() -> String {
    format!("{} about", ["abandon"; 11].join(" "))
}

struct MockNode {
    chain_id: u8,
    sequence_number: u64,
    commit_success: bool,
    calls: Mutex<Vec<&'static str>>,
    submitted: Mutex<Vec<SignedTransaction>>,
    waited: Mutex<Vec<(String, u64)>>,
}

impl MockNode {
    fn new(sequence_number: u64) -> Self {
        Self {
            chain_id: 1,
            sequence_number,
            commit_success: true,
            calls: Mutex::new(vec![]),
            submitted: Mutex::new(vec![]),
            waited: Mutex::new(vec![]),
        }
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NodeApi for MockNode {
    async fn get_chain_id(&self) -> Result<u8, ScriptError> {
        self.calls.lock().unwrap().push("chain_id");
        Ok(self.chain_id)
    }

    async fn get_account(&self, _address: AccountAddress) -> Result<AccountInfo, ScriptError> {
        self.calls.lock().unwrap().push("account");
        Ok(AccountInfo {
            sequence_number: self.sequence_number,
        })
    }

    async fn get_account_resource(
        &self,
        _address: AccountAddress,
        _resource_type: &str,
    ) -> Result<Value, ScriptError> {
        self.calls.lock().unwrap().push("resource");
        Ok(json!({ "coin": { "value": "1500" } }))
    }

    async fn submit_transaction(
        &self,
        txn: &SignedTransaction,
    ) -> Result<PendingTransaction, ScriptError> {
        self.calls.lock().unwrap().push("submit");
        self.submitted.lock().unwrap().push(txn.clone());
        Ok(PendingTransaction {
            hash: String::from("0xfeed"),
        })
    }

    async fn wait_for_transaction(
        &self,
        hash: &str,
        expiration_timestamp_secs: u64,
    ) -> Result<CommittedTransaction, ScriptError> {
        self.calls.lock().unwrap().push("wait");
        self.waited
            .lock()
            .unwrap()
            .push((hash.to_string(), expiration_timestamp_secs));
        Ok(CommittedTransaction {
            hash: hash.to_string(),
            version: 42,
            success: self.commit_success,
            vm_status: String::from(if self.commit_success {
                "Executed successfully"
            } else {
                "Move abort"
            }),
        })
    }
}

/// Records commands, failing the ones whose arguments contain `fail_on`
struct MockRunner {
    fail_on: Option<&'static str>,
    ran: Mutex<Vec<String>>,
}

impl MockRunner {
    fn succeeding() -> Self {
        Self {
            fail_on: None,
            ran: Mutex::new(vec![]),
        }
    }

    fn failing_on(word: &'static str) -> Self {
        Self {
            fail_on: Some(word),
            ran: Mutex::new(vec![]),
        }
    }

    fn ran(&self) -> Vec<String> {
        self.ran.lock().unwrap().clone()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, cmd: &ExternalCommand) -> io::Result<bool> {
        self.ran.lock().unwrap().push(cmd.to_string());
        Ok(!self
            .fail_on
            .is_some_and(|word| cmd.args.iter().any(|arg| arg == word)))
    }
}

fn package_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Move.toml"), MANIFEST).unwrap();
    dir
}

fn config(dir: &Path, seed_phrase: &str, mode: PublishMode) -> DeployConfig {
    DeployConfig {
        seed_phrase: seed_phrase.to_string(),
        node_url: String::from("https://node.example"),
        package_dir: dir.to_path_buf(),
        package_file: PathBuf::from("Move.toml"),
        output_file: Some(dir.join("deployed.json")),
        mode,
    }
}

const COMPILE: &str = "aptos move compile --save-metadata --included-artifacts sparse";
const PUBLISH: &str = "aptos move publish";

#[tokio::test]
async fn cli_mode_never_touches_the_network() {
    let dir = package_dir();
    let node = MockNode::new(0);
    let runner = MockRunner::succeeding();

    let outcome = deploy_package(&config(dir.path(), &valid_phrase(), PublishMode::Cli), &node, &runner)
        .await
        .unwrap();

    assert_eq!(runner.ran(), vec![COMPILE, PUBLISH]);
    assert!(node.calls().is_empty());
    assert!(outcome.cli_published);
    assert_eq!(outcome.committed, None);
}

#[tokio::test]
async fn failed_compilation_stops_the_run() {
    let dir = package_dir();
    let node = MockNode::new(0);
    let runner = MockRunner::failing_on("compile");

    let err = deploy_package(&config(dir.path(), &valid_phrase(), PublishMode::Both), &node, &runner)
        .await
        .unwrap_err();

    assert!(matches!(err, ScriptError::PackageCompilation(_)));
    assert_eq!(runner.ran(), vec![COMPILE]);
    assert!(node.calls().is_empty());
}

#[tokio::test]
async fn invalid_seed_phrase_fails_before_any_request() {
    let dir = package_dir();
    let node = MockNode::new(0);
    let runner = MockRunner::succeeding();
    let phrase = ["abandon"; 12].join(" ");

    let err = deploy_package(&config(dir.path(), &phrase, PublishMode::Both), &node, &runner)
        .await
        .unwrap_err();

    assert!(matches!(err, ScriptError::InvalidSeedPhrase(_)));
    assert!(node.calls().is_empty());
    assert_eq!(runner.ran(), vec![COMPILE]);
}

#[tokio::test]
async fn api_mode_submits_and_waits_once() {
    let dir = package_dir();
    let node = MockNode::new(7);
    let runner = MockRunner::succeeding();

    let before = unix_now();
    let outcome = deploy_package(&config(dir.path(), &valid_phrase(), PublishMode::Api), &node, &runner)
        .await
        .unwrap();
    let after = unix_now();

    assert_eq!(node.calls(), vec!["chain_id", "account", "submit", "wait"]);
    assert_eq!(runner.ran(), vec![COMPILE]);
    assert!(!outcome.cli_published);

    let waited = node.waited.lock().unwrap().clone();
    assert_eq!(waited.len(), 1);
    assert_eq!(waited[0].0, "0xfeed");
    assert!(waited[0].1 >= before + 600 && waited[0].1 <= after + 600);

    let submitted = node.submitted.lock().unwrap().clone();
    let raw_txn = submitted[0].raw_txn();
    assert_eq!(raw_txn.sequence_number(), 7);
    assert_eq!(raw_txn.sender(), outcome.address);
    assert_eq!(raw_txn.expiration_timestamp_secs(), waited[0].1);

    let TransactionPayload::EntryFunction(function) = raw_txn.payload();
    let published: Vec<u8> = bcs::from_bytes(&function.args[0]).unwrap();
    assert_eq!(published, MANIFEST.as_bytes());

    assert_eq!(outcome.committed.unwrap().version, 42);
}

#[tokio::test]
async fn api_mode_records_the_deployment() {
    let dir = package_dir();
    let node = MockNode::new(0);
    let runner = MockRunner::succeeding();

    let outcome = deploy_package(&config(dir.path(), &valid_phrase(), PublishMode::Api), &node, &runner)
        .await
        .unwrap();

    let output = dir.path().join("deployed.json");
    let package = || String::from("hello_blockchain");
    assert_eq!(
        read_output_file(&output, OutputKeys::Publish { package: package() }).unwrap(),
        "0xfeed"
    );
    assert_eq!(
        read_output_file(&output, OutputKeys::Sender { package: package() }).unwrap(),
        outcome.address.to_string()
    );
}

#[tokio::test]
async fn both_mode_publishes_with_cli_after_commit() {
    let dir = package_dir();
    let node = MockNode::new(1);
    let runner = MockRunner::succeeding();

    let outcome = deploy_package(&config(dir.path(), &valid_phrase(), PublishMode::Both), &node, &runner)
        .await
        .unwrap();

    assert_eq!(runner.ran(), vec![COMPILE, PUBLISH]);
    assert_eq!(node.waited.lock().unwrap().len(), 1);
    assert!(outcome.cli_published);
    assert!(outcome.committed.is_some());
}

#[tokio::test]
async fn failed_transaction_skips_cli_publish() {
    let dir = package_dir();
    let mut node = MockNode::new(1);
    node.commit_success = false;
    let runner = MockRunner::succeeding();

    let err = deploy_package(&config(dir.path(), &valid_phrase(), PublishMode::Both), &node, &runner)
        .await
        .unwrap_err();

    assert!(matches!(err, ScriptError::TransactionConfirmation(msg) if msg.contains("Move abort")));
    assert_eq!(runner.ran(), vec![COMPILE]);
    assert!(!dir.path().join("deployed.json").exists());
}

#[tokio::test]
async fn wrong_network_is_refused_before_signing() {
    let dir = package_dir();
    let mut node = MockNode::new(1);
    node.chain_id = 2;
    let runner = MockRunner::succeeding();

    let err = deploy_package(&config(dir.path(), &valid_phrase(), PublishMode::Api), &node, &runner)
        .await
        .unwrap_err();

    assert!(matches!(err, ScriptError::ClientInitialization(_)));
    assert_eq!(node.calls(), vec!["chain_id"]);
}

#[tokio::test]
async fn missing_package_file_fails_before_any_request() {
    let dir = package_dir();
    let node = MockNode::new(1);
    let runner = MockRunner::succeeding();
    let mut config = config(dir.path(), &valid_phrase(), PublishMode::Api);
    config.package_file = PathBuf::from("build/package.bcs");

    let err = deploy_package(&config, &node, &runner).await.unwrap_err();

    assert!(matches!(err, ScriptError::PackageRead(_)));
    assert!(node.calls().is_empty());
}

#[tokio::test]
async fn cli_publish_failure_is_reported() {
    let dir = package_dir();
    let node = MockNode::new(1);
    let runner = MockRunner::failing_on("publish");

    let err = deploy_package(&config(dir.path(), &valid_phrase(), PublishMode::Cli), &node, &runner)
        .await
        .unwrap_err();

    assert!(matches!(err, ScriptError::ExternalCommand(_)));
    assert_eq!(runner.ran(), vec![COMPILE, PUBLISH]);
}

#[tokio::test]
async fn balance_reads_the_coin_store() {
    let node = MockNode::new(0);
    let balance = scripts::tx::reader::get_coin_balance(&node, AccountAddress::new([1; 32]))
        .await
        .unwrap();

    assert_eq!(balance, 1500);
    assert_eq!(node.calls(), vec!["resource"]);
}
