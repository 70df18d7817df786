//! Definitions of errors that can occur during the execution of the deploy scripts

use thiserror::Error;

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The seed phrase is not a valid BIP-39 mnemonic
    #[error("invalid seed phrase, make sure it's correct: {0}")]
    InvalidSeedPhrase(String),
    /// Error while walking the hd derivation path
    #[error("error deriving the deployer key: {0}")]
    KeyDerivation(String),
    /// Error when creating the client
    #[error("error during client init: {0}")]
    ClientInitialization(String),
    /// Error when fetching the sequence number of the deployer
    #[error("error during sequence number fetching: {0}")]
    SequenceNumberFetching(String),
    /// Error when reading an account resource
    #[error("error fetching account resource: {0}")]
    ResourceFetching(String),
    /// Error reading the package files from disk
    #[error("error reading move package: {0}")]
    PackageRead(String),
    /// Error compiling the package
    #[error("error compiling move package: {0}")]
    PackageCompilation(String),
    /// Error encoding a transaction to bcs
    #[error("error serializing transaction: {0}")]
    Serialization(String),
    /// The node refused (or never answered) the submission
    #[error("error submitting transaction: {0}")]
    TransactionSubmission(String),
    /// The transaction never reached a successful terminal state
    #[error("error waiting for transaction: {0}")]
    TransactionConfirmation(String),
    /// A non-compilation external command failed
    #[error("external command failed: {0}")]
    ExternalCommand(String),
    /// Error when building output file
    #[error("error writing json output: {0}")]
    JsonOutputError(String),
}
