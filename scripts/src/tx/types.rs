//! Transaction types, laid out the way the aptos node expects them in BCS.

use std::{
    fmt::{self, Debug, Display, Formatter},
    str::FromStr,
};

use ed25519_dalek::{Signature, VerifyingKey};
use serde::{Serialize, Serializer};
use sha3::{Digest, Sha3_256};

use crate::{
    constants::{GAS_UNIT_PRICE, MAINNET_CHAIN_ID, MAX_GAS_AMOUNT, RAW_TXN_SALT, TXN_EXPIRATION_SECS},
    errors::ScriptError,
};

/// A 32 bytes account address
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AccountAddress([u8; 32]);

impl AccountAddress {
    /// Size of an address, in bytes
    pub const LENGTH: usize = 32;

    /// Wrap raw address bytes
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Display for AccountAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Debug for AccountAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl FromStr for AccountAddress {
    type Err = ScriptError;

    /// Accepts short forms such as `0x1`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() || digits.len() > Self::LENGTH * 2 {
            return Err(ScriptError::Serialization(format!("invalid address: {s}")));
        }
        // Left pad to a full 64 hex chars
        let padded = format!("{digits:0>64}");
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(padded, &mut bytes)
            .map_err(|e| ScriptError::Serialization(format!("invalid address {s}: {e}")))?;
        Ok(Self(bytes))
    }
}

/// Fully qualified module name, `address::name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleId {
    /// Account the module is published under
    pub address: AccountAddress,
    /// Module name
    pub name: String,
}

impl FromStr for ModuleId {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address, name) = s
            .split_once("::")
            .ok_or_else(|| ScriptError::Serialization(format!("invalid module id: {s}")))?;
        if name.is_empty() || name.contains("::") {
            return Err(ScriptError::Serialization(format!("invalid module id: {s}")));
        }
        Ok(Self {
            address: address.parse()?,
            name: name.to_string(),
        })
    }
}

/// Type argument of an entry function call
///
/// The publish call is not generic, so no tag can be built and the list
/// always encodes as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeTag {}

/// An entry function call descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryFunction {
    /// Module declaring the function
    pub module: ModuleId,
    /// Function name
    pub function: String,
    /// Generic type arguments
    pub ty_args: Vec<TypeTag>,
    /// Each argument is itself a bcs encoded value
    pub args: Vec<Vec<u8>>,
}

/// What a transaction executes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionPayload {
    /// Call to an entry function
    EntryFunction(EntryFunction),
}

impl Serialize for TransactionPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Variant indexes 0 and 1 are the legacy script and module bundle payloads
        match self {
            TransactionPayload::EntryFunction(function) => serializer.serialize_newtype_variant(
                "TransactionPayload",
                2,
                "EntryFunction",
                function,
            ),
        }
    }
}

/// Network identifier signed into every transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChainId(
    /// Raw chain id
    pub u8,
);

impl ChainId {
    /// Aptos mainnet
    pub const MAINNET: ChainId = ChainId(MAINNET_CHAIN_ID);
}

/// An unsigned transaction, immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawTransaction {
    /// Account paying for and authorizing the transaction
    sender: AccountAddress,
    /// Sender sequence number this transaction consumes
    sequence_number: u64,
    /// What to execute
    payload: TransactionPayload,
    /// Max gas units
    max_gas_amount: u64,
    /// Octas per gas unit
    gas_unit_price: u64,
    /// Unix seconds after which the transaction is discarded
    expiration_timestamp_secs: u64,
    /// Network the transaction is valid on
    chain_id: ChainId,
}

impl RawTransaction {
    /// Build a mainnet transaction expiring ten minutes after `constructed_at` (unix secs)
    pub fn new(
        sender: AccountAddress,
        sequence_number: u64,
        payload: TransactionPayload,
        constructed_at: u64,
    ) -> Self {
        Self {
            sender,
            sequence_number,
            payload,
            max_gas_amount: MAX_GAS_AMOUNT,
            gas_unit_price: GAS_UNIT_PRICE,
            expiration_timestamp_secs: constructed_at + TXN_EXPIRATION_SECS,
            chain_id: ChainId::MAINNET,
        }
    }

    /// Sender address
    pub fn sender(&self) -> AccountAddress {
        self.sender
    }

    /// Sequence number
    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    /// Payload
    pub fn payload(&self) -> &TransactionPayload {
        &self.payload
    }

    /// Max gas units
    pub fn max_gas_amount(&self) -> u64 {
        self.max_gas_amount
    }

    /// Octas per gas unit
    pub fn gas_unit_price(&self) -> u64 {
        self.gas_unit_price
    }

    /// Expiration, unix seconds
    pub fn expiration_timestamp_secs(&self) -> u64 {
        self.expiration_timestamp_secs
    }

    /// Chain id
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// The bytes covered by the signature: `sha3(salt) || bcs(self)`
    pub fn signing_message(&self) -> Result<Vec<u8>, ScriptError> {
        let mut message = Sha3_256::digest(RAW_TXN_SALT).to_vec();
        message.extend(bcs::to_bytes(self).map_err(|e| ScriptError::Serialization(e.to_string()))?);
        Ok(message)
    }
}

/// Ed25519 public key, encoded as a length prefixed byte string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ed25519PublicKey(
    /// The dalek key
    pub VerifyingKey,
);

impl Serialize for Ed25519PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.0.as_bytes())
    }
}

/// Ed25519 signature, encoded as a length prefixed byte string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ed25519Signature(
    /// The dalek signature
    pub Signature,
);

impl Serialize for Ed25519Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0.to_bytes())
    }
}

/// Proof that the sender authorized the transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TransactionAuthenticator {
    /// Single ed25519 key
    Ed25519 {
        /// Key of the sender
        public_key: Ed25519PublicKey,
        /// Signature over the signing message
        signature: Ed25519Signature,
    },
}

/// A raw transaction and its authenticator, ready for submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedTransaction {
    /// The signed transaction
    raw_txn: RawTransaction,
    /// Sender proof
    authenticator: TransactionAuthenticator,
}

impl SignedTransaction {
    /// Pair a raw transaction with its authenticator
    pub fn new(raw_txn: RawTransaction, authenticator: TransactionAuthenticator) -> Self {
        Self {
            raw_txn,
            authenticator,
        }
    }

    /// The raw transaction
    pub fn raw_txn(&self) -> &RawTransaction {
        &self.raw_txn
    }

    /// The authenticator
    pub fn authenticator(&self) -> &TransactionAuthenticator {
        &self.authenticator
    }

    /// BCS body sent to the node
    pub fn to_bcs(&self) -> Result<Vec<u8>, ScriptError> {
        bcs::to_bytes(self).map_err(|e| ScriptError::Serialization(e.to_string()))
    }
}
