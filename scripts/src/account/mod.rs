//! The deployer account, derived from a BIP-39 seed phrase.

pub mod derivation;

use std::fmt::{self, Debug, Formatter};

use bip39::{Language, Mnemonic};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use sha3::{Digest, Sha3_256};

use crate::{
    constants::APTOS_DERIVATION_PATH, errors::ScriptError, tx::types::AccountAddress,
};

/// Authentication scheme byte for single ed25519 keys
const ED25519_SCHEME: u8 = 0x00;

/// Signing account of a deployment run
pub struct DeployerAccount {
    /// Ed25519 key, never logged
    signing_key: SigningKey,
    /// Address derived from the public key
    address: AccountAddress,
}

impl DeployerAccount {
    /// Validate the seed phrase, then derive the account on the aptos path.
    ///
    /// Words must be separated by single spaces, with no surrounding
    /// whitespace. Derivation is pure, the same phrase always yields the same
    /// account.
    pub fn from_seed_phrase(seed_phrase: &str) -> Result<Self, ScriptError> {
        if seed_phrase
            .split(' ')
            .any(|word| word.is_empty() || word.contains(char::is_whitespace))
        {
            return Err(ScriptError::InvalidSeedPhrase(String::from(
                "words must be separated by single spaces",
            )));
        }
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, seed_phrase)
            .map_err(|e| ScriptError::InvalidSeedPhrase(e.to_string()))?;
        let seed = mnemonic.to_seed_normalized("");

        let node = derivation::derive_path(APTOS_DERIVATION_PATH, &seed)?;
        Ok(Self::from_private_key(node.signing_key.to_bytes()))
    }

    /// Build the account from a raw ed25519 secret
    pub fn from_private_key(private_key: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&private_key);
        let address = authentication_key(&signing_key.verifying_key());
        Self {
            signing_key,
            address,
        }
    }

    /// On chain address of the account
    pub fn address(&self) -> AccountAddress {
        self.address
    }

    /// Ed25519 public key
    pub fn public_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Hex encoded private key, `0x` prefixed
    pub fn private_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.signing_key.to_bytes()))
    }

    /// Sign `message` with the account key
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }
}

impl Debug for DeployerAccount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployerAccount")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// `sha3_256(public_key || scheme)`, which is also the initial account address
fn authentication_key(public_key: &VerifyingKey) -> AccountAddress {
    let mut hasher = Sha3_256::new();
    hasher.update(public_key.as_bytes());
    hasher.update([ED25519_SCHEME]);
    AccountAddress::new(hasher.finalize().into())
}
