//! SLIP-0010 hierarchical derivation over the ed25519 curve.
//!
//! Only hardened children exist on ed25519, so every path segment must carry
//! the `'` marker.

use ed25519_dalek_bip32::{DerivationPath, ExtendedSigningKey};

use crate::errors::ScriptError;

/// Walk `path` from the master node of `seed`
pub fn derive_path(path: &str, seed: &[u8]) -> Result<ExtendedSigningKey, ScriptError> {
    let path: DerivationPath = path
        .parse()
        .map_err(|e| ScriptError::KeyDerivation(format!("invalid path {path}: {e:?}")))?;

    ExtendedSigningKey::from_seed(seed)
        .and_then(|master| master.derive(&path))
        .map_err(|e| ScriptError::KeyDerivation(format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::APTOS_DERIVATION_PATH;

    // SLIP-0010 test vector 1 for ed25519
    const SEED: &str = "000102030405060708090a0b0c0d0e0f";

    #[test]
    fn master_node_matches_slip10_vector() {
        let seed = hex::decode(SEED).unwrap();
        let master = ExtendedSigningKey::from_seed(&seed).unwrap();
        assert_eq!(
            hex::encode(master.signing_key.to_bytes()),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );
        assert_eq!(
            hex::encode(master.chain_code),
            "90046a93de5380a72b5e45010748567d5ea02bbf6522f979e05c0d8d8ca9fffb"
        );
    }

    #[test]
    fn hardened_child_matches_slip10_vector() {
        let seed = hex::decode(SEED).unwrap();
        let child = derive_path("m/0'", &seed).unwrap();
        assert_eq!(
            hex::encode(child.signing_key.to_bytes()),
            "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3"
        );
        assert_eq!(
            hex::encode(child.chain_code),
            "8b59aa11380b624e81507a27fedda59fea6d0b779a778918a2fd3590e16e9c69"
        );
    }

    #[test]
    fn walks_the_aptos_path() {
        let node = derive_path(APTOS_DERIVATION_PATH, &[7u8; 64]).unwrap();
        assert_eq!(node.depth, 5);
    }

    #[test]
    fn rejects_malformed_paths() {
        let seed = [7u8; 64];
        for path in ["44'/637'", "m/abc'", "m/44/637'"] {
            let err = derive_path(path, &seed).unwrap_err();
            assert!(matches!(err, ScriptError::KeyDerivation(_)), "{path}");
        }
    }
}
