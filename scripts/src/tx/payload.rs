//! Entry function payload of a package publish

use crate::{
    constants::{CODE_MODULE, PUBLISH_PACKAGE_FUNCTION},
    errors::ScriptError,
    tx::types::{EntryFunction, TransactionPayload},
};

/// Build the `0x1::code::publish_package_txn` call with the package bytes as sole argument
pub fn publish_package_payload(package_bytes: &[u8]) -> Result<TransactionPayload, ScriptError> {
    let argument =
        bcs::to_bytes(package_bytes).map_err(|e| ScriptError::Serialization(e.to_string()))?;

    Ok(TransactionPayload::EntryFunction(EntryFunction {
        module: CODE_MODULE.parse()?,
        function: PUBLISH_PACKAGE_FUNCTION.to_string(),
        ty_args: vec![],
        args: vec![argument],
    }))
}
