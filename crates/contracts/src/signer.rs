//! Local signing accounts.

use std::path::Path;

use alloy::signers::Signer;
use alloy::signers::local::PrivateKeySigner;
use gofp_core::error::ContractError;
use tracing::debug;

/// Decrypt a JSON keystore file.
///
/// With `chain_id` set the signer refuses transactions for any other chain.
pub fn from_keystore(
    path: &Path,
    password: &str,
    chain_id: Option<u64>,
) -> Result<PrivateKeySigner, ContractError> {
    if !path.is_file() {
        return Err(ContractError::Signer(format!(
            "keystore {} not found",
            path.display()
        )));
    }

    let signer = PrivateKeySigner::decrypt_keystore(path, password)
        .map_err(|e| ContractError::Signer(format!("{}: {e}", path.display())))?;
    debug!(address = %signer.address(), keystore = %path.display(), "Loaded keystore account");

    Ok(signer.with_chain_id(chain_id))
}

/// Parse a hex private key, with or without the `0x` prefix.
pub fn from_private_key(key: &str, chain_id: Option<u64>) -> Result<PrivateKeySigner, ContractError> {
    let signer: PrivateKeySigner = key
        .trim()
        .parse()
        .map_err(|_| ContractError::Signer("invalid private key".into()))?;
    debug!(address = %signer.address(), "Loaded private key account");

    Ok(signer.with_chain_id(chain_id))
}
