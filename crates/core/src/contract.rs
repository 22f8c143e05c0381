//! Garden contract trait — the on-chain surface the bot reads and writes.
//!
//! The contract numbers stages and paths from 1; callers convert to and from
//! the zero-based indices used by [`crate::session`].

use alloy::primitives::utils::{ParseUnits, parse_units};
use async_trait::async_trait;

use crate::error::ContractError;
use crate::session::SessionInfo;

pub use alloy::primitives::{Address, TxHash, U256};

/// Fee and nonce settings for the write call.
///
/// Unset fields are filled in from the node before signing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionConfig {
    /// Gas limit
    pub gas_limit: Option<u64>,

    /// Legacy gas price in wei
    pub gas_price: Option<u128>,

    /// EIP-1559 max fee per gas in wei
    pub max_fee_per_gas: Option<u128>,

    /// EIP-1559 max priority fee per gas in wei
    pub max_priority_fee_per_gas: Option<u128>,

    /// Explicit account nonce
    pub nonce: Option<u64>,
}

/// Parse an amount such as `"30 gwei"`, `"0.5 ether"` or `"1000"` into wei.
pub fn parse_amount(input: &str) -> Result<u128, ContractError> {
    let invalid = |reason: String| ContractError::InvalidAmount(format!("{input:?}: {reason}"));

    let s = input.trim();
    let split = s
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);
    let unit = match unit.trim().to_ascii_lowercase().as_str() {
        "" => "wei".to_string(),
        "eth" => "ether".to_string(),
        other => other.to_string(),
    };

    let wei = match parse_units(number.trim(), unit.as_str()).map_err(|e| invalid(e.to_string()))? {
        ParseUnits::U256(wei) => wei,
        ParseUnits::I256(_) => return Err(invalid("amount is negative".into())),
    };
    u128::try_from(wei).map_err(|_| invalid("too large".into()))
}

/// The Garden of Forking Paths contract.
#[async_trait]
pub trait GardenContract: Send + Sync {
    /// Read a session's configuration and activity flags.
    async fn get_session(&self, session_id: u64) -> Result<SessionInfo, ContractError>;

    /// Read the one-based number of the session's current stage.
    async fn get_current_stage(&self, session_id: u64) -> Result<u64, ContractError>;

    /// Submit one-based path choices for the current stage on behalf of tokens.
    ///
    /// Fails with [`ContractError::MissingSender`] when no signing account is
    /// available.
    async fn choose_current_stage_paths(
        &self,
        session_id: u64,
        token_ids: &[u64],
        paths: &[u64],
        config: &TransactionConfig,
    ) -> Result<TxHash, ContractError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_in_units() {
        assert_eq!(parse_amount("1000").unwrap(), 1000);
        assert_eq!(parse_amount("7 wei").unwrap(), 7);
        assert_eq!(parse_amount("30 gwei").unwrap(), 30_000_000_000);
        assert_eq!(parse_amount("1.5gwei").unwrap(), 1_500_000_000);
        assert_eq!(parse_amount("0.01 ether").unwrap(), 10_000_000_000_000_000);
        assert_eq!(parse_amount("2 ETH").unwrap(), 2_000_000_000_000_000_000);
    }

    #[test]
    fn bad_amounts_rejected() {
        assert!(parse_amount("ten gwei").is_err());
        assert!(parse_amount("5 doge").is_err());
        assert!(parse_amount("-1 gwei").is_err());
    }

    #[test]
    fn amount_beyond_u128_rejected() {
        let err = parse_amount("1000000000000000000000 ether").unwrap_err();
        assert!(matches!(err, ContractError::InvalidAmount(msg) if msg.contains("too large")));
    }
}
