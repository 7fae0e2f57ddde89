//! Wallet address and link types.
//!
//! Addresses are normalized to lower-case at construction, so equality
//! (and therefore the registry's uniqueness index) is case-insensitive
//! by construction — `0xABC…` and `0xabc…` are the same address.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{constants, RewardrailError, Result, UserId};

/// A validated, lower-case-normalized on-chain wallet address
/// (`0x` + 40 hex characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Parse and normalize an address string.
    ///
    /// # Errors
    /// Returns `InvalidWalletAddress` if the prefix, length, or hex
    /// payload is malformed.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let Some(payload) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) else {
            return Err(RewardrailError::InvalidWalletAddress {
                reason: "missing 0x prefix".to_string(),
            });
        };
        if payload.len() != constants::WALLET_ADDRESS_HEX_LEN {
            return Err(RewardrailError::InvalidWalletAddress {
                reason: format!(
                    "expected {} hex characters, got {}",
                    constants::WALLET_ADDRESS_HEX_LEN,
                    payload.len()
                ),
            });
        }
        if hex::decode(payload).is_err() {
            return Err(RewardrailError::InvalidWalletAddress {
                reason: "non-hex characters in payload".to_string(),
            });
        }
        Ok(Self(format!("0x{}", payload.to_ascii_lowercase())))
    }

    /// The normalized address string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for logs (`0x1234…abcd`).
    #[must_use]
    pub fn short(&self) -> String {
        format!("{}…{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The single active wallet link for a user. Updated in place on a
/// switch, never replaced, so `switch_count` survives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletLink {
    pub user_id: UserId,
    pub address: WalletAddress,
    /// Number of times the linked address has been changed. Capped;
    /// reaching the cap blocks further switches, not existing use.
    pub switch_count: u32,
    pub linked_at: DateTime<Utc>,
}

impl WalletLink {
    /// First-time link for a user.
    #[must_use]
    pub fn new(user_id: UserId, address: WalletAddress, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            address,
            switch_count: 0,
            linked_at: now,
        }
    }
}

/// Dummy addresses for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl WalletAddress {
    /// Random valid address for unit tests.
    pub fn dummy() -> Self {
        let bytes: [u8; 20] = rand::random();
        Self(format!("0x{}", hex::encode(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

    #[test]
    fn parse_normalizes_lowercase() {
        let addr = WalletAddress::parse(ADDR).unwrap();
        assert_eq!(
            addr.as_str(),
            "0x52908400098527886e0f7030069857d2e4169ee7"
        );
    }

    #[test]
    fn mixed_case_addresses_are_equal() {
        let upper = WalletAddress::parse(ADDR).unwrap();
        let lower = WalletAddress::parse(&ADDR.to_ascii_lowercase()).unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn missing_prefix_rejected() {
        let err = WalletAddress::parse("52908400098527886E0F7030069857D2E4169EE7").unwrap_err();
        assert!(matches!(
            err,
            RewardrailError::InvalidWalletAddress { .. }
        ));
    }

    #[test]
    fn wrong_length_rejected() {
        let err = WalletAddress::parse("0xabc123").unwrap_err();
        assert!(matches!(
            err,
            RewardrailError::InvalidWalletAddress { .. }
        ));
    }

    #[test]
    fn non_hex_payload_rejected() {
        let err =
            WalletAddress::parse("0xZZ908400098527886E0F7030069857D2E4169EE7").unwrap_err();
        assert!(matches!(
            err,
            RewardrailError::InvalidWalletAddress { .. }
        ));
    }

    #[test]
    fn short_form() {
        let addr = WalletAddress::parse(ADDR).unwrap();
        assert_eq!(addr.short(), "0x5290…9ee7");
    }

    #[test]
    fn new_link_has_zero_switches() {
        let link = WalletLink::new(UserId::new(), WalletAddress::dummy(), Utc::now());
        assert_eq!(link.switch_count, 0);
    }

    #[test]
    fn serde_roundtrip() {
        let addr = WalletAddress::parse(ADDR).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        let back: WalletAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);
    }
}
