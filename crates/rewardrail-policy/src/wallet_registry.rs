//! Wallet link registry — one wallet per account, bounded switches.
//!
//! The reverse index over active addresses is the final arbiter of
//! cross-account uniqueness; [`WalletRegistry::check_eligibility`] is a
//! fast-fail UX pre-check only, and [`WalletRegistry::link_wallet`]
//! re-runs every check inside the mutation so two users racing for the
//! same address cannot both win.

use chrono::{DateTime, Utc};
use rewardrail_types::{
    constants, RewardrailError, Result, UserId, WalletAddress, WalletLink,
};
use std::collections::HashMap;

/// One entry in the wallet-change audit trail.
#[derive(Debug, Clone)]
pub struct WalletLinkChange {
    pub user_id: UserId,
    pub previous: Option<WalletAddress>,
    pub new: WalletAddress,
    pub changed_at: DateTime<Utc>,
}

/// Enforces the one-wallet-per-account policy.
pub struct WalletRegistry {
    /// Active link per user. Updated in place on a switch.
    links: HashMap<UserId, WalletLink>,
    /// Reverse index: active address → owning user. The uniqueness
    /// constraint.
    by_address: HashMap<WalletAddress, UserId>,
    /// Append-only record of every link and switch.
    audit: Vec<WalletLinkChange>,
    /// Maximum switches per account.
    max_switches: u32,
}

impl WalletRegistry {
    /// Create a registry with the default switch cap.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_switches(constants::MAX_WALLET_SWITCHES)
    }

    /// Create a registry with a custom switch cap.
    #[must_use]
    pub fn with_max_switches(max_switches: u32) -> Self {
        Self {
            links: HashMap::new(),
            by_address: HashMap::new(),
            audit: Vec::new(),
            max_switches,
        }
    }

    /// Fast-fail eligibility pre-check. `Ok(())` means the address can
    /// currently be linked; the authoritative decision is still made
    /// inside [`WalletRegistry::link_wallet`].
    ///
    /// # Errors
    /// - `WalletAlreadyLinkedElsewhere` if the address is another user's
    ///   active link
    /// - `SwitchLimitExceeded` if this would be a switch and the cap is
    ///   exhausted
    pub fn check_eligibility(&self, user_id: UserId, address: &WalletAddress) -> Result<()> {
        if let Some(owner) = self.by_address.get(address) {
            if *owner != user_id {
                return Err(RewardrailError::WalletAlreadyLinkedElsewhere(
                    address.clone(),
                ));
            }
        }

        if let Some(link) = self.links.get(&user_id) {
            if link.address != *address && link.switch_count >= self.max_switches {
                return Err(RewardrailError::SwitchLimitExceeded {
                    switches: link.switch_count,
                    max: self.max_switches,
                });
            }
        }

        Ok(())
    }

    /// Link a wallet to a user. First link creates; re-linking the
    /// currently active address is a no-op success (not a switch); a
    /// legitimate switch updates the address and increments the switch
    /// count.
    ///
    /// # Errors
    /// Same conditions as [`WalletRegistry::check_eligibility`],
    /// re-validated here.
    pub fn link_wallet(
        &mut self,
        user_id: UserId,
        address: WalletAddress,
        now: DateTime<Utc>,
    ) -> Result<&WalletLink> {
        // Final arbiter: the pre-check may be stale by the time we mutate.
        self.check_eligibility(user_id, &address)?;

        match self.links.get_mut(&user_id) {
            None => {
                self.by_address.insert(address.clone(), user_id);
                self.audit.push(WalletLinkChange {
                    user_id,
                    previous: None,
                    new: address.clone(),
                    changed_at: now,
                });
                tracing::info!(%user_id, wallet = %address.short(), "wallet linked");
                self.links
                    .insert(user_id, WalletLink::new(user_id, address, now));
            }
            Some(link) if link.address == address => {
                // Re-linking the active address: nothing to do.
            }
            Some(link) => {
                let previous = link.address.clone();
                self.by_address.remove(&previous);
                self.by_address.insert(address.clone(), user_id);
                link.address = address.clone();
                link.switch_count += 1;
                link.linked_at = now;
                tracing::info!(
                    %user_id,
                    from = %previous.short(),
                    to = %address.short(),
                    switches = link.switch_count,
                    "wallet switched"
                );
                self.audit.push(WalletLinkChange {
                    user_id,
                    previous: Some(previous),
                    new: address,
                    changed_at: now,
                });
            }
        }

        Ok(&self.links[&user_id])
    }

    /// The user's active wallet link, if any.
    #[must_use]
    pub fn active_link(&self, user_id: UserId) -> Option<&WalletLink> {
        self.links.get(&user_id)
    }

    /// The user currently owning an address, if any.
    #[must_use]
    pub fn owner_of(&self, address: &WalletAddress) -> Option<UserId> {
        self.by_address.get(address).copied()
    }

    /// The wallet-change audit trail, oldest first.
    #[must_use]
    pub fn audit_trail(&self) -> &[WalletLinkChange] {
        &self.audit
    }
}

impl Default for WalletRegistry {
    fn default() -> Self {
        Self::new()
    }
}
