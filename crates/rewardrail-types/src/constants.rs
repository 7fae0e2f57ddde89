//! System-wide constants for the RewardRail engine.

/// Default daily claim limit, in points (adult accounts).
pub const DEFAULT_DAILY_CLAIM_LIMIT: i64 = 100_000;

/// Daily claim limit for child accounts, in points.
pub const CHILD_DAILY_CLAIM_LIMIT: i64 = 20_000;

/// Daily claim limit for teen accounts, in points.
pub const TEEN_DAILY_CLAIM_LIMIT: i64 = 50_000;

/// Maximum number of wallet switches per account. Exceeding it blocks
/// further switches, not use of the currently linked wallet.
pub const MAX_WALLET_SWITCHES: u32 = 3;

/// Expected hex payload length of a wallet address (after the `0x` prefix).
pub const WALLET_ADDRESS_HEX_LEN: usize = 40;

/// Sliding window over which claim requests are counted for rate limiting.
pub const TRUST_REQUEST_WINDOW_SECS: i64 = 3600;

/// Minimum account age (days) and confirmed claims for the REGULAR tier.
pub const REGULAR_MIN_ACCOUNT_AGE_DAYS: i64 = 7;
pub const REGULAR_MIN_CONFIRMED_CLAIMS: u64 = 1;

/// Minimum account age (days) and confirmed claims for the TRUSTED tier.
pub const TRUSTED_MIN_ACCOUNT_AGE_DAYS: i64 = 30;
pub const TRUSTED_MIN_CONFIRMED_CLAIMS: u64 = 5;

/// Minimum account age (days) and confirmed claims for the VETERAN tier.
pub const VETERAN_MIN_ACCOUNT_AGE_DAYS: i64 = 90;
pub const VETERAN_MIN_CONFIRMED_CLAIMS: u64 = 20;

/// Hourly claim-request ceiling per tier.
pub const NEW_HOURLY_CEILING: usize = 2;
pub const REGULAR_HOURLY_CEILING: usize = 5;
pub const TRUSTED_HOURLY_CEILING: usize = 10;
pub const VETERAN_HOURLY_CEILING: usize = 20;

/// Cooldown between claims per tier, in seconds.
pub const NEW_COOLDOWN_SECS: i64 = 1800;
pub const REGULAR_COOLDOWN_SECS: i64 = 600;
pub const TRUSTED_COOLDOWN_SECS: i64 = 60;
pub const VETERAN_COOLDOWN_SECS: i64 = 0;

/// How long a claim may sit in SUBMITTED before the reconciler queries
/// the rail for its fate.
pub const DEFAULT_RECONCILE_AFTER_SECS: i64 = 300;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "RewardRail";
