//! System-wide constants for the LastBite marketplace core.

/// Decimal places for prices (USD cents).
pub const PRICE_DECIMALS: u32 = 2;

/// Fixed bid increment in cents: a new bid must beat the current highest
/// by at least this much.
pub const BID_INCREMENT_CENTS: i64 = 50;

/// Items with less than this many minutes remaining get the steepest
/// discount tier.
pub const TIER_FINAL_MINUTES: i64 = 30;

/// Items with less than this many minutes remaining (but at least
/// [`TIER_FINAL_MINUTES`]) get the middle discount tier.
pub const TIER_CLOSING_MINUTES: i64 = 60;

/// Steepest discount, in percent (under 30 minutes remaining).
pub const DISCOUNT_FINAL_PCT: i64 = 20;

/// Middle discount, in percent (30 to 60 minutes remaining).
pub const DISCOUNT_CLOSING_PCT: i64 = 15;

/// Baseline discount, in percent (an hour or more remaining).
pub const DISCOUNT_EARLY_PCT: i64 = 10;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "LastBite";
