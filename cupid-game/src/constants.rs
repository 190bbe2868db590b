//! Centralized balance and tuning constants for Cupid.exe game logic.
//!
//! These values define the deterministic math of a match. Structural
//! tunables that table variants disagree on (round bounds, roster bounds,
//! event probability) live in [`crate::config::GameConfig`] instead.

// Scoring ------------------------------------------------------------------
pub const SCORE_DARE_SUCCESS: f64 = 3.0;
pub const SCORE_FAIL: f64 = -1.0;
pub const SCORE_SAFE_SKIP: f64 = -1.0;
pub const SCORE_PUNISHMENT: f64 = -2.0;
pub const SCORE_EVENT: f64 = 1.0;
/// Extra weight applied when a player is caught skipping a punishment.
pub const PUNISHMENT_SKIP_PENALTY_MULT: f64 = 1.5;
/// Each prior skip in the streak worsens a safe skip by this fraction.
pub const SAFE_SKIP_STREAK_STEP: f64 = 0.5;

pub const DARING_MULT_LOW: f64 = 0.8;
pub const DARING_MULT_MEDIUM: f64 = 1.0;
pub const DARING_MULT_HIGH: f64 = 1.3;

// Levels -------------------------------------------------------------------
pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 3;
/// Round difficulty steps up once every this many rounds.
pub const ROUNDS_PER_LEVEL: u32 = 2;

// Skip roll ----------------------------------------------------------------
pub const SKIP_ROLL_SCALE: f64 = 100.0;
pub const SKIP_SAFE_BASE: u32 = 40;
pub const SKIP_SAFE_STEP: u32 = 10;
pub const SKIP_PUNISHMENT_BASE: u32 = 40;
pub const SKIP_PUNISHMENT_STEP: u32 = 5;
pub const SKIP_PUNISHMENT_CAP: u32 = 70;
/// Streak at which flavor text switches to its angriest tier.
pub const SKIP_FURY_STREAK: u32 = 3;

// Roulette -----------------------------------------------------------------
pub const ROULETTE_BASE_WEIGHT: f64 = 1.0;
pub const ROULETTE_REPEAT_WEIGHT: f64 = 0.5;
pub const ROULETTE_MIN_WEIGHT: f64 = 0.5;

// Roster -------------------------------------------------------------------
pub const UNKNOWN_CRUSH: &str = "Unknown";
pub const PLAYER_ID_PREFIX: &str = "player-";

// Fallback texts -----------------------------------------------------------
pub const FALLBACK_DARE: &str = "Cupid is searching for a dare...";
pub const FALLBACK_WORSE_DARE: &str = "Cupid is thinking of something worse...";
pub const FALLBACK_PUNISHMENT: &str = "Cupid is thinking of a punishment...";
pub const FALLBACK_WORSE_PUNISHMENT: &str = "Cupid is thinking of an even WORSE punishment...";
pub const FALLBACK_EVENT: &str = "Cupid.exe encountered a mysterious glitch.";

// Routes -------------------------------------------------------------------
pub const FALLBACK_ROUTE: &str = "/";
