//! Fixed scoring parameters
//!
//! Weights and thresholds here are product decisions, not tunable defaults.
//! They are compile-time constants and a test asserts the weight identity so a
//! drive-by edit cannot silently change the ranking contract.

use crate::types::Persona;

// ---------------------------------------------------------------------------
// Holistic score weights
// ---------------------------------------------------------------------------

/// Circadian sub-score weight in the overall score
pub const WEIGHT_CIRCADIAN: f64 = 0.45;
/// Routing/layover strategy sub-score weight
pub const WEIGHT_STRATEGY: f64 = 0.25;
/// Cabin/airport comfort sub-score weight
pub const WEIGHT_COMFORT: f64 = 0.20;
/// Duration/stops efficiency sub-score weight
pub const WEIGHT_EFFICIENCY: f64 = 0.10;

// ---------------------------------------------------------------------------
// Recommendation tier thresholds (inclusive lower bounds)
// ---------------------------------------------------------------------------

pub const TIER_OPTIMAL: f64 = 85.0;
pub const TIER_EXCELLENT: f64 = 70.0;
pub const TIER_GOOD: f64 = 55.0;
pub const TIER_ACCEPTABLE: f64 = 40.0;

// ---------------------------------------------------------------------------
// Circadian recovery model
// ---------------------------------------------------------------------------

/// Eastbound recovery rate: one day per timezone crossed. Advancing the body
/// clock fights the natural circadian period.
pub const EASTBOUND_RECOVERY_DAYS_PER_ZONE: f64 = 1.0;

/// Westbound recovery rate, canonical value.
///
/// The natural circadian period runs ~24.2-24.5h, so phase delay absorbs about
/// 1.5 zones per day. The historical codebase carried both 0.6 and 0.67 in
/// different places; 2/3 is the single canonical constant here.
pub const WESTBOUND_RECOVERY_DAYS_PER_ZONE: f64 = 2.0 / 3.0;

/// Shifts below this many hours produce no measurable recovery time
pub const MIN_SHIFT_FOR_RECOVERY_HOURS: f64 = 2.0;

/// Recovery never exceeds this multiple of the timezone delta (sanity bound)
pub const RECOVERY_CAP_FACTOR: f64 = 1.5;

/// Arrival-hour optimality buckets: (inclusive start hour, exclusive end hour,
/// score). Hours outside every bucket score [`ARRIVAL_OPTIMALITY_FLOOR`].
pub const ARRIVAL_OPTIMALITY_BUCKETS: [(u8, u8, f64); 6] = [
    (6, 9, 10.0),
    (9, 12, 9.0),
    (12, 15, 7.0),
    (15, 18, 6.0),
    (18, 21, 4.0),
    (21, 23, 2.0),
];

/// Score for arrivals outside every bucket (23:00-06:00)
pub const ARRIVAL_OPTIMALITY_FLOOR: f64 = 1.0;

// ---------------------------------------------------------------------------
// Scenario matching
// ---------------------------------------------------------------------------

/// Persona weighting profile over (circadian, strategy, comfort, efficiency).
/// Each profile sums to 1.0 so the dot product stays on the 0-100 scale.
pub const PERSONA_PROFILES: [(Persona, [f64; 4]); 4] = [
    (Persona::BusinessTraveler, [0.35, 0.15, 0.20, 0.30]),
    (Persona::BudgetTraveler, [0.20, 0.20, 0.10, 0.50]),
    (Persona::FamilyTraveler, [0.25, 0.30, 0.35, 0.10]),
    (Persona::WellnessFocused, [0.55, 0.20, 0.20, 0.05]),
];

/// Only persona matches at or above this percentage are surfaced
pub const SCENARIO_MATCH_THRESHOLD: f64 = 70.0;

// ---------------------------------------------------------------------------
// Layover quality
// ---------------------------------------------------------------------------

/// Optimal connection window, minutes: long enough to reach the gate calmly,
/// short enough not to dominate the trip
pub const LAYOVER_OPTIMAL_MIN_MINUTES: u32 = 90;
pub const LAYOVER_OPTIMAL_MAX_MINUTES: u32 = 180;

/// Fallback connection thresholds when the airport publishes none, minutes
pub const DEFAULT_MIN_CONNECTION_MINUTES: u32 = 60;
pub const DEFAULT_REALISTIC_CONNECTION_MINUTES: u32 = 90;

/// Neutral midpoint substituted for missing 0-10 source fields
pub const NEUTRAL_MIDPOINT: f64 = 5.0;
