//! Shared data model for the flight ranking engine
//!
//! Input types (flights, segments, airport records) arrive already normalized
//! from the upstream flight source and enrichment layer. Output types
//! (holistic scores, price analysis, filter results) carry structured codes
//! only; display strings are produced by the swappable formatting layer in
//! `jetrank_engine::format`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Flight input model
// ---------------------------------------------------------------------------

/// Cabin class for one segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

/// Aircraft generation class, used by the "modern aircraft only" filter.
///
/// Modern types (A350, 787 class) run lower cabin pressure altitude and higher
/// humidity, both of which reduce in-flight circadian strain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AircraftGeneration {
    Legacy,
    Standard,
    Modern,
}

/// Aircraft quality metadata resolved by the enrichment layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    /// IATA/ICAO type code (e.g. "789")
    pub type_code: String,
    pub manufacturer: String,
    /// Sleep comfort score (0.0-10.0)
    pub sleep_comfort: f64,
    pub generation: AircraftGeneration,
    /// Cabin pressure as equivalent altitude in feet
    pub cabin_pressure_altitude_ft: u32,
    /// Cabin humidity (%)
    pub cabin_humidity_pct: f64,
}

/// Airline quality metadata resolved by the enrichment layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airline {
    /// IATA carrier code (e.g. "JL")
    pub code: String,
    pub name: String,
    /// Service quality score (0.0-10.0)
    pub service_quality: f64,
    /// Jet-lag optimization score (0.0-10.0): lighting and meal-timing protocols
    pub jetlag_optimization: f64,
}

/// One operated leg of an itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Origin airport code
    pub origin: String,
    /// Destination airport code
    pub destination: String,
    /// Departure instant (UTC, not wall-clock)
    pub departure: DateTime<Utc>,
    /// Arrival instant (UTC)
    pub arrival: DateTime<Utc>,
    pub flight_number: String,
    pub aircraft: Aircraft,
    pub airline: Airline,
    pub cabin_class: CabinClass,
}

impl Segment {
    /// Segment duration in minutes (0 if timestamps are inverted)
    pub fn duration_minutes(&self) -> i64 {
        (self.arrival - self.departure).num_minutes().max(0)
    }
}

/// One connection between segments, with facilities already resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layover {
    /// Connection airport code
    pub airport: String,
    /// Time on the ground in minutes
    pub duration_minutes: u32,
    pub facilities: AirportFacilities,
}

/// One itinerary as supplied by the upstream flight source.
///
/// Immutable once constructed for a given search; owned solely by the request
/// that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOption {
    /// Opaque identifier from the upstream source
    pub id: String,
    pub origin: String,
    pub destination: String,
    /// Ordered operated legs; empty means malformed input (neutral fallback)
    pub segments: Vec<Segment>,
    pub total_duration_minutes: u32,
    pub stops: u32,
    pub price: f64,
    /// ISO 4217 currency code
    pub currency: String,
    /// Connections between segments, in itinerary order
    #[serde(default)]
    pub layovers: Vec<Layover>,
}

impl FlightOption {
    /// First departure instant, if the itinerary has any segments
    pub fn first_departure(&self) -> Option<DateTime<Utc>> {
        self.segments.first().map(|s| s.departure)
    }

    /// Last arrival instant, if the itinerary has any segments
    pub fn last_arrival(&self) -> Option<DateTime<Utc>> {
        self.segments.last().map(|s| s.arrival)
    }
}

// ---------------------------------------------------------------------------
// Airport enrichment model
// ---------------------------------------------------------------------------

/// Geographic coordinates in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Raw per-airport facility record from the enrichment layer.
///
/// Every field is optional; missing fields default to a neutral midpoint when
/// derived scores are computed (5.0 on 0-10 scales, `false` for booleans).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirportIntel {
    pub lounge_quality: Option<f64>,
    pub premium_lounge: Option<bool>,
    pub sleep_pods: Option<bool>,
    /// Sleep pod quality (0-10), when the airport has rated pods
    pub sleep_pod_quality: Option<f64>,
    pub showers: Option<bool>,
    /// Shower facility quality (0-10)
    pub shower_quality: Option<f64>,
    pub sleep_seating: Option<bool>,
    pub quiet_zones: Option<bool>,
    pub healthy_food: Option<bool>,
    /// Connection complexity (1-10, lower = easier)
    pub connection_complexity: Option<f64>,
    pub fast_track: Option<bool>,
    /// Whether connecting passengers pass security again
    pub requires_rescreening: Option<bool>,
    /// Known connection challenges (terminal changes, long walks, ...)
    #[serde(default)]
    pub major_challenges: Vec<String>,
    /// Minimum connection time published for the airport, minutes
    pub min_connection_minutes: Option<u32>,
    /// Realistic recommended connection time, minutes
    pub realistic_connection_minutes: Option<u32>,
}

/// Derived airport facility profile (never stored raw; always computed from
/// an [`AirportIntel`] record or substituted with neutral defaults)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportFacilities {
    pub sleep_pods: bool,
    pub showers: bool,
    pub lounge_access: bool,
    pub quiet_zones: bool,
    pub healthy_food: bool,
    /// Lounge quality (0-10)
    pub lounge_quality: f64,
    /// Connection complexity (1-10, lower = easier)
    pub connection_complexity: f64,
    pub fast_track: bool,
    pub requires_rescreening: bool,
    /// Derived comfort score (0-10)
    pub comfort_score: f64,
    /// Derived stress score (0-10, lower = calmer)
    pub stress_score: f64,
    /// Derived jet-lag support score (0-10)
    pub jetlag_support_score: f64,
    /// Minimum connection time, minutes
    pub min_connection_minutes: u32,
    /// Realistic recommended connection time, minutes
    pub realistic_connection_minutes: u32,
    /// Set when the source record was missing and neutral defaults were used
    pub reduced_confidence: bool,
}

/// Resolved airport record from the enrichment layer. Raw facility records
/// ([`AirportIntel`]) are consumed upstream, where layover facilities are
/// resolved; the directory carries only the geometry the engine reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportInfo {
    pub code: String,
    pub coords: Option<GeoPoint>,
    /// UTC offset in hours (may be fractional, e.g. +5.5)
    pub utc_offset_hours: Option<f64>,
}

/// Enrichment-layer seam: resolves airport codes to coordinates and timezone
/// offsets.
///
/// The engine depends only on this interface; whether the caller backs it with
/// the legacy key-value fact table or the consolidated JSON-column table is
/// irrelevant here. A lookup miss returns `None` and the engine substitutes
/// neutral defaults with reduced confidence.
pub trait AirportDirectory: Sync {
    fn lookup(&self, code: &str) -> Option<AirportInfo>;
}

/// In-memory directory, used by tests and simple callers
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    airports: HashMap<String, AirportInfo>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, info: AirportInfo) {
        self.airports.insert(info.code.clone(), info);
    }
}

impl AirportDirectory for StaticDirectory {
    fn lookup(&self, code: &str) -> Option<AirportInfo> {
        self.airports.get(code).cloned()
    }
}

// ---------------------------------------------------------------------------
// Circadian model output
// ---------------------------------------------------------------------------

/// Travel direction relative to the dominant coordinate delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelDirection {
    /// Body clock must advance (harder adaptation)
    Eastbound,
    /// Body clock delays (easier; natural period exceeds 24h)
    Westbound,
    Northbound,
    Southbound,
    /// Origin and destination resolve to the same timezone
    None,
}

impl TravelDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelDirection::Eastbound => "eastbound",
            TravelDirection::Westbound => "westbound",
            TravelDirection::Northbound => "northbound",
            TravelDirection::Southbound => "southbound",
            TravelDirection::None => "none",
        }
    }
}

/// Circadian model output for one flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircadianAssessment {
    /// Absolute timezone delta in hours (0-12, normalized across the ±180° wrap)
    pub timezones_crossed: f64,
    pub direction: TravelDirection,
    /// Arrival-time optimality (1-10), from the local arrival hour bucket table
    pub arrival_optimality: f64,
    /// Estimated recovery days (>= 0)
    pub estimated_recovery_days: f64,
    /// Set when an endpoint could not be resolved and estimates fell back to
    /// neutral values
    pub degraded: bool,
}

// ---------------------------------------------------------------------------
// Holistic score output
// ---------------------------------------------------------------------------

/// Recommendation tier on the overall jetlag score.
/// Boundaries are inclusive on the lower bound of each tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTier {
    Poor,
    Acceptable,
    Good,
    Excellent,
    Optimal,
}

impl RecommendationTier {
    /// Tier for an overall score (0-100)
    pub fn from_score(score: f64) -> Self {
        if score >= crate::params::TIER_OPTIMAL {
            RecommendationTier::Optimal
        } else if score >= crate::params::TIER_EXCELLENT {
            RecommendationTier::Excellent
        } else if score >= crate::params::TIER_GOOD {
            RecommendationTier::Good
        } else if score >= crate::params::TIER_ACCEPTABLE {
            RecommendationTier::Acceptable
        } else {
            RecommendationTier::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationTier::Optimal => "optimal",
            RecommendationTier::Excellent => "excellent",
            RecommendationTier::Good => "good",
            RecommendationTier::Acceptable => "acceptable",
            RecommendationTier::Poor => "poor",
        }
    }
}

/// Structured strength/weakness reason codes.
///
/// The core emits codes; `jetrank_engine::format` renders display text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ScoreReason {
    /// Arrival lands in the morning adaptation window
    MorningArrival,
    /// Arrival lands late at night, fighting the first sleep cycle
    LateNightArrival,
    /// Small or zero circadian shift
    MinimalTimezoneShift { hours: f64 },
    /// Large eastbound shift; body clock must advance
    LargeEastboundShift { hours: f64 },
    /// Westbound routing eases adaptation
    WestboundAdvantage,
    /// High-comfort aircraft/airline combination
    StrongCabinComfort,
    /// Low sleep-comfort equipment on long legs
    WeakCabinComfort,
    /// Layovers are well-placed and well-equipped
    WellPlacedLayovers,
    /// A connection is too short or poorly equipped
    StressfulConnection { airport: String },
    /// Among the fastest itineraries in the result set
    TimeEfficientRouting,
    /// Materially slower than the best option in the result set
    SlowRouting { extra_minutes: i64 },
    /// More stops than the best routing in the result set
    ExtraStops { count: u32 },
}

/// Structured traveler advice codes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum AdviceCode {
    /// Shift sleep earlier by ~1h/day for the given days before departure
    PreAdjustSleepEarlier { days: u32 },
    /// Shift sleep later before westbound travel
    PreAdjustSleepLater { days: u32 },
    /// Seek bright light on arrival morning
    SeekMorningLight,
    /// Avoid evening light after eastbound arrival
    AvoidEveningLight,
    /// Sleep on board aligned to destination night
    SleepAlignedToDestination,
    /// Use a layover nap opportunity
    NapDuringLayover { airport: String },
    /// Stay awake until local night on arrival
    StayAwakeUntilLocalNight,
}

/// Tradeoff notes surfaced with the score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum TradeoffNote {
    /// Cheaper than alternatives but with a worse circadian profile
    PriceOverJetlag,
    /// Pays a premium for a better circadian profile
    JetlagOverPrice,
    /// Longer total travel in exchange for a better-timed arrival
    DurationForArrivalTiming,
}

/// Degraded-confidence markers attached when inputs were incomplete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "factor", rename_all = "snake_case")]
pub enum CriticalFactor {
    /// Required geometry/time fields were missing; neutral fallback score used
    DegradedConfidence { reason: String },
    /// Airport intelligence was unavailable for the given code
    UnknownAirport { code: String },
}

/// Traveler persona for scenario matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    BusinessTraveler,
    BudgetTraveler,
    FamilyTraveler,
    WellnessFocused,
}

impl Persona {
    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::BusinessTraveler => "Business Traveler",
            Persona::BudgetTraveler => "Budget Traveler",
            Persona::FamilyTraveler => "Family Traveler",
            Persona::WellnessFocused => "Wellness Focused",
        }
    }
}

/// One persona match (only matches >= 70% are surfaced)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMatch {
    pub persona: Persona,
    /// Match percentage (0-100)
    pub match_pct: f64,
}

/// Per-flight holistic scoring output.
///
/// `overall` is a strict function of the four weighted sub-scores; recomputing
/// with identical inputs yields identical output (no hidden randomness or
/// wall-clock dependence beyond the flight's own timestamps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolisticScore {
    /// Overall jetlag score (0-100, higher = less predicted disruption),
    /// stored with full precision; use [`display_score`](Self::display_score)
    /// for UI rounding
    pub overall: f64,
    /// Circadian sub-score (0-100)
    pub circadian: f64,
    /// Routing/layover strategy sub-score (0-100)
    pub strategy: f64,
    /// Cabin and airport comfort sub-score (0-100)
    pub comfort: f64,
    /// Duration/stops efficiency sub-score (0-100, relative to the candidate set)
    pub efficiency: f64,
    pub recommendation: RecommendationTier,
    /// Taken directly from the circadian model, not re-derived
    pub estimated_recovery_days: f64,
    pub strengths: Vec<ScoreReason>,
    pub weaknesses: Vec<ScoreReason>,
    pub recommendations: Vec<AdviceCode>,
    pub scenario_matches: Vec<ScenarioMatch>,
    pub tradeoff_notes: Vec<TradeoffNote>,
    #[serde(default)]
    pub critical_factors: Vec<CriticalFactor>,
}

impl HolisticScore {
    /// Overall score rounded for display
    pub fn display_score(&self) -> u32 {
        self.overall.round().clamp(0.0, 100.0) as u32
    }
}

// ---------------------------------------------------------------------------
// Layover assessment output
// ---------------------------------------------------------------------------

/// Advisory classification for one connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoverClass {
    Excellent,
    Good,
    Marginal,
    Risky,
    /// Below the airport's minimum connection time
    Insufficient,
}

impl LayoverClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoverClass::Excellent => "excellent",
            LayoverClass::Good => "good",
            LayoverClass::Marginal => "marginal",
            LayoverClass::Risky => "risky",
            LayoverClass::Insufficient => "insufficient",
        }
    }
}

/// Structured layover tips, emitted in fixed priority order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum LayoverTip {
    /// Connection is below the published minimum; rebooking risk
    BelowMinimumConnection { minimum_minutes: u32 },
    /// Tight connection; move directly to the gate
    ProceedDirectlyToGate,
    /// Fast-track security available
    UseFastTrack,
    /// Lounge available and worth using
    VisitLounge { quality: f64 },
    /// Long enough for a shower to reset
    TakeShower,
    /// Sleep pods available for a recovery nap
    NapInSleepPod,
    /// Security re-screening required; budget extra time
    RescreeningRequired,
    /// This layover falls in the traveler's home-night window; sleeping here
    /// directly reduces jetlag
    BestForJetlagRecovery,
}

/// Full advisory output for one connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoverAssessment {
    /// Layover quality (0-100)
    pub quality: f64,
    pub class: LayoverClass,
    pub tips: Vec<LayoverTip>,
}

// ---------------------------------------------------------------------------
// Price analysis output
// ---------------------------------------------------------------------------

/// Category tag assigned by the tradeoff optimizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceCategoryKind {
    Cheapest,
    BestJetlag,
    BestValue,
    Balanced,
}

impl PriceCategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceCategoryKind::Cheapest => "cheapest",
            PriceCategoryKind::BestJetlag => "best_jetlag",
            PriceCategoryKind::BestValue => "best_value",
            PriceCategoryKind::Balanced => "balanced",
        }
    }
}

/// Per-flight price/jetlag category annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceCategory {
    pub kind: PriceCategoryKind,
    /// Normalized bang-for-buck score (0-100), comparable only within one search
    pub value_score: f64,
    /// For the cheapest flight: price saved vs the best-jetlag option
    pub savings_from_best: Option<f64>,
    /// For the best-jetlag flight: premium paid vs the cheapest option
    pub extra_cost_for_best: Option<f64>,
}

/// One categorized pick in a [`PriceAnalysis`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedFlight {
    /// Flight identifier within the analyzed set
    pub flight_id: String,
    pub category: PriceCategory,
}

/// Whole-set price/jetlag tradeoff analysis for one search.
///
/// Every categorized pick is `None` for an empty set: the analysis degrades
/// to null picks and zero ranges instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAnalysis {
    pub cheapest: Option<CategorizedFlight>,
    pub best_jetlag: Option<CategorizedFlight>,
    pub best_value: Option<CategorizedFlight>,
    /// Omitted for sets of fewer than two flights
    pub balanced: Option<CategorizedFlight>,
    /// (min, max) price over the set
    pub price_range: (f64, f64),
    /// (min, max) overall jetlag score over the set
    pub jetlag_range: (f64, f64),
    /// Per-flight value scores (0-100), in input order
    pub value_scores: Vec<(String, f64)>,
}

/// One scored flight, optionally annotated by the tradeoff optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredFlight {
    pub flight: FlightOption,
    pub score: HolisticScore,
    #[serde(default)]
    pub price_category: Option<PriceCategory>,
}

/// Ranked output for one search; scoped to a single request and discarded
/// after the response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultSet {
    pub flights: Vec<ScoredFlight>,
    pub analysis: Option<PriceAnalysis>,
    pub filter_stats: Option<FilterStats>,
    pub suggestions: Vec<FilterSuggestion>,
}

// ---------------------------------------------------------------------------
// Filter & sort model
// ---------------------------------------------------------------------------

/// Price percentile bucket over the original (unfiltered) result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    /// <= 25th percentile
    Budget,
    /// <= 50th percentile
    Economy,
    /// <= 75th percentile
    Standard,
    /// Above the 75th percentile
    Premium,
}

/// Local-hour window, inclusive start, exclusive end. A window wrapping
/// midnight (e.g. 22..6) is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    pub start: u8,
    pub end: u8,
}

impl HourWindow {
    /// Whether the given hour (0-23) falls inside the window
    pub fn contains(&self, hour: u8) -> bool {
        if self.start <= self.end {
            hour >= self.start && hour < self.end
        } else {
            hour >= self.start || hour < self.end
        }
    }
}

/// User filter specification. All fields optional; `None` means "no
/// constraint". Values are validated before execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub price_tier: Option<PriceTier>,
    pub max_duration_minutes: Option<u32>,
    pub max_stops: Option<u32>,
    /// Local departure hour window at the origin
    pub departure_window: Option<HourWindow>,
    /// Local arrival hour window at the destination
    pub arrival_window: Option<HourWindow>,
    /// Minimum overall jetlag score (0-100)
    pub min_jetlag_score: Option<f64>,
    pub max_recovery_days: Option<f64>,
    /// Only these airline codes, when non-empty
    #[serde(default)]
    pub airlines_include: Vec<String>,
    /// Never these airline codes
    #[serde(default)]
    pub airlines_exclude: Vec<String>,
    #[serde(default)]
    pub modern_aircraft_only: bool,
}

/// Identity of one filter predicate, for removal accounting and suggestions.
/// Predicates are applied in this declaration order; a flight removed by an
/// earlier rule is not counted again by a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterRule {
    MinPrice,
    MaxPrice,
    PriceTier,
    MaxDuration,
    MaxStops,
    DepartureWindow,
    ArrivalWindow,
    MinJetlagScore,
    MaxRecoveryDays,
    AirlineInclude,
    AirlineExclude,
    ModernAircraftOnly,
}

impl FilterRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterRule::MinPrice => "min_price",
            FilterRule::MaxPrice => "max_price",
            FilterRule::PriceTier => "price_tier",
            FilterRule::MaxDuration => "max_duration",
            FilterRule::MaxStops => "max_stops",
            FilterRule::DepartureWindow => "departure_window",
            FilterRule::ArrivalWindow => "arrival_window",
            FilterRule::MinJetlagScore => "min_jetlag_score",
            FilterRule::MaxRecoveryDays => "max_recovery_days",
            FilterRule::AirlineInclude => "airline_include",
            FilterRule::AirlineExclude => "airline_exclude",
            FilterRule::ModernAircraftOnly => "modern_aircraft_only",
        }
    }
}

/// Per-filter accounting for one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterStats {
    pub original_count: usize,
    pub filtered_count: usize,
    /// Removal count per rule, in application order; rules that removed
    /// nothing are omitted
    pub removed_by: Vec<(FilterRule, usize)>,
}

/// Proposed single-rule relaxation for a filter suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SuggestedChange {
    RaiseMaxPrice { to: f64 },
    LowerMinPrice { to: f64 },
    RaiseMaxDuration { to_minutes: u32 },
    AllowMoreStops { up_to: u32 },
    WidenDepartureWindow,
    WidenArrivalWindow,
    LowerMinJetlagScore { to: f64 },
    RaiseMaxRecoveryDays { to: f64 },
    RelaxAirlineList,
    IncludeOlderAircraft,
    RelaxPriceTier,
}

/// One "what-if" relaxation: dropping/loosening `rule` as proposed would
/// admit `would_admit` additional flights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSuggestion {
    pub rule: FilterRule,
    pub change: SuggestedChange,
    pub would_admit: usize,
}

/// Sort criterion for the filtered set. Absence defaults to `JetlagBest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Descending overall jetlag score
    #[default]
    JetlagBest,
    /// Ascending price
    PriceLow,
    /// Descending value score
    ValueBest,
    /// Ascending total duration
    DurationShort,
}
