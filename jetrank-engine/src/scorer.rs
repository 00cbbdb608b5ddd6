//! Holistic scorer
//!
//! Combines circadian, strategy, comfort, and efficiency sub-scores into one
//! weighted overall score per flight, plus structured strengths, weaknesses,
//! advice codes, persona matches, and tradeoff notes.
//!
//! Scoring one flight never mutates anything: the candidate set is passed in
//! explicitly and used only for cross-flight normalization of the efficiency
//! and tradeoff components. Identical inputs produce bit-identical output.

use chrono::{Duration, Timelike};
use jetrank_common::params;
use jetrank_common::types::{
    AdviceCode, AirportDirectory, AirportInfo, CircadianAssessment, CriticalFactor, FlightOption,
    HolisticScore, RecommendationTier, ScenarioMatch, ScoreReason, TradeoffNote, TravelDirection,
};
use tracing::debug;

use crate::airport;
use crate::circadian;

/// Circadian sub-score: per-zone penalty, steeper eastbound
const EASTBOUND_ZONE_PENALTY: f64 = 5.5;
const WESTBOUND_ZONE_PENALTY: f64 = 3.5;
/// Arrival-optimality leverage around its 5.5 midpoint
const ARRIVAL_LEVERAGE: f64 = 6.0;

/// Strategy baseline for nonstop itineraries: no connection risk, no layover
/// recovery either
const DIRECT_STRATEGY_BASE: f64 = 85.0;
/// Single-stop routings keep more strategic options open than multi-stop ones
const SINGLE_STOP_BONUS: f64 = 8.0;
/// Bonus when a layover lands in the traveler's home-night window with sleep
/// facilities available
const NAP_PLACEMENT_BONUS: f64 = 8.0;
const QUIET_ZONE_NAP_BONUS: f64 = 4.0;

/// Efficiency penalty per stop beyond the best routing in the set
const EXTRA_STOP_PENALTY: f64 = 15.0;

/// Per-flight holistic scorer, borrowing the caller-injected airport
/// directory for endpoint resolution
pub struct HolisticScorer<'a> {
    directory: &'a dyn AirportDirectory,
}

impl<'a> HolisticScorer<'a> {
    pub fn new(directory: &'a dyn AirportDirectory) -> Self {
        Self { directory }
    }

    /// Score one flight in the context of its candidate set.
    ///
    /// Never fails: a flight missing required geometry/time fields receives
    /// the neutral fallback score (50, acceptable) with a degraded-confidence
    /// critical factor, so one malformed flight cannot abort the set.
    pub fn score(&self, flight: &FlightOption, candidate_set: &[FlightOption]) -> HolisticScore {
        let mut critical_factors = Vec::new();

        let Some(arrival) = flight.last_arrival() else {
            return fallback_score(
                "itinerary has no segments".into(),
                critical_factors,
            );
        };

        let origin = self.resolve(&flight.origin, &mut critical_factors);
        let dest = self.resolve(&flight.destination, &mut critical_factors);

        let assessment = circadian::assess(&origin, &dest, arrival);
        if assessment.degraded {
            return fallback_score(
                format!(
                    "cannot resolve timezone geometry for {} -> {}",
                    flight.origin, flight.destination
                ),
                critical_factors,
            );
        }

        let circadian_score = circadian_subscore(&assessment);
        let comfort_score = comfort_subscore(flight);
        let (strategy_score, nap_airports) = strategy_subscore(flight, &origin);
        let efficiency_score = efficiency_subscore(flight, candidate_set);

        let overall = params::WEIGHT_CIRCADIAN * circadian_score
            + params::WEIGHT_STRATEGY * strategy_score
            + params::WEIGHT_COMFORT * comfort_score
            + params::WEIGHT_EFFICIENCY * efficiency_score;

        let subs = SubScores {
            circadian: circadian_score,
            strategy: strategy_score,
            comfort: comfort_score,
            efficiency: efficiency_score,
        };

        let (strengths, weaknesses) = build_reasons(flight, &assessment, &subs, candidate_set);
        let recommendations = build_advice(&assessment, &nap_airports);
        let scenario_matches = match_personas(&subs);
        let tradeoff_notes = build_tradeoff_notes(flight, &assessment, &subs, candidate_set);

        debug!(
            flight = %flight.id,
            overall,
            circadian = circadian_score,
            strategy = strategy_score,
            comfort = comfort_score,
            efficiency = efficiency_score,
            "Scored flight"
        );

        HolisticScore {
            overall,
            circadian: circadian_score,
            strategy: strategy_score,
            comfort: comfort_score,
            efficiency: efficiency_score,
            recommendation: RecommendationTier::from_score(overall),
            estimated_recovery_days: assessment.estimated_recovery_days,
            strengths,
            weaknesses,
            recommendations,
            scenario_matches,
            tradeoff_notes,
            critical_factors,
        }
    }

    fn resolve(&self, code: &str, critical_factors: &mut Vec<CriticalFactor>) -> AirportInfo {
        match self.directory.lookup(code) {
            Some(info) => info,
            None => {
                critical_factors.push(CriticalFactor::UnknownAirport { code: code.into() });
                AirportInfo {
                    code: code.into(),
                    coords: None,
                    utc_offset_hours: None,
                }
            }
        }
    }
}

struct SubScores {
    circadian: f64,
    strategy: f64,
    comfort: f64,
    efficiency: f64,
}

/// Neutral fallback for malformed input: 50/acceptable with a degraded-
/// confidence marker
fn fallback_score(reason: String, mut critical_factors: Vec<CriticalFactor>) -> HolisticScore {
    critical_factors.push(CriticalFactor::DegradedConfidence { reason });
    HolisticScore {
        overall: 50.0,
        circadian: 50.0,
        strategy: 50.0,
        comfort: 50.0,
        efficiency: 50.0,
        recommendation: RecommendationTier::Acceptable,
        estimated_recovery_days: 0.0,
        strengths: Vec::new(),
        weaknesses: Vec::new(),
        recommendations: Vec::new(),
        scenario_matches: Vec::new(),
        tradeoff_notes: Vec::new(),
        critical_factors,
    }
}

/// Circadian sub-score (0-100): large shifts pull down (eastbound harder),
/// arrival timing swings the result around the bucket midpoint
fn circadian_subscore(assessment: &CircadianAssessment) -> f64 {
    let zone_penalty = match assessment.direction {
        TravelDirection::Eastbound => EASTBOUND_ZONE_PENALTY,
        _ => WESTBOUND_ZONE_PENALTY,
    };
    let base = 100.0 - assessment.timezones_crossed * zone_penalty;
    let arrival = (assessment.arrival_optimality - 5.5) * ARRIVAL_LEVERAGE;
    (base + arrival).clamp(0.0, 100.0)
}

/// Comfort sub-score (0-100): segment-length-weighted aircraft/airline blend,
/// mixed with layover comfort and jet-lag support when the itinerary connects
fn comfort_subscore(flight: &FlightOption) -> f64 {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for segment in &flight.segments {
        let cabin = 0.5 * segment.aircraft.sleep_comfort * 10.0
            + 0.25 * segment.airline.service_quality * 10.0
            + 0.25 * segment.airline.jetlag_optimization * 10.0;
        // Zero-length segments still count with minimal weight
        let weight = segment.duration_minutes().max(1) as f64;
        weighted += cabin * weight;
        total_weight += weight;
    }
    let segment_comfort = if total_weight > 0.0 {
        weighted / total_weight
    } else {
        50.0
    };

    if flight.layovers.is_empty() {
        return segment_comfort.clamp(0.0, 100.0);
    }

    let layover_comfort: f64 = flight
        .layovers
        .iter()
        .map(|l| (0.6 * l.facilities.comfort_score + 0.4 * l.facilities.jetlag_support_score) * 10.0)
        .sum::<f64>()
        / flight.layovers.len() as f64;

    (0.75 * segment_comfort + 0.25 * layover_comfort).clamp(0.0, 100.0)
}

/// Strategy sub-score (0-100) and the airports where a home-night nap is
/// available (fed into the advice list).
///
/// Nonstop itineraries get the fixed direct baseline. Connecting itineraries
/// average per-layover quality weighted by layover duration, with bonuses for
/// layovers placed inside the traveler's home-night window.
fn strategy_subscore(flight: &FlightOption, origin: &AirportInfo) -> (f64, Vec<String>) {
    if flight.layovers.is_empty() {
        return (DIRECT_STRATEGY_BASE, Vec::new());
    }

    let mut weighted_quality = 0.0;
    let mut total_weight = 0.0;
    let mut nap_bonus: f64 = 0.0;
    let mut nap_airports = Vec::new();

    for (index, layover) in flight.layovers.iter().enumerate() {
        let quality = airport::layover_quality(layover.duration_minutes, &layover.facilities);
        let weight = f64::from(layover.duration_minutes.max(1));
        weighted_quality += quality * weight;
        total_weight += weight;

        if layover_in_home_night(flight, origin, index) && layover.duration_minutes >= 120 {
            if layover.facilities.sleep_pods {
                nap_bonus = nap_bonus.max(NAP_PLACEMENT_BONUS);
                nap_airports.push(layover.airport.clone());
            } else if layover.facilities.quiet_zones {
                nap_bonus = nap_bonus.max(QUIET_ZONE_NAP_BONUS);
                nap_airports.push(layover.airport.clone());
            }
        }
    }

    let average_quality = weighted_quality / total_weight;
    let stop_bonus = if flight.stops == 1 { SINGLE_STOP_BONUS } else { 0.0 };
    let score = (0.85 * average_quality + nap_bonus + stop_bonus).clamp(0.0, 100.0);
    (score, nap_airports)
}

/// Whether the Nth layover's midpoint falls inside the traveler's home-night
/// window (22:00-06:00 origin time), the "should sleep" circadian low
fn layover_in_home_night(flight: &FlightOption, origin: &AirportInfo, index: usize) -> bool {
    let Some(offset) = origin.utc_offset_hours else {
        return false;
    };
    let (Some(inbound), Some(outbound)) =
        (flight.segments.get(index), flight.segments.get(index + 1))
    else {
        return false;
    };
    let midpoint = inbound.arrival + (outbound.departure - inbound.arrival) / 2;
    let home = midpoint + Duration::minutes((offset * 60.0).round() as i64);
    let hour = home.hour();
    hour >= 22 || hour < 6
}

/// Efficiency sub-score (0-100), relative to the best duration and fewest
/// stops in the candidate set. Recomputing against a different set can
/// legitimately change the result.
fn efficiency_subscore(flight: &FlightOption, candidate_set: &[FlightOption]) -> f64 {
    let best_duration = candidate_set
        .iter()
        .map(|f| f.total_duration_minutes)
        .chain(std::iter::once(flight.total_duration_minutes))
        .filter(|&d| d > 0)
        .min()
        .unwrap_or(1);
    let min_stops = candidate_set
        .iter()
        .map(|f| f.stops)
        .chain(std::iter::once(flight.stops))
        .min()
        .unwrap_or(0);

    let duration = f64::from(flight.total_duration_minutes.max(1));
    let duration_part = 100.0 * f64::from(best_duration) / duration;
    let stop_penalty = EXTRA_STOP_PENALTY * f64::from(flight.stops - min_stops);
    (duration_part - stop_penalty).clamp(0.0, 100.0)
}

/// Rule-generated strengths and weaknesses, in a fixed deterministic order
fn build_reasons(
    flight: &FlightOption,
    assessment: &CircadianAssessment,
    subs: &SubScores,
    candidate_set: &[FlightOption],
) -> (Vec<ScoreReason>, Vec<ScoreReason>) {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    if assessment.arrival_optimality >= 9.0 {
        strengths.push(ScoreReason::MorningArrival);
    }
    if assessment.timezones_crossed < 3.0 {
        strengths.push(ScoreReason::MinimalTimezoneShift {
            hours: assessment.timezones_crossed,
        });
    } else if assessment.direction == TravelDirection::Westbound {
        strengths.push(ScoreReason::WestboundAdvantage);
    }
    if subs.comfort >= 75.0 {
        strengths.push(ScoreReason::StrongCabinComfort);
    }
    if subs.strategy >= 75.0 && !flight.layovers.is_empty() {
        strengths.push(ScoreReason::WellPlacedLayovers);
    }
    if subs.efficiency >= 90.0 {
        strengths.push(ScoreReason::TimeEfficientRouting);
    }

    if assessment.arrival_optimality <= 2.0 {
        weaknesses.push(ScoreReason::LateNightArrival);
    }
    if assessment.direction == TravelDirection::Eastbound && assessment.timezones_crossed >= 6.0 {
        weaknesses.push(ScoreReason::LargeEastboundShift {
            hours: assessment.timezones_crossed,
        });
    }
    if subs.comfort < 45.0 {
        weaknesses.push(ScoreReason::WeakCabinComfort);
    }
    for layover in &flight.layovers {
        let quality = airport::layover_quality(layover.duration_minutes, &layover.facilities);
        if quality < 40.0 || layover.duration_minutes < layover.facilities.min_connection_minutes {
            weaknesses.push(ScoreReason::StressfulConnection {
                airport: layover.airport.clone(),
            });
        }
    }
    if subs.efficiency < 50.0 {
        let best = candidate_set
            .iter()
            .map(|f| f.total_duration_minutes)
            .chain(std::iter::once(flight.total_duration_minutes))
            .filter(|&d| d > 0)
            .min()
            .unwrap_or(flight.total_duration_minutes);
        weaknesses.push(ScoreReason::SlowRouting {
            extra_minutes: i64::from(flight.total_duration_minutes) - i64::from(best),
        });
    }
    let min_stops = candidate_set
        .iter()
        .map(|f| f.stops)
        .chain(std::iter::once(flight.stops))
        .min()
        .unwrap_or(0);
    if flight.stops >= min_stops + 2 {
        weaknesses.push(ScoreReason::ExtraStops { count: flight.stops });
    }

    (strengths, weaknesses)
}

/// Traveler advice, in a fixed deterministic order
fn build_advice(assessment: &CircadianAssessment, nap_airports: &[String]) -> Vec<AdviceCode> {
    let mut advice = Vec::new();
    let zones = assessment.timezones_crossed;

    match assessment.direction {
        TravelDirection::Eastbound if zones >= 3.0 => {
            let days = ((zones / 2.0).round() as u32).clamp(1, 3);
            advice.push(AdviceCode::PreAdjustSleepEarlier { days });
            advice.push(AdviceCode::SeekMorningLight);
            advice.push(AdviceCode::AvoidEveningLight);
        }
        TravelDirection::Westbound if zones >= 3.0 => {
            let days = ((zones / 2.0).round() as u32).clamp(1, 3);
            advice.push(AdviceCode::PreAdjustSleepLater { days });
            advice.push(AdviceCode::StayAwakeUntilLocalNight);
        }
        _ => {}
    }
    if zones >= 6.0 {
        advice.push(AdviceCode::SleepAlignedToDestination);
    }
    for airport in nap_airports {
        advice.push(AdviceCode::NapDuringLayover {
            airport: airport.clone(),
        });
    }
    advice
}

/// Persona match percentages; only matches at or above the surfacing
/// threshold are returned, in fixed table order
fn match_personas(subs: &SubScores) -> Vec<ScenarioMatch> {
    let values = [subs.circadian, subs.strategy, subs.comfort, subs.efficiency];
    params::PERSONA_PROFILES
        .iter()
        .filter_map(|(persona, profile)| {
            let match_pct: f64 = profile.iter().zip(values.iter()).map(|(w, v)| w * v).sum();
            (match_pct >= params::SCENARIO_MATCH_THRESHOLD).then_some(ScenarioMatch {
                persona: *persona,
                match_pct,
            })
        })
        .collect()
}

/// Tradeoff notes relative to the candidate set (price extremes only; the
/// full categorical analysis lives in the tradeoff optimizer)
fn build_tradeoff_notes(
    flight: &FlightOption,
    assessment: &CircadianAssessment,
    subs: &SubScores,
    candidate_set: &[FlightOption],
) -> Vec<TradeoffNote> {
    let mut notes = Vec::new();
    if candidate_set.len() < 2 {
        return notes;
    }
    let min_price = candidate_set.iter().map(|f| f.price).fold(f64::INFINITY, f64::min);
    let max_price = candidate_set.iter().map(|f| f.price).fold(f64::NEG_INFINITY, f64::max);
    let best_duration = candidate_set
        .iter()
        .map(|f| f.total_duration_minutes)
        .filter(|&d| d > 0)
        .min()
        .unwrap_or(flight.total_duration_minutes);

    if flight.price <= min_price && subs.circadian < 60.0 {
        notes.push(TradeoffNote::PriceOverJetlag);
    }
    if flight.price >= max_price && subs.circadian >= 75.0 {
        notes.push(TradeoffNote::JetlagOverPrice);
    }
    if flight.total_duration_minutes > best_duration && assessment.arrival_optimality >= 9.0 {
        notes.push(TradeoffNote::DurationForArrivalTiming);
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airport::neutral_facilities;
    use chrono::{TimeZone, Utc};
    use jetrank_common::types::{
        Aircraft, AircraftGeneration, Airline, CabinClass, GeoPoint, Layover, Segment,
        StaticDirectory,
    };

    fn directory() -> StaticDirectory {
        let mut dir = StaticDirectory::new();
        for (code, lat, lon, offset) in [
            ("JFK", 40.64, -73.78, -5.0),
            ("LHR", 51.47, -0.45, 0.0),
            ("LAX", 33.94, -118.41, -8.0),
            ("NRT", 35.77, 140.39, 9.0),
            ("KEF", 63.99, -22.62, 0.0),
        ] {
            dir.insert(AirportInfo {
                code: code.into(),
                coords: Some(GeoPoint { lat, lon }),
                utc_offset_hours: Some(offset),
            });
        }
        dir
    }

    fn aircraft(comfort: f64) -> Aircraft {
        Aircraft {
            type_code: "789".into(),
            manufacturer: "Boeing".into(),
            sleep_comfort: comfort,
            generation: AircraftGeneration::Modern,
            cabin_pressure_altitude_ft: 6000,
            cabin_humidity_pct: 15.0,
        }
    }

    fn airline(quality: f64) -> Airline {
        Airline {
            code: "JR".into(),
            name: "Jetrank Air".into(),
            service_quality: quality,
            jetlag_optimization: quality,
        }
    }

    fn segment(origin: &str, dest: &str, dep_h: u32, arr_h: u32, comfort: f64) -> Segment {
        Segment {
            origin: origin.into(),
            destination: dest.into(),
            departure: Utc.with_ymd_and_hms(2025, 6, 10, dep_h, 0, 0).unwrap(),
            arrival: Utc.with_ymd_and_hms(2025, 6, 10, arr_h, 0, 0).unwrap(),
            flight_number: "JR100".into(),
            aircraft: aircraft(comfort),
            airline: airline(comfort),
            cabin_class: CabinClass::Economy,
        }
    }

    fn direct_flight(id: &str, price: f64) -> FlightOption {
        FlightOption {
            id: id.into(),
            origin: "JFK".into(),
            destination: "LHR".into(),
            // Arrive 06:00 UTC = 06:00 London
            segments: vec![segment("JFK", "LHR", 22, 6, 8.0)],
            total_duration_minutes: 420,
            stops: 0,
            price,
            currency: "USD".into(),
            layovers: vec![],
        }
    }

    fn connecting_flight(id: &str, price: f64) -> FlightOption {
        FlightOption {
            id: id.into(),
            origin: "JFK".into(),
            destination: "LHR".into(),
            // Arrive 23:00 UTC = 23:00 London
            segments: vec![segment("JFK", "KEF", 10, 15, 5.0), segment("KEF", "LHR", 19, 23, 5.0)],
            total_duration_minutes: 780,
            stops: 2,
            price,
            currency: "USD".into(),
            layovers: vec![Layover {
                airport: "KEF".into(),
                duration_minutes: 240,
                facilities: neutral_facilities(),
            }],
        }
    }

    #[test]
    fn overall_is_the_exact_weighted_sum() {
        let dir = directory();
        let scorer = HolisticScorer::new(&dir);
        let set = vec![direct_flight("a", 500.0), connecting_flight("b", 500.0)];
        for flight in &set {
            let score = scorer.score(flight, &set);
            let expected = 0.45 * score.circadian
                + 0.25 * score.strategy
                + 0.20 * score.comfort
                + 0.10 * score.efficiency;
            assert!((score.overall - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn morning_direct_beats_late_night_two_stop_at_equal_price() {
        let dir = directory();
        let scorer = HolisticScorer::new(&dir);
        let set = vec![direct_flight("direct", 500.0), connecting_flight("twostop", 500.0)];
        let direct = scorer.score(&set[0], &set);
        let twostop = scorer.score(&set[1], &set);
        assert!(
            direct.overall > twostop.overall,
            "direct {} must beat two-stop {}",
            direct.overall,
            twostop.overall
        );
    }

    #[test]
    fn scoring_is_deterministic() {
        let dir = directory();
        let scorer = HolisticScorer::new(&dir);
        let set = vec![direct_flight("a", 500.0), connecting_flight("b", 400.0)];
        let first = scorer.score(&set[0], &set);
        let second = scorer.score(&set[0], &set);
        assert_eq!(first, second);
    }

    #[test]
    fn recovery_days_come_straight_from_the_circadian_model() {
        let dir = directory();
        let scorer = HolisticScorer::new(&dir);
        let set = vec![direct_flight("a", 500.0)];
        let score = scorer.score(&set[0], &set);
        // JFK -> LHR is 5 zones eastbound at 1.0 day/zone
        assert!((score.estimated_recovery_days - 5.0).abs() < 1e-9);
    }

    #[test]
    fn empty_itinerary_gets_the_neutral_fallback() {
        let dir = directory();
        let scorer = HolisticScorer::new(&dir);
        let mut flight = direct_flight("empty", 500.0);
        flight.segments.clear();
        let score = scorer.score(&flight, &[]);
        assert_eq!(score.overall, 50.0);
        assert_eq!(score.recommendation, RecommendationTier::Acceptable);
        assert!(matches!(
            score.critical_factors[0],
            CriticalFactor::DegradedConfidence { .. }
        ));
    }

    #[test]
    fn unknown_airports_degrade_without_failing() {
        let dir = StaticDirectory::new();
        let scorer = HolisticScorer::new(&dir);
        let flight = direct_flight("mystery", 500.0);
        let score = scorer.score(&flight, &[]);
        assert_eq!(score.overall, 50.0);
        assert!(score
            .critical_factors
            .iter()
            .any(|f| matches!(f, CriticalFactor::UnknownAirport { code } if code == "JFK")));
        assert!(score
            .critical_factors
            .iter()
            .any(|f| matches!(f, CriticalFactor::DegradedConfidence { .. })));
    }

    #[test]
    fn efficiency_is_relative_to_the_candidate_set() {
        let dir = directory();
        let scorer = HolisticScorer::new(&dir);
        let fast = direct_flight("fast", 500.0);
        let slow = connecting_flight("slow", 500.0);

        // Alone, the slow flight is its own best
        let alone = scorer.score(&slow, &[slow.clone()]);
        assert!((alone.efficiency - 100.0).abs() < 1e-9);

        // Against the fast flight it loses duration and stop points
        let contested = scorer.score(&slow, &[fast, slow.clone()]);
        assert!(contested.efficiency < alone.efficiency);
    }

    #[test]
    fn morning_arrival_is_a_strength_late_night_a_weakness() {
        let dir = directory();
        let scorer = HolisticScorer::new(&dir);
        let set = vec![direct_flight("a", 500.0), connecting_flight("b", 500.0)];
        let direct = scorer.score(&set[0], &set);
        assert!(direct.strengths.contains(&ScoreReason::MorningArrival));
        let twostop = scorer.score(&set[1], &set);
        assert!(twostop.weaknesses.contains(&ScoreReason::LateNightArrival));
    }

    #[test]
    fn eastbound_long_haul_gets_eastbound_advice() {
        let dir = directory();
        let scorer = HolisticScorer::new(&dir);
        let set = vec![direct_flight("a", 500.0)];
        let score = scorer.score(&set[0], &set);
        assert!(matches!(
            score.recommendations[0],
            AdviceCode::PreAdjustSleepEarlier { .. }
        ));
        assert!(score.recommendations.contains(&AdviceCode::SeekMorningLight));
    }

    #[test]
    fn persona_matches_only_surface_at_threshold() {
        let dir = directory();
        let scorer = HolisticScorer::new(&dir);
        let set = vec![direct_flight("a", 500.0)];
        let score = scorer.score(&set[0], &set);
        for m in &score.scenario_matches {
            assert!(m.match_pct >= 70.0);
        }
    }
}
