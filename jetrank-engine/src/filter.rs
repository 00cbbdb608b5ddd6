//! Filter & sort pipeline
//!
//! Applies user constraints to the scored, price-annotated set and reorders
//! by a chosen criterion. Filters are an ordered sequence of independent
//! predicates composed with logical AND; each flight's removal is attributed
//! to the FIRST rule that rejects it, so later rules never double-count.
//! Suggestions try one-rule-at-a-time relaxations and report how many extra
//! flights each would admit, largest unlock first.

use chrono::{DateTime, Duration, Timelike, Utc};
use jetrank_common::types::{
    AirportDirectory, FilterRule, FilterSpec, FilterStats, FilterSuggestion, HourWindow,
    PriceTier, ScoredFlight, SortKey, SuggestedChange,
};
use jetrank_common::{Error, Result};
use tracing::debug;

use crate::tradeoff;

/// Validate a filter specification before execution.
///
/// Out-of-domain values are rejected with a descriptive [`Error::InvalidFilter`]
/// so the API layer can map them to user-facing messages.
pub fn validate(spec: &FilterSpec) -> Result<()> {
    for (name, value) in [("min_price", spec.min_price), ("max_price", spec.max_price)] {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::InvalidFilter(format!("{name} must be a non-negative number, got {v}")));
            }
        }
    }
    if let (Some(min), Some(max)) = (spec.min_price, spec.max_price) {
        if min > max {
            return Err(Error::InvalidFilter(format!(
                "min_price ({min}) exceeds max_price ({max})"
            )));
        }
    }
    if let Some(score) = spec.min_jetlag_score {
        if !(0.0..=100.0).contains(&score) {
            return Err(Error::InvalidFilter(format!(
                "min_jetlag_score must be in 0-100, got {score}"
            )));
        }
    }
    if let Some(days) = spec.max_recovery_days {
        if !days.is_finite() || days < 0.0 {
            return Err(Error::InvalidFilter(format!(
                "max_recovery_days must be non-negative, got {days}"
            )));
        }
    }
    for (name, window) in [
        ("departure_window", spec.departure_window),
        ("arrival_window", spec.arrival_window),
    ] {
        if let Some(w) = window {
            if w.start > 23 || w.end > 23 {
                return Err(Error::InvalidFilter(format!(
                    "{name} hours must be 0-23, got {}..{}",
                    w.start, w.end
                )));
            }
        }
    }
    let contradictory: Vec<&String> = spec
        .airlines_include
        .iter()
        .filter(|a| spec.airlines_exclude.contains(a))
        .collect();
    if !contradictory.is_empty() {
        return Err(Error::InvalidFilter(format!(
            "airlines appear in both include and exclude lists: {contradictory:?}"
        )));
    }
    Ok(())
}

/// Price percentile thresholds (p25, p50, p75) over the original set
fn price_percentiles(scored: &[ScoredFlight]) -> (f64, f64, f64) {
    let mut prices: Vec<f64> = scored.iter().map(|s| s.flight.price).collect();
    prices.sort_by(f64::total_cmp);
    let at = |q: f64| -> f64 {
        if prices.is_empty() {
            return 0.0;
        }
        let idx = ((prices.len() - 1) as f64 * q).round() as usize;
        prices[idx]
    };
    (at(0.25), at(0.50), at(0.75))
}

/// Per-run context shared by the predicates
struct FilterContext<'a> {
    spec: &'a FilterSpec,
    directory: &'a dyn AirportDirectory,
    percentiles: (f64, f64, f64),
}

/// Local hour at an airport, falling back to the UTC hour when the directory
/// cannot resolve an offset (degrade, don't drop)
fn local_hour(directory: &dyn AirportDirectory, code: &str, instant: DateTime<Utc>) -> u8 {
    let offset = directory
        .lookup(code)
        .and_then(|info| info.utc_offset_hours)
        .unwrap_or(0.0);
    (instant + Duration::minutes((offset * 60.0).round() as i64)).hour() as u8
}

fn in_window(
    directory: &dyn AirportDirectory,
    code: &str,
    instant: Option<DateTime<Utc>>,
    window: HourWindow,
) -> bool {
    match instant {
        Some(t) => window.contains(local_hour(directory, code, t)),
        // A flight without timestamps already scored as degraded; windows
        // cannot apply to it
        None => true,
    }
}

/// All rules the given spec activates, in application order
fn active_rules(spec: &FilterSpec) -> Vec<FilterRule> {
    let mut rules = Vec::new();
    if spec.min_price.is_some() {
        rules.push(FilterRule::MinPrice);
    }
    if spec.max_price.is_some() {
        rules.push(FilterRule::MaxPrice);
    }
    if spec.price_tier.is_some() {
        rules.push(FilterRule::PriceTier);
    }
    if spec.max_duration_minutes.is_some() {
        rules.push(FilterRule::MaxDuration);
    }
    if spec.max_stops.is_some() {
        rules.push(FilterRule::MaxStops);
    }
    if spec.departure_window.is_some() {
        rules.push(FilterRule::DepartureWindow);
    }
    if spec.arrival_window.is_some() {
        rules.push(FilterRule::ArrivalWindow);
    }
    if spec.min_jetlag_score.is_some() {
        rules.push(FilterRule::MinJetlagScore);
    }
    if spec.max_recovery_days.is_some() {
        rules.push(FilterRule::MaxRecoveryDays);
    }
    if !spec.airlines_include.is_empty() {
        rules.push(FilterRule::AirlineInclude);
    }
    if !spec.airlines_exclude.is_empty() {
        rules.push(FilterRule::AirlineExclude);
    }
    if spec.modern_aircraft_only {
        rules.push(FilterRule::ModernAircraftOnly);
    }
    rules
}

/// Whether one flight passes one rule
fn rule_passes(rule: FilterRule, s: &ScoredFlight, ctx: &FilterContext<'_>) -> bool {
    let spec = ctx.spec;
    match rule {
        FilterRule::MinPrice => spec.min_price.map_or(true, |min| s.flight.price >= min),
        FilterRule::MaxPrice => spec.max_price.map_or(true, |max| s.flight.price <= max),
        FilterRule::PriceTier => match spec.price_tier {
            None => true,
            Some(tier) => {
                let (p25, p50, p75) = ctx.percentiles;
                match tier {
                    PriceTier::Budget => s.flight.price <= p25,
                    PriceTier::Economy => s.flight.price <= p50,
                    PriceTier::Standard => s.flight.price <= p75,
                    PriceTier::Premium => s.flight.price > p75,
                }
            }
        },
        FilterRule::MaxDuration => spec
            .max_duration_minutes
            .map_or(true, |max| s.flight.total_duration_minutes <= max),
        FilterRule::MaxStops => spec.max_stops.map_or(true, |max| s.flight.stops <= max),
        FilterRule::DepartureWindow => spec.departure_window.map_or(true, |w| {
            in_window(ctx.directory, &s.flight.origin, s.flight.first_departure(), w)
        }),
        FilterRule::ArrivalWindow => spec.arrival_window.map_or(true, |w| {
            in_window(ctx.directory, &s.flight.destination, s.flight.last_arrival(), w)
        }),
        FilterRule::MinJetlagScore => spec
            .min_jetlag_score
            .map_or(true, |min| s.score.overall >= min),
        FilterRule::MaxRecoveryDays => spec
            .max_recovery_days
            .map_or(true, |max| s.score.estimated_recovery_days <= max),
        FilterRule::AirlineInclude => {
            spec.airlines_include.is_empty()
                || s.flight
                    .segments
                    .iter()
                    .all(|seg| spec.airlines_include.contains(&seg.airline.code))
        }
        FilterRule::AirlineExclude => s
            .flight
            .segments
            .iter()
            .all(|seg| !spec.airlines_exclude.contains(&seg.airline.code)),
        FilterRule::ModernAircraftOnly => s.flight.segments.iter().all(|seg| {
            seg.aircraft.generation == jetrank_common::types::AircraftGeneration::Modern
        }),
    }
}

/// Apply the filter spec, attributing each removal to the first failing rule.
///
/// Filtering is monotone (`filtered_count <= original_count`) and idempotent:
/// re-applying the same spec to its own output removes nothing further.
pub fn apply_filters(
    scored: &[ScoredFlight],
    spec: &FilterSpec,
    directory: &dyn AirportDirectory,
) -> Result<(Vec<ScoredFlight>, FilterStats)> {
    validate(spec)?;

    let ctx = FilterContext {
        spec,
        directory,
        percentiles: price_percentiles(scored),
    };
    let rules = active_rules(spec);

    let mut kept = Vec::with_capacity(scored.len());
    let mut removal_counts = vec![0usize; rules.len()];

    for s in scored {
        match rules.iter().position(|&rule| !rule_passes(rule, s, &ctx)) {
            Some(first_failing) => removal_counts[first_failing] += 1,
            None => kept.push(s.clone()),
        }
    }

    let removed_by: Vec<(FilterRule, usize)> = rules
        .iter()
        .zip(removal_counts.iter())
        .filter(|(_, &count)| count > 0)
        .map(|(&rule, &count)| (rule, count))
        .collect();

    let stats = FilterStats {
        original_count: scored.len(),
        filtered_count: kept.len(),
        removed_by,
    };

    debug!(
        original = stats.original_count,
        filtered = stats.filtered_count,
        rules = rules.len(),
        "Applied filters"
    );

    Ok((kept, stats))
}

/// Stable reorder of the already-filtered set. Equal-key flights retain their
/// relative input order, keeping output deterministic across repeated calls.
pub fn sort_flights(flights: &mut [ScoredFlight], key: SortKey) {
    match key {
        SortKey::JetlagBest => {
            flights.sort_by(|a, b| b.score.overall.total_cmp(&a.score.overall));
        }
        SortKey::PriceLow => {
            flights.sort_by(|a, b| a.flight.price.total_cmp(&b.flight.price));
        }
        SortKey::ValueBest => {
            // Value is normalized over the set being sorted
            let values = tradeoff::compute_value_scores(flights);
            let mut order: Vec<usize> = (0..flights.len()).collect();
            order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
            apply_permutation(flights, &order);
        }
        SortKey::DurationShort => {
            flights.sort_by(|a, b| {
                a.flight
                    .total_duration_minutes
                    .cmp(&b.flight.total_duration_minutes)
            });
        }
    }
}

/// Reorder `items` so that position i holds the element previously at
/// `order[i]`
fn apply_permutation(items: &mut [ScoredFlight], order: &[usize]) {
    let reordered: Vec<ScoredFlight> = order.iter().map(|&i| items[i].clone()).collect();
    for (slot, value) in items.iter_mut().zip(reordered) {
        *slot = value;
    }
}

/// Evaluate what-if relaxations of the binding filters.
///
/// For each rule that removed at least one flight, re-runs the pipeline with
/// that single rule dropped and reports how many additional flights it would
/// admit, together with the concrete bound that would admit them. Ordered by
/// impact, largest unlock first.
pub fn suggest_filters(
    scored: &[ScoredFlight],
    spec: &FilterSpec,
    directory: &dyn AirportDirectory,
) -> Result<Vec<FilterSuggestion>> {
    let (_, stats) = apply_filters(scored, spec, directory)?;
    let baseline = stats.filtered_count;

    let mut suggestions = Vec::new();
    for (rule, _) in &stats.removed_by {
        let relaxed_spec = without_rule(spec, *rule);
        let (admitted, _) = apply_filters(scored, &relaxed_spec, directory)?;
        let would_admit = admitted.len().saturating_sub(baseline);
        if would_admit == 0 {
            continue;
        }
        let change = proposed_change(*rule, spec, &admitted);
        suggestions.push(FilterSuggestion {
            rule: *rule,
            change,
            would_admit,
        });
    }

    // Largest unlock first; stable, so rule application order breaks ties
    suggestions.sort_by(|a, b| b.would_admit.cmp(&a.would_admit));
    Ok(suggestions)
}

/// Copy of the spec with one rule deactivated
fn without_rule(spec: &FilterSpec, rule: FilterRule) -> FilterSpec {
    let mut relaxed = spec.clone();
    match rule {
        FilterRule::MinPrice => relaxed.min_price = None,
        FilterRule::MaxPrice => relaxed.max_price = None,
        FilterRule::PriceTier => relaxed.price_tier = None,
        FilterRule::MaxDuration => relaxed.max_duration_minutes = None,
        FilterRule::MaxStops => relaxed.max_stops = None,
        FilterRule::DepartureWindow => relaxed.departure_window = None,
        FilterRule::ArrivalWindow => relaxed.arrival_window = None,
        FilterRule::MinJetlagScore => relaxed.min_jetlag_score = None,
        FilterRule::MaxRecoveryDays => relaxed.max_recovery_days = None,
        FilterRule::AirlineInclude => relaxed.airlines_include.clear(),
        FilterRule::AirlineExclude => relaxed.airlines_exclude.clear(),
        FilterRule::ModernAircraftOnly => relaxed.modern_aircraft_only = false,
    }
    relaxed
}

/// The concrete relaxation that admits the unlocked flights
fn proposed_change(rule: FilterRule, spec: &FilterSpec, admitted: &[ScoredFlight]) -> SuggestedChange {
    match rule {
        FilterRule::MaxPrice => SuggestedChange::RaiseMaxPrice {
            to: admitted.iter().map(|s| s.flight.price).fold(f64::NEG_INFINITY, f64::max),
        },
        FilterRule::MinPrice => SuggestedChange::LowerMinPrice {
            to: admitted.iter().map(|s| s.flight.price).fold(f64::INFINITY, f64::min),
        },
        FilterRule::PriceTier => SuggestedChange::RelaxPriceTier,
        FilterRule::MaxDuration => SuggestedChange::RaiseMaxDuration {
            to_minutes: admitted
                .iter()
                .map(|s| s.flight.total_duration_minutes)
                .max()
                .unwrap_or(spec.max_duration_minutes.unwrap_or(0)),
        },
        FilterRule::MaxStops => SuggestedChange::AllowMoreStops {
            up_to: admitted.iter().map(|s| s.flight.stops).max().unwrap_or(0),
        },
        FilterRule::DepartureWindow => SuggestedChange::WidenDepartureWindow,
        FilterRule::ArrivalWindow => SuggestedChange::WidenArrivalWindow,
        FilterRule::MinJetlagScore => SuggestedChange::LowerMinJetlagScore {
            to: admitted.iter().map(|s| s.score.overall).fold(f64::INFINITY, f64::min),
        },
        FilterRule::MaxRecoveryDays => SuggestedChange::RaiseMaxRecoveryDays {
            to: admitted
                .iter()
                .map(|s| s.score.estimated_recovery_days)
                .fold(f64::NEG_INFINITY, f64::max),
        },
        FilterRule::AirlineInclude | FilterRule::AirlineExclude => SuggestedChange::RelaxAirlineList,
        FilterRule::ModernAircraftOnly => SuggestedChange::IncludeOlderAircraft,
    }
}
