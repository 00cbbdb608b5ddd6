//! Batch ranking pipeline
//!
//! Orchestrates the full flow for one search: per-flight scoring (optionally
//! fanned out across a rayon pool), whole-set tradeoff analysis, filtering,
//! sorting, and suggestions. Scoring is embarrassingly parallel because every
//! component is pure over immutable inputs; the tradeoff optimizer is the
//! join barrier since it needs global min/max.
//!
//! The pipeline itself is idempotent and side-effect-free, so a caller-side
//! cache can memoize the whole search-to-ranked-output run by [`cache_key`]
//! without correctness risk.

use jetrank_common::config::EngineConfig;
use jetrank_common::types::{
    AirportDirectory, FilterSpec, FlightOption, ScoredFlight, SearchResultSet, SortKey,
};
use jetrank_common::Result;
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::filter;
use crate::scorer::HolisticScorer;
use crate::tradeoff;

/// One ranking request: the raw candidate set plus optional constraints
#[derive(Debug, Clone, Default)]
pub struct RankRequest {
    pub flights: Vec<FlightOption>,
    pub filter: Option<FilterSpec>,
    pub sort: Option<SortKey>,
}

/// Score every flight in the candidate set.
///
/// Fans out across the rayon pool when the configured threshold is reached;
/// output order always matches input order either way.
pub fn score_set(
    flights: &[FlightOption],
    directory: &dyn AirportDirectory,
    config: &EngineConfig,
) -> Vec<ScoredFlight> {
    let scorer = HolisticScorer::new(directory);
    let parallel = config.parallel_scoring && flights.len() >= config.parallel_threshold;

    debug!(flights = flights.len(), parallel, "Scoring candidate set");

    if parallel {
        flights
            .par_iter()
            .map(|flight| ScoredFlight {
                flight: flight.clone(),
                score: scorer.score(flight, flights),
                price_category: None,
            })
            .collect()
    } else {
        flights
            .iter()
            .map(|flight| ScoredFlight {
                flight: flight.clone(),
                score: scorer.score(flight, flights),
                price_category: None,
            })
            .collect()
    }
}

/// Run the whole pipeline for one search: score, analyze tradeoffs, filter,
/// sort, and suggest.
///
/// An empty candidate set is not an error at this level: it produces an empty
/// result with no analysis, per the degenerate-input contract.
pub fn rank(
    request: &RankRequest,
    directory: &dyn AirportDirectory,
    config: &EngineConfig,
) -> Result<SearchResultSet> {
    if request.flights.is_empty() {
        return Ok(SearchResultSet {
            flights: Vec::new(),
            analysis: None,
            filter_stats: None,
            suggestions: Vec::new(),
        });
    }

    let mut candidates = request.flights.as_slice();
    if candidates.len() > config.max_candidates {
        warn!(
            received = candidates.len(),
            cap = config.max_candidates,
            "Candidate set exceeds cap, truncating"
        );
        candidates = &candidates[..config.max_candidates];
    }

    let mut scored = score_set(candidates, directory, config);

    // Join barrier: the optimizer needs the entire scored set
    let analysis = tradeoff::analyze_tradeoffs(&scored);

    // Annotate the singled-out flights with their categories
    for categorized in [&analysis.cheapest, &analysis.best_jetlag, &analysis.best_value, &analysis.balanced]
        .into_iter()
        .flatten()
    {
        if let Some(s) = scored.iter_mut().find(|s| s.flight.id == categorized.flight_id) {
            // First category wins when one flight holds several titles
            if s.price_category.is_none() {
                s.price_category = Some(categorized.category.clone());
            }
        }
    }

    let (mut flights, filter_stats, suggestions) = match &request.filter {
        Some(spec) => {
            let (kept, stats) = filter::apply_filters(&scored, spec, directory)?;
            let suggestions = if stats.filtered_count < stats.original_count {
                filter::suggest_filters(&scored, spec, directory)?
            } else {
                Vec::new()
            };
            (kept, Some(stats), suggestions)
        }
        None => (scored, None, Vec::new()),
    };

    filter::sort_flights(&mut flights, request.sort.unwrap_or_default());

    info!(
        requested = request.flights.len(),
        ranked = flights.len(),
        sorted_by = ?request.sort.unwrap_or_default(),
        "Ranked search results"
    );

    Ok(SearchResultSet {
        flights,
        analysis: Some(analysis),
        filter_stats,
        suggestions,
    })
}

/// Cache key for one ranking request, for the caller-side memoization layer.
///
/// SHA-256 over the normalized request: flight identities and prices, the
/// filter spec, and the sort key. Identical requests always produce identical
/// keys; the engine itself never caches.
pub fn cache_key(request: &RankRequest) -> String {
    let mut hasher = Sha256::new();
    for flight in &request.flights {
        hasher.update(flight.id.as_bytes());
        hasher.update(flight.price.to_le_bytes());
        hasher.update(flight.currency.as_bytes());
    }
    // FilterSpec and SortKey serialize deterministically (struct field order)
    if let Some(spec) = &request.filter {
        if let Ok(encoded) = serde_json::to_vec(spec) {
            hasher.update(&encoded);
        }
    }
    if let Ok(encoded) = serde_json::to_vec(&request.sort.unwrap_or_default()) {
        hasher.update(&encoded);
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use jetrank_common::types::{
        Aircraft, AircraftGeneration, Airline, AirportInfo, CabinClass, GeoPoint, Segment,
        StaticDirectory,
    };

    fn directory() -> StaticDirectory {
        let mut dir = StaticDirectory::new();
        for (code, lat, lon, offset) in [
            ("JFK", 40.64, -73.78, -5.0),
            ("LHR", 51.47, -0.45, 0.0),
        ] {
            dir.insert(AirportInfo {
                code: code.into(),
                coords: Some(GeoPoint { lat, lon }),
                utc_offset_hours: Some(offset),
            });
        }
        dir
    }

    fn flight(id: &str, price: f64, arr_h: u32) -> FlightOption {
        FlightOption {
            id: id.into(),
            origin: "JFK".into(),
            destination: "LHR".into(),
            segments: vec![Segment {
                origin: "JFK".into(),
                destination: "LHR".into(),
                departure: Utc.with_ymd_and_hms(2025, 6, 10, 22, 0, 0).unwrap(),
                arrival: Utc.with_ymd_and_hms(2025, 6, 11, arr_h, 0, 0).unwrap(),
                flight_number: "JR100".into(),
                aircraft: Aircraft {
                    type_code: "789".into(),
                    manufacturer: "Boeing".into(),
                    sleep_comfort: 7.0,
                    generation: AircraftGeneration::Modern,
                    cabin_pressure_altitude_ft: 6000,
                    cabin_humidity_pct: 15.0,
                },
                airline: Airline {
                    code: "JR".into(),
                    name: "Jetrank Air".into(),
                    service_quality: 7.0,
                    jetlag_optimization: 7.0,
                },
                cabin_class: CabinClass::Economy,
            }],
            total_duration_minutes: 420,
            stops: 0,
            price,
            currency: "USD".into(),
            layovers: vec![],
        }
    }

    #[test]
    fn empty_request_produces_empty_results() {
        let dir = directory();
        let result = rank(&RankRequest::default(), &dir, &EngineConfig::default()).unwrap();
        assert!(result.flights.is_empty());
        assert!(result.analysis.is_none());
        assert!(result.filter_stats.is_none());
    }

    #[test]
    fn parallel_and_sequential_scoring_agree() {
        let dir = directory();
        let flights: Vec<FlightOption> = (0..12)
            .map(|i| flight(&format!("f{i}"), 400.0 + i as f64 * 25.0, 6 + (i % 12) as u32))
            .collect();
        let sequential = EngineConfig {
            parallel_scoring: false,
            ..Default::default()
        };
        let parallel = EngineConfig {
            parallel_scoring: true,
            parallel_threshold: 1,
            ..Default::default()
        };
        let a = score_set(&flights, &dir, &sequential);
        let b = score_set(&flights, &dir, &parallel);
        assert_eq!(a, b);
    }

    #[test]
    fn rank_annotates_categorical_picks() {
        let dir = directory();
        let request = RankRequest {
            flights: vec![flight("cheap", 300.0, 23), flight("rested", 700.0, 6)],
            filter: None,
            sort: None,
        };
        let result = rank(&request, &dir, &EngineConfig::default()).unwrap();
        let analysis = result.analysis.unwrap();
        assert_eq!(analysis.cheapest.unwrap().flight_id, "cheap");
        assert_eq!(analysis.best_jetlag.unwrap().flight_id, "rested");
        let annotated = result
            .flights
            .iter()
            .filter(|s| s.price_category.is_some())
            .count();
        assert!(annotated >= 2);
    }

    #[test]
    fn default_sort_is_jetlag_best() {
        let dir = directory();
        let request = RankRequest {
            flights: vec![flight("late", 500.0, 23), flight("morning", 500.0, 6)],
            filter: None,
            sort: None,
        };
        let result = rank(&request, &dir, &EngineConfig::default()).unwrap();
        assert_eq!(result.flights[0].flight.id, "morning");
    }

    #[test]
    fn oversized_sets_are_truncated_to_the_cap() {
        let dir = directory();
        let config = EngineConfig {
            max_candidates: 3,
            ..Default::default()
        };
        let request = RankRequest {
            flights: (0..10).map(|i| flight(&format!("f{i}"), 400.0, 6)).collect(),
            filter: None,
            sort: None,
        };
        let result = rank(&request, &dir, &config).unwrap();
        assert_eq!(result.flights.len(), 3);
    }

    #[test]
    fn cache_key_is_stable_and_input_sensitive() {
        let request_a = RankRequest {
            flights: vec![flight("a", 400.0, 6)],
            filter: None,
            sort: None,
        };
        let request_b = RankRequest {
            flights: vec![flight("a", 425.0, 6)],
            filter: None,
            sort: None,
        };
        assert_eq!(cache_key(&request_a), cache_key(&request_a));
        assert_ne!(cache_key(&request_a), cache_key(&request_b));
    }
}
