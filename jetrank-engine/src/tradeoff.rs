//! Price-jetlag tradeoff optimizer
//!
//! Consumes the complete scored set for one search and classifies flights into
//! cheapest / best-jetlag / best-value / balanced. Runs after scoring and
//! needs the entire set at once: categorical assignment requires global
//! min/max, so this is the synchronization barrier after any parallel
//! scoring fan-out.
//!
//! Value scores are min-max normalized over this search's price and jetlag
//! ranges only and are NOT comparable across searches.

use jetrank_common::types::{
    CategorizedFlight, PriceAnalysis, PriceCategory, PriceCategoryKind, ScoredFlight,
};
use tracing::debug;

/// Normalize `value` into [0, 1] over `(min, max)`; a flat range maps to
/// `flat` so degenerate sets stay well-defined
fn min_max_norm(value: f64, min: f64, max: f64, flat: f64) -> f64 {
    if (max - min).abs() < f64::EPSILON {
        flat
    } else {
        (value - min) / (max - min)
    }
}

/// Value score (0-100): equal blend of cheapness and jetlag quality,
/// normalized over this search's ranges
fn value_score(price_norm: f64, jetlag_norm: f64) -> f64 {
    (0.5 * (1.0 - price_norm) + 0.5 * jetlag_norm) * 100.0
}

/// Per-flight value scores over the given set's own price and jetlag ranges,
/// in input order. A flat price range counts as maximally cheap; a flat
/// jetlag range counts as maximally rested. Also used by the value-best sort.
pub fn compute_value_scores(scored: &[ScoredFlight]) -> Vec<f64> {
    let price_min = scored.iter().map(|s| s.flight.price).fold(f64::INFINITY, f64::min);
    let price_max = scored.iter().map(|s| s.flight.price).fold(f64::NEG_INFINITY, f64::max);
    let jetlag_min = scored.iter().map(|s| s.score.overall).fold(f64::INFINITY, f64::min);
    let jetlag_max = scored.iter().map(|s| s.score.overall).fold(f64::NEG_INFINITY, f64::max);
    scored
        .iter()
        .map(|s| {
            let p = min_max_norm(s.flight.price, price_min, price_max, 0.0);
            let j = min_max_norm(s.score.overall, jetlag_min, jetlag_max, 1.0);
            value_score(p, j)
        })
        .collect()
}

/// Analyze the whole scored set and single out the categorical picks.
///
/// Tie-breaks: cheapest prefers the higher jetlag score, best-jetlag prefers
/// the lower price, best-value and balanced keep the earlier flight (stable).
/// A singleton set has cheapest = best-jetlag = best-value and no balanced
/// entry. An empty set degrades to null picks and zero ranges instead of
/// failing.
pub fn analyze_tradeoffs(scored: &[ScoredFlight]) -> PriceAnalysis {
    if scored.is_empty() {
        debug!("Tradeoff analysis over an empty set");
        return PriceAnalysis {
            cheapest: None,
            best_jetlag: None,
            best_value: None,
            balanced: None,
            price_range: (0.0, 0.0),
            jetlag_range: (0.0, 0.0),
            value_scores: Vec::new(),
        };
    }

    let price_min = scored.iter().map(|s| s.flight.price).fold(f64::INFINITY, f64::min);
    let price_max = scored.iter().map(|s| s.flight.price).fold(f64::NEG_INFINITY, f64::max);
    let jetlag_min = scored.iter().map(|s| s.score.overall).fold(f64::INFINITY, f64::min);
    let jetlag_max = scored.iter().map(|s| s.score.overall).fold(f64::NEG_INFINITY, f64::max);

    let value_scores: Vec<(String, f64)> = scored
        .iter()
        .map(|s| s.flight.id.clone())
        .zip(compute_value_scores(scored))
        .collect();

    // Cheapest: min price, ties broken by higher jetlag score
    let cheapest_idx = arg_best(scored, |a, b| {
        a.flight
            .price
            .total_cmp(&b.flight.price)
            .then(b.score.overall.total_cmp(&a.score.overall))
    });

    // Best jetlag: max overall score, ties broken by lower price
    let best_jetlag_idx = arg_best(scored, |a, b| {
        b.score
            .overall
            .total_cmp(&a.score.overall)
            .then(a.flight.price.total_cmp(&b.flight.price))
    });

    // Best value: max value score, earlier flight wins ties
    let best_value_idx = (0..scored.len())
        .max_by(|&a, &b| {
            value_scores[a]
                .1
                .total_cmp(&value_scores[b].1)
                .then(b.cmp(&a))
        })
        .unwrap_or(0);

    // Balanced: closest to the midpoint of normalized price and jetlag;
    // omitted for singleton sets
    let balanced_idx = (scored.len() >= 2).then(|| {
        arg_best(scored, |a, b| {
            midpoint_distance(a, price_min, price_max, jetlag_min, jetlag_max)
                .total_cmp(&midpoint_distance(b, price_min, price_max, jetlag_min, jetlag_max))
        })
    });

    let savings = scored[best_jetlag_idx].flight.price - scored[cheapest_idx].flight.price;

    let categorize = |idx: usize, kind: PriceCategoryKind| -> CategorizedFlight {
        CategorizedFlight {
            flight_id: scored[idx].flight.id.clone(),
            category: PriceCategory {
                kind,
                value_score: value_scores[idx].1,
                savings_from_best: (kind == PriceCategoryKind::Cheapest && savings > 0.0)
                    .then_some(savings),
                extra_cost_for_best: (kind == PriceCategoryKind::BestJetlag && savings > 0.0)
                    .then_some(savings),
            },
        }
    };

    debug!(
        flights = scored.len(),
        price_min,
        price_max,
        jetlag_min,
        jetlag_max,
        "Analyzed price-jetlag tradeoffs"
    );

    PriceAnalysis {
        cheapest: Some(categorize(cheapest_idx, PriceCategoryKind::Cheapest)),
        best_jetlag: Some(categorize(best_jetlag_idx, PriceCategoryKind::BestJetlag)),
        best_value: Some(categorize(best_value_idx, PriceCategoryKind::BestValue)),
        balanced: balanced_idx.map(|idx| categorize(idx, PriceCategoryKind::Balanced)),
        price_range: (price_min, price_max),
        jetlag_range: (jetlag_min, jetlag_max),
        value_scores,
    }
}

/// Index of the best element under `cmp` (first wins ties; `cmp` orders
/// better-first)
fn arg_best<F>(scored: &[ScoredFlight], cmp: F) -> usize
where
    F: Fn(&ScoredFlight, &ScoredFlight) -> std::cmp::Ordering,
{
    let mut best = 0;
    for i in 1..scored.len() {
        if cmp(&scored[i], &scored[best]).is_lt() {
            best = i;
        }
    }
    best
}

/// Euclidean distance from the normalized (price, jetlag) midpoint
fn midpoint_distance(
    s: &ScoredFlight,
    price_min: f64,
    price_max: f64,
    jetlag_min: f64,
    jetlag_max: f64,
) -> f64 {
    let p = min_max_norm(s.flight.price, price_min, price_max, 0.5);
    let j = min_max_norm(s.score.overall, jetlag_min, jetlag_max, 0.5);
    ((p - 0.5).powi(2) + (j - 0.5).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jetrank_common::types::{FlightOption, HolisticScore, RecommendationTier};

    fn scored(id: &str, price: f64, overall: f64) -> ScoredFlight {
        ScoredFlight {
            flight: FlightOption {
                id: id.into(),
                origin: "JFK".into(),
                destination: "LHR".into(),
                segments: vec![],
                total_duration_minutes: 420,
                stops: 0,
                price,
                currency: "USD".into(),
                layovers: vec![],
            },
            score: HolisticScore {
                overall,
                circadian: overall,
                strategy: overall,
                comfort: overall,
                efficiency: overall,
                recommendation: RecommendationTier::from_score(overall),
                estimated_recovery_days: 1.0,
                strengths: vec![],
                weaknesses: vec![],
                recommendations: vec![],
                scenario_matches: vec![],
                tradeoff_notes: vec![],
                critical_factors: vec![],
            },
            price_category: None,
        }
    }

    #[test]
    fn identifies_the_extremes() {
        let set = vec![
            scored("cheap_bad", 300.0, 45.0),
            scored("mid", 550.0, 70.0),
            scored("pricey_good", 900.0, 92.0),
        ];
        let analysis = analyze_tradeoffs(&set);
        assert_eq!(analysis.cheapest.unwrap().flight_id, "cheap_bad");
        assert_eq!(analysis.best_jetlag.unwrap().flight_id, "pricey_good");
        assert_eq!(analysis.price_range, (300.0, 900.0));
        assert_eq!(analysis.jetlag_range, (45.0, 92.0));
    }

    #[test]
    fn cheapest_matches_min_price_and_best_jetlag_matches_max_score() {
        let set = vec![
            scored("a", 410.0, 61.0),
            scored("b", 385.0, 55.0),
            scored("c", 620.0, 88.0),
            scored("d", 390.0, 71.0),
        ];
        let analysis = analyze_tradeoffs(&set);
        let min_price = set.iter().map(|s| s.flight.price).fold(f64::INFINITY, f64::min);
        let max_score = set.iter().map(|s| s.score.overall).fold(f64::NEG_INFINITY, f64::max);
        let cheapest_id = analysis.cheapest.unwrap().flight_id;
        let best_id = analysis.best_jetlag.unwrap().flight_id;
        let cheapest = set.iter().find(|s| s.flight.id == cheapest_id).unwrap();
        let best = set.iter().find(|s| s.flight.id == best_id).unwrap();
        assert_eq!(cheapest.flight.price, min_price);
        assert_eq!(best.score.overall, max_score);
    }

    #[test]
    fn price_tie_broken_by_higher_jetlag_score() {
        let set = vec![scored("tired", 400.0, 50.0), scored("rested", 400.0, 80.0)];
        let analysis = analyze_tradeoffs(&set);
        assert_eq!(analysis.cheapest.unwrap().flight_id, "rested");
    }

    #[test]
    fn jetlag_tie_broken_by_lower_price() {
        let set = vec![scored("pricey", 700.0, 85.0), scored("fair", 500.0, 85.0)];
        let analysis = analyze_tradeoffs(&set);
        assert_eq!(analysis.best_jetlag.unwrap().flight_id, "fair");
    }

    #[test]
    fn singleton_set_collapses_and_omits_balanced() {
        let set = vec![scored("only", 500.0, 75.0)];
        let analysis = analyze_tradeoffs(&set);
        let cheapest = analysis.cheapest.unwrap();
        assert_eq!(cheapest.flight_id, "only");
        assert_eq!(analysis.best_jetlag.unwrap().flight_id, "only");
        assert_eq!(analysis.best_value.unwrap().flight_id, "only");
        assert!(analysis.balanced.is_none());
        assert!(cheapest.category.savings_from_best.is_none());
    }

    #[test]
    fn value_score_rewards_cheap_and_rested() {
        let set = vec![
            scored("cheap_bad", 300.0, 40.0),
            scored("sweet_spot", 400.0, 85.0),
            scored("pricey_good", 900.0, 90.0),
        ];
        let analysis = analyze_tradeoffs(&set);
        assert_eq!(analysis.best_value.unwrap().flight_id, "sweet_spot");
        // Value scores are emitted in input order
        assert_eq!(analysis.value_scores[0].0, "cheap_bad");
        for (_, v) in &analysis.value_scores {
            assert!((0.0..=100.0).contains(v));
        }
    }

    #[test]
    fn balanced_picks_the_midpoint_flight() {
        let set = vec![
            scored("cheap_bad", 300.0, 40.0),
            scored("middle", 600.0, 65.0),
            scored("pricey_good", 900.0, 90.0),
        ];
        let analysis = analyze_tradeoffs(&set);
        assert_eq!(analysis.balanced.unwrap().flight_id, "middle");
    }

    #[test]
    fn savings_are_reported_on_both_categorical_picks() {
        let set = vec![scored("cheap", 300.0, 50.0), scored("best", 800.0, 90.0)];
        let analysis = analyze_tradeoffs(&set);
        assert_eq!(analysis.cheapest.unwrap().category.savings_from_best, Some(500.0));
        assert_eq!(analysis.best_jetlag.unwrap().category.extra_cost_for_best, Some(500.0));
    }

    #[test]
    fn empty_set_degrades_to_a_null_analysis() {
        let analysis = analyze_tradeoffs(&[]);
        assert!(analysis.cheapest.is_none());
        assert!(analysis.best_jetlag.is_none());
        assert!(analysis.best_value.is_none());
        assert!(analysis.balanced.is_none());
        assert!(analysis.value_scores.is_empty());
        assert_eq!(analysis.price_range, (0.0, 0.0));
        assert_eq!(analysis.jetlag_range, (0.0, 0.0));
    }
}
