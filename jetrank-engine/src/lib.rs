//! # Jetrank Engine
//!
//! Ranks retrieved flight itineraries by predicted jet-lag impact, combined
//! with aircraft/airline comfort, routing strategy, and price.
//!
//! Components, in data-flow order:
//! - `circadian`: timezone delta, travel direction, arrival-time optimality,
//!   recovery-day estimation for one flight
//! - `airport`: derives comfort/stress/jetlag-support scores from raw airport
//!   facility records; scores and classifies individual layovers
//! - `scorer`: combines circadian, strategy, comfort, and efficiency
//!   sub-scores into one weighted holistic score per flight
//! - `tradeoff`: whole-set price-vs-jetlag analysis (cheapest / best-jetlag /
//!   best-value / balanced)
//! - `filter`: constraint filtering, stable sorting, and what-if suggestions
//! - `pipeline`: batch scoring fan-out and the end-to-end ranking entry point
//! - `format`: presentation strings for the structured codes the core emits
//!
//! Every function here is synchronous, deterministic, and side-effect-free:
//! no I/O, no hidden state, no wall-clock reads beyond the flight's own
//! timestamps. Persistence, HTTP, and caching belong to the caller.

pub mod airport;
pub mod circadian;
pub mod filter;
pub mod format;
pub mod pipeline;
pub mod scorer;
pub mod tradeoff;

pub use pipeline::{rank, score_set, RankRequest};
pub use scorer::HolisticScorer;
