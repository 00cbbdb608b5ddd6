//! # Jetrank Common Library
//!
//! Shared code for the jetrank flight ranking engine:
//! - Flight, segment, and airport data model
//! - Holistic score and price analysis output types
//! - Filter specification and result types
//! - Fixed scoring parameters (weights, thresholds, persona table)
//! - Error types and configuration loading

pub mod config;
pub mod error;
pub mod params;
pub mod types;

pub use error::{Error, Result};
