//! Engine configuration loading
//!
//! Resolution priority order:
//! 1. Explicit path argument (highest priority)
//! 2. `JETRANK_CONFIG` environment variable
//! 3. Compiled defaults (fallback)
//!
//! Scoring weights and thresholds are NOT configuration (see `params`); this
//! only covers operational knobs of the batch pipeline.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Operational configuration for the ranking pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fan scoring out across a rayon pool when the candidate set is large
    pub parallel_scoring: bool,
    /// Minimum candidate-set size before the parallel path is used
    pub parallel_threshold: usize,
    /// Hard cap on candidate-set size per search; larger sets are truncated
    /// before scoring (upstream sources occasionally return runaway pages)
    pub max_candidates: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel_scoring: true,
            parallel_threshold: 8,
            max_candidates: 200,
        }
    }
}

impl EngineConfig {
    /// Resolve configuration following the priority order above
    pub fn resolve(explicit_path: Option<&str>) -> Result<Self> {
        // Priority 1: explicit path argument
        if let Some(path) = explicit_path {
            return Self::load_file(Path::new(path));
        }

        // Priority 2: environment variable
        if let Ok(path) = std::env::var("JETRANK_CONFIG") {
            return Self::load_file(Path::new(&path));
        }

        // Priority 3: compiled defaults
        Ok(Self::default())
    }

    /// Load and validate a TOML configuration file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {e}", path.display())))?;
        let config: EngineConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Cannot parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_candidates == 0 {
            return Err(Error::Config("max_candidates must be at least 1".into()));
        }
        if self.parallel_threshold == 0 {
            return Err(Error::Config("parallel_threshold must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_no_source_given() {
        // No explicit path and (in tests) the env var is left unset
        std::env::remove_var("JETRANK_CONFIG");
        let config = EngineConfig::resolve(None).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn loads_partial_toml_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "parallel_scoring = false").unwrap();
        let config = EngineConfig::load_file(file.path()).unwrap();
        assert!(!config.parallel_scoring);
        assert_eq!(config.parallel_threshold, EngineConfig::default().parallel_threshold);
    }

    #[test]
    fn rejects_zero_max_candidates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_candidates = 0").unwrap();
        let result = EngineConfig::load_file(file.path());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let result = EngineConfig::load_file(Path::new("/nonexistent/jetrank.toml"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
