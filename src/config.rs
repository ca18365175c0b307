//! Engine configuration
//!
//! Every key is optional; an empty JSON object yields the defaults.
//!
//! ```json
//! { "cache-capacity": 256, "parallel-threshold": 8, "validate-instance": false }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default number of compiled expressions kept
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Default batch size at which evaluation goes parallel
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Compiled expressions kept in the LRU cache; 0 disables caching.
    pub cache_capacity: usize,
    /// Batches at least this large evaluate on the rayon pool.
    pub parallel_threshold: usize,
    /// Validate instances against the schema before navigating them.
    pub validate_instance: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            validate_instance: true,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate_instance = validate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.cache_capacity, 128);
        assert_eq!(config.parallel_threshold, 4);
        assert!(config.validate_instance);
    }

    #[test]
    fn test_kebab_case_keys() {
        let config = EngineConfig::from_json(
            r#"{ "cache-capacity": 0, "parallel-threshold": 16, "validate-instance": false }"#,
        )
        .unwrap();
        assert_eq!(
            config,
            EngineConfig::default()
                .with_cache_capacity(0)
                .with_parallel_threshold(16)
                .with_validation(false)
        );
    }

    #[test]
    fn test_partial_document() {
        let config = EngineConfig::from_json(r#"{ "parallel-threshold": 2 }"#).unwrap();
        assert_eq!(config.parallel_threshold, 2);
        assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn test_rejects_bad_documents() {
        assert!(matches!(EngineConfig::from_json("{"), Err(Error::Config(_))));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "cache_capacity": 1 }"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "cache-capacity": -1 }"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_serializes_back() {
        let json = serde_json::to_string(&EngineConfig::default()).unwrap();
        assert!(json.contains("\"cache-capacity\":128"));
    }
}
