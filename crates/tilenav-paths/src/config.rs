use std::num::NonZeroUsize;

use crate::error::PathError;

/// Default number of paths retained by the path cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Which engine answers cache misses in
/// [`PathService::compute_unit_path`](crate::PathService::compute_unit_path).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SearchEngine {
    /// Breadth-first flood search.
    Flood,
    /// Best-first search guided by approximate distance.
    #[default]
    Heuristic,
}

/// Configuration for a [`PathService`](crate::PathService).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathConfig {
    /// Maximum number of paths kept in the cache. Fixed for the service's
    /// lifetime.
    pub cache_capacity: usize,
    pub engine: SearchEngine,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            engine: SearchEngine::default(),
        }
    }
}

impl PathConfig {
    /// A default configuration with the given cache capacity.
    pub fn with_capacity(cache_capacity: usize) -> Self {
        Self {
            cache_capacity,
            ..Self::default()
        }
    }

    /// Select the search engine.
    pub fn engine(mut self, engine: SearchEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Check the configuration, returning the validated cache capacity.
    pub fn validate(&self) -> Result<NonZeroUsize, PathError> {
        NonZeroUsize::new(self.cache_capacity).ok_or(PathError::ZeroCapacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = PathConfig::default();
        assert_eq!(cfg.cache_capacity, DEFAULT_CACHE_CAPACITY);
        assert_eq!(cfg.engine, SearchEngine::Heuristic);
        assert_eq!(cfg.validate().unwrap().get(), DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn builder() {
        let cfg = PathConfig::with_capacity(3).engine(SearchEngine::Flood);
        assert_eq!(cfg.cache_capacity, 3);
        assert_eq!(cfg.engine, SearchEngine::Flood);
    }

    #[test]
    fn zero_capacity_rejected() {
        assert_eq!(
            PathConfig::with_capacity(0).validate(),
            Err(PathError::ZeroCapacity)
        );
    }
}
