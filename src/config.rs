use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RecommendError, Result};
use crate::kmeans::{Denominator, KMeansConfig};

/// Settings of a recommendation run. Every field has a default, so a JSON
/// file only needs to name what it overrides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    pub clusters: usize,
    pub max_iterations: usize,
    /// Movies shown per recommendation list.
    pub sample_size: usize,
    /// How many favorite genres are matched against centroids.
    pub favorite_genres: usize,
    /// Seed for centroid initialization, catalog weights and sampling.
    pub seed: Option<u64>,
    pub denominator: Denominator,
    pub parallel: bool,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        RecommenderConfig {
            clusters: 4,
            max_iterations: 1000,
            sample_size: 5,
            favorite_genres: 3,
            seed: None,
            denominator: Denominator::ClusterSize,
            parallel: false,
        }
    }
}

impl RecommenderConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: RecommenderConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.clusters == 0 {
            return Err(RecommendError::invalid_argument("clusters must be positive"));
        }
        if self.max_iterations == 0 {
            return Err(RecommendError::invalid_argument(
                "max_iterations must be positive",
            ));
        }
        if self.favorite_genres == 0 {
            return Err(RecommendError::invalid_argument(
                "favorite_genres must be positive",
            ));
        }
        Ok(())
    }

    pub fn kmeans(&self) -> KMeansConfig {
        KMeansConfig::new(self.clusters)
            .with_max_iterations(self.max_iterations)
            .with_denominator(self.denominator)
            .with_parallel(self.parallel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: RecommenderConfig =
            serde_json::from_str(r#"{"clusters": 6, "denominator": "key-presence"}"#).unwrap();
        assert_eq!(config.clusters, 6);
        assert_eq!(config.denominator, Denominator::KeyPresence);
        assert_eq!(config.sample_size, 5);
        assert_eq!(config.max_iterations, 1000);
        assert_eq!(config.kmeans().k, 6);
    }

    #[test]
    fn test_from_json_file_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"clusters": 0}}"#).unwrap();
        assert!(matches!(
            RecommenderConfig::from_json_file(file.path()),
            Err(RecommendError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "clusters = 3").unwrap();
        assert!(matches!(
            RecommenderConfig::from_json_file(file.path()),
            Err(RecommendError::Json(_))
        ));
    }
}
