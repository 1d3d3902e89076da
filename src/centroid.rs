use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::vector::FeatureVector;

/// A point in genre space. Never mutated once built: relocation produces a
/// new centroid, so centroids from different iterations can be compared.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Centroid {
    coordinates: FeatureVector,
}

impl Centroid {
    pub fn new(coordinates: FeatureVector) -> Self {
        Centroid { coordinates }
    }

    pub fn coordinates(&self) -> &FeatureVector {
        &self.coordinates
    }

    pub fn coordinate(&self, genre: &str) -> Option<f64> {
        self.coordinates.get(genre).copied()
    }

    fn ordered(&self) -> impl Iterator<Item = (&String, OrderedFloat<f64>)> {
        self.coordinates.iter().map(|(k, v)| (k, OrderedFloat(*v)))
    }
}

impl PartialEq for Centroid {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Centroid {}

impl PartialOrd for Centroid {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Centroid {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordered().cmp(other.ordered())
    }
}

impl Hash for Centroid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for (genre, value) in self.ordered() {
            genre.hash(state);
            value.hash(state);
        }
    }
}
