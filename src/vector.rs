use std::collections::BTreeMap;

/// Sparse genre -> weight mapping. Different items may use disjoint genres.
pub type FeatureVector = BTreeMap<String, f64>;

/// Dissimilarity between two feature vectors.
///
/// Genres present in only one of the two vectors carry no signal and must
/// not contribute to the result. Implementations are expected to be
/// symmetric and non-negative.
pub trait DistanceCalculator: Send + Sync {
    fn calculate(&self, features1: &FeatureVector, features2: &FeatureVector) -> f64;
}

/// Pairs of weights for the genres both vectors define.
fn shared<'a>(
    features1: &'a FeatureVector,
    features2: &'a FeatureVector,
) -> impl Iterator<Item = (f64, f64)> + 'a {
    features1
        .iter()
        .filter_map(move |(genre, x)| features2.get(genre).map(|y| (*x, *y)))
}

pub struct EuclideanDistance;

impl DistanceCalculator for EuclideanDistance {
    fn calculate(&self, features1: &FeatureVector, features2: &FeatureVector) -> f64 {
        shared(features1, features2)
            .map(|(x, y)| (x - y).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

pub struct ManhattanDistance;

impl DistanceCalculator for ManhattanDistance {
    fn calculate(&self, features1: &FeatureVector, features2: &FeatureVector) -> f64 {
        shared(features1, features2)
            .map(|(x, y)| (x - y).abs())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn features(pairs: &[(&str, f64)]) -> FeatureVector {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_euclidean_on_shared_genres() {
        let a = features(&[("Drama", 0.0), ("Comedy", 0.0)]);
        let b = features(&[("Drama", 3.0), ("Comedy", 4.0)]);
        assert_eq!(EuclideanDistance.calculate(&a, &b), 5.0);
    }

    #[test]
    fn test_unshared_genres_are_ignored() {
        let a = features(&[("Drama", 1.0), ("Horror", 50.0)]);
        let b = features(&[("Drama", 4.0), ("Western", 7.0)]);
        assert_eq!(EuclideanDistance.calculate(&a, &b), 3.0);
        assert_eq!(ManhattanDistance.calculate(&a, &b), 3.0);
    }

    #[test]
    fn test_disjoint_genres_have_zero_distance() {
        let a = features(&[("Drama", 10.0)]);
        let b = features(&[("Comedy", 90.0)]);
        assert_eq!(EuclideanDistance.calculate(&a, &b), 0.0);
        assert_eq!(ManhattanDistance.calculate(&a, &b), 0.0);
    }

    #[test]
    fn test_manhattan() {
        let a = features(&[("x", 1.0), ("y", -2.0)]);
        let b = features(&[("x", 4.0), ("y", 2.0)]);
        assert_eq!(ManhattanDistance.calculate(&a, &b), 7.0);
    }

    fn feature_vector() -> impl Strategy<Value = FeatureVector> {
        prop::collection::btree_map("[a-e]", -100.0f64..100.0, 0..5)
    }

    proptest! {
        #[test]
        fn prop_distance_to_self_is_zero(x in feature_vector()) {
            prop_assert_eq!(EuclideanDistance.calculate(&x, &x), 0.0);
            prop_assert_eq!(ManhattanDistance.calculate(&x, &x), 0.0);
        }

        #[test]
        fn prop_distance_is_non_negative_and_symmetric(a in feature_vector(), b in feature_vector()) {
            let ab = EuclideanDistance.calculate(&a, &b);
            prop_assert!(ab >= 0.0);
            prop_assert_eq!(ab, EuclideanDistance.calculate(&b, &a));
        }
    }
}
