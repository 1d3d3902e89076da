use std::collections::BTreeMap;

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::centroid::Centroid;
use crate::cluster::ClusterMap;
use crate::error::{RecommendError, Result};
use crate::item::Item;
use crate::vector::{DistanceCalculator, FeatureVector};

/// What a genre's accumulated sum is divided by when a centroid is relocated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Denominator {
    /// Total number of items in the cluster. Genres that only some members
    /// define are pulled toward zero.
    #[default]
    ClusterSize,
    /// Number of cluster members that define the genre (a plain mean).
    KeyPresence,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KMeansConfig {
    /// Number of centroids.
    pub k: usize,
    /// Upper bound on assignment passes.
    pub max_iterations: usize,
    pub denominator: Denominator,
    /// Run the assignment step on the rayon pool.
    pub parallel: bool,
}

impl KMeansConfig {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iterations: 1000,
            denominator: Denominator::default(),
            parallel: false,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_denominator(mut self, denominator: Denominator) -> Self {
        self.denominator = denominator;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Why the iteration loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    /// Two consecutive passes produced the same cluster map.
    Converged,
    /// The last allowed pass was executed.
    IterationLimit,
    /// No items were supplied.
    EmptyInput,
}

/// Outcome of [`KMeans::fit_report`].
#[derive(Clone, Debug)]
pub struct Fitted {
    pub clusters: ClusterMap,
    /// All `k` centroids of the final pass, including those left without items.
    pub centroids: Vec<Centroid>,
    /// Number of assignment passes executed.
    pub iterations: usize,
    pub termination: Termination,
}

/// Item indices grouped by centroid; compared between passes to detect convergence.
type Assignment = BTreeMap<Centroid, Vec<usize>>;

pub struct KMeans {
    config: KMeansConfig,
    distance_calculator: Box<dyn DistanceCalculator>,
}

impl KMeans {
    pub fn new(config: KMeansConfig, distance_calculator: Box<dyn DistanceCalculator>) -> Self {
        KMeans {
            config,
            distance_calculator,
        }
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    /// Cluster `items` and return the centroid -> items map of the final pass.
    pub fn fit<R: Rng + ?Sized>(&self, items: &[Item], rng: &mut R) -> Result<ClusterMap> {
        self.fit_report(items, rng).map(|fitted| fitted.clusters)
    }

    /// Like [`KMeans::fit`], but also reports the final centroids and how the loop ended.
    ///
    /// Every item appears in exactly one cluster of the result. Empty input
    /// yields an empty map without drawing any centroid.
    pub fn fit_report<R: Rng + ?Sized>(&self, items: &[Item], rng: &mut R) -> Result<Fitted> {
        if self.config.k == 0 {
            return Err(RecommendError::invalid_argument("k must be positive"));
        }
        if self.config.max_iterations == 0 {
            return Err(RecommendError::invalid_argument(
                "max_iterations must be positive",
            ));
        }
        if items.is_empty() {
            info!("no items to cluster");
            return Ok(Fitted {
                clusters: ClusterMap::new(),
                centroids: Vec::new(),
                iterations: 0,
                termination: Termination::EmptyInput,
            });
        }

        let mut centroids = random_centroids(items, self.config.k, rng);
        let mut last_state: Option<Assignment> = None;
        let mut last_labels: Option<Vec<usize>> = None;
        let mut iteration = 0;

        loop {
            let labels = self.assign(items, &centroids);
            let assignment = group(&centroids, &labels);

            if let Some(previous) = &last_labels {
                let moved = previous.iter().zip(&labels).filter(|(a, b)| a != b).count();
                debug!(iteration, moved, clusters = assignment.len(), "assignment pass");
            }

            let converged = last_state.as_ref() == Some(&assignment);
            let is_last_iteration = iteration + 1 == self.config.max_iterations;
            if converged || is_last_iteration {
                let termination = if converged {
                    Termination::Converged
                } else {
                    Termination::IterationLimit
                };
                info!(
                    iterations = iteration + 1,
                    clusters = assignment.len(),
                    ?termination,
                    "k-means finished"
                );
                let clusters = assignment
                    .into_iter()
                    .flat_map(|(centroid, members)| {
                        members
                            .into_iter()
                            .map(move |index| (centroid.clone(), items[index].clone()))
                    })
                    .collect();
                return Ok(Fitted {
                    clusters,
                    centroids,
                    iterations: iteration + 1,
                    termination,
                });
            }

            centroids = self.relocate(&centroids, &labels, items);
            last_state = Some(assignment);
            last_labels = Some(labels);
            iteration += 1;
        }
    }

    /// Index of the nearest centroid for every item, in item order.
    fn assign(&self, items: &[Item], centroids: &[Centroid]) -> Vec<usize> {
        let nearest = |item: &Item| self.nearest_centroid(&item.features, centroids);
        if self.config.parallel {
            items.par_iter().map(nearest).collect()
        } else {
            items.iter().map(nearest).collect()
        }
    }

    /// First centroid with the strictly smallest distance wins.
    fn nearest_centroid(&self, features: &FeatureVector, centroids: &[Centroid]) -> usize {
        let mut minimum_distance = f64::INFINITY;
        let mut nearest = 0;
        for (index, centroid) in centroids.iter().enumerate() {
            let distance = self
                .distance_calculator
                .calculate(features, centroid.coordinates());
            if distance < minimum_distance {
                minimum_distance = distance;
                nearest = index;
            }
        }
        nearest
    }

    /// New centroid list, same order and length as `centroids`.
    fn relocate(&self, centroids: &[Centroid], labels: &[usize], items: &[Item]) -> Vec<Centroid> {
        centroids
            .iter()
            .enumerate()
            .map(|(index, centroid)| {
                let members: Vec<&Item> = items
                    .iter()
                    .zip(labels)
                    .filter(|(_, label)| **label == index)
                    .map(|(item, _)| item)
                    .collect();
                if members.is_empty() {
                    warn!(centroid = index, "empty cluster keeps its centroid");
                    return centroid.clone();
                }
                average(centroid, &members, self.config.denominator)
            })
            .collect()
    }
}

/// Uniform draw in `[min, max]` of every genre, per centroid.
fn random_centroids<R: Rng + ?Sized>(items: &[Item], k: usize, rng: &mut R) -> Vec<Centroid> {
    let mut ranges: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for item in items {
        for (genre, &value) in &item.features {
            ranges
                .entry(genre.as_str())
                .and_modify(|(min, max)| {
                    *min = min.min(value);
                    *max = max.max(value);
                })
                .or_insert((value, value));
        }
    }

    (0..k)
        .map(|_| {
            let coordinates = ranges
                .iter()
                .map(|(genre, (min, max))| (genre.to_string(), min + rng.gen::<f64>() * (max - min)))
                .collect();
            Centroid::new(coordinates)
        })
        .collect()
}

fn group(centroids: &[Centroid], labels: &[usize]) -> Assignment {
    let mut assignment = Assignment::new();
    for (index, &label) in labels.iter().enumerate() {
        assignment
            .entry(centroids[label].clone())
            .or_default()
            .push(index);
    }
    assignment
}

/// Member genres are summed from zero, the remaining genres start from the
/// previous coordinate. Under [`Denominator::ClusterSize`] every coordinate,
/// including the ones no member defines, is then divided by the cluster size;
/// under [`Denominator::KeyPresence`] only member genres are averaged.
fn average(centroid: &Centroid, members: &[&Item], denominator: Denominator) -> Centroid {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for item in members {
        for (genre, value) in &item.features {
            let (sum, count) = sums.entry(genre.as_str()).or_insert((0.0, 0));
            *sum += value;
            *count += 1;
        }
    }

    let mut coordinates = centroid.coordinates().clone();
    if denominator == Denominator::ClusterSize {
        for value in coordinates.values_mut() {
            *value /= members.len() as f64;
        }
    }
    for (genre, (sum, count)) in sums {
        let divisor = match denominator {
            Denominator::ClusterSize => members.len(),
            Denominator::KeyPresence => count,
        };
        coordinates.insert(genre.to_string(), sum / divisor as f64);
    }
    Centroid::new(coordinates)
}

/// Cluster `items` into at most `k` groups using `distance_calculator`.
pub fn fit<R: Rng + ?Sized>(
    items: &[Item],
    k: usize,
    distance_calculator: Box<dyn DistanceCalculator>,
    max_iterations: usize,
    rng: &mut R,
) -> Result<ClusterMap> {
    let config = KMeansConfig::new(k).with_max_iterations(max_iterations);
    KMeans::new(config, distance_calculator).fit(items, rng)
}
