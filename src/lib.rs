mod centroid;
mod cluster;
pub mod config;
pub mod error;
mod item;
pub mod kmeans;
pub mod loader;
pub mod sampling;
pub mod scoring;
pub mod vector;

pub use centroid::Centroid;
pub use cluster::ClusterMap;
pub use config::RecommenderConfig;
pub use error::{RecommendError, Result};
pub use item::{Item, RatedMovie, User};
pub use kmeans::{fit, Denominator, Fitted, KMeans, KMeansConfig, Termination};
pub use sampling::sample_descriptions;
pub use scoring::{
    favorite_genres, find_best_cluster, find_worst_cluster, join_ratings, GenreScore,
};
pub use vector::{DistanceCalculator, EuclideanDistance, FeatureVector, ManhattanDistance};
