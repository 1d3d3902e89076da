//! Matching a user's favorite genres against cluster centroids.
//!
//! Cluster scores are compared after every genre is added, not only once
//! the full score is known. A cluster whose first (most favored) genres
//! alone reach an extreme partial score can therefore win even if its
//! total would not, which weights the top-ranked genres more heavily.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;

use crate::centroid::Centroid;
use crate::cluster::ClusterMap;
use crate::error::{RecommendError, Result};
use crate::item::{Item, User};

/// Score a best cluster must exceed.
pub const BEST_SCORE_FLOOR: f64 = 0.0;
/// Score a worst cluster must fall below.
pub const WORST_SCORE_CEILING: f64 = 100.0;

/// A genre weight on a movie together with the user's rating of that movie.
#[derive(Clone, Debug, PartialEq)]
pub struct GenreScore {
    pub genre: String,
    pub rating: u8,
    pub weight: f64,
}

impl GenreScore {
    /// Rating on a 1..10 scale applied to the genre weight.
    pub fn value(&self) -> f64 {
        self.rating as f64 / 10.0 * self.weight
    }
}

/// Centroid whose running score over `preferred` is highest, if any partial
/// score exceeds [`BEST_SCORE_FLOOR`].
pub fn find_best_cluster<'a>(
    clusters: &'a ClusterMap,
    preferred: &[String],
) -> Result<Option<&'a Centroid>> {
    select_cluster(clusters, preferred, BEST_SCORE_FLOOR, Ordering::Greater)
}

/// Centroid whose running score over `preferred` is lowest, if any partial
/// score falls below [`WORST_SCORE_CEILING`].
pub fn find_worst_cluster<'a>(
    clusters: &'a ClusterMap,
    preferred: &[String],
) -> Result<Option<&'a Centroid>> {
    select_cluster(clusters, preferred, WORST_SCORE_CEILING, Ordering::Less)
}

fn select_cluster<'a>(
    clusters: &'a ClusterMap,
    preferred: &[String],
    threshold: f64,
    wins: Ordering,
) -> Result<Option<&'a Centroid>> {
    let mut record = threshold;
    let mut selected = None;
    for centroid in clusters.centroids() {
        let mut score = 0.0;
        for genre in preferred {
            score += centroid
                .coordinate(genre)
                .ok_or_else(|| RecommendError::missing_key(genre.as_str()))?;
            if score.partial_cmp(&record) == Some(wins) {
                record = score;
                selected = Some(centroid);
            }
        }
    }
    debug!(score = record, found = selected.is_some(), "cluster selected");
    Ok(selected)
}

/// Catalog copies of the movies the user rated, each carrying the user's
/// rating. Rated movies missing from `catalog` are skipped.
pub fn join_ratings(user: &User, catalog: &[Item]) -> Result<Vec<Item>> {
    let mut joined = Vec::new();
    for rated in &user.movies {
        let Some(movie) = catalog.iter().find(|m| m.description == rated.description) else {
            debug!(movie = %rated.description, "rated movie not in catalog");
            continue;
        };
        joined.push(movie.clone().with_rating(rated.rating)?);
    }
    Ok(joined)
}

/// Genre triples for every rated item; unrated items contribute nothing.
pub fn genre_scores(rated_items: &[Item]) -> Vec<GenreScore> {
    let mut scores = Vec::new();
    for movie in rated_items {
        let Some(rating) = movie.rating() else {
            continue;
        };
        scores.extend(movie.features.iter().map(|(genre, weight)| GenreScore {
            genre: genre.clone(),
            rating,
            weight: *weight,
        }));
    }
    scores
}

/// Top `n` genres by average rated weight, highest first. Equal averages
/// are ordered by genre name.
pub fn rank_genres(scores: &[GenreScore], n: usize) -> Vec<String> {
    let mut grouped: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for score in scores {
        let (total, count) = grouped.entry(score.genre.as_str()).or_insert((0.0, 0));
        *total += score.value();
        *count += 1;
    }

    let mut averages: Vec<(&str, f64)> = grouped
        .into_iter()
        .map(|(genre, (total, count))| (genre, total / count as f64))
        .collect();
    // stable sort keeps the name order among ties
    averages.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    averages
        .into_iter()
        .take(n)
        .map(|(genre, _)| genre.to_string())
        .collect()
}

/// The user's `n` favorite genres, derived from their ratings of `catalog` movies.
pub fn favorite_genres(user: &User, catalog: &[Item], n: usize) -> Result<Vec<String>> {
    let rated = join_ratings(user, catalog)?;
    Ok(rank_genres(&genre_scores(&rated), n))
}
