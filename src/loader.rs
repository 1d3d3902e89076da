//! Readers for the three input files.
//!
//! - users: `name;movie;rating;movie;rating;...`
//! - rated movies: `movie;genre;genre;...`, every genre weighted [`RATED_GENRE_WEIGHT`]
//! - catalog: comma separated with a header row; the title and the quoted,
//!   comma separated genre list are read from fixed columns and each genre
//!   gets a random weight in `0..=100`

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use rand::Rng;
use tracing::info;

use crate::error::{RecommendError, Result};
use crate::item::{Item, RatedMovie, User};
use crate::vector::FeatureVector;

/// Weight given to every genre listed for a rated movie.
pub const RATED_GENRE_WEIGHT: f64 = 66.0;
/// Inclusive upper bound of a random catalog genre weight.
pub const MAX_GENRE_WEIGHT: u32 = 100;

const CATALOG_TITLE_COLUMN: usize = 1;
const CATALOG_GENRE_COLUMN: usize = 5;

fn semicolon_records<R: Read>(reader: R) -> csv::StringRecordsIntoIter<R> {
    ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_records()
}

pub fn read_users<R: Read>(reader: R) -> Result<Vec<User>> {
    let mut users = Vec::new();
    for (index, record) in semicolon_records(reader).enumerate() {
        let record = record?;
        let line = index + 1;
        let Some(name) = record.get(0) else {
            continue;
        };

        let mut movies = Vec::new();
        let mut fields = record.iter().skip(1);
        while let Some(description) = fields.next() {
            let value = fields.next().unwrap_or_default();
            let rating = value.parse::<u8>().map_err(|_| RecommendError::Parse {
                line,
                value: value.to_string(),
                expected: "rating",
            })?;
            movies.push(RatedMovie {
                description: description.to_string(),
                rating,
            });
        }
        users.push(User {
            name: name.to_string(),
            movies,
        });
    }
    Ok(users)
}

pub fn read_rated_movies<R: Read>(reader: R) -> Result<Vec<Item>> {
    let mut movies = Vec::new();
    for record in semicolon_records(reader) {
        let record = record?;
        let Some(description) = record.get(0) else {
            continue;
        };
        let features: FeatureVector = record
            .iter()
            .skip(1)
            .map(|genre| (genre.to_string(), RATED_GENRE_WEIGHT))
            .collect();
        movies.push(Item::new(description, features));
    }
    Ok(movies)
}

pub fn read_catalog<R: Read, G: Rng + ?Sized>(reader: R, rng: &mut G) -> Result<Vec<Item>> {
    let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut movies = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        // header is line 1
        let line = index + 2;
        let title = column(&record, CATALOG_TITLE_COLUMN, line, "title")?;
        let genres = column(&record, CATALOG_GENRE_COLUMN, line, "genre list")?;
        let features: FeatureVector = genres
            .split(',')
            .map(str::trim)
            .filter(|genre| !genre.is_empty())
            .map(|genre| {
                let weight = rng.gen_range(0..=MAX_GENRE_WEIGHT);
                (genre.to_string(), weight as f64)
            })
            .collect();
        movies.push(Item::new(title.trim(), features));
    }
    Ok(movies)
}

fn column<'r>(
    record: &'r StringRecord,
    index: usize,
    line: usize,
    expected: &'static str,
) -> Result<&'r str> {
    record.get(index).ok_or_else(|| RecommendError::Parse {
        line,
        value: String::new(),
        expected,
    })
}

pub fn load_users(path: &Path) -> Result<Vec<User>> {
    let users = read_users(File::open(path)?)?;
    info!(path = %path.display(), count = users.len(), "loaded users");
    Ok(users)
}

pub fn load_rated_movies(path: &Path) -> Result<Vec<Item>> {
    let movies = read_rated_movies(File::open(path)?)?;
    info!(path = %path.display(), count = movies.len(), "loaded rated movies");
    Ok(movies)
}

pub fn load_catalog<G: Rng + ?Sized>(path: &Path, rng: &mut G) -> Result<Vec<Item>> {
    let movies = read_catalog(File::open(path)?, rng)?;
    info!(path = %path.display(), count = movies.len(), "loaded catalog");
    Ok(movies)
}
