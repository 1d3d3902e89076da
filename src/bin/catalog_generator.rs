// src/bin/catalog_generator.rs
use std::fs::{self, File};
use std::path::Path;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const GENRES: &[&str] = &[
    "Action", "Adventure", "Animation", "Biography", "Comedy", "Crime", "Drama", "Family",
    "Fantasy", "Film-Noir", "History", "Horror", "Music", "Musical", "Mystery", "Romance",
    "Sci-Fi", "Sport", "Thriller", "War", "Western",
];

/// Write a synthetic catalog in the same CSV layout the recommender reads.
#[derive(Parser, Debug)]
#[command(name = "catalog-generator")]
struct Args {
    #[arg(default_value = "data/generated_catalog.csv")]
    output: String,

    /// Number of genre profiles movies are drawn around.
    #[arg(long, default_value = "5")]
    profiles: usize,

    #[arg(long, default_value = "200")]
    movies_per_profile: usize,

    /// Genres per profile.
    #[arg(long, default_value = "3")]
    genres: usize,

    #[arg(long)]
    seed: Option<u64>,
}

/// A movie's genres: mostly the profile's own, now and then one extra.
fn movie_genres<'a>(profile: &[&'a str], rng: &mut impl Rng) -> Vec<&'a str> {
    let mut genres: Vec<&str> = profile
        .iter()
        .copied()
        .filter(|_| rng.gen_bool(0.8))
        .collect();
    if genres.is_empty() {
        genres.push(profile[0]);
    }
    if rng.gen_bool(0.1) {
        if let Some(extra) = GENRES.choose(rng) {
            if !genres.contains(extra) {
                genres.push(*extra);
            }
        }
    }
    genres
}

fn create_catalog(output: &Path, args: &Args, rng: &mut impl Rng) -> csv::Result<()> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_writer(File::create(output)?);
    writer.write_record([
        "Poster_Link",
        "Series_Title",
        "Released_Year",
        "Certificate",
        "Runtime",
        "Genre",
    ])?;

    let total = args.profiles * args.movies_per_profile;
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
    {
        pb.set_style(style.progress_chars("=>-"));
    }

    let genres_per_profile = args.genres.clamp(1, GENRES.len());
    for profile_idx in 0..args.profiles {
        let profile: Vec<&str> = GENRES
            .choose_multiple(rng, genres_per_profile)
            .copied()
            .collect();

        for movie_idx in 0..args.movies_per_profile {
            let title = format!("Movie {:03}-{:04}", profile_idx, movie_idx);
            let year = rng.gen_range(1920..=2024).to_string();
            let runtime = format!("{} min", rng.gen_range(70..=200));
            let genres = movie_genres(&profile, rng).join(", ");
            writer.write_record(["", title.as_str(), year.as_str(), "", runtime.as_str(), genres.as_str()])?;
            pb.inc(1);
        }

        pb.set_message(format!("Generated profile {}/{}", profile_idx + 1, args.profiles));
    }

    writer.flush()?;
    pb.finish_with_message("Catalog generation complete");
    Ok(())
}

fn main() {
    let args = Args::parse();
    let output = Path::new(&args.output);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    println!("Catalog Generation Tool");
    println!("--------------------");
    println!("Output file: {}", output.display());
    println!("Genre profiles: {}", args.profiles);
    println!("Movies per profile: {}", args.movies_per_profile);
    println!("Total movies: {}", args.profiles * args.movies_per_profile);
    println!();

    if let Err(e) = create_catalog(output, &args, &mut rng) {
        eprintln!("Error writing catalog: {}", e);
        std::process::exit(1);
    }

    println!("\nCatalog has been generated!");
}
