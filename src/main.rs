use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use movie_kmeans::{
    favorite_genres, find_best_cluster, find_worst_cluster, loader, sample_descriptions,
    EuclideanDistance, KMeans, RecommendError, RecommenderConfig, Result,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Recommend and anti-recommend movies from the user's genre preferences.
#[derive(Parser, Debug)]
#[command(name = "movie-kmeans")]
struct Args {
    /// Catalog CSV (title in column 1, genre list in column 5).
    #[arg(long, default_value = "data/catalog.csv")]
    catalog: PathBuf,

    /// Users file: name;movie;rating;...
    #[arg(long, default_value = "data/usersMovies.csv")]
    users: PathBuf,

    /// Genres of the movies users rated: movie;genre;...
    #[arg(long, default_value = "data/movieRatedByUsers.csv")]
    rated: PathBuf,

    /// JSON file with run settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// User to recommend for; prompted on stdin when omitted.
    #[arg(long)]
    user: Option<String>,

    #[arg(long)]
    clusters: Option<usize>,

    #[arg(long)]
    max_iterations: Option<usize>,

    #[arg(long)]
    sample_size: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Log debug output.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn recommender_config(&self) -> Result<RecommenderConfig> {
        let mut config = match &self.config {
            Some(path) => RecommenderConfig::from_json_file(path)?,
            None => RecommenderConfig::default(),
        };
        if let Some(clusters) = self.clusters {
            config.clusters = clusters;
        }
        if let Some(max_iterations) = self.max_iterations {
            config.max_iterations = max_iterations;
        }
        if let Some(sample_size) = self.sample_size {
            config.sample_size = sample_size;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}

fn prompt_user_name(names: &[&str]) -> Result<String> {
    println!("Enter the name of the user to recommend for:");
    for name in names {
        println!("{}", name);
    }
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn run(args: Args) -> Result<()> {
    let config = args.recommender_config()?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let users = loader::load_users(&args.users)?;
    let catalog = loader::load_catalog(&args.catalog, &mut rng)?;
    let rated_movies = loader::load_rated_movies(&args.rated)?;

    let kmeans = KMeans::new(config.kmeans(), Box::new(EuclideanDistance));
    let clusters = kmeans.fit(&catalog, &mut rng)?;
    info!(clusters = clusters.len(), movies = catalog.len(), "catalog clustered");

    let name = match args.user {
        Some(name) => name,
        None => {
            let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
            prompt_user_name(&names)?
        }
    };
    let user = users
        .iter()
        .find(|u| u.name == name)
        .ok_or_else(|| RecommendError::UnknownUser(name.clone()))?;

    let genres = favorite_genres(user, &rated_movies, config.favorite_genres)?;
    info!(user = %user.name, ?genres, "favorite genres");

    match find_best_cluster(&clusters, &genres)?.and_then(|c| clusters.get(c)) {
        Some(movies) => {
            let picks = sample_descriptions(movies, config.sample_size, &mut rng)?;
            println!("Recommended for you: {:?}", picks);
        }
        None => println!("No cluster matches your favorite genres"),
    }
    match find_worst_cluster(&clusters, &genres)?.and_then(|c| clusters.get(c)) {
        Some(movies) => {
            let picks = sample_descriptions(movies, config.sample_size, &mut rng)?;
            println!("Better skip these: {:?}", picks);
        }
        None => println!("No cluster stands out as a poor match"),
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error installing logger: {}", e);
    }

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
