use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use movie_kmeans::{
    loader, Denominator, EuclideanDistance, Fitted, Item, KMeans, KMeansConfig, Result,
    Termination,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Cluster a movie catalog and write one file per cluster.
#[derive(Parser, Debug)]
#[command(name = "cluster-processor")]
struct Args {
    /// Catalog CSV to cluster.
    #[arg(default_value = "data/catalog.csv")]
    input: PathBuf,

    /// Directory receiving cluster_NNNNN.txt and cluster_stats.json.
    #[arg(default_value = "clustered_movies")]
    output: PathBuf,

    /// Number of clusters.
    #[arg(default_value = "4")]
    clusters: usize,

    #[arg(long, default_value = "1000")]
    max_iterations: usize,

    #[arg(long)]
    seed: Option<u64>,

    /// Divide genre sums by the number of members defining the genre.
    #[arg(long)]
    key_presence: bool,

    #[arg(long)]
    parallel: bool,
}

#[derive(Debug, Serialize)]
struct ClusterStats {
    index: usize,
    size: usize,
    centroid: Vec<(String, f64)>,
}

#[derive(Debug, Serialize)]
struct RunStats {
    movies: usize,
    requested_clusters: usize,
    non_empty_clusters: usize,
    iterations: usize,
    termination: Termination,
    clusters: Vec<ClusterStats>,
}

struct ClusterProcessor {
    kmeans: KMeans,
    movies: Vec<Item>,
    rng: StdRng,
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
    {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}

impl ClusterProcessor {
    fn new(config: KMeansConfig, seed: Option<u64>) -> Self {
        ClusterProcessor {
            kmeans: KMeans::new(config, Box::new(EuclideanDistance)),
            movies: Vec::new(),
            rng: match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            },
        }
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        self.movies = loader::load_catalog(path, &mut self.rng)?;
        Ok(())
    }

    fn cluster_movies(&mut self) -> Result<Fitted> {
        println!(
            "\nClustering {} movies into {} clusters...",
            self.movies.len(),
            self.kmeans.config().k
        );
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Running k-means");
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        let fitted = self.kmeans.fit_report(&self.movies, &mut self.rng)?;
        spinner.finish_with_message(format!(
            "Clustering complete after {} iterations ({:?})",
            fitted.iterations, fitted.termination
        ));
        Ok(fitted)
    }

    fn write_clusters(&self, fitted: &Fitted, output_dir: &Path) -> Result<()> {
        fs::create_dir_all(output_dir)?;
        println!("\nWriting clusters to {}", output_dir.display());

        let pb = progress_bar(fitted.clusters.len() as u64);
        let mut stats = Vec::new();

        for (index, (centroid, movies)) in fitted.clusters.iter().enumerate() {
            let output_path = output_dir.join(format!("cluster_{:05}.txt", index));
            let mut writer = BufWriter::new(File::create(&output_path)?);

            writeln!(writer, "# Cluster {} - {} movies", index, movies.len())?;
            write!(writer, "# Centroid:")?;
            for (genre, value) in centroid.coordinates() {
                write!(writer, " {}={:.2}", genre, value)?;
            }
            writeln!(writer)?;

            for movie in movies {
                let genres: Vec<String> = movie
                    .features
                    .iter()
                    .map(|(genre, weight)| format!("{}={}", genre, weight))
                    .collect();
                writeln!(writer, "{} | {}", movie.description, genres.join(" "))?;
            }

            stats.push(ClusterStats {
                index,
                size: movies.len(),
                centroid: centroid
                    .coordinates()
                    .iter()
                    .map(|(genre, value)| (genre.clone(), *value))
                    .collect(),
            });
            pb.inc(1);
        }
        pb.finish_with_message("Cluster files written");

        stats.sort_by_key(|s| std::cmp::Reverse(s.size));
        let run = RunStats {
            movies: self.movies.len(),
            requested_clusters: self.kmeans.config().k,
            non_empty_clusters: fitted.clusters.len(),
            iterations: fitted.iterations,
            termination: fitted.termination,
            clusters: stats,
        };
        let stats_path = output_dir.join("cluster_stats.json");
        serde_json::to_writer_pretty(BufWriter::new(File::create(stats_path)?), &run)?;
        info!(clusters = run.non_empty_clusters, "statistics written");

        Ok(())
    }
}

fn main() {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error installing logger: {}", e);
    }

    println!("Movie Clustering Tool");
    println!("--------------------");
    println!("Input catalog:    {}", args.input.display());
    println!("Output directory: {}", args.output.display());
    println!("Number of clusters: {}", args.clusters);

    let denominator = if args.key_presence {
        Denominator::KeyPresence
    } else {
        Denominator::ClusterSize
    };
    let config = KMeansConfig::new(args.clusters)
        .with_max_iterations(args.max_iterations)
        .with_denominator(denominator)
        .with_parallel(args.parallel);
    let mut processor = ClusterProcessor::new(config, args.seed);

    if let Err(e) = processor.load(&args.input) {
        eprintln!("Error reading catalog: {}", e);
        std::process::exit(1);
    }

    let fitted = match processor.cluster_movies() {
        Ok(fitted) => fitted,
        Err(e) => {
            eprintln!("Error during clustering: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = processor.write_clusters(&fitted, &args.output) {
        eprintln!("Error writing clusters: {}", e);
        std::process::exit(1);
    }

    println!("\nProcessing complete! Check {} for results", args.output.display());
}
