use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::Dataset;
use serde::Serialize;
use similarity::{ItemStats, RatingMatrix, SimilarItem, SimilarityEngine, SimilarityError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// ReelRecs - Movie similarity from rating correlation
#[derive(Parser)]
#[command(name = "reel-recs")]
#[command(about = "Find movies rated like a given movie using Pearson correlation", long_about = None)]
struct Cli {
    /// Tab-separated ratings file (user_id, item_id, rating, timestamp)
    #[arg(long, default_value = "data/u.data")]
    ratings: PathBuf,

    /// Comma-separated catalog file with an item_id,title header
    #[arg(long, default_value = "data/Movie_Id_Titles")]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List movies whose ratings correlate with a target movie
    Similar {
        /// Exact title of the target movie
        #[arg(long, default_value = "Star Wars (1977)")]
        title: String,

        /// Only keep movies with more than this many ratings
        #[arg(long, default_value = "100")]
        min_ratings: u32,

        /// Number of results to show
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Keep the target movie in its own results
        #[arg(long)]
        include_target: bool,

        /// Print results as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the correlation between two movies
    Compare {
        /// First title
        #[arg(long)]
        first: String,

        /// Second title
        #[arg(long)]
        second: String,
    },

    /// Show rating statistics: most rated and best rated movies
    Stats {
        /// Number of movies in each list
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Best-rated list only counts movies with more than this many ratings
        #[arg(long, default_value = "100")]
        min_ratings: u32,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load data and build the matrix (this may take a moment)
    let start = Instant::now();
    let dataset = Dataset::load_from_files(&cli.ratings, &cli.catalog)
        .context("Failed to load MovieLens dataset")?;
    let matrix = Arc::new(
        RatingMatrix::from_dataset(&dataset).context("Failed to build rating matrix")?,
    );
    let (users, items, ratings) = matrix.counts();
    info!(users, items, ratings, elapsed = ?start.elapsed(), "Rating matrix ready");

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Similar {
            title,
            min_ratings,
            limit,
            include_target,
            json,
        } => {
            let engine = SimilarityEngine::new(matrix).with_include_target(include_target);
            handle_similar(&engine, &title, min_ratings, limit, json)?
        }
        Commands::Compare { first, second } => {
            handle_compare(&SimilarityEngine::new(matrix), &first, &second)?
        }
        Commands::Stats { limit, min_ratings } => handle_stats(&matrix, limit, min_ratings),
        Commands::Search { title } => handle_search(&matrix, &title),
    }

    Ok(())
}

/// JSON shape for the 'similar' command
#[derive(Serialize)]
struct SimilarOutput<'a> {
    target: &'a str,
    min_ratings: u32,
    results: &'a [SimilarItem],
}

/// Handle the 'similar' command
fn handle_similar(
    engine: &SimilarityEngine,
    title: &str,
    min_ratings: u32,
    limit: usize,
    json: bool,
) -> Result<()> {
    for line in render_similar(engine, title, min_ratings, limit, json)? {
        println!("{}", line);
    }
    Ok(())
}

/// Run a similarity query and render its output lines
///
/// An unknown title renders as an error message with suggestions and is not
/// an error; anything else the engine reports is propagated.
fn render_similar(
    engine: &SimilarityEngine,
    title: &str,
    min_ratings: u32,
    limit: usize,
    json: bool,
) -> Result<Vec<String>> {
    let start = Instant::now();
    let similar = match recover_unknown(engine.matrix(), engine.find_similar(title, min_ratings))? {
        Lookup::Found(similar) => similar,
        Lookup::Unknown(lines) => return Ok(lines),
    };
    debug!(elapsed = ?start.elapsed(), total = similar.len(), "Similarity query finished");

    let shown = &similar[..similar.len().min(limit)];

    if json {
        let output = SimilarOutput {
            target: title,
            min_ratings,
            results: shown,
        };
        return Ok(vec![serde_json::to_string_pretty(&output)?]);
    }

    let mut lines = vec![format!("Top Recommendations Similar to '{}':", title)
        .bold()
        .blue()
        .to_string()];
    if shown.is_empty() {
        lines.push(format!(
            "  No movie with more than {} ratings has a defined correlation with it.",
            min_ratings
        ));
    }
    for (rank, item) in shown.iter().enumerate() {
        lines.push(format!(
            "{:>3}. {:<55} {:>7.4}  ({} ratings)",
            (rank + 1).to_string().green(),
            item.title,
            item.correlation,
            item.num_ratings
        ));
    }
    Ok(lines)
}

/// Handle the 'compare' command
fn handle_compare(engine: &SimilarityEngine, first: &str, second: &str) -> Result<()> {
    for line in render_compare(engine, first, second)? {
        println!("{}", line);
    }
    Ok(())
}

fn render_compare(engine: &SimilarityEngine, first: &str, second: &str) -> Result<Vec<String>> {
    let line = match recover_unknown(engine.matrix(), engine.correlation(first, second))? {
        Lookup::Found(Some(r)) => format!("corr('{}', '{}') = {:.4}", first, second, r),
        Lookup::Found(None) => format!(
            "corr('{}', '{}') is undefined: fewer than two shared raters or no rating variance",
            first, second
        ),
        Lookup::Unknown(lines) => return Ok(lines),
    };
    Ok(vec![line])
}

/// Handle the 'stats' command
fn handle_stats(matrix: &RatingMatrix, limit: usize, min_ratings: u32) {
    let (users, items, ratings) = matrix.counts();
    println!("{}", "Dataset:".bold().blue());
    println!("{}Users: {}", "• ".green(), users);
    println!("{}Movies: {}", "• ".green(), items);
    println!("{}Ratings: {}", "• ".green(), ratings);

    println!("\n{}", "Most rated:".bold().blue());
    print_stats_table(&matrix.most_rated(limit));

    println!(
        "\n{}",
        format!("Best rated (more than {} ratings):", min_ratings).bold().blue()
    );
    print_stats_table(&matrix.top_rated(min_ratings, limit));
}

/// Handle the 'search' command
fn handle_search(matrix: &RatingMatrix, title: &str) {
    println!("{}", format!("Search results for '{}':", title).bold().blue());

    let matches = matrix.search_titles(title);
    if matches.is_empty() {
        println!("  No matching titles.");
        return;
    }
    for found in matches.iter().take(20) {
        if let Some(stats) = matrix.item_stats(found) {
            println!(
                "  {} avg {:.2} ({} ratings)",
                found, stats.average_rating, stats.num_ratings
            );
        }
    }
}

/// Result of a query that may name an unknown title
enum Lookup<T> {
    Found(T),
    /// Rendered error message plus suggestions
    Unknown(Vec<String>),
}

/// Turn `UnknownItem` into a readable report with a few close matches
///
/// Every other error is passed through.
fn recover_unknown<T>(
    matrix: &RatingMatrix,
    result: similarity::Result<T>,
) -> Result<Lookup<T>> {
    let err = match result {
        Ok(value) => return Ok(Lookup::Found(value)),
        Err(err @ SimilarityError::UnknownItem { .. }) => err,
        Err(err) => return Err(err.into()),
    };

    let mut lines = vec![format!("{} {}", "Error:".red().bold(), err)];
    if let SimilarityError::UnknownItem { title } = &err {
        let suggestions = matrix.search_titles(title);
        if !suggestions.is_empty() {
            lines.push("Did you mean:".to_string());
            for suggestion in suggestions.iter().take(5) {
                lines.push(format!("  - {}", suggestion));
            }
        }
    }
    Ok(Lookup::Unknown(lines))
}

/// Helper function to print a ranked stats list
fn print_stats_table(rows: &[(&str, ItemStats)]) {
    for (rank, (title, stats)) in rows.iter().enumerate() {
        println!(
            "{:>3}. {:<55} avg {:.2}  ({} ratings)",
            (rank + 1).to_string().green(),
            title,
            stats.average_rating,
            stats.num_ratings
        );
    }
}
