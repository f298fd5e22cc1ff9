//! Example: Movies rated like Star Wars
//!
//! Run with: cargo run --package similarity --example similar_movies
//!
//! Expects `data/u.data` and `data/Movie_Id_Titles` (MovieLens 100k).

use data_loader::Dataset;
use similarity::{RatingMatrix, SimilarityEngine, SimilarityError};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    println!("=== Similar Movies Example ===\n");

    let start = Instant::now();
    let dataset = Dataset::load_from_dir(Path::new("data"))?;
    let matrix = Arc::new(RatingMatrix::from_dataset(&dataset)?);
    let (users, items, ratings) = matrix.counts();
    println!(
        "Built {} x {} matrix from {} ratings in {:?}\n",
        users,
        items,
        ratings,
        start.elapsed()
    );

    println!("Most rated:");
    for (title, stats) in matrix.most_rated(5) {
        println!(
            "  {:<45} {:>4} ratings, avg {:.2}",
            title, stats.num_ratings, stats.average_rating
        );
    }
    println!();

    let engine = SimilarityEngine::new(matrix);
    let target = "Star Wars (1977)";

    match engine.find_similar(target, 100) {
        Ok(similar) => {
            println!("Top recommendations similar to '{}':", target);
            for item in similar.iter().take(10) {
                println!(
                    "  {:<45} corr {:>6.3} ({} ratings)",
                    item.title, item.correlation, item.num_ratings
                );
            }
        }
        Err(err @ SimilarityError::UnknownItem { .. }) => println!("Error: {}", err),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
