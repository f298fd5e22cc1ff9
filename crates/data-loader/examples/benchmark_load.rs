use data_loader::Dataset;
use std::path::Path;
use std::time::Instant;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let data_dir = Path::new("data");

    println!("Loading MovieLens 100k dataset...\n");

    let start = Instant::now();
    let dataset = Dataset::load_from_dir(data_dir)
        .expect("Failed to load dataset");
    let elapsed = start.elapsed();

    let (ratings, items) = dataset.counts();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Catalog entries: {}", items);
    println!("Ratings: {}", ratings);
    println!("\nPerformance: {:.0} ratings/second",
             ratings as f64 / elapsed.as_secs_f64());
}
