//! Clustering three synthetic blobs with k-means
//!
//! Run with `RUST_LOG=debug` to watch the per-epoch mean distance settle.

use kentroid::{KMeans, Matrix};
use rand::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let data = blobs();
    println!(
        "data: {} points x {} features",
        data.nrows(),
        data.ncols()
    );

    // Random initialization can leave a cluster empty; keep the best of a
    // few seeded attempts, as measured by score.
    let mut best: Option<(f64, KMeans)> = None;
    for seed in 0..10 {
        let mut model = KMeans::new(3).epochs(50).random_state(seed);
        if model.fit(&data).is_err() {
            continue;
        }
        let score = model.score()?;
        if best.as_ref().map_or(true, |(s, _)| score > *s) {
            best = Some((score, model));
        }
    }
    let (score, model) = best.ok_or("every initialization collapsed a cluster")?;

    println!("score: {:.4}", score);
    println!("centroids:\n{}", model.centroids()?);

    let labels = model.predict(&data)?;
    for i in 0..data.nrows() {
        println!("point {:>2} -> cluster {}", i, labels.get(i, 0)? as usize);
    }
    Ok(())
}

fn blobs() -> Matrix {
    let centers = [(0.0, 0.0), (8.0, 8.0), (-8.0, 8.0)];
    let mut rng = StdRng::seed_from_u64(7);
    let mut rows = Vec::new();
    for &(cx, cy) in &centers {
        for _ in 0..12 {
            rows.push(vec![
                cx + rng.gen_range(-0.5..0.5),
                cy + rng.gen_range(-0.5..0.5),
            ]);
        }
    }
    Matrix::from_rows(rows).expect("rows are rectangular")
}
