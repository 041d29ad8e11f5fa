use std::time::Duration;

use rand::{Rng, SeedableRng};
use sweepline_voronoi::{fortune_algorithm, Point};

fn random_points(number: usize) -> Vec<Point> {
    let mut rng = rand::rngs::SmallRng::from_seed([76; 32]); // chosen by fair dice roll
    (0..number)
        .map(|_| Point::new(rng.gen(), rng.gen()))
        .collect()
}

/// A square grid: lots of same-x sites and cocircular quadruples.
fn grid_points(number: usize) -> Vec<Point> {
    let side = (number as f64).sqrt().ceil() as usize;
    (0..number)
        .map(|i| Point::new((i / side) as f64, (i % side) as f64))
        .collect()
}

fn main() {
    let grid = std::env::args().any(|arg| arg == "grid");

    let mut n = 1;
    println!(" i |     N |    elapsed | increase ");
    let mut times: Vec<Duration> = Vec::new();
    for i in 0..=14 {
        let sites = if grid {
            grid_points(n)
        } else {
            random_points(n)
        };

        let start = std::time::Instant::now();
        for _ in 0..10 {
            fortune_algorithm(&sites).unwrap();
        }
        let elapsed = start.elapsed();
        let increase = times
            .last()
            .map(|t| elapsed.as_secs_f64() / t.as_secs_f64())
            .unwrap_or(f64::NAN);
        println!("{:>2} | {:>5} | {:>10.3?} | {:.2}", i, n, elapsed, increase);

        times.push(elapsed);

        n *= 2;
    }
}
