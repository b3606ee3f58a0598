//! Offline helper: draw a fixed-size random sample of the full TripAdvisor
//! export so the dashboard has a small working file.
//!
//! Usage: `generate_sample [INPUT] [OUTPUT] [COUNT]`

use anyhow::{Context, Result};

const DEFAULT_INPUT: &str = "data/restaurants.csv";
const DEFAULT_OUTPUT: &str = "data/restaurant_sample.csv";
const DEFAULT_COUNT: usize = 3000;
const SEED: u64 = 42;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform index in `0..bound`.
    fn below(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }
}

/// Pick `count` distinct items with a partial Fisher–Yates shuffle.
/// Returns everything (shuffled) when `count` exceeds the input size.
fn sample<T>(mut items: Vec<T>, count: usize, rng: &mut SimpleRng) -> Vec<T> {
    let n = items.len();
    let count = count.min(n);
    for i in 0..count {
        let j = i + rng.below(n - i);
        items.swap(i, j);
    }
    items.truncate(count);
    items
}

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| DEFAULT_INPUT.to_string());
    let output = args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
    let count = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid sample size '{n}'"))?,
        None => DEFAULT_COUNT,
    };

    let mut reader = csv::Reader::from_path(&input).with_context(|| format!("opening {input}"))?;
    let headers = reader.headers().context("reading CSV headers")?.clone();
    let records = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("reading {input}"))?;
    let total = records.len();

    let mut rng = SimpleRng::new(SEED);
    let picked = sample(records, count, &mut rng);

    let mut writer = csv::Writer::from_path(&output).with_context(|| format!("creating {output}"))?;
    writer.write_record(&headers)?;
    for record in &picked {
        writer.write_record(record)?;
    }
    writer.flush()?;

    log::info!("Sampled {} of {total} restaurants from {input}", picked.len());
    println!(
        "The sample data has been successfully created! with {} records in {output}",
        picked.len()
    );
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("Sample creation failed: {e:#}");
        eprintln!("Sample creation failed: {e:#}");
        std::process::exit(1);
    }
}
