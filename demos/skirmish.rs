//! Headless skirmish: units path between rally points, frame after frame.
//!
//! Run: cargo run --bin skirmish [frames] [seed]

use tilenav_demos::Skirmish;

fn main() {
    let mut args = std::env::args().skip(1);
    let frames: u32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(300);
    let seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(42);

    let mut sim = match Skirmish::new(seed) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    for _ in 0..frames {
        sim.step();
    }

    let report = sim.report();
    let stats = report.path;
    println!("{}", sim.map());
    println!("frames:         {}", report.frames);
    println!("arrivals:       {}", report.arrivals);
    println!("walls built:    {} ({} rejected)", report.walls_built, report.walls_rejected);
    println!("searches:       {}", stats.searches);
    println!("cache hits:     {} / misses {}", stats.cache_hits, stats.cache_misses);
    println!("evictions:      {}", stats.evictions);
    println!("memo hits:      {}", stats.negative_hits);
    println!("failed searches {}", stats.failures);
}
