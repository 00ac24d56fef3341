//! Compare the four firefly variants on the default 100-sensor field.
//!
//! ```text
//! cargo run --release --example coverage_demo -- [seed] [layout.svg]
//! RUST_LOG=debug cargo run --release --example coverage_demo
//! ```

use firefly_wsn::compare::compare_variants;
use firefly_wsn::{CoverageProblem, Deployment, FireflyConfig};
use firefly_wsn::report;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(s) => s.parse()?,
        None => firefly_wsn::DEFAULT_RNG_SEED,
    };
    let svg_path = args.next();

    let problem = CoverageProblem::default();
    let config = FireflyConfig::default();

    let comparison = compare_variants(problem, &config, seed)?;
    println!("{}", report::render_summary(&comparison));
    println!("{}", report::to_json(&comparison)?);

    if let (Some(path), Some(winner)) = (svg_path, comparison.winner()) {
        let best = Deployment::builder()
            .problem(problem)
            .config(config)
            .variant(winner.variant)
            .rng_seed(seed)
            .build()
            .run()?;
        std::fs::write(&path, report::render_layout_svg(&best))?;
        println!("wrote {path}");
    }

    Ok(())
}
