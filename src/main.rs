use anyhow::Result;
use lumen_compare::{config::AppConfig, input::Collector, observability, report, store, transform};
use std::{env, io, path::PathBuf};

fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    // Optional positional override for the store path.
    let args: Vec<String> = env::args().collect();
    let store_path = match args.len() {
        1 => cfg.store_path.clone(),
        2 => PathBuf::from(&args[1]),
        _ => anyhow::bail!("usage: lumen-compare [store_path]"),
    };

    let stdin = io::stdin();
    let mut collector = Collector::new(stdin.lock(), io::stdout());

    println!("Light Efficiency Calculator with Multi-Light Comparison\n");

    let rate_per_kwh = match cfg.default_rate_per_kwh {
        Some(rate) => {
            tracing::info!(rate, "using electricity rate from config");
            rate
        }
        None => collector.number("Enter electricity cost per kWh (e.g. 0.23 for €0.23): ")?,
    };

    let count = collector.count("How many lights do you want to compare? ")?;

    let mut lights = Vec::with_capacity(count);
    for _ in 0..count {
        let spec = collector.light_spec(rate_per_kwh)?;
        // A zero wattage is fatal for the run: nothing is reported or stored.
        let record = transform::derive(spec)?;
        lights.push(record);
    }

    print!("\n{}", report::render(&lights));

    match store::append(&lights, &store_path) {
        Ok(0) => println!("\nNo new records to save (duplicates detected)."),
        Ok(written) => {
            tracing::info!(written, path = %store_path.display(), "records persisted");
            println!("\n{written} new records saved to {}", store_path.display());
        }
        Err(e) => {
            // The comparison table has already been shown; report and end.
            tracing::error!(error = %e, "failed to persist records");
            println!("\nFailed to save records: {e}");
        }
    }

    Ok(())
}
