//! Chart description export tool
//!
//! Composes a chart from a JSON request and writes the renderer payload
//! (`{ "height", "option" }`) for inspection.
//!
//! Usage: chart-export <input_json> [--config PATH] [--output PATH] [--hover DATE]

use std::env;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use folio_chart::{compose, ChartInput};
use folio_config::Config;
use log::info;

fn main() -> Result<()> {
    env_logger::init();
    let start_time = Instant::now();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <input_json> [options]", args[0]);
        eprintln!("Options:");
        eprintln!("  --config PATH   Chart config TOML (default: ./chart.toml, then user config dir)");
        eprintln!("  --output PATH   Write JSON here instead of stdout");
        eprintln!("  --hover DATE    Also print the tooltip for DATE as HTML on stderr");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let mut config_path: Option<&str> = None;
    let mut output_path: Option<&str> = None;
    let mut hover_date: Option<&str> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                config_path = Some(args[i + 1].as_str());
                i += 2;
            }
            "--output" if i + 1 < args.len() => {
                output_path = Some(args[i + 1].as_str());
                i += 2;
            }
            "--hover" if i + 1 < args.len() => {
                hover_date = Some(args[i + 1].as_str());
                i += 2;
            }
            other => {
                eprintln!("Ignoring unknown argument: {other}");
                i += 1;
            }
        }
    }

    let config = match config_path {
        Some(path) => Config::load(path).with_context(|| format!("loading config from {path}"))?,
        None => Config::load_default(),
    };

    let raw = fs::read_to_string(input_path).with_context(|| format!("reading {input_path}"))?;
    let input: ChartInput =
        serde_json::from_str(&raw).with_context(|| format!("parsing chart input {input_path}"))?;

    let chart = compose(&input, &config);
    let payload = chart.to_json().context("serializing chart description")?;

    match output_path {
        Some(path) => {
            let file = fs::File::create(path).with_context(|| format!("creating {path}"))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &payload)?;
            writer.flush()?;
            info!("Wrote chart description to {path}");
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            serde_json::to_writer_pretty(&mut writer, &payload)?;
            writeln!(writer)?;
        }
    }

    if let Some(date) = hover_date {
        eprintln!("{}", chart.hover_at(date).to_html());
    }

    info!(
        "Composed {} bars into {} series (height {}) in {:.2}ms",
        input.bars.len(),
        chart.spec.series.len(),
        chart.total_height,
        start_time.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}
