//! Multiple-gusts directivity of a flat plate in isotropic turbulence
//!
//! Loads a JSON scenario (or the default 150 mm chord, 60 m/s case),
//! integrates the far-field auto-spectra over both observer arcs and writes
//! normalised directivity curves to JSON.
//!
//! Usage:
//!   cargo run --release --bin mult_gusts -- --config configs/flat_plate.json
//!   cargo run --release --bin mult_gusts -- --kc 5.0 --output kc5.json

use anyhow::Context;
use clap::Parser;
use math_aero_common::{DirectivityOutput, RunSummary, ScenarioConfig, print_config_summary};
use math_amiet::core::{MultipleGustsModel, SamplingRegime};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mult-gusts")]
#[command(about = "Aerofoil-turbulence interaction noise by the multiple-gusts method", long_about = None)]
struct Args {
    /// Path to JSON scenario file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output JSON file path
    #[arg(short, long, default_value = "mult_gusts.json")]
    output: PathBuf,

    /// Override the chord-based reduced frequency k0·c
    #[arg(short, long)]
    kc: Option<f64>,

    /// Number of parallel threads (default: all cores)
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(threads) = args.threads {
        #[cfg(feature = "parallel")]
        {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .context("failed to set thread pool")?;
            println!("Using {} threads\n", threads);
        }
        #[cfg(not(feature = "parallel"))]
        println!("Built without parallel support, ignoring --threads {}\n", threads);
    }

    let mut config = if let Some(config_path) = &args.config {
        println!("Loading configuration from: {}", config_path.display());
        ScenarioConfig::from_file(config_path)
            .with_context(|| format!("loading {}", config_path.display()))?
    } else {
        println!("No configuration file specified, using default flat plate");
        ScenarioConfig::default()
    };

    if let Some(kc) = args.kc {
        config.frequency.kc = Some(kc);
        config.frequency.frequency = None;
    }

    print_config_summary(&config);

    let model = MultipleGustsModel::from_config(&config)?;
    let (chordwise, spanwise) = config.observers.to_arcs()?;

    println!("\n=== Running Multiple Gusts ===");
    println!(
        "Frequency: {:.2} Hz (kc = {:.3})",
        model.frequency(),
        model.reduced_frequency()
    );

    let result = model.run(&[&chordwise, &spanwise])?;
    let mut spectra = result.spectra.into_iter().map(|s| s.to_vec());
    let chord_psd = spectra.next().unwrap_or_default();
    let span_psd = spectra.next().unwrap_or_default();

    if args.verbose {
        println!(
            "Grid: {} points, dky = {:.4} rad/m, {:?}",
            result.grid.len(),
            result.grid.spacing,
            result.grid.regime
        );
    }

    let run = RunSummary {
        frequency: result.frequency,
        kc: model.reduced_frequency(),
        mach: model.flow().mach(),
        low_frequency_regime: result.grid.regime == SamplingRegime::LowFrequency,
        gusts: result.grid.len(),
        gusts_integrated: result.gusts_integrated,
    };

    let output = DirectivityOutput::from_spectra(
        &config,
        run,
        (&chordwise, chord_psd),
        (&spanwise, span_psd),
        "multiple-gusts",
    );

    for curve in [&output.chordwise, &output.spanwise] {
        if let Some(angle) = curve.peak_angle() {
            println!("Peak {:?} directivity at {:.1} deg", curve.plane, angle);
        }
    }

    println!("\nSaving results to: {}", args.output.display());
    output
        .save_json(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("Done!");

    Ok(())
}
