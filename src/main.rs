//! rab-efficiency entry point: CLI wiring, config resolution, and output.

use std::process;

use clap::Parser;
use tracing::{info, warn};

use rab_efficiency::analysis::run_analysis;
use rab_efficiency::cli::CliArgs;
use rab_efficiency::io::export::export_csv;
use rab_efficiency::io::workbook::Workbook;
use rab_efficiency::logging::init_tracing;
use rab_efficiency::report;

fn main() {
    let cli = CliArgs::parse();
    init_tracing(cli.log_json);

    // Config: overrides on top of --config, --preset, or the defaults
    let config = match cli.resolve_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let workbook = match Workbook::load(&cli.workbook) {
        Ok(wb) => wb,
        Err(e) => {
            eprintln!("error [{}]: {e}", e.kind());
            process::exit(1);
        }
    };
    info!(path = %cli.workbook.display(), sheets = workbook.sheets.len(), "workbook loaded");

    let analysis = match run_analysis(&workbook, &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error [{}]: {e}", e.kind());
            process::exit(1);
        }
    };

    let location = cli.location.as_deref();
    if let Some(loc) = location
        && !analysis.locations().contains(&loc)
    {
        warn!(location = loc, "no records match the location filter");
    }
    if cli.json {
        match report::to_json(&analysis, location) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize report: {e}");
                process::exit(1);
            }
        }
    } else {
        print!("{}", report::render(&analysis, location, !cli.no_charts));
    }

    if let Some(ref path) = cli.out {
        if let Err(e) = export_csv(analysis.filtered(location), path) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Results written to {}", path.display());
    }
}
