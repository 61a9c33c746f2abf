use horton_fit::config::Config;
use horton_fit::data::ObservedSeries;
use horton_fit::evaluation::FitReport;
use horton_fit::export::{write_export_to_json, SessionExport};
use horton_fit::search::{FittingSession, RunResult, SearchError};
use std::path::Path;
use std::process;

/// Runs every configured search and prints each run's champion.
///
/// # Returns
/// * `Ok(Vec<RunResult>)` - One result per run, in run order
/// * `Err(SearchError)` - The first configuration or domain error encountered
fn fit(config: &Config, series: &ObservedSeries) -> Result<Vec<RunResult>, SearchError> {
    let mut session = match config.search.seed {
        Some(seed) => {
            log::info!("Using master seed {}", seed);
            FittingSession::with_seed(&config.ga, series, seed)?
        }
        None => FittingSession::new(&config.ga, series)?,
    };
    let bounds = session.operators().bounds().initial_rate();
    log::info!("fo sampling range: [{}, {}]", bounds.low, bounds.high);

    session.run_search(config.search.runs)
}

fn report(results: &[RunResult], series: &ObservedSeries) {
    println!(
        "\n{:>4} {:>16} {:>10} {:>10} {:>8} {:>10} {:>8} {:>10} {:>10}",
        "run", "fitness", "fo", "fc", "k", "rmse", "nse", "f(start)", "f(end)"
    );
    for result in results {
        let c = result.candidate;
        match FitReport::new(&c, series) {
            Ok(fit) => println!(
                "{:>4} {:>16.4} {:>10.4} {:>10.4} {:>8.4} {:>10.4} {:>8.4} {:>10.4} {:>10.4}",
                result.run,
                result.fitness,
                c.fo,
                c.fc,
                c.k,
                fit.rmse,
                fit.nse,
                fit.initial_rate,
                fit.final_rate
            ),
            Err(e) => println!(
                "{:>4} {:>16.4} {:>10.4} {:>10.4} {:>8.4}  (report failed: {})",
                result.run, result.fitness, c.fo, c.fc, c.k, e
            ),
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Booting horton-fit...");

    // 1. Load and Validate Configuration
    let config = match Config::load(Path::new("config.toml")) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        log::error!("Invalid configuration: {}", e);
        process::exit(1);
    }
    log::info!("Configuration loaded and validated.");

    // 2. Prepare Data
    let series = match config.data.load_series() {
        Ok(s) => s,
        Err(e) => {
            log::error!("Data preparation failed: {}", e);
            process::exit(1);
        }
    };
    log::info!("Loaded {} observations.", series.len());

    // 3. Run the searches
    log::info!(
        "--- Starting {} runs of {} generations ---",
        config.search.runs,
        config.ga.num_generations
    );
    let results = match fit(&config, &series) {
        Ok(r) => r,
        Err(e) => {
            log::error!("Search aborted: {}", e);
            process::exit(1);
        }
    };

    // 4. Report; choosing among the runs is left to the user
    report(&results, &series);

    // 5. Export
    if let Some(export_config) = &config.export {
        let export = SessionExport::new(
            config.ga.clone(),
            config.search.clone(),
            series,
            results,
        );
        match write_export_to_json(&export, Path::new(&export_config.output_path)) {
            Ok(()) => log::info!("Results written to '{}'.", export_config.output_path),
            Err(e) => {
                log::error!("Failed to write export: {}", e);
                process::exit(1);
            }
        }
    }
}
