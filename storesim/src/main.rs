//! Store queueing simulation application.
#![warn(
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::default_trait_access)]

use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use eyre::WrapErr;
use indicatif::{ProgressBar, ProgressStyle};

use storesim::{StoreConfig, StoreModel};

/// Output format of the final report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
enum Format {
    Text,
    Json,
}

/// Simulates a store with a number of identical servers and a single shared queue.
#[derive(Parser)]
#[clap(version, author)]
struct Opt {
    /// Number of servers.
    #[clap(long, default_value = "1", conflicts_with = "config")]
    servers: usize,

    /// Expected number of customer arrivals per tick.
    #[clap(long, default_value = "1.0", conflicts_with = "config")]
    arrival_rate: f64,

    /// Expected number of ticks needed to serve one customer.
    #[clap(long, default_value = "2.5", conflicts_with = "config")]
    service_time: f64,

    /// Path to a JSON file with the store configuration. Replaces the model options.
    #[clap(long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate.
    #[clap(long, default_value = "1000")]
    steps: u64,

    /// Seed to use for random number generators. Overrides the seed in the config file.
    #[clap(short, long)]
    seed: Option<u64>,

    /// Report format: `text` or `json`.
    #[clap(short, long, default_value = "text")]
    format: Format,

    /// Do not display the progress bar.
    #[clap(long)]
    no_progress: bool,

    /// Verbosity.
    #[clap(short, long, parse(from_occurrences))]
    verbose: i32,

    /// Store the logs this file.
    #[clap(long)]
    log_output: Option<PathBuf>,

    /// Do not log to the stderr.
    #[clap(long)]
    no_stderr: bool,
}

impl Opt {
    /// Loads the store config from the file, if given, or builds it from the command line.
    fn store_config(&self) -> eyre::Result<StoreConfig> {
        let config: StoreConfig = if let Some(path) = &self.config {
            let file = File::open(path)
                .wrap_err_with(|| format!("unable to open config file: {}", path.display()))?;
            serde_json::from_reader(file)
                .wrap_err_with(|| format!("unable to parse config file: {}", path.display()))?
        } else {
            StoreConfig::new(self.servers, self.arrival_rate, self.service_time)
                .wrap_err("invalid store parameters")?
        };
        Ok(match self.seed {
            Some(seed) => config.seed(seed),
            None => config,
        })
    }
}

/// Runs the model for `steps` ticks, displaying the progress unless `quiet` is set.
fn run(model: &mut StoreModel, steps: u64, quiet: bool) -> eyre::Result<()> {
    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(steps)
            .with_style(ProgressStyle::default_bar().template("{msg} {wide_bar} {percent}%"))
    };
    let refresh = (steps / 100).max(1);
    for step in 0..steps {
        model.step().wrap_err("simulation aborted")?;
        if step % refresh == 0 || step + 1 == steps {
            pb.set_position(step + 1);
            pb.set_message(&format!(
                "[T={time}] [Q={waiting}] [B={busy}] [C={completed}]",
                time = model.now(),
                waiting = model.queue().len(),
                busy = model.busy_servers(),
                completed = model.statistics().total_completions(),
            ));
        }
    }
    pb.finish();
    log::info!("Simulated {} ticks", steps);
    Ok(())
}

/// Set up a logger based on the given user options.
///
/// Records go to the stderr unless `--no-stderr` is passed, and to the `--log-output` file,
/// which is truncated first, if one is given.
fn set_up_logger(opt: &Opt) -> Result<(), fern::InitError> {
    let level = match opt.verbose {
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        n if n >= 3 => log::LevelFilter::Trace,
        _ => log::LevelFilter::Warn,
    };
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| out.finish(format_args!("[{}] {}", record.level(), message)))
        .level(level);
    if let Some(path) = &opt.log_output {
        let file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        dispatch = dispatch.chain(file);
    }
    if !opt.no_stderr {
        dispatch = dispatch.chain(std::io::stderr());
    }
    dispatch.apply()?;
    Ok(())
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let opt = Opt::parse();
    set_up_logger(&opt)?;
    let config = opt.store_config()?;
    let mut model = StoreModel::new(&config)?;
    run(&mut model, opt.steps, opt.no_progress)?;
    let report = model.report();
    match opt.format {
        Format::Text => println!("{}", report),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
