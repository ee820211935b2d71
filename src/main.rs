use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use log::{error, info};
use protloc::dashboard::{Param, ParamChange};
use protloc::report::Summary;
use protloc::{Config, DataLoader, Dashboard, Dataset, Selection};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "protloc")]
#[command(author, version, about = "Explore the protein location predictor dataset")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding model_scoring.tsv and data_cleaning_stats.json
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive dashboard in the browser
    Serve {
        /// Port to listen on (default: from config, 8501)
        #[arg(short, long)]
        port: Option<u16>,

        /// Request worker threads (default: number of CPUs)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Don't open the browser
        #[arg(long)]
        no_open: bool,
    },

    /// Write the dashboard to a file (.html or .json)
    Render {
        /// Output file (default: protloc-reports/protloc_<timestamp>.html)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for auto-named reports
        #[arg(long, default_value = "protloc-reports")]
        report_dir: PathBuf,

        /// Mass histogram x axis: Linear or Log
        #[arg(long)]
        mass_scale: Option<String>,

        /// Location for the location explorer
        #[arg(long)]
        location: Option<String>,

        /// Metric for the location explorer
        #[arg(long)]
        metric: Option<String>,

        /// Location explorer x axis: Linear or Log
        #[arg(long)]
        loc_scale: Option<String>,
    },

    /// Print cleaning stats and location counts as TSV
    Summary,
}

fn main() {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    if let Err(e) = run(args) {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let loader = DataLoader::new(&config);
    let dataset = Dataset::load(config, &loader).context("Failed to load dataset")?;

    match args.command {
        Command::Serve { port, workers, no_open } => {
            let config = dataset.config();
            let port = port.unwrap_or(config.port);
            let workers = workers.unwrap_or(config.workers);
            protloc::serve::start(&dataset, port, workers, !no_open)
                .with_context(|| format!("Server error on port {}", port))?;
        }

        Command::Render { output, report_dir, mass_scale, location, metric, loc_scale } => {
            let mut selection = Selection::default();
            let changes = [
                (Param::MassScale, mass_scale),
                (Param::Location, location),
                (Param::Metric, metric),
                (Param::LocScale, loc_scale),
            ];
            for (param, value) in changes {
                if let Some(value) = value {
                    selection.apply(&ParamChange { param, value }, dataset.config());
                }
            }

            let output_path = match output {
                Some(path) => path,
                None => {
                    std::fs::create_dir_all(&report_dir)
                        .with_context(|| format!("Failed to create {}", report_dir.display()))?;
                    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
                    report_dir.join(format!("protloc_{}.html", timestamp))
                }
            };

            let page = Dashboard::new(&dataset).render_page(&selection);
            protloc::report::generate(&output_path, &page)
                .with_context(|| format!("Failed to write report {}", output_path.display()))?;
            info!("wrote {} sections", page.sections.len());
            eprintln!("\x1b[32mReport saved: {}\x1b[0m", output_path.display());
        }

        Command::Summary => {
            let summary = Summary::from_dataset(&dataset)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            summary.write_tsv(&mut out)?;
            out.flush()?;
        }
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
