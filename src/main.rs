use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use tcxrs::config::{AppConfig, OutputFormat};
use tcxrs::logging::{self, LogLevel};
use tcxrs::summary::{self, format_duration, ActivitySummary};
use tcxrs::{Lap, TcxImporter, TrainingCenterDatabase, Units};

/// tcxrs - Training Center XML activity summaries
///
/// Reads TCX exports from fitness devices and reports duration, distance,
/// heart rate and pace for every activity they contain.
#[derive(Parser)]
#[command(name = "tcxrs")]
#[command(author = "tcxrs Contributors")]
#[command(version)]
#[command(about = "Training Center XML activity summaries", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize every activity in TCX files or directories
    Summary {
        /// TCX files or directories containing TCX files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output format (defaults to the configured one)
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,

        /// Distance units (defaults to the configured ones)
        #[arg(short, long, value_enum)]
        units: Option<Units>,
    },

    /// List the laps of every activity in a TCX file
    Laps {
        /// Input TCX file
        file: PathBuf,
    },

    /// Check that a file decodes as TCX
    Validate {
        /// Input TCX file
        file: PathBuf,
    },
}

#[derive(Tabled)]
struct LapRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Distance (m)")]
    distance: String,
    #[tabled(rename = "Max Speed (m/s)")]
    max_speed: String,
    #[tabled(rename = "Calories")]
    calories: String,
    #[tabled(rename = "Intensity")]
    intensity: String,
    #[tabled(rename = "Trigger")]
    trigger: String,
    #[tabled(rename = "Points")]
    trackpoints: usize,
}

impl LapRow {
    fn new(index: usize, lap: &Lap) -> Self {
        Self {
            index: index + 1,
            start: lap
                .start_time
                .with_timezone(&chrono::Local)
                .format("%H:%M:%S")
                .to_string(),
            time: format_duration(chrono::Duration::seconds(lap.total_time_seconds as i64)),
            distance: format!("{:.1}", lap.distance_meters),
            max_speed: format!("{:.2}", lap.maximum_speed),
            calories: format!("{:.0}", lap.calories),
            intensity: lap.intensity.clone(),
            trigger: lap.trigger_method.clone(),
            trackpoints: lap.track.len(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_or_default()?,
    };
    config.logging.level = LogLevel::from_verbosity(config.logging.level, cli.verbose);
    logging::init_logging(&config.logging)?;

    let importer = TcxImporter::new();

    match cli.command {
        Commands::Summary {
            paths,
            output,
            units,
        } => {
            let output = output.unwrap_or(config.display.output);
            let units = units.unwrap_or(config.display.units);

            let mut summaries = Vec::new();
            for path in &paths {
                for (_, tcx) in load_documents(&importer, path)? {
                    summaries.extend(summary::summarize(&tcx));
                }
            }

            match output {
                OutputFormat::Json => println!("{}", summary::render_json(&summaries)?),
                OutputFormat::Table => print_summary_table(&summaries, units),
            }
        }

        Commands::Laps { file } => {
            let tcx = read_file(&importer, &file)?;

            for activity in &tcx.activities {
                println!(
                    "{} {}",
                    activity.sport.cyan().bold(),
                    activity.start_time().format("%Y-%m-%d %H:%M:%S").to_string().dimmed()
                );

                let rows: Vec<LapRow> = activity
                    .laps
                    .iter()
                    .enumerate()
                    .map(|(index, lap)| LapRow::new(index, lap))
                    .collect();
                println!("{}", Table::new(rows).with(Style::rounded()));
            }
        }

        Commands::Validate { file } => match importer.import_file(&file) {
            Ok(tcx) => {
                let laps: usize = tcx.activities.iter().map(|a| a.laps.len()).sum();
                println!(
                    "{}",
                    format!(
                        "✓ {} is valid: {} activities, {} laps",
                        file.display(),
                        tcx.activities.len(),
                        laps
                    )
                    .green()
                );
            }
            Err(e) => {
                eprintln!("{}", format!("✗ {}", e.user_message()).red());
                return Err(e).with_context(|| format!("Validation failed: {}", file.display()));
            }
        },
    }

    Ok(())
}

fn read_file(importer: &TcxImporter, file: &Path) -> Result<TrainingCenterDatabase> {
    importer
        .import_file(file)
        .with_context(|| format!("Failed to read {}", file.display()))
}

fn load_documents(
    importer: &TcxImporter,
    path: &Path,
) -> Result<Vec<(PathBuf, TrainingCenterDatabase)>> {
    if path.is_dir() {
        importer.import_directory(path)
    } else {
        Ok(vec![(path.to_path_buf(), read_file(importer, path)?)])
    }
}

fn print_summary_table(summaries: &[ActivitySummary], units: Units) {
    if summaries.is_empty() {
        println!("{}", "No activities found".yellow());
        return;
    }

    println!("{}", summary::render_table(summaries, units));

    let total_distance: f64 = summaries
        .iter()
        .map(|s| match units {
            Units::Metric => s.distance_meters,
            Units::Imperial => s.distance_miles,
        })
        .sum();
    let unit = match units {
        Units::Metric => "m",
        Units::Imperial => "mi",
    };
    println!(
        "{}",
        format!(
            "{} activities, {:.2} {} total",
            summaries.len(),
            total_distance,
            unit
        )
        .bold()
    );
}
