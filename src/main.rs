use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser};
use tracing::{info, warn};

mod columns;
mod config;
mod dates;
mod error;
mod models;
mod report;
mod scoring;
mod slotting;
mod table;

use config::{FilePaths, ScoringConfig};
use scoring::Scorer;

const USAGE: &str = "\
Usage:
  Complete workflow:   oflight <number_of_slots>
  Calculate points:    oflight points
  Assign slots:        oflight slots [number_of_slots]";

#[derive(Parser)]
#[command(name = "oflight")]
#[command(about = "Orientation flight priority points and slotting", long_about = None)]
#[command(after_help = USAGE)]
struct Cli {
    /// `points`, `slots`, or a slot count to run both stages
    command: String,
    /// Number of primary slots for the `slots` command
    #[arg(allow_hyphen_values = true)]
    slot_count: Option<String>,
    /// JSON file overriding the scoring factors
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(flatten)]
    files: FileArgs,
}

#[derive(Args)]
struct FileArgs {
    /// Orientation report exported from E-Services
    #[arg(long, default_value = config::DEFAULT_REPORT_FILE)]
    report: PathBuf,
    /// Scored table written by `points` and read by `slots`
    #[arg(long, default_value = config::DEFAULT_POINTS_FILE)]
    points: PathBuf,
    /// Cadet list, one CAP ID per line
    #[arg(long, default_value = config::DEFAULT_CADETS_FILE)]
    cadets: PathBuf,
    #[arg(long, default_value = config::DEFAULT_SLOTTING_FILE)]
    slotting: PathBuf,
}

impl From<FileArgs> for FilePaths {
    fn from(args: FileArgs) -> Self {
        Self {
            report: args.report,
            points: args.points,
            cadets: args.cadets,
            slotting: args.slotting,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum RunMode {
    Points,
    Slots(Option<usize>),
    Complete(usize),
}

impl RunMode {
    fn parse(command: &str, slot_count: Option<&str>) -> anyhow::Result<Self> {
        let command = command.trim().to_lowercase();
        if let Ok(slots) = command.parse::<usize>() {
            return Ok(RunMode::Complete(slots));
        }

        match command.as_str() {
            "points" => Ok(RunMode::Points),
            "slots" => {
                let slots = slot_count.and_then(|value| match value.trim().parse::<usize>() {
                    Ok(slots) => Some(slots),
                    Err(_) => {
                        warn!(value, "invalid slot count provided, using no slot limit");
                        None
                    }
                });
                Ok(RunMode::Slots(slots))
            }
            other => anyhow::bail!("unknown command or invalid slot count: {other}\n{USAGE}"),
        }
    }
}

fn points_command(paths: &FilePaths, scorer: &Scorer) -> anyhow::Result<()> {
    let candidates = table::read_report(&paths.report)
        .with_context(|| format!("error processing {}", paths.report.display()))?;
    let ranked = scorer.score_all(candidates);
    table::write_scored(&paths.points, &ranked).context("error saving points")?;

    info!(
        cadets = ranked.len(),
        "points calculation complete, results saved to {}",
        paths.points.display()
    );
    Ok(())
}

fn slots_command(paths: &FilePaths, slot_count: Option<usize>) -> anyhow::Result<()> {
    let candidates = slotting::read_candidate_list(&paths.cadets);
    if candidates.is_empty() {
        warn!("no cadets listed in {}", paths.cadets.display());
    } else {
        info!(cadets = candidates.len(), "read cadet list");
    }
    let ranked = table::read_scored(&paths.points)
        .with_context(|| format!("error processing {}", paths.points.display()))?;

    let assignment = slotting::assign_slots(&ranked, &candidates, slot_count);
    let output = report::build_report(&assignment);
    table::write_atomic(&paths.slotting, output.as_bytes())
        .context("error writing slot assignments")?;

    println!("{output}");
    info!(
        matched = assignment.matched_count(),
        unmatched = assignment.unmatched.len(),
        "slot assignments complete, results saved to {}",
        paths.slotting.display()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ScoringConfig::load(path)?,
        None => ScoringConfig::default(),
    };
    let mode = RunMode::parse(&cli.command, cli.slot_count.as_deref())?;
    let paths = FilePaths::from(cli.files);
    let scorer = Scorer::new(config, chrono::Local::now().date_naive());

    match mode {
        RunMode::Points => points_command(&paths, &scorer)?,
        RunMode::Slots(slot_count) => slots_command(&paths, slot_count)?,
        RunMode::Complete(slot_count) => {
            info!("starting complete workflow");
            points_command(&paths, &scorer)?;
            slots_command(&paths, Some(slot_count))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_first_argument_runs_both_stages() {
        assert_eq!(RunMode::parse("10", None).unwrap(), RunMode::Complete(10));
        assert_eq!(RunMode::parse("0", Some("ignored")).unwrap(), RunMode::Complete(0));
    }

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(RunMode::parse("POINTS", None).unwrap(), RunMode::Points);
        assert_eq!(RunMode::parse("Slots", Some("4")).unwrap(), RunMode::Slots(Some(4)));
    }

    #[test]
    fn bad_slot_count_means_no_limit() {
        assert_eq!(RunMode::parse("slots", Some("ten")).unwrap(), RunMode::Slots(None));
        assert_eq!(RunMode::parse("slots", Some("-3")).unwrap(), RunMode::Slots(None));
        assert_eq!(RunMode::parse("slots", None).unwrap(), RunMode::Slots(None));
    }

    #[test]
    fn unknown_command_reports_usage() {
        let err = RunMode::parse("score", None).unwrap_err();
        assert!(err.to_string().contains("unknown command"));
        assert!(err.to_string().contains("oflight slots [number_of_slots]"));
    }

    #[test]
    fn cli_defaults_to_original_file_names() {
        let cli = Cli::try_parse_from(["oflight", "slots", "3"]).unwrap();
        let paths = FilePaths::from(cli.files);
        let defaults = FilePaths::default();
        assert_eq!(paths.report, defaults.report);
        assert_eq!(paths.points, defaults.points);
        assert_eq!(paths.cadets, defaults.cadets);
        assert_eq!(paths.slotting, defaults.slotting);
        assert_eq!(cli.slot_count.as_deref(), Some("3"));
    }

    #[test]
    fn complete_workflow_writes_points_and_slots() {
        let dir = tempfile::tempdir().unwrap();
        let paths = FilePaths {
            report: dir.path().join("Cadet_Orientation_Report.csv"),
            points: dir.path().join("oflight_points.csv"),
            cadets: dir.path().join("cadet_list.txt"),
            slotting: dir.path().join("slotting.txt"),
        };
        std::fs::write(
            &paths.report,
            "CAPID,FullName,Miles,Textbox39,Textbox25,GroupType,Joined,\
             Textbox135,Textbox136,Textbox137,Textbox138,Textbox139\n\
             100,Avery Lee,No,NER,NY-001,Has Flights,Jan-20,Mar-23,,,,\n\
             300,Jules Moreno,No,NER,NY-001,No O-Flights,Jun-23,,,,,\n\
             400,Kiara Patel,No,NER,NY-001,Has Flights,Jan-20,Jan-23,Jun-23,,,\n",
        )
        .unwrap();
        std::fs::write(&paths.cadets, "100\n200\n100\n300\n").unwrap();

        let scorer = Scorer::new(
            ScoringConfig::default(),
            chrono::NaiveDate::from_ymd_opt(2023, 9, 9).unwrap(),
        );
        points_command(&paths, &scorer).unwrap();
        slots_command(&paths, Some(1)).unwrap();

        let output = std::fs::read_to_string(&paths.slotting).unwrap();
        let primary = output.split("Alternates:").next().unwrap();
        assert!(primary.contains("Jules Moreno"));
        assert!(output.contains("  2  100      Avery Lee"));
        assert!(!output.contains("Kiara Patel"));
        assert!(output.ends_with("Unmatched CAP IDs:\n====================\n200\n"));
    }

    #[test]
    fn missing_report_fails_without_writing_points() {
        let dir = tempfile::tempdir().unwrap();
        let paths = FilePaths {
            report: dir.path().join("absent.csv"),
            points: dir.path().join("oflight_points.csv"),
            ..FilePaths::default()
        };
        let scorer = Scorer::new(
            ScoringConfig::default(),
            chrono::NaiveDate::from_ymd_opt(2023, 9, 9).unwrap(),
        );
        assert!(points_command(&paths, &scorer).is_err());
        assert!(!paths.points.exists());
    }
}
