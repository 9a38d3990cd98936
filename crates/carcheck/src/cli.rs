//! CLI command definitions.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};

/// Record classic car pre-purchase inspections.
#[derive(Debug, Parser)]
#[command(name = "carcheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file.
    #[arg(long, env = "CARCHECK_DB_PATH")]
    pub db: Option<String>,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a new inspection checklist.
    New {
        /// Free-text description of the car.
        #[arg(long, default_value = "")]
        car_info: String,
        /// Vehicle identification number (up to 17 characters).
        #[arg(long, default_value = "")]
        vin: String,
        /// Inspection date (YYYY-MM-DD), today if omitted.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List checklists with their progress, most recent first.
    List,
    /// Show a checklist and its questions grouped by section.
    Show {
        /// Checklist ID.
        id: i64,
    },
    /// Change the car details of a checklist.
    Edit {
        /// Checklist ID.
        id: i64,
        /// New car description.
        #[arg(long)]
        car_info: Option<String>,
        /// New VIN.
        #[arg(long)]
        vin: Option<String>,
        /// New inspection date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Answer a question. Answering a yes/no question with its current value clears it.
    Answer {
        /// Item ID as printed by `show`.
        item_id: i64,
        /// YES/NO, one of the listed options, or free text.
        value: String,
    },
    /// Clear the answer of a question.
    Clear {
        /// Item ID as printed by `show`.
        item_id: i64,
    },
    /// Delete a checklist and all of its answers.
    Delete {
        /// Checklist ID.
        id: i64,
    },
}

/// Midnight UTC of the given day, or now when no day is given.
pub fn inspection_date(date: Option<NaiveDate>) -> DateTime<Utc> {
    match date {
        Some(day) => day.and_time(chrono::NaiveTime::MIN).and_utc(),
        None => Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_new() {
        let cli = Cli::try_parse_from([
            "carcheck",
            "--db",
            "/tmp/x.db",
            "new",
            "--car-info",
            "1965 Mustang",
            "--vin",
            "5F08F123456789",
            "--date",
            "2024-06-15",
        ])
        .unwrap();

        assert_eq!(cli.db.as_deref(), Some("/tmp/x.db"));
        assert_eq!(cli.format, OutputFormat::Pretty);
        match cli.command {
            Commands::New {
                car_info,
                vin,
                date,
            } => {
                assert_eq!(car_info, "1965 Mustang");
                assert_eq!(vin, "5F08F123456789");
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 15));
            }
            other => panic!("Expected New, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_answer_and_format() {
        let cli = Cli::try_parse_from(["carcheck", "--format", "json", "answer", "12", "FAIR"]).unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        assert!(!cli.log_json);
        assert!(matches!(
            cli.command,
            Commands::Answer { item_id: 12, ref value } if value == "FAIR"
        ));
    }

    #[test]
    fn test_parse_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["carcheck", "show", "abc"]).is_err());
    }

    #[test]
    fn test_inspection_date_is_midnight_utc() {
        let date = inspection_date(NaiveDate::from_ymd_opt(2024, 6, 15));
        assert_eq!(date.to_rfc3339(), "2024-06-15T00:00:00+00:00");
    }
}
