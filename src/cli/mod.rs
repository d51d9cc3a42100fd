//! Command-line parsing for the farm yield dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the estimator and advisor code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{
    Equipment, FertilizerPlan, FieldMonitoring, HarvestTool, IrrigationSystem, LandType, ManureType,
    SeedQuality, SoilCondition, StorageFacility, Transport, Variant, WaterLevel, WaterSource, Weather,
    WeedControl, YearYield,
};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "agri", version, about = "Farm yield dashboard with an AI agronomist")]
pub struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the diagnostic summary, yield breakdown and yield trend.
    Estimate(EstimateArgs),
    /// Print the yield sensitivity curve.
    Curve(CurveArgs),
    /// Ask the AI agronomist one question about the farm.
    Ask(AskArgs),
    /// Print the satellite tile covering the farm location.
    Map(MapArgs),
    /// Write the resolved profile to a JSON file.
    Profile(SaveProfileArgs),
    /// Launch the interactive dashboard.
    ///
    /// This uses the same analysis pipeline as `agri estimate`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(ProfileArgs),
}

/// Where the farm profile comes from, plus per-field overrides.
///
/// Precedence: defaults for the variant < `--profile`/`--pick` file < flags.
#[derive(Debug, Args, Clone, Default)]
pub struct ProfileArgs {
    /// Dashboard variant (overrides AGRI_VARIANT).
    #[arg(long, value_enum)]
    pub variant: Option<Variant>,

    /// Start from a saved profile JSON.
    #[arg(long, value_name = "JSON", conflicts_with = "pick")]
    pub profile: Option<PathBuf>,

    /// Choose a profile JSON from the current directory tree.
    #[arg(long)]
    pub pick: bool,

    /// Clamp negative yield estimates at zero (overrides AGRI_CLAMP_AT_ZERO).
    #[arg(long)]
    pub clamp: bool,

    #[arg(long, value_enum)]
    pub land: Option<LandType>,

    #[arg(long, value_enum)]
    pub soil: Option<SoilCondition>,

    /// Soil pH (0-14).
    #[arg(long)]
    pub ph: Option<f64>,

    #[arg(long, value_enum)]
    pub seed: Option<SeedQuality>,

    #[arg(long, value_enum)]
    pub manure: Option<ManureType>,

    #[arg(long, value_enum)]
    pub fertilizer: Option<FertilizerPlan>,

    #[arg(long, value_enum)]
    pub water_source: Option<WaterSource>,

    #[arg(long, value_enum)]
    pub water_level: Option<WaterLevel>,

    #[arg(long, value_enum)]
    pub irrigation: Option<IrrigationSystem>,

    /// Labor personnel (1-100).
    #[arg(long)]
    pub labor: Option<u32>,

    /// Equipment on hand (comma separated; replaces the profile's list).
    #[arg(long, value_enum, value_delimiter = ',')]
    pub equipment: Vec<Equipment>,

    #[arg(long, value_enum)]
    pub weather: Option<Weather>,

    #[arg(long, value_enum)]
    pub weed_control: Option<WeedControl>,

    /// Pest activity observed (`--pest` or `--pest false`).
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub pest: Option<bool>,

    /// Disease symptoms observed (`--disease` or `--disease false`).
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub disease: Option<bool>,

    #[arg(long, value_enum)]
    pub monitoring: Option<FieldMonitoring>,

    #[arg(long, value_enum)]
    pub harvest_tools: Option<HarvestTool>,

    #[arg(long, value_enum)]
    pub storage: Option<StorageFacility>,

    #[arg(long, value_enum)]
    pub transport: Option<Transport>,

    /// Last recorded yield (q/acre).
    #[arg(long)]
    pub yield_record: Option<f64>,

    /// Past season yield as YEAR=VALUE (repeatable; replaces the profile's history).
    #[arg(long = "history", value_name = "YEAR=VALUE", value_parser = parse_year_yield)]
    pub history: Vec<YearYield>,

    /// Latitude (decimal degrees).
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude (decimal degrees).
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

/// Options for `agri estimate`.
#[derive(Debug, Args)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Print the full analysis as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Season label for the prediction (defaults to the current year).
    #[arg(long)]
    pub season: Option<i32>,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 12)]
    pub height: usize,

    /// Export the yield trend to CSV.
    #[arg(long = "export-series", value_name = "CSV")]
    pub export_series: Option<PathBuf>,
}

/// Options for `agri curve`.
#[derive(Debug, Args)]
pub struct CurveArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 12)]
    pub height: usize,

    /// Export the curve to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

/// Options for `agri ask`.
#[derive(Debug, Args)]
pub struct AskArgs {
    /// The question (remaining words are joined with spaces).
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,

    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Also write the exchange as a markdown transcript.
    #[arg(long, value_name = "MD")]
    pub transcript: Option<PathBuf>,
}

/// Options for `agri map`.
#[derive(Debug, Args)]
pub struct MapArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Tile zoom level.
    #[arg(long, default_value_t = crate::map::DEFAULT_ZOOM)]
    pub zoom: u8,

    /// Print the maps key in full instead of masking it.
    #[arg(long)]
    pub reveal_key: bool,
}

/// Options for `agri profile`.
#[derive(Debug, Args)]
pub struct SaveProfileArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Destination JSON file.
    #[arg(long, value_name = "JSON")]
    pub out: PathBuf,
}

/// Parse `YEAR=VALUE` (e.g. `2024=13.5`).
pub fn parse_year_yield(raw: &str) -> Result<YearYield, String> {
    let (year, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected YEAR=VALUE, got '{raw}'"))?;
    let year: i32 = year
        .trim()
        .parse()
        .map_err(|_| format!("invalid year '{}'", year.trim()))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid yield '{}'", value.trim()))?;
    Ok(YearYield { year, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_yield_parses() {
        assert_eq!(
            parse_year_yield("2024=13.5").unwrap(),
            YearYield { year: 2024, value: 13.5 }
        );
        assert!(parse_year_yield("2024").is_err());
        assert!(parse_year_yield("last=1").is_err());
    }

    #[test]
    fn estimate_flags_parse() {
        let cli = Cli::parse_from([
            "agri",
            "estimate",
            "--variant",
            "classic",
            "--soil",
            "excellent",
            "--seed",
            "damaged-discolored",
            "--pest",
            "--equipment",
            "tractor,power-tiller",
            "--lat",
            "-33.87",
            "--history",
            "2024=11",
        ]);
        let Command::Estimate(args) = cli.command else {
            panic!("expected estimate");
        };
        let p = &args.profile;
        assert_eq!(p.variant, Some(Variant::Classic));
        assert_eq!(p.soil, Some(SoilCondition::Excellent));
        assert_eq!(p.seed, Some(SeedQuality::DamagedDiscolored));
        assert_eq!(p.pest, Some(true));
        assert_eq!(p.disease, None);
        assert_eq!(p.equipment, vec![Equipment::Tractor, Equipment::PowerTiller]);
        assert_eq!(p.lat, Some(-33.87));
        assert_eq!(p.history.len(), 1);
    }

    #[test]
    fn ask_joins_words_and_accepts_explicit_false() {
        let cli = Cli::parse_from(["agri", "ask", "--pest", "false", "why", "yellow", "leaves?"]);
        let Command::Ask(args) = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(args.question.join(" "), "why yellow leaves?");
        assert_eq!(args.profile.pest, Some(false));
    }
}
