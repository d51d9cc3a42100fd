//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and loads environment settings
//! - resolves the farm profile (defaults, saved JSON, flag overrides)
//! - runs the analysis pipeline or the advisor
//! - prints reports/plots and writes optional exports

use clap::Parser;

use crate::advisor::{ChatSession, GeminiClient};
use crate::cli::{AskArgs, Command, CurveArgs, EstimateArgs, MapArgs, ProfileArgs, SaveProfileArgs};
use crate::config::Settings;
use crate::domain::FarmProfile;
use crate::error::AppError;
use crate::estimator::EstimatorSettings;

pub mod pipeline;

/// Entry point for the `agri` binary.
pub fn run() -> Result<(), AppError> {
    // We want `agri` and `agri --variant classic` to behave like `agri tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    let settings = Settings::from_env()?;

    // The dashboard owns the terminal, so it only logs when a file is configured.
    if matches!(cli.command, Command::Tui(_)) {
        if let Some(path) = &settings.log_file {
            crate::logging::init_file_logger(path, cli.verbose)?;
        }
    } else {
        crate::logging::init_cli_logger(cli.verbose);
    }
    tracing::debug!(?settings, "loaded settings");

    match cli.command {
        Command::Estimate(args) => handle_estimate(args, &settings),
        Command::Curve(args) => handle_curve(args, &settings),
        Command::Ask(args) => handle_ask(args, &settings),
        Command::Map(args) => handle_map(args, &settings),
        Command::Profile(args) => handle_profile(args, &settings),
        Command::Tui(args) => crate::tui::run(&args, &settings),
    }
}

fn handle_estimate(args: EstimateArgs, settings: &Settings) -> Result<(), AppError> {
    let (profile, estimator) = resolve_profile(&args.profile, settings)?;
    let season = args.season.unwrap_or_else(pipeline::current_season);
    let output = pipeline::analyze(&profile, &estimator, season)?;

    if args.json {
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| AppError::runtime(format!("Failed to encode analysis: {e}")))?;
        println!("{json}");
    } else {
        println!("{}", crate::report::format_summary(&output));
        println!("{}", crate::report::format_breakdown(&output.breakdown));
        println!("{}", crate::report::format_series_table(&output.series));
        if !args.no_plot {
            println!(
                "{}",
                crate::plot::render_series_plot(&output.series, args.width, args.height)
            );
        }
    }

    if let Some(path) = &args.export_series {
        crate::io::write_series_csv(path, &output.series)?;
    }
    Ok(())
}

fn handle_curve(args: CurveArgs, settings: &Settings) -> Result<(), AppError> {
    let (profile, estimator) = resolve_profile(&args.profile, settings)?;
    let output = pipeline::analyze(&profile, &estimator, pipeline::current_season())?;

    println!("Current prediction: {:.2} q/acre\n", output.predicted());
    println!("{}", crate::report::format_curve_table(&output.curve));
    if !args.no_plot {
        println!(
            "{}",
            crate::plot::render_curve_plot(&output.curve, args.width, args.height)
        );
    }

    if let Some(path) = &args.export {
        crate::io::write_curve_csv(path, &output.curve)?;
    }
    Ok(())
}

fn handle_ask(args: AskArgs, settings: &Settings) -> Result<(), AppError> {
    let (profile, estimator) = resolve_profile(&args.profile, settings)?;
    let output = pipeline::analyze(&profile, &estimator, pipeline::current_season())?;
    let client = GeminiClient::from_settings(settings)?;

    let question = args.question.join(" ");
    let session = ChatSession::new().ask(&client, &profile, &question)?;
    if let Some(reply) = session.last_reply() {
        println!("{}", reply.content.trim_end());
    }

    if let Some(path) = &args.transcript {
        crate::io::write_transcript_markdown(path, &output, &session)?;
    }
    Ok(())
}

fn handle_map(args: MapArgs, settings: &Settings) -> Result<(), AppError> {
    let (profile, estimator) = resolve_profile(&args.profile, settings)?;
    profile.validate(estimator.variant)?;

    let tile = crate::map::tile_for(profile.location, args.zoom)?;
    println!(
        "Location: lat {:.4}, lon {:.4}",
        profile.location.lat, profile.location.lon
    );
    println!("Tile: z={} x={} y={}", tile.z, tile.x, tile.y);

    println!("URL: {}", map_url(settings, tile, args.reveal_key));
    Ok(())
}

/// Tile URL for display; the maps key is masked unless `reveal_key`.
fn map_url(settings: &Settings, tile: crate::map::Tile, reveal_key: bool) -> String {
    let key = match settings.require_maps_key() {
        Ok(key) if reveal_key => key.to_string(),
        Ok(key) => crate::map::mask_key(key),
        Err(err) => {
            tracing::warn!(error = %err, "printing the tile URL without a key");
            String::new()
        }
    };
    crate::map::tile_url(crate::map::SATELLITE_TILE_TEMPLATE, tile, &key)
}

fn handle_profile(args: SaveProfileArgs, settings: &Settings) -> Result<(), AppError> {
    let (profile, estimator) = resolve_profile(&args.profile, settings)?;
    profile.validate(estimator.variant)?;
    crate::io::write_profile_json(&args.out, &profile)?;
    println!("Wrote {}", args.out.display());
    Ok(())
}

/// Build the profile and estimator settings for a command.
///
/// Precedence: variant defaults < saved profile (`--profile` / `--pick`) < flags.
/// The profile is not validated here; the pipeline does that.
pub fn resolve_profile(
    args: &ProfileArgs,
    settings: &Settings,
) -> Result<(FarmProfile, EstimatorSettings), AppError> {
    let variant = args.variant.unwrap_or(settings.variant);

    let mut profile = if let Some(path) = &args.profile {
        crate::io::read_profile_json(path, variant)?
    } else if args.pick {
        let path = crate::cli::picker::prompt_for_profile_path()?;
        crate::io::read_profile_json(&path, variant)?
    } else {
        FarmProfile::default_for(variant)
    };
    apply_overrides(&mut profile, args);

    let estimator = EstimatorSettings {
        variant,
        clamp_at_zero: args.clamp || settings.clamp_at_zero,
    };
    Ok((profile, estimator))
}

/// Copy every flag the user passed onto `profile`.
pub fn apply_overrides(profile: &mut FarmProfile, args: &ProfileArgs) {
    fn set<T: Copy>(slot: &mut T, value: Option<T>) {
        if let Some(v) = value {
            *slot = v;
        }
    }

    set(&mut profile.land_type, args.land);
    set(&mut profile.soil_condition, args.soil);
    set(&mut profile.soil_ph, args.ph);
    set(&mut profile.seed_quality, args.seed);
    set(&mut profile.manure, args.manure);
    set(&mut profile.fertilizer_plan, args.fertilizer);
    set(&mut profile.water_source, args.water_source);
    set(&mut profile.water_level, args.water_level);
    set(&mut profile.irrigation, args.irrigation);
    set(&mut profile.labor, args.labor);
    set(&mut profile.weather, args.weather);
    set(&mut profile.weed_control, args.weed_control);
    set(&mut profile.pest_observed, args.pest);
    set(&mut profile.disease_observed, args.disease);
    set(&mut profile.monitoring, args.monitoring);
    set(&mut profile.harvest_tools, args.harvest_tools);
    set(&mut profile.storage, args.storage);
    set(&mut profile.transport, args.transport);
    set(&mut profile.yield_record, args.yield_record);
    set(&mut profile.location.lat, args.lat);
    set(&mut profile.location.lon, args.lon);

    if !args.equipment.is_empty() {
        profile.equipment = args.equipment.iter().copied().collect();
    }
    if !args.history.is_empty() {
        profile.yield_history = args.history.clone();
    }
}

/// Rewrite argv so `agri` defaults to `agri tui`.
///
/// Rules:
/// - `agri`                      -> `agri tui`
/// - `agri --variant classic`    -> `agri tui --variant classic`
/// - `agri --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "estimate" | "curve" | "ask" | "map" | "profile" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
