//! Chess scene runner
//!
//! Opens a window and renders the scene until it is closed, or renders a
//! fixed number of frames headless and logs the frame statistics.

use anyhow::{Context, Result};
use chess_render::core::config::{ApplicationConfig, Config};
use chess_render::foundation::logging;
use chess_render::render::backends::RecordingBackend;
use chess_render::{AppError, Engine};
use clap::{Arg, ArgMatches, Command};

fn cli() -> Command {
    Command::new("chess_app")
        .about("Renders a chess board lit by shadow-casting point and spot lights")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Configuration file (.toml or .ron)"),
        )
        .arg(
            Arg::new("headless")
                .long("headless")
                .value_name("FRAMES")
                .help("Render FRAMES frames without a window and log statistics")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("state")
                .long("state")
                .value_name("PATH")
                .help("View state file, overriding the configured one"),
        )
}

fn load_config(matches: &ArgMatches) -> Result<ApplicationConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => ApplicationConfig::load_from_file(path)
            .map_err(AppError::from)
            .with_context(|| format!("Failed to load configuration from {path}"))?,
        None => ApplicationConfig::default(),
    };
    if let Some(state) = matches.get_one::<String>("state") {
        config.state_file = Some(state.clone());
    }
    Ok(config)
}

fn run(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    logging::init(config.log_filter());
    log::info!("Starting chess renderer");

    let mut engine = Engine::new(config)?;
    match matches.get_one::<u64>("headless") {
        Some(&frames) => {
            let mut backend = RecordingBackend::new();
            let summary = engine.run_headless(&mut backend, frames)?;
            log::info!(
                "Last frame: {} shadow passes, {} depth bindings, {} light uniforms, {} pieces, {} markers",
                summary.last_frame.shadow_passes,
                summary.last_frame.depth_bindings,
                summary.last_frame.light_uniform_writes,
                summary.last_frame.piece_draws,
                summary.last_frame.marker_draws
            );
        }
        None => {
            log::warn!("No GPU backend attached; frames are recorded only");
            let mut backend = RecordingBackend::discarding();
            engine.run_windowed(&mut backend)?;
        }
    }
    Ok(())
}

fn is_initialization_failure(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<AppError>())
        .any(AppError::is_initialization_failure)
}

fn main() {
    let matches = cli().get_matches();
    if let Err(e) = run(&matches) {
        eprintln!("Error: {e:#}");
        let code = if is_initialization_failure(&e) { -1 } else { 1 };
        std::process::exit(code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_headless_and_state_overrides() {
        let matches = cli()
            .try_get_matches_from(["chess_app", "--headless", "5", "--state", "view.txt"])
            .unwrap();
        assert_eq!(matches.get_one::<u64>("headless"), Some(&5));

        let config = load_config(&matches).unwrap();
        assert_eq!(config.state_file.as_deref(), Some("view.txt"));
    }

    #[test]
    fn missing_config_file_is_an_initialization_failure() {
        let matches = cli()
            .try_get_matches_from(["chess_app", "--config", "no/such/chess.toml"])
            .unwrap();
        let err = load_config(&matches).unwrap_err();
        assert!(is_initialization_failure(&err));
    }

    #[test]
    fn rejects_non_numeric_frame_count() {
        assert!(cli().try_get_matches_from(["chess_app", "--headless", "many"]).is_err());
    }
}
