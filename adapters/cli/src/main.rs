#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Pizza Brawl round without a window.

mod headless;
mod session;
mod settings;
mod sinks;
mod summary_transfer;

use std::{cell::RefCell, path::PathBuf, rc::Rc};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pizza_brawl_core::RuleSet;
use pizza_brawl_rendering::{Color, Presentation, RenderingBackend};
use pizza_brawl_system_bootstrap::Bootstrap;
use pizza_brawl_world::World;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    headless::HeadlessBackend,
    session::{layout_scene, Session},
    settings::SessionSettings,
    sinks::{ConsoleResults, LogFeedback},
};

/// Play one timed arena round against the bot
#[derive(Parser, Debug)]
#[command(name = "pizza-brawl", version)]
struct Cli {
    /// TOML file with arena and system settings
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for ingredient placement and sabotage timing
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Round length in whole seconds
    #[arg(long, value_name = "SECONDS")]
    duration: Option<u32>,

    /// Rule preset to play under
    #[arg(long, value_enum)]
    rules: Option<RulesArg>,

    /// Simulated frame length in milliseconds
    #[arg(long, value_name = "MS")]
    frame_ms: Option<u64>,

    /// Let a scripted player take part instead of standing still
    #[arg(long)]
    autopilot: bool,

    /// Also write the summary transfer string to this file
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Decode a summary transfer string, print it and exit
    #[arg(
        long,
        value_name = "STRING",
        conflicts_with_all = ["config", "autopilot", "export"]
    )]
    verify: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RulesArg {
    /// Collect ingredients, craft recipes and deliver under fog of war
    Kitchen,
    /// Stack boxed pizzas and deliver them one at a time
    Stacking,
}

impl From<RulesArg> for RuleSet {
    fn from(value: RulesArg) -> Self {
        match value {
            RulesArg::Kitchen => RuleSet::kitchen(),
            RulesArg::Stacking => RuleSet::stacking(),
        }
    }
}

/// Entry point for the Pizza Brawl command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if let Some(encoded) = &cli.verify {
        let summary = summary_transfer::decode(encoded).context("invalid summary string")?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let settings = resolve_settings(&cli)?;
    let world = World::new(settings.arena.clone()).context("invalid arena configuration")?;
    println!("{}", Bootstrap.welcome_banner(&world));

    let mut scene = layout_scene(&world)?;
    let session = Rc::new(RefCell::new(Session::new(
        world,
        &settings,
        Box::new(LogFeedback),
        Box::new(ConsoleResults::stdout(cli.export.clone())),
    )));
    session.borrow_mut().start(&mut scene);
    info!(
        seed = settings.seed,
        seconds = settings.arena.round_seconds,
        "session_configured"
    );

    let backend = HeadlessBackend::new(settings.frame(), settings.max_frames)
        .with_autopilot(cli.autopilot);
    let presentation = Presentation::new(
        "Pizza Brawl",
        Color::from_rgb_u8(0x1a, 0x1a, 0x2e),
        scene,
    );
    let driver = Rc::clone(&session);
    backend.run(presentation, move |dt, input, scene| {
        driver.borrow_mut().advance(dt, input, scene);
    })?;

    let failure = session.borrow_mut().take_failure();
    match failure {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn resolve_settings(cli: &Cli) -> Result<SessionSettings> {
    let mut settings = SessionSettings::load(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        settings.seed = seed;
    }
    if let Some(seconds) = cli.duration {
        settings.arena.round_seconds = seconds;
    }
    if let Some(rules) = cli.rules {
        settings.arena.rules = rules.into();
    }
    if let Some(frame_ms) = cli.frame_ms {
        settings.frame_ms = frame_ms;
    }
    Ok(settings)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_loaded_settings() {
        let cli = Cli::parse_from([
            "pizza-brawl",
            "--seed",
            "7",
            "--duration",
            "30",
            "--rules",
            "stacking",
            "--frame-ms",
            "50",
        ]);
        let settings = resolve_settings(&cli).expect("settings resolve");
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.arena.round_seconds, 30);
        assert_eq!(settings.arena.rules, RuleSet::stacking());
        assert_eq!(settings.frame_ms, 50);
    }

    #[test]
    fn verify_conflicts_with_play_flags() {
        let parsed =
            Cli::try_parse_from(["pizza-brawl", "--verify", "brawl:v1:e30", "--autopilot"]);
        assert!(parsed.is_err());
    }
}
