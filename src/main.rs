//! Neon Survivor headless runner
//!
//! Plays one session with the autopilot steering and the first offered
//! upgrade picked at every level-up, then prints the result as JSON.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use neon_survivor::meta::MetaProgress;
use neon_survivor::sim::{SessionResult, SimulationContext, StepInput, StepOutcome, step};
use neon_survivor::{QualityPreset, SimConfig};

/// Steps allowed per session frame before the runner gives up
const STEP_BUDGET_FACTOR: u64 = 2;

/// Command-line arguments for a headless session.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Seed for every random draw of the session.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Stage to play; defaults to the profile's unlocked stage. The reward is
    /// still banked at the profile's stage.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    stage: Option<u32>,
    /// Permanent attack level; overrides the profile.
    #[arg(long)]
    attack: Option<u32>,
    /// Permanent health level; overrides the profile.
    #[arg(long)]
    health: Option<u32>,
    /// JSON file with config overrides.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Cosmetic quality preset (low, medium, high).
    #[arg(long, value_parser = parse_quality)]
    quality: Option<QualityPreset>,
    /// Meta-progression profile; the result is banked into it and saved back.
    #[arg(long, value_name = "PATH")]
    profile: Option<PathBuf>,
    /// Print the final render snapshot as well.
    #[arg(long)]
    snapshot: bool,
    /// Print the effective config as JSON and exit without playing.
    #[arg(long)]
    dump_config: bool,
}

fn parse_quality(value: &str) -> Result<QualityPreset, String> {
    QualityPreset::parse(value).ok_or_else(|| format!("unknown quality preset `{value}`"))
}

#[derive(Debug, Serialize)]
struct Report {
    result: SessionResult,
    frames: u64,
    level: u32,
    kills: u32,
    reward: u64,
    profile: MetaProgress,
}

fn load_config(args: &CliArgs) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SimConfig::from_json(&json)?
        }
        None => SimConfig::default(),
    };
    if let Some(preset) = args.quality {
        config.apply_preset(preset);
    }
    Ok(config)
}

fn load_profile(path: Option<&PathBuf>) -> Result<MetaProgress> {
    let Some(path) = path.filter(|p| p.exists()) else {
        return Ok(MetaProgress::default());
    };
    let json = fs::read_to_string(path).with_context(|| format!("reading profile {}", path.display()))?;
    Ok(MetaProgress::from_json(&json)?)
}

fn run(ctx: &mut SimulationContext) -> SessionResult {
    let input = StepInput {
        autopilot: true,
        ..Default::default()
    };

    // Level-up steps don't advance the clock, so leave headroom over the stage length
    let budget = ctx.config.stage_frames().saturating_mul(STEP_BUDGET_FACTOR).max(1);
    for _ in 0..budget {
        match step(ctx, &input) {
            StepOutcome::Finished(result) => return result,
            StepOutcome::LevelingUp => {
                let Some(id) = ctx.progression.choices.first().map(|c| c.id) else {
                    continue;
                };
                if let Err(err) = ctx.select_upgrade(id) {
                    log::warn!("Auto-select failed: {err}");
                }
            }
            StepOutcome::Running | StepOutcome::Paused => {}
        }
    }

    log::warn!("Step limit reached, aborting session");
    ctx.abort()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();
    log::info!("Neon Survivor (headless) starting...");

    let config = load_config(&args)?;
    if args.dump_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }
    log::info!("Quality preset: {}", config.quality.as_str());
    let mut profile = load_profile(args.profile.as_ref())?;

    let mut params = profile.session_params(args.seed);
    if let Some(stage) = args.stage {
        params.stage = stage;
    }
    if let Some(attack) = args.attack {
        params.base_stats.attack = attack;
    }
    if let Some(health) = args.health {
        params.base_stats.health = health;
    }

    let mut ctx = SimulationContext::new(config, params);
    let result = run(&mut ctx);

    if args.snapshot {
        println!("{}", serde_json::to_string_pretty(&ctx.snapshot())?);
    }

    let reward = profile.apply_result(&result);
    if let Some(path) = &args.profile {
        fs::write(path, profile.to_json()?).with_context(|| format!("writing profile {}", path.display()))?;
    }

    let report = Report {
        result,
        frames: ctx.clock.frames,
        level: ctx.progression.level,
        kills: ctx.kills,
        reward,
        profile,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
