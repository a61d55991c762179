//! Symphony Skirmish — headless match driver.
//!
//! Plays one full match in the terminal: the player is simulated by clicking
//! the tuning bar after a fixed wait, the opponent by its policy and pacing
//! delay. Narration goes to stdout, diagnostics to tracing.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::info;

use symphony_skirmish::battle::{JournalEntry, MatchContext, Phase, TurnOutcome};
use symphony_skirmish::config::{default_config_path, load_config};

/// Render-loop frame length the driver simulates.
const FRAME_MS: f64 = 16.0;

#[derive(Parser, Debug)]
#[command(name = "symphony-skirmish", version, about = "Play a headless harmony battle")]
struct Cli {
    /// Dice seed; the same seed replays the same match.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Config file (defaults to ~/.symphony-skirmish/battle.yaml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many rounds even if nobody has fallen.
    #[arg(long, default_value_t = 200)]
    max_turns: u32,

    /// How long the simulated player watches the bar before clicking.
    #[arg(long, default_value_t = 1200)]
    click_ms: u64,
}

fn main() -> Result<()> {
    setup_tracing()?;
    let cli = Cli::parse();

    let path = cli.config.unwrap_or_else(default_config_path);
    let config = load_config(&path)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    info!(seed = cli.seed, config = %path.display(), "starting match");

    let mut ctx = MatchContext::seeded(config, cli.seed);
    ctx.start();
    ctx.start();
    println!(
        "symphony-skirmish v{} — wind {}, birds {} ({})",
        env!("CARGO_PKG_VERSION"),
        ctx.environment().wind,
        ctx.environment().birds,
        ctx.weather()
    );

    while !ctx.phase().is_terminal() && ctx.state().turn_number <= cli.max_turns {
        match ctx.phase() {
            Phase::PlayerTurn => play_player_turn(&mut ctx, cli.click_ms),
            Phase::AiTurn => {
                if let Some(outcome) = ctx.tick(FRAME_MS).outcome {
                    narrate(&ctx, &outcome);
                }
            }
            other => return Err(anyhow!("unexpected phase {other:?} mid-match")),
        }
    }

    let state = ctx.state();
    let verdict = match state.phase {
        Phase::Victory => "victory",
        Phase::Defeat => "defeat",
        _ => "unfinished",
    };
    println!(
        "{verdict} after {} rounds — player {} hp, opponent {} hp, score {}, perfect harmonies {}/{}",
        state.turn_number,
        state.player.health,
        state.ai.health,
        state.score,
        state.perfect_harmonies_used,
        ctx.config().max_perfect_harmonies
    );
    Ok(())
}

fn play_player_turn(ctx: &mut MatchContext, click_ms: u64) {
    ctx.arm_tuning_bar();
    let mut waited = 0.0;
    while waited < click_ms as f64 {
        let tick = ctx.tick(FRAME_MS);
        waited += FRAME_MS;
        if let Some(outcome) = tick.outcome {
            println!("  (turn timer ran out)");
            narrate(ctx, &outcome);
            return;
        }
    }
    if let Some(selection) = ctx.resolve_tuning_bar() {
        if let Some(outcome) = ctx.submit_selection(selection) {
            narrate(ctx, &outcome);
        }
    }
}

fn narrate(ctx: &MatchContext, outcome: &TurnOutcome) {
    let mut line = format!(
        "[{}] {} plays {} — tier {} ({}%), {} damage",
        ctx.state().turn_number,
        outcome.side,
        outcome.pitch,
        outcome.harmony_tier,
        outcome.harmony,
        outcome.damage_dealt
    );
    if outcome.heal_applied > 0 {
        line.push_str(&format!(", heals {}", outcome.heal_applied));
    }
    if outcome.finisher {
        line.push_str(", FINISHER");
    }
    if outcome.stun_applied {
        line.push_str(", stuns");
    }
    if let Some(kind) = outcome.power_up_granted {
        line.push_str(&format!(", gains {}", kind.label()));
    }
    if outcome.combo_after > 1 {
        line.push_str(&format!(" (combo {})", outcome.combo_after));
    }
    println!(
        "{line} | hp {}/{}",
        ctx.state().player.health,
        ctx.state().ai.health
    );
    if let Some(JournalEntry::StunSkipped { side, .. }) = ctx.journal().last() {
        println!("  {side} is stunned and loses a turn");
    }
}

fn setup_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err: Box<dyn std::error::Error + Send + Sync>| {
            anyhow!("failed to initialise tracing: {err}")
        })?;
    Ok(())
}
