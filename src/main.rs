use anyhow::{ensure, Context, Result};
use clap::Parser;
use log::{info, warn};

use commuter_sim::simulation::{parse_hhmm, GameSpeed, SimClock, SimConfig, SimWorld, SpeedControl};

/// A speed button pressed just before a given tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SpeedPress {
    tick: u32,
    button: usize,
}

fn parse_press(text: &str) -> Result<SpeedPress, String> {
    let (tick, button) = text
        .split_once(':')
        .ok_or_else(|| format!("expected TICK:BUTTON, got '{text}'"))?;
    Ok(SpeedPress {
        tick: tick.trim().parse().map_err(|_| format!("invalid tick in '{text}'"))?,
        button: button
            .trim()
            .parse()
            .map_err(|_| format!("invalid button in '{text}'"))?,
    })
}

#[derive(Parser)]
#[command(name = "commuter_sim")]
#[command(about = "Commuter traffic between cities, driven by rush-hour demand")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "1000")]
    ticks: u32,

    /// Real time per tick in seconds
    #[arg(long, default_value = "0.1")]
    delta: f32,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated wall time at the first tick
    #[arg(long, default_value = "07:30", value_parser = parse_hhmm)]
    start_time: f64,

    /// Initial speed tier
    #[arg(long, value_enum, default_value = "one")]
    speed: GameSpeed,

    /// Speed tiers bound to buttons 1, 2, 3, ...
    #[arg(long, value_enum, value_delimiter = ',', default_values = ["one", "six", "fifteen"])]
    tiers: Vec<GameSpeed>,

    /// Press a speed button before a tick, as TICK:BUTTON (repeatable)
    #[arg(long = "press", value_parser = parse_press)]
    presses: Vec<SpeedPress>,

    /// Print a summary every N ticks
    #[arg(long, default_value = "100")]
    report_every: u32,

    /// Draw the ASCII map with every summary
    #[arg(long)]
    map: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,commuter_sim=info"),
    )
    .init();

    let cli = Cli::parse();
    ensure!(cli.delta > 0.0, "--delta must be positive, got {}", cli.delta);
    ensure!(!cli.tiers.is_empty(), "--tiers needs at least one speed tier");

    run_headless(&cli)
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli) -> Result<()> {
    let mut world = SimWorld::build_test_world(SimWorld::with_config(SimConfig::default(), cli.seed));
    world.clock = SimClock::new(cli.start_time);
    world.set_speed(cli.speed);

    let control = SpeedControl::new(cli.tiers.clone());
    if !control.tiers().contains(&cli.speed) {
        warn!("Starting speed {} is not bound to any button", cli.speed);
    }

    info!(
        "Running commuter simulation: {} ticks of {}s from {}",
        cli.ticks,
        cli.delta,
        world.clock.format_hhmm()
    );

    println!("Initial state:");
    world.print_summary();
    if cli.map {
        world.draw_map();
    }
    println!();

    let report_every = cli.report_every.max(1);
    for tick in 1..=cli.ticks {
        for press in cli.presses.iter().filter(|press| press.tick == tick) {
            match control.button(press.button) {
                Some(speed) => {
                    world.set_speed(speed);
                    info!("Tick {}: speed button {} -> {}", tick, press.button, speed);
                }
                None => warn!("Tick {}: speed button {} is not bound", tick, press.button),
            }
        }

        world.tick(cli.delta);

        if cfg!(debug_assertions) {
            world
                .check_invariants()
                .with_context(|| format!("Invariant violated after tick {}", tick))?;
        }

        if tick % report_every == 0 && tick < cli.ticks {
            println!("--- After tick {} ({}) ---", tick, world.clock.format_hhmm());
            world.print_summary();
            if cli.map {
                world.draw_map();
            }
            println!();
        }
    }

    println!("=== Final State ===");
    world.print_summary();
    if cli.map {
        world.draw_map();
    }

    world
        .stats
        .log_summary(world.road_network.city_count(), world.road_network.road_count());
    Ok(())
}
