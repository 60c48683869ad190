//! # Headless Session Test
//!
//! Proves the whole simulation surface works with no window attached:
//!
//! Generate → Spawn → Walk → Jump → Mine → Collect → Place → Stream
//!
//! The session is fully scripted and driven by one [`InputFrame`] per
//! tick, exactly the way a rendering host would drive it. The world
//! seed comes from the first CLI argument (default 42), so two runs
//! with the same seed must report identical world checksums.

use std::time::Instant;

use strata::{InputFrame, SimPhase, Simulation};
use strata_core::{Vec2, WorldConfig};
use strata_procedural::WorldSeed;

/// Ticks of scripted play after generation.
const SESSION_TICKS: u64 = 900;

/// Computes a cheap FNV-1a checksum of the blueprint's ASCII form.
fn world_checksum(ascii: &str) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for byte in ascii.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// Builds the scripted input for one session tick.
fn scripted_input(tick: u64, player_center: Vec2) -> InputFrame {
    let mut input = InputFrame::default();
    match tick {
        // Walk right with the occasional hop
        0..=299 => {
            input.right = true;
            input.jump = tick % 40 == 0;
        }
        // Stand still and dig a shaft straight down
        300..=499 => {
            if tick % 2 == 0 {
                input.mine_at = Some(player_center + Vec2::new(0.0, 20.0));
            }
        }
        // Build a small pillar two tiles to the left
        500..=539 => {
            input.cycle_selection = tick == 500;
            if tick % 4 == 0 {
                input.place_at = Some(player_center + Vec2::new(-40.0, 0.0));
            }
        }
        // Walk back left across the sector boundary
        _ => input.left = true,
    }
    input
}

fn main() {
    let seed_value = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42u64);

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║           HEADLESS SESSION TEST                                  ║");
    println!("║           Generate → Walk → Mine → Place → Stream                ║");
    println!("╠══════════════════════════════════════════════════════════════════╣");
    println!("║  No window, no GPU, no input device. Pure simulation.            ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let config = WorldConfig::default();
    let seed = WorldSeed::new(seed_value);
    let mut sim = match Simulation::new(&config, seed) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("❌ failed to start simulation: {err}");
            std::process::exit(1);
        }
    };

    // =========================================================================
    // PHASE 1: World Generation (one phase per tick)
    // =========================================================================
    println!("Generating {}x{} world, seed {}...", config.width, config.height, seed_value);
    let gen_start = Instant::now();
    let idle = InputFrame::default();
    while sim.phase() == SimPhase::Generating {
        if let Some(progress) = sim.progress() {
            println!(
                "  phase {:>2}/{:<2} ({:>5.1}%)",
                progress.completed,
                progress.total,
                f64::from(progress.fraction()) * 100.0
            );
        }
        if let Err(err) = sim.tick(&idle) {
            eprintln!("❌ generation failed: {err}");
            std::process::exit(1);
        }
    }
    let gen_duration = gen_start.elapsed();

    let checksum = sim
        .world()
        .map(|grid| world_checksum(&grid.blueprint().to_ascii()))
        .unwrap_or(0);
    println!("  world live in {:.2} ms, checksum {checksum:#018x}", gen_duration.as_secs_f64() * 1000.0);
    println!();

    // =========================================================================
    // PHASE 2: Scripted Session
    // =========================================================================
    println!("Running {SESSION_TICKS} scripted ticks...");
    let session_start = Instant::now();
    let mut events_seen = 0usize;

    for tick in 0..SESSION_TICKS {
        let center = sim.player().map(strata::Player::center).unwrap_or(Vec2::ZERO);
        let input = scripted_input(tick, center);
        if let Err(err) = sim.tick(&input) {
            eprintln!("❌ tick {tick} failed: {err}");
            std::process::exit(1);
        }
        events_seen += sim.take_events().len();
    }
    let session_duration = session_start.elapsed();

    // =========================================================================
    // RESULTS
    // =========================================================================
    let stats = *sim.stats();
    let ticks_per_sec = stats.ticks as f64 / session_duration.as_secs_f64();

    println!();
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                    SESSION RESULTS                               ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();
    println!("┌─ THROUGHPUT ─────────────────────────────────────────────────────┐");
    println!("│ Session Duration:   {:.2} ms", session_duration.as_secs_f64() * 1000.0);
    println!("│ Ticks:              {}", stats.ticks);
    println!("│ Ticks/sec:          {ticks_per_sec:.0}  (60 needed for real time)");
    println!("│ Events Emitted:     {events_seen}");
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();
    println!("┌─ WORLD ACTIVITY ─────────────────────────────────────────────────┐");
    println!("│ Blocks Mined:       {}", stats.blocks_mined);
    println!("│ Blocks Placed:      {}", stats.blocks_placed);
    println!("│ Drops Collected:    {}", stats.drops_collected);
    println!("│ Drops Culled:       {}", stats.drops_culled);
    println!("│ Granular Woken:     {}", stats.granular_woken);
    println!("│ Granular Settled:   {}", stats.granular_settled);
    println!("│ Sectors Crossed:    {}", stats.sectors_crossed);
    println!("│ Grass Grown:        {}", stats.grass_grown);
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    if let Some(player) = sim.player() {
        println!("┌─ FINAL INVENTORY ────────────────────────────────────────────────┐");
        let mut empty = true;
        for (kind, count) in player.inventory.iter_held() {
            println!("│ {:<10} x{count}", kind.name());
            empty = false;
        }
        if empty {
            println!("│ (empty)");
        }
        println!("└──────────────────────────────────────────────────────────────────┘");
        println!();
    }

    // The scripted dig phase must have broken ground and the whole
    // session must have kept real-time pace.
    let requirement_met = stats.ticks == SESSION_TICKS && stats.blocks_mined > 0 && ticks_per_sec >= 60.0;

    if requirement_met {
        println!("✅ HEADLESS SESSION PASSED");
        std::process::exit(0);
    }
    println!("❌ HEADLESS SESSION FAILED");
    std::process::exit(1);
}
