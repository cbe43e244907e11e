#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs headless Zen Garden sessions.
//!
//! Each invocation plays a number of combat rounds with a simple placement
//! policy, spends the earned coins tending the garden, reports anything the
//! session unlocked, and persists the profile when a save path is given.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use zen_garden_core::{
    Command, DefenderKind, Event, GardenSlot, Lane, RoundOutcome, RoundPhase, Timestamp, TreeKind,
    GARDEN_SLOT_COUNT, LANE_COUNT, TREE_PLANT_COST,
};
use zen_garden_system_spawning::{Config as SpawnConfig, Spawning};
use zen_garden_world::{self as world, query, World, WorldConfig};

const FRAME_CAP_PER_ROUND: u32 = 120_000;

#[derive(Debug, Parser)]
#[command(name = "zen-garden", about = "Headless Zen Garden session runner")]
struct Args {
    /// Seed for spawn pacing and garden choices; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of combat rounds to play before tending the garden.
    #[arg(long, default_value_t = 1)]
    rounds: u32,
    /// Simulated milliseconds per frame.
    #[arg(long, default_value_t = 100)]
    frame_ms: u64,
    /// Save file for the economy profile.
    #[arg(long)]
    save: Option<PathBuf>,
    /// User identifier used for certificate storage keys.
    #[arg(long, default_value = "local-player")]
    user_id: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("session seed {seed}");

    let profile = match &args.save {
        Some(path) => zen_garden_persistence::load_profile(path)
            .with_context(|| format!("loading profile from {}", path.display()))?
            .unwrap_or_default(),
        None => Default::default(),
    };
    let epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0);
    let mut world = World::with_config(WorldConfig {
        profile,
        epoch: Timestamp::from_millis(epoch),
        certificate_seed: seed,
    });
    let certificates_before = query::profile_snapshot(&world).certificates.len();

    let mut spawning = Spawning::new(SpawnConfig::new(seed));
    let mut policy_rng = ChaCha8Rng::seed_from_u64(seed);
    let frame = Duration::from_millis(args.frame_ms.max(1));

    for round in 1..=args.rounds {
        let outcome = run_round(&mut world, &mut spawning, frame, &mut policy_rng);
        let banner = match outcome {
            Some(RoundOutcome::Victory) => "victory",
            Some(RoundOutcome::Defeat) => "defeat",
            None => "abandoned",
        };
        let profile = query::profile_snapshot(&world);
        println!(
            "round {round}/{}: {banner} (coins {}, high score {})",
            args.rounds, profile.coins, profile.high_score
        );
    }

    tend_garden(&mut world, &mut policy_rng);
    report_session(&world, &args.user_id, certificates_before);

    if let Some(path) = &args.save {
        let snapshot = query::profile_snapshot(&world);
        zen_garden_persistence::save_profile(path, &snapshot)
            .with_context(|| format!("saving profile to {}", path.display()))?;
        println!("profile saved to {}", path.display());
    }
    Ok(())
}

/// Plays one round to its terminal transition, returning the outcome.
fn run_round(
    world: &mut World,
    spawning: &mut Spawning,
    frame: Duration,
    rng: &mut ChaCha8Rng,
) -> Option<RoundOutcome> {
    let mut events = Vec::new();
    world::apply(world, Command::StartRound, &mut events);
    let mut pending: Vec<Command> = Vec::new();
    let status = query::round_status(world);
    spawning.handle(&events, status.as_ref(), &mut pending);

    let mut outcome = None;
    for _ in 0..FRAME_CAP_PER_ROUND {
        let mut events = Vec::new();
        for command in pending.drain(..).collect::<Vec<_>>() {
            world::apply(world, command, &mut events);
        }
        for command in placement_commands(world, rng) {
            world::apply(world, command, &mut events);
        }
        world::apply(world, Command::Tick { dt: frame }, &mut events);
        let status = query::round_status(world);
        spawning.handle(&events, status.as_ref(), &mut pending);

        for event in &events {
            if let Event::RoundEnded {
                outcome: ended, ..
            } = event
            {
                outcome = Some(*ended);
            }
        }
        if outcome.is_some() {
            break;
        }
    }

    let mut events = Vec::new();
    world::apply(world, Command::EndRound, &mut events);
    outcome
}

/// Greedy per-frame placement: a couple of sunflowers for income, then a
/// shooter for every lane that has enemies and no gun yet.
fn placement_commands(world: &World, rng: &mut ChaCha8Rng) -> Vec<Command> {
    let Some(status) = query::round_status(world) else {
        return Vec::new();
    };
    if status.phase != RoundPhase::Playing {
        return Vec::new();
    }

    let defenders = query::defender_view(world);
    let sunflowers = defenders
        .iter()
        .filter(|defender| defender.kind == DefenderKind::Sunflower)
        .count();

    let (kind, lane) = if sunflowers < 2 {
        (
            DefenderKind::Sunflower,
            Lane::new(rng.gen_range(0..LANE_COUNT)),
        )
    } else {
        let enemies = query::enemy_view(world);
        let ungunned = enemies.iter().map(|enemy| enemy.lane).find(|lane| {
            !defenders
                .iter()
                .any(|defender| defender.kind == DefenderKind::Shooter && defender.lane == *lane)
        });
        match ungunned {
            Some(lane) => (DefenderKind::Shooter, lane),
            None => return Vec::new(),
        }
    };

    if status.sun < kind.cost() {
        return Vec::new();
    }
    let occupied = defenders
        .iter()
        .filter(|defender| defender.lane == lane)
        .count();
    let x = 100.0 + 70.0 * occupied as f32;
    vec![
        Command::SelectDefender {
            selection: Some(kind),
        },
        Command::PlaceDefender { lane, x },
    ]
}

/// Spends every affordable coin on planting, then on the cheapest upgrades.
fn tend_garden(world: &mut World, rng: &mut ChaCha8Rng) {
    loop {
        let snapshot = query::profile_snapshot(world);
        let garden = query::garden_view(world);

        let empty_slot = (0..GARDEN_SLOT_COUNT)
            .map(GardenSlot::new)
            .find(|slot| !garden.iter().any(|tree| tree.slot == *slot));
        if let Some(slot) = empty_slot {
            if snapshot.coins >= u64::from(TREE_PLANT_COST) {
                let kind = TreeKind::ALL[rng.gen_range(0..TreeKind::ALL.len())];
                let mut events = Vec::new();
                world::apply(world, Command::PlantTree { slot, kind }, &mut events);
                continue;
            }
            break;
        }

        let upgrade = garden
            .iter()
            .filter_map(|tree| {
                tree.level
                    .next()
                    .map(|next| (tree.id, u64::from(next.threshold() - tree.points)))
            })
            .min_by_key(|(_, cost)| *cost);
        match upgrade {
            Some((tree, cost)) if snapshot.coins >= cost => {
                let mut events = Vec::new();
                world::apply(world, Command::UpgradeTree { tree }, &mut events);
            }
            _ => break,
        }
    }
}

/// Prints what the session unlocked, including planned certificate uploads.
fn report_session(world: &World, user_id: &str, certificates_before: usize) {
    let profile = query::profile_snapshot(world);
    let garden = query::garden_view(world);
    let earned = profile.badges.iter().filter(|badge| badge.earned()).count();
    println!(
        "garden: {} trees | badges: {earned}/{} | lifetime points: {}",
        garden.len(),
        profile.badges.len(),
        profile.total_points
    );

    // Uploads are fire-and-forget against the external relay; here we only
    // report where each new certificate would land.
    for certificate in profile.certificates.iter().skip(certificates_before) {
        let definition = certificate.kind.definition();
        let request = zen_garden_relay::upload_request(user_id, &certificate.number);
        println!(
            "new certificate: {} ({}) -> {}",
            definition.name,
            certificate.number,
            zen_garden_relay::object_key(&request.user_id, &certificate.number)
        );
    }
}
