#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave-director system that paces enemy spawns.
//!
//! The system consumes world events plus the round status snapshot and emits
//! [`Command::SpawnEnemy`] on the wave's cadence and [`Command::AdvanceWave`]
//! once a cleared wave has stayed quiet long enough. It never touches the
//! world directly.

use std::time::Duration;

use zen_garden_core::{Command, EnemyKind, Event, Lane, RoundPhase, RoundStatus, FINAL_WAVE, LANE_COUNT};

const BASE_WAVE_QUOTA: u32 = 5;
const QUOTA_PER_WAVE: u32 = 2;
const SPAWN_INTERVAL_BASE_MS: u64 = 2500;
const SPAWN_INTERVAL_STEP_MS: u64 = 150;
const SPAWN_INTERVAL_FLOOR_MS: u64 = 1000;
const WAVE_QUIET_GAP: Duration = Duration::from_millis(3000);
const BOSS_UNLOCK_WAVE: u32 = 5;

/// Spawnable kinds before the boss unlocks, in unlock order.
const BASE_POOL: [EnemyKind; 4] = [
    EnemyKind::Smoke,
    EnemyKind::Trash,
    EnemyKind::Oil,
    EnemyKind::Fire,
];

/// Number of enemies a wave emits before it can be cleared.
#[must_use]
pub fn wave_quota(wave: u32) -> u32 {
    BASE_WAVE_QUOTA + QUOTA_PER_WAVE * wave
}

/// Delay between consecutive spawns within a wave; shrinks as waves climb.
#[must_use]
pub fn spawn_interval(wave: u32) -> Duration {
    let millis = SPAWN_INTERVAL_BASE_MS
        .saturating_sub(SPAWN_INTERVAL_STEP_MS.saturating_mul(u64::from(wave)))
        .max(SPAWN_INTERVAL_FLOOR_MS);
    Duration::from_millis(millis)
}

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that deterministically paces spawns and wave advancement.
#[derive(Debug)]
pub struct Spawning {
    rng: SplitMix64,
    spawned_in_wave: u32,
    spawn_accumulator: Duration,
    quiet_accumulator: Duration,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: SplitMix64::new(config.rng_seed),
            spawned_in_wave: 0,
            spawn_accumulator: Duration::ZERO,
            quiet_accumulator: Duration::ZERO,
        }
    }

    /// Consumes events and the round status to emit spawn commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        round: Option<&RoundStatus>,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if matches!(event, Event::WaveStarted { .. }) {
                self.reset_wave_progress();
            }
        }

        let Some(status) = round else {
            return;
        };
        if status.phase != RoundPhase::Playing {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }
        if accumulated.is_zero() {
            return;
        }

        if self.spawned_in_wave < wave_quota(status.wave) {
            self.spawn_accumulator = self.spawn_accumulator.saturating_add(accumulated);
            if self.spawn_accumulator > spawn_interval(status.wave) {
                let kind = self.select_kind(status.wave);
                let lane = self.select_lane();
                out.push(Command::SpawnEnemy { kind, lane });
                self.spawned_in_wave += 1;
                self.spawn_accumulator = Duration::ZERO;
            }
            return;
        }

        // Quota exhausted: a cleared field must stay quiet for the full gap
        // before the next wave opens. Wave ten never advances.
        if status.enemy_count == 0 && status.wave < FINAL_WAVE {
            self.quiet_accumulator = self.quiet_accumulator.saturating_add(accumulated);
            if self.quiet_accumulator > WAVE_QUIET_GAP {
                out.push(Command::AdvanceWave);
                self.quiet_accumulator = Duration::ZERO;
            }
        }
    }

    fn reset_wave_progress(&mut self) {
        self.spawned_in_wave = 0;
        self.spawn_accumulator = Duration::ZERO;
        self.quiet_accumulator = Duration::ZERO;
    }

    fn select_kind(&mut self, wave: u32) -> EnemyKind {
        let mut pool: Vec<EnemyKind> = BASE_POOL.to_vec();
        if wave >= BOSS_UNLOCK_WAVE {
            pool.push(EnemyKind::Boss);
        }
        // The eligible prefix of the pool widens one kind per wave.
        let eligible = pool.len().min(wave.max(1) as usize);
        let index = (self.rng.next_u64() % eligible as u64) as usize;
        pool[index]
    }

    fn select_lane(&mut self) -> Lane {
        Lane::new((self.rng.next_u64() % u64::from(LANE_COUNT)) as u8)
    }
}

#[derive(Debug)]
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9e37_79b9_7f4a_7c15 } else { seed };
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}
