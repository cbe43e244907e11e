#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Zen Garden.
//!
//! The world owns the persistent economy profile and the ephemeral combat
//! round. Adapters and systems never mutate either directly: they submit
//! [`Command`] values through [`apply`], which executes each command
//! atomically and appends the resulting [`Event`] values for systems to
//! consume. Read access goes through the [`query`] module, which hands out
//! immutable snapshots.

use zen_garden_core::{Command, Event, ProfileSnapshot, Timestamp};

mod combat;
mod garden;
mod profile;
mod rewards;

use combat::Round;
use profile::{CertificateMint, Profile};

const CERTIFICATE_MINT_SEED: u64 = 0x7a3d_91b4_5c66_20e9;

/// Construction parameters for a [`World`].
#[derive(Clone, Debug)]
pub struct WorldConfig {
    /// Economy profile to restore, typically loaded from a save file.
    pub profile: ProfileSnapshot,
    /// Wall-clock moment the session began, in milliseconds.
    pub epoch: Timestamp,
    /// Seed for the certificate number generator.
    pub certificate_seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            profile: ProfileSnapshot::default(),
            epoch: Timestamp::from_millis(0),
            certificate_seed: CERTIFICATE_MINT_SEED,
        }
    }
}

/// Represents the authoritative Zen Garden state.
#[derive(Debug)]
pub struct World {
    profile: Profile,
    round: Option<Round>,
    clock: Timestamp,
    mint: CertificateMint,
}

impl World {
    /// Creates a new world with a fresh profile.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a world from an explicit configuration.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            profile: Profile::from_snapshot(config.profile),
            round: None,
            clock: config.epoch,
            mint: CertificateMint::new(config.certificate_seed),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartRound => {
            world.profile.record_round_start(world.clock, out_events);
            world.round = Some(Round::new());
            out_events.push(Event::RoundStarted { wave: 1 });
            out_events.push(Event::WaveStarted { wave: 1 });
        }
        Command::EndRound => {
            // Round state is discarded wholesale; the profile alone persists.
            world.round = None;
        }
        Command::PauseRound => {
            if let Some(round) = world.round.as_mut() {
                round.pause();
            }
        }
        Command::ResumeRound => {
            if let Some(round) = world.round.as_mut() {
                round.resume();
            }
        }
        Command::Tick { dt } => {
            world.clock = world.clock.advanced_by(dt);
            if let Some(round) = world.round.as_mut() {
                if round.is_playing() {
                    out_events.push(Event::TimeAdvanced { dt });
                    if let Some(outcome) = combat::advance(round, dt, out_events) {
                        rewards::settle(
                            &mut world.profile,
                            round,
                            outcome,
                            world.clock,
                            &mut world.mint,
                            out_events,
                        );
                    }
                }
            }
        }
        Command::SelectDefender { selection } => {
            if let Some(round) = world.round.as_mut() {
                round.select(selection);
            }
        }
        Command::PlaceDefender { lane, x } => {
            if let Some(round) = world.round.as_mut() {
                combat::place_defender(round, lane, x, out_events);
            } else {
                out_events.push(Event::DefenderRejected {
                    kind: None,
                    lane,
                    reason: zen_garden_core::PlacementError::InvalidPhase,
                });
            }
        }
        Command::SpawnEnemy { kind, lane } => {
            if let Some(round) = world.round.as_mut() {
                if round.is_playing() {
                    let enemy = round.spawn_enemy(kind, lane);
                    out_events.push(Event::EnemySpawned { enemy, kind, lane });
                }
            }
        }
        Command::AdvanceWave => {
            if let Some(round) = world.round.as_mut() {
                if round.can_advance_wave() {
                    let wave = round.advance_wave();
                    out_events.push(Event::WaveStarted { wave });
                }
            }
        }
        Command::PlantTree { slot, kind } => {
            garden::plant(
                &mut world.profile,
                slot,
                kind,
                world.clock,
                &mut world.mint,
                out_events,
            );
        }
        Command::UpgradeTree { tree } => {
            garden::upgrade(
                &mut world.profile,
                tree,
                world.clock,
                &mut world.mint,
                out_events,
            );
        }
        Command::Donate { amount } => {
            world.profile.add_points(
                u64::from(amount),
                world.clock,
                &mut world.mint,
                out_events,
            );
            out_events.push(Event::DonationRecorded { amount });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use zen_garden_core::{
        DefenderView, EnemyView, GardenView, ProfileSnapshot, ProjectileView, RoundStatus,
        Timestamp,
    };

    /// Aggregate status of the active round, if one exists.
    #[must_use]
    pub fn round_status(world: &World) -> Option<RoundStatus> {
        world.round.as_ref().map(super::Round::status)
    }

    /// Captures a read-only view of the enemies on the field.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        world
            .round
            .as_ref()
            .map(|round| EnemyView::from_snapshots(round.enemy_snapshots()))
            .unwrap_or_default()
    }

    /// Captures a read-only view of the placed defenders.
    #[must_use]
    pub fn defender_view(world: &World) -> DefenderView {
        world
            .round
            .as_ref()
            .map(|round| DefenderView::from_snapshots(round.defender_snapshots()))
            .unwrap_or_default()
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        world
            .round
            .as_ref()
            .map(|round| ProjectileView::from_snapshots(round.projectile_snapshots()))
            .unwrap_or_default()
    }

    /// Captures a read-only view of the planted garden.
    #[must_use]
    pub fn garden_view(world: &World) -> GardenView {
        GardenView::from_snapshots(
            world
                .profile
                .trees()
                .iter()
                .map(super::profile::Tree::snapshot)
                .collect(),
        )
    }

    /// Serializable image of the persistent profile, suitable for saving.
    #[must_use]
    pub fn profile_snapshot(world: &World) -> ProfileSnapshot {
        world.profile.snapshot()
    }

    /// Current session clock.
    #[must_use]
    pub fn clock(world: &World) -> Timestamp {
        world.clock
    }
}
