#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Zen Garden engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! Alongside the messages live the fixed catalogs that tune the experience:
//! enemy and defender stat tables, the tree growth thresholds, and the badge
//! and certificate definitions shared by the combat round and the garden.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Number of horizontal lanes enemies travel along toward the base.
pub const LANE_COUNT: u8 = 5;

/// Number of plantable cells in the 3x3 garden grid.
pub const GARDEN_SLOT_COUNT: u8 = 9;

/// Sun balance granted at the start of every round.
pub const STARTING_SUN: u32 = 150;

/// Base health granted at the start of every round.
pub const STARTING_HEALTH: u32 = 100;

/// Horizontal position newly spawned enemies enter the field at.
pub const ENEMY_SPAWN_X: f32 = 800.0;

/// Horizontal threshold at which an enemy breaches the defended base.
pub const BASE_LINE_X: f32 = 50.0;

/// Horizontal bound beyond which projectiles leave the playfield.
pub const FIELD_EXIT_X: f32 = 850.0;

/// Maximum distance at which a projectile connects with an enemy.
pub const HIT_RADIUS: f32 = 30.0;

/// Minimum horizontal clearance between two defenders in the same lane.
pub const DEFENDER_SPACING: f32 = 60.0;

/// Distance ahead of a defender at which its projectiles materialize.
pub const PROJECTILE_MUZZLE_OFFSET: f32 = 30.0;

/// Per-millisecond scale applied to enemy movement speed.
pub const ENEMY_SPEED_SCALE: f32 = 0.05;

/// Per-millisecond scale applied to projectile movement speed.
pub const PROJECTILE_SPEED_SCALE: f32 = 0.1;

/// Travel speed shared by every projectile kind.
pub const PROJECTILE_SPEED: f32 = 5.0;

/// Base damage inflicted by each enemy that breaches the base line.
pub const BREACH_DAMAGE: u32 = 10;

/// Score forfeited for each enemy that breaches the base line.
pub const BREACH_SCORE_PENALTY: u32 = 10;

/// Score credited when a wave is cleared and the next one begins.
pub const WAVE_CLEAR_BONUS: u32 = 50;

/// Final wave of a round; no further waves spawn past it.
pub const FINAL_WAVE: u32 = 10;

/// Coin price of planting a new tree, equal to the level-1 threshold.
pub const TREE_PLANT_COST: u32 = 300;

/// Sun granted by a sunflower each time its cooldown elapses.
pub const SUNFLOWER_HARVEST: u32 = 25;

/// Lifetime point total that earns the eco-warrior certificate.
pub const ECO_WARRIOR_POINTS: u64 = 10_000;

/// Consecutive-day streak that earns the zen-streak badge.
pub const STREAK_BADGE_TARGET: u32 = 7;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Begins a fresh combat round, discarding any previous round state.
    StartRound,
    /// Discards the current round and returns ownership to the garden.
    EndRound,
    /// Suspends simulation advancement for the active round.
    PauseRound,
    /// Resumes a previously paused round.
    ResumeRound,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Updates the pending defender placement choice.
    SelectDefender {
        /// Defender kind to stage for placement, or `None` to clear it.
        selection: Option<DefenderKind>,
    },
    /// Requests placement of the selected defender at a field position.
    PlaceDefender {
        /// Lane the defender should occupy.
        lane: Lane,
        /// Horizontal position within the lane.
        x: f32,
    },
    /// Requests that a new enemy enter the field.
    SpawnEnemy {
        /// Kind of enemy to spawn.
        kind: EnemyKind,
        /// Lane the enemy should travel along.
        lane: Lane,
    },
    /// Requests advancement to the next wave once the field is clear.
    AdvanceWave,
    /// Requests planting a tree in an empty garden slot.
    PlantTree {
        /// Garden slot the tree should occupy.
        slot: GardenSlot,
        /// Cosmetic appearance assigned to the tree.
        kind: TreeKind,
    },
    /// Requests upgrading an existing tree to its next level.
    UpgradeTree {
        /// Identifier of the tree to upgrade.
        tree: TreeId,
    },
    /// Records a donation that credits lifetime points and coins.
    Donate {
        /// Amount of points and coins to credit.
        amount: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced for an active round.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a fresh round began.
    RoundStarted {
        /// Wave number the round opens on.
        wave: u32,
    },
    /// Announces that a wave began, including the first wave of a round.
    WaveStarted {
        /// Wave number that became active.
        wave: u32,
    },
    /// Confirms that an enemy entered the field.
    EnemySpawned {
        /// Identifier assigned to the enemy by the world.
        enemy: EnemyId,
        /// Kind of enemy that spawned.
        kind: EnemyKind,
        /// Lane the enemy travels along.
        lane: Lane,
    },
    /// Reports that an enemy crossed the base line and was removed.
    EnemyBreached {
        /// Identifier of the enemy that breached.
        enemy: EnemyId,
    },
    /// Reports that an enemy was destroyed by projectile damage.
    EnemyFelled {
        /// Identifier of the felled enemy.
        enemy: EnemyId,
        /// Kind of the felled enemy.
        kind: EnemyKind,
        /// Score credited for the kill.
        points: u32,
    },
    /// Confirms that a defender fired a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Defender that fired it.
        defender: DefenderId,
        /// Lane the projectile travels along.
        lane: Lane,
    },
    /// Confirms that a sunflower harvested sun.
    SunHarvested {
        /// Defender that produced the sun.
        defender: DefenderId,
        /// Amount of sun credited.
        amount: u32,
    },
    /// Confirms that a defender was placed into the field.
    DefenderPlaced {
        /// Identifier assigned to the defender by the world.
        defender: DefenderId,
        /// Kind of defender that was placed.
        kind: DefenderKind,
        /// Lane the defender occupies.
        lane: Lane,
        /// Horizontal position within the lane.
        x: f32,
    },
    /// Reports that a defender placement request was rejected.
    DefenderRejected {
        /// Kind staged for placement, if any selection existed.
        kind: Option<DefenderKind>,
        /// Lane provided in the placement request.
        lane: Lane,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Announces that the round reached a terminal outcome.
    RoundEnded {
        /// Whether the round ended in victory or defeat.
        outcome: RoundOutcome,
        /// Final score at the moment of termination.
        score: u32,
        /// Wave the round terminated on.
        wave: u32,
    },
    /// Confirms that the round's reward settled into the profile.
    RewardGranted {
        /// Score converted into points and coins.
        score: u32,
        /// Lifetime point total after the grant.
        total_points: u64,
        /// Coin balance after the grant.
        coins: u64,
        /// High score after the grant.
        high_score: u32,
    },
    /// Confirms that a badge flipped to earned.
    BadgeEarned {
        /// Badge that was earned.
        badge: BadgeId,
    },
    /// Confirms that a certificate was issued.
    CertificateIssued {
        /// Kind of certificate issued.
        kind: CertificateKind,
        /// Number stamped onto the certificate.
        number: CertificateNumber,
    },
    /// Confirms that a tree was planted.
    TreePlanted {
        /// Identifier assigned to the tree by the world.
        tree: TreeId,
        /// Slot the tree occupies.
        slot: GardenSlot,
        /// Cosmetic appearance assigned to the tree.
        kind: TreeKind,
    },
    /// Reports that a planting request was rejected.
    TreePlantRejected {
        /// Slot provided in the planting request.
        slot: GardenSlot,
        /// Specific reason the planting failed.
        reason: PlantError,
    },
    /// Confirms that a tree advanced one level.
    TreeUpgraded {
        /// Identifier of the upgraded tree.
        tree: TreeId,
        /// Level the tree reached.
        level: TreeLevel,
    },
    /// Reports that an upgrade request was rejected.
    TreeUpgradeRejected {
        /// Identifier provided in the upgrade request.
        tree: TreeId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a donation credited points and coins.
    DonationRecorded {
        /// Amount credited.
        amount: u32,
    },
}

/// Unique identifier assigned to an enemy within a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a defender within a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefenderId(u32);

impl DefenderId {
    /// Creates a new defender identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile within a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a planted tree.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TreeId(u32);

impl TreeId {
    /// Creates a new tree identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// One of the five horizontal tracks enemies travel along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lane(u8);

impl Lane {
    /// Creates a new lane index wrapper.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the zero-based lane index.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// One cell of the 3x3 garden grid, indexed 0 through 8.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GardenSlot(u8);

impl GardenSlot {
    /// Creates a new garden slot wrapper.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the zero-based slot index.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Reports whether the slot lies within the 3x3 grid.
    #[must_use]
    pub const fn in_bounds(&self) -> bool {
        self.0 < GARDEN_SLOT_COUNT
    }
}

/// Milliseconds elapsed since the session epoch.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

impl Timestamp {
    /// Creates a timestamp from a millisecond count.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Retrieves the millisecond count.
    #[must_use]
    pub const fn millis(&self) -> u64 {
        self.0
    }

    /// Returns the timestamp advanced by the provided duration.
    #[must_use]
    pub fn advanced_by(self, dt: Duration) -> Self {
        Self(self.0.saturating_add(dt.as_millis() as u64))
    }

    /// Returns the calendar day this timestamp falls on.
    #[must_use]
    pub const fn day(&self) -> DayStamp {
        DayStamp((self.0 / MILLIS_PER_DAY) as u32)
    }
}

/// Whole days elapsed since the session epoch, used for streak tracking.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct DayStamp(u32);

impl DayStamp {
    /// Creates a day stamp from a day count.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the day count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether `other` is the calendar day immediately before this one.
    #[must_use]
    pub const fn follows(&self, other: DayStamp) -> bool {
        match other.0.checked_add(1) {
            Some(next) => self.0 == next,
            None => false,
        }
    }
}

/// Kinds of pollution enemies that assault the garden.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fast, fragile smog cloud.
    Smoke,
    /// Slow drifting litter pile.
    Trash,
    /// Durable oil slick.
    Oil,
    /// Fast-burning blaze.
    Fire,
    /// Massive pollution boss, unlocked from wave five.
    Boss,
}

impl EnemyKind {
    /// Starting health for this enemy kind.
    #[must_use]
    pub const fn health(self) -> u32 {
        match self {
            Self::Smoke => 20,
            Self::Trash => 30,
            Self::Oil => 50,
            Self::Fire => 40,
            Self::Boss => 150,
        }
    }

    /// Movement speed for this enemy kind, in field units per scaled tick.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Smoke => 1.2,
            Self::Trash => 0.8,
            Self::Oil => 0.6,
            Self::Fire => 1.5,
            Self::Boss => 0.4,
        }
    }

    /// Score credited when this enemy kind is destroyed.
    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            Self::Smoke => 5,
            Self::Trash => 8,
            Self::Oil => 12,
            Self::Fire => 10,
            Self::Boss => 50,
        }
    }
}

/// Kinds of defenders a player can place into the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefenderKind {
    /// Generates sun on a slow cadence.
    Sunflower,
    /// Fires leaf projectiles at enemies in its lane.
    Shooter,
    /// Cheap passive obstacle.
    Wall,
    /// Fires ice projectiles at enemies in its lane.
    Freeze,
    /// Expensive passive obstacle.
    Bomb,
}

/// What a defender does when its cooldown elapses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DefenderRole {
    /// Credits sun and restarts the cooldown unconditionally.
    Harvest,
    /// Fires at the first eligible enemy in the lane, retrying otherwise.
    Shoot,
    /// Takes no action after placement.
    Block,
}

impl DefenderKind {
    /// Sun cost of placing this defender kind.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Sunflower => 50,
            Self::Shooter => 100,
            Self::Wall => 75,
            Self::Freeze => 150,
            Self::Bomb => 200,
        }
    }

    /// Projectile damage dealt by this defender kind.
    #[must_use]
    pub const fn damage(self) -> u32 {
        match self {
            Self::Shooter => 10,
            Self::Freeze => 5,
            Self::Sunflower | Self::Wall | Self::Bomb => 0,
        }
    }

    /// Delay between consecutive actions for this defender kind.
    #[must_use]
    pub const fn cooldown(self) -> Duration {
        match self {
            Self::Sunflower => Duration::from_millis(5000),
            Self::Shooter => Duration::from_millis(1500),
            Self::Freeze => Duration::from_millis(2000),
            Self::Wall | Self::Bomb => Duration::ZERO,
        }
    }

    /// Behavior this defender kind performs when its cooldown elapses.
    #[must_use]
    pub const fn role(self) -> DefenderRole {
        match self {
            Self::Sunflower => DefenderRole::Harvest,
            Self::Shooter | Self::Freeze => DefenderRole::Shoot,
            Self::Wall | Self::Bomb => DefenderRole::Block,
        }
    }

    /// Projectile kind fired by this defender, if it shoots at all.
    #[must_use]
    pub const fn projectile_kind(self) -> Option<ProjectileKind> {
        match self {
            Self::Shooter => Some(ProjectileKind::Leaf),
            Self::Freeze => Some(ProjectileKind::Ice),
            Self::Sunflower | Self::Wall | Self::Bomb => None,
        }
    }
}

/// Visual family of a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    /// Standard leaf shot fired by shooters.
    Leaf,
    /// Chilling shot fired by freeze defenders.
    Ice,
}

/// Cosmetic species assigned to a planted tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeKind {
    /// Broad-canopied oak.
    Oak,
    /// Blossoming cherry.
    Cherry,
    /// Evergreen pine.
    Pine,
    /// Autumn maple.
    Maple,
    /// Drooping willow.
    Willow,
    /// Towering redwood.
    Redwood,
}

impl TreeKind {
    /// Every plantable species, in catalog order.
    pub const ALL: [TreeKind; 6] = [
        Self::Oak,
        Self::Cherry,
        Self::Pine,
        Self::Maple,
        Self::Willow,
        Self::Redwood,
    ];
}

/// Growth stage of a tree, from seedling (1) to ancient (6).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TreeLevel(u8);

/// Cumulative point investment required to hold each level, indexed by
/// level minus one.
const TREE_LEVEL_THRESHOLDS: [u32; 6] = [300, 400, 450, 500, 600, 800];

impl TreeLevel {
    /// First growth stage, reached at planting.
    pub const MIN: TreeLevel = TreeLevel(1);

    /// Terminal growth stage; no further upgrades apply.
    pub const MAX: TreeLevel = TreeLevel(6);

    /// Creates a level wrapper without validation.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric level.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Largest level whose threshold the provided points satisfy.
    #[must_use]
    pub fn for_points(points: u32) -> Self {
        let mut level = 0u8;
        for threshold in TREE_LEVEL_THRESHOLDS {
            if points >= threshold {
                level += 1;
            }
        }
        Self(level.max(1))
    }

    /// Cumulative points required to hold this level.
    #[must_use]
    pub const fn threshold(&self) -> u32 {
        TREE_LEVEL_THRESHOLDS[(self.0 - 1) as usize]
    }

    /// The level after this one, or `None` at the terminal stage.
    #[must_use]
    pub const fn next(&self) -> Option<TreeLevel> {
        if self.0 >= Self::MAX.0 {
            None
        } else {
            Some(TreeLevel(self.0 + 1))
        }
    }

    /// Reports whether the tree can grow no further.
    #[must_use]
    pub const fn is_max(&self) -> bool {
        self.0 >= Self::MAX.0
    }
}

/// Achievement badges tracked on the profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BadgeId {
    /// Plant your first tree.
    FirstTree,
    /// Score 500 in one round.
    EcoDefender,
    /// Reach wave five.
    ForestGuardian,
    /// Play seven days in a row.
    ZenStreak,
    /// Grow a tree to level six.
    MaxTree,
    /// Fill the entire garden.
    FullGarden,
    /// Win a round without taking damage.
    PerfectRun,
    /// Destroy a pollution boss.
    BossSlayer,
}

/// Display metadata for a badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BadgeDefinition {
    /// Badge the metadata describes.
    pub badge: BadgeId,
    /// Short display name.
    pub name: &'static str,
    /// One-line earning condition.
    pub description: &'static str,
    /// Emoji shown next to the badge.
    pub emoji: &'static str,
}

impl BadgeId {
    /// Every badge in catalog order.
    pub const ALL: [BadgeId; 8] = [
        Self::FirstTree,
        Self::EcoDefender,
        Self::ForestGuardian,
        Self::ZenStreak,
        Self::MaxTree,
        Self::FullGarden,
        Self::PerfectRun,
        Self::BossSlayer,
    ];

    /// Display metadata for this badge.
    #[must_use]
    pub const fn definition(self) -> BadgeDefinition {
        match self {
            Self::FirstTree => BadgeDefinition {
                badge: self,
                name: "First Seed",
                description: "Plant your first tree",
                emoji: "\u{1f331}",
            },
            Self::EcoDefender => BadgeDefinition {
                badge: self,
                name: "Eco Defender",
                description: "Score 500 in one game",
                emoji: "\u{1f6e1}\u{fe0f}",
            },
            Self::ForestGuardian => BadgeDefinition {
                badge: self,
                name: "Forest Guardian",
                description: "Beat level 5",
                emoji: "\u{1f3c6}",
            },
            Self::ZenStreak => BadgeDefinition {
                badge: self,
                name: "Zen Streak",
                description: "Play 7 days in a row",
                emoji: "\u{1f525}",
            },
            Self::MaxTree => BadgeDefinition {
                badge: self,
                name: "Ancient Wisdom",
                description: "Grow a tree to level 6",
                emoji: "\u{1f332}",
            },
            Self::FullGarden => BadgeDefinition {
                badge: self,
                name: "Garden Master",
                description: "Fill your entire garden",
                emoji: "\u{1f3e1}",
            },
            Self::PerfectRun => BadgeDefinition {
                badge: self,
                name: "Perfect Defense",
                description: "Complete a round without damage",
                emoji: "\u{2b50}",
            },
            Self::BossSlayer => BadgeDefinition {
                badge: self,
                name: "Boss Slayer",
                description: "Defeat a pollution boss",
                emoji: "\u{1f451}",
            },
        }
    }
}

/// Earned state of one badge on the profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeProgress {
    /// Badge the progress entry tracks.
    pub badge: BadgeId,
    /// Moment the badge was earned, if it has been.
    pub earned_at: Option<Timestamp>,
}

impl BadgeProgress {
    /// Reports whether the badge has been earned.
    #[must_use]
    pub const fn earned(&self) -> bool {
        self.earned_at.is_some()
    }
}

/// Kinds of one-per-profile achievement certificates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CertificateKind {
    /// Full garden with every tree at the terminal level.
    MasterGardener,
    /// First garden with all nine slots planted.
    FirstGarden,
    /// Ten thousand lifetime points.
    EcoWarrior,
}

/// Broad classification printed on a certificate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CertificateClass {
    /// Highest-tier accomplishment.
    Mastery,
    /// Completion of a long-running goal.
    Completion,
    /// Notable one-off achievement.
    Achievement,
}

/// Display metadata for a certificate kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CertificateDefinition {
    /// Kind the metadata describes.
    pub kind: CertificateKind,
    /// Full display title.
    pub name: &'static str,
    /// Sentence describing the accomplishment.
    pub description: &'static str,
    /// Emoji shown next to the certificate.
    pub emoji: &'static str,
    /// Broad classification of the accomplishment.
    pub class: CertificateClass,
}

impl CertificateKind {
    /// Every certificate kind in catalog order.
    pub const ALL: [CertificateKind; 3] =
        [Self::MasterGardener, Self::FirstGarden, Self::EcoWarrior];

    /// Display metadata for this certificate kind.
    #[must_use]
    pub const fn definition(self) -> CertificateDefinition {
        match self {
            Self::MasterGardener => CertificateDefinition {
                kind: self,
                name: "Master Gardener Certificate",
                description:
                    "Successfully completed a full Zen Garden with all trees at maximum level",
                emoji: "\u{1f3c6}",
                class: CertificateClass::Mastery,
            },
            Self::FirstGarden => CertificateDefinition {
                kind: self,
                name: "Garden Completion Certificate",
                description: "Planted your first complete garden with all 9 trees",
                emoji: "\u{1f338}",
                class: CertificateClass::Completion,
            },
            Self::EcoWarrior => CertificateDefinition {
                kind: self,
                name: "Eco Warrior Certificate",
                description: "Reached 10,000 total points in environmental impact",
                emoji: "\u{2694}\u{fe0f}",
                class: CertificateClass::Achievement,
            },
        }
    }
}

/// Globally unique (best-effort) number stamped onto a certificate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificateNumber(String);

impl CertificateNumber {
    /// Wraps an already-formatted certificate number.
    #[must_use]
    pub const fn new(text: String) -> Self {
        Self(text)
    }

    /// Retrieves the formatted number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CertificateNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One issued certificate held on the profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Kind of the certificate.
    pub kind: CertificateKind,
    /// Moment the certificate was issued.
    pub earned_at: Timestamp,
    /// Number stamped onto the certificate.
    pub number: CertificateNumber,
    /// Public URL in external storage, populated only after a successful
    /// upload and never required for correctness.
    pub storage_url: Option<String>,
}

/// Whether a round terminated in triumph or collapse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// Wave ten was cleared with the base intact.
    Victory,
    /// Base health reached zero.
    Defeat,
}

/// Lifecycle phase of an active round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    /// Simulation ticks apply.
    Playing,
    /// Simulation is suspended; elapsed time is discarded.
    Paused,
    /// The round reached a terminal outcome and is frozen.
    Ended(RoundOutcome),
}

/// Reasons a defender placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// No round is accepting placements right now.
    InvalidPhase,
    /// No defender kind is currently selected.
    NoSelection,
    /// The selected kind costs more sun than is available.
    InsufficientSun,
    /// Another defender in the lane sits within the spacing radius.
    Crowded,
}

/// Reasons a tree planting request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlantError {
    /// The slot index lies outside the 3x3 grid.
    InvalidSlot,
    /// The slot already holds a tree.
    SlotOccupied,
    /// The coin balance is below the planting cost.
    InsufficientCoins,
}

/// Reasons a tree upgrade request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeError {
    /// No tree with the provided identifier exists.
    UnknownTree,
    /// The tree already sits at the terminal level.
    MaxLevel,
    /// The coin balance is below the upgrade cost.
    InsufficientCoins,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier assigned to the enemy by the world.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// Lane the enemy travels along.
    pub lane: Lane,
    /// Current horizontal position.
    pub x: f32,
    /// Remaining health.
    pub health: u32,
    /// Health the enemy spawned with.
    pub max_health: u32,
}

/// Immutable representation of a single defender used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefenderSnapshot {
    /// Identifier assigned to the defender by the world.
    pub id: DefenderId,
    /// Kind of the defender.
    pub kind: DefenderKind,
    /// Lane the defender occupies.
    pub lane: Lane,
    /// Horizontal position, fixed at placement.
    pub x: f32,
    /// Time remaining until the next action.
    pub cooldown: Duration,
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier assigned to the projectile by the world.
    pub id: ProjectileId,
    /// Visual family of the projectile.
    pub kind: ProjectileKind,
    /// Lane the projectile travels along.
    pub lane: Lane,
    /// Current horizontal position.
    pub x: f32,
    /// Damage applied on impact.
    pub damage: u32,
}

/// Immutable representation of a single tree used for queries and saves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    /// Identifier assigned to the tree by the world.
    pub id: TreeId,
    /// Slot the tree occupies.
    pub slot: GardenSlot,
    /// Cosmetic species of the tree.
    pub kind: TreeKind,
    /// Current growth stage.
    pub level: TreeLevel,
    /// Cumulative point investment.
    pub points: u32,
    /// Moment the tree was planted.
    pub planted_at: Timestamp,
}

/// Read-only snapshot describing the enemies on the field.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of live enemies captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing the defenders on the field.
#[derive(Clone, Debug, Default)]
pub struct DefenderView {
    snapshots: Vec<DefenderSnapshot>,
}

impl DefenderView {
    /// Creates a new defender view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<DefenderSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &DefenderSnapshot> {
        self.snapshots.iter()
    }

    /// Number of placed defenders captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no defenders were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<DefenderSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing the projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no projectiles were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing the planted garden.
#[derive(Clone, Debug, Default)]
pub struct GardenView {
    snapshots: Vec<TreeSnapshot>,
}

impl GardenView {
    /// Creates a new garden view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TreeSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TreeSnapshot> {
        self.snapshots.iter()
    }

    /// Number of planted trees captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the garden is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TreeSnapshot> {
        self.snapshots
    }
}

/// Aggregate status of the active round used by systems and adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundStatus {
    /// Lifecycle phase of the round.
    pub phase: RoundPhase,
    /// Wave currently in progress.
    pub wave: u32,
    /// Current score.
    pub score: u32,
    /// Spendable sun balance.
    pub sun: u32,
    /// Remaining base health.
    pub health: u32,
    /// Base health the round started with.
    pub max_health: u32,
    /// Defender kind staged for placement, if any.
    pub selected: Option<DefenderKind>,
    /// Number of enemies currently on the field.
    pub enemy_count: usize,
}

/// Serializable image of the persistent economy profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    /// Lifetime points earned; never decreases.
    pub total_points: u64,
    /// Spendable coin balance.
    pub coins: u64,
    /// Every planted tree.
    pub trees: Vec<TreeSnapshot>,
    /// Earned state for the full badge catalog.
    pub badges: Vec<BadgeProgress>,
    /// Every issued certificate.
    pub certificates: Vec<Certificate>,
    /// Number of rounds ever started.
    pub games_played: u32,
    /// Best final round score.
    pub high_score: u32,
    /// Consecutive-day play streak.
    pub streak: u32,
    /// Day of the most recent round start.
    pub last_played: Option<DayStamp>,
}

impl Default for ProfileSnapshot {
    fn default() -> Self {
        Self {
            total_points: 0,
            coins: 0,
            trees: Vec::new(),
            badges: BadgeId::ALL
                .into_iter()
                .map(|badge| BadgeProgress {
                    badge,
                    earned_at: None,
                })
                .collect(),
            certificates: Vec::new(),
            games_played: 0,
            high_score: 0,
            streak: 0,
            last_played: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tree_level_tracks_threshold_table() {
        let expectations = [
            (0, 1),
            (299, 1),
            (300, 1),
            (399, 1),
            (400, 2),
            (450, 3),
            (500, 4),
            (600, 5),
            (799, 5),
            (800, 6),
            (5000, 6),
        ];
        for (points, level) in expectations {
            assert_eq!(
                TreeLevel::for_points(points),
                TreeLevel::new(level),
                "points {points}"
            );
        }
    }

    #[test]
    fn tree_level_progression_never_skips() {
        let mut previous = TreeLevel::MIN;
        for threshold in [300, 400, 450, 500, 600, 800] {
            let level = TreeLevel::for_points(threshold);
            assert!(level.get() == previous.get() || level.get() == previous.get() + 1);
            previous = level;
        }
        assert_eq!(previous, TreeLevel::MAX);
        assert!(TreeLevel::MAX.next().is_none());
    }

    #[test]
    fn upgrade_costs_follow_threshold_gaps() {
        let level = TreeLevel::for_points(300);
        let next = level.next().expect("level 1 upgrades");
        assert_eq!(next.threshold() - 300, 100);
        assert_eq!(TreeLevel::MAX.threshold(), 800);
    }

    #[test]
    fn boss_is_the_toughest_catalog_entry() {
        for kind in [
            EnemyKind::Smoke,
            EnemyKind::Trash,
            EnemyKind::Oil,
            EnemyKind::Fire,
        ] {
            assert!(kind.health() < EnemyKind::Boss.health());
            assert!(kind.points() < EnemyKind::Boss.points());
        }
    }

    #[test]
    fn only_shooting_defenders_carry_projectiles() {
        for kind in [
            DefenderKind::Sunflower,
            DefenderKind::Shooter,
            DefenderKind::Wall,
            DefenderKind::Freeze,
            DefenderKind::Bomb,
        ] {
            let shoots = matches!(kind.role(), DefenderRole::Shoot);
            assert_eq!(kind.projectile_kind().is_some(), shoots);
            if shoots {
                assert!(kind.damage() > 0);
            }
        }
    }

    #[test]
    fn day_stamp_follows_detects_consecutive_days() {
        let yesterday = DayStamp::new(41);
        let today = DayStamp::new(42);
        assert!(today.follows(yesterday));
        assert!(!today.follows(today));
        assert!(!yesterday.follows(today));
    }

    #[test]
    fn timestamp_day_rolls_over_at_midnight() {
        let late = Timestamp::from_millis(MILLIS_PER_DAY - 1);
        let midnight = late.advanced_by(Duration::from_millis(1));
        assert_eq!(late.day(), DayStamp::new(0));
        assert_eq!(midnight.day(), DayStamp::new(1));
    }

    #[test]
    fn tree_snapshot_round_trips_through_bincode() {
        let snapshot = TreeSnapshot {
            id: TreeId::new(3),
            slot: GardenSlot::new(4),
            kind: TreeKind::Willow,
            level: TreeLevel::new(2),
            points: 400,
            planted_at: Timestamp::from_millis(86_400_123),
        };
        assert_round_trip(&snapshot);
    }

    #[test]
    fn certificate_round_trips_through_bincode() {
        let certificate = Certificate {
            kind: CertificateKind::FirstGarden,
            earned_at: Timestamp::from_millis(1_000),
            number: CertificateNumber::new("ZEN-1000-0000A1B".to_owned()),
            storage_url: None,
        };
        assert_round_trip(&certificate);
    }

    #[test]
    fn profile_snapshot_round_trips_through_bincode() {
        let mut profile = ProfileSnapshot::default();
        profile.total_points = 1234;
        profile.coins = 934;
        profile.high_score = 610;
        assert_round_trip(&profile);
    }

    #[test]
    fn rejection_reasons_round_trip_through_bincode() {
        assert_round_trip(&PlacementError::Crowded);
        assert_round_trip(&PlantError::SlotOccupied);
        assert_round_trip(&UpgradeError::MaxLevel);
    }

    #[test]
    fn default_profile_carries_the_full_badge_catalog() {
        let profile = ProfileSnapshot::default();
        assert_eq!(profile.badges.len(), BadgeId::ALL.len());
        assert!(profile.badges.iter().all(|entry| !entry.earned()));
    }
}
