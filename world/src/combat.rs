//! Combat round state and the per-tick simulation update.

use std::time::Duration;

use zen_garden_core::{
    DefenderId, DefenderKind, DefenderRole, DefenderSnapshot, EnemyId, EnemyKind, EnemySnapshot,
    Event, Lane, PlacementError, ProjectileId, ProjectileKind, ProjectileSnapshot, RoundOutcome,
    RoundPhase, RoundStatus, BASE_LINE_X, BREACH_DAMAGE, BREACH_SCORE_PENALTY, DEFENDER_SPACING,
    ENEMY_SPAWN_X, ENEMY_SPEED_SCALE, FIELD_EXIT_X, FINAL_WAVE, HIT_RADIUS, PROJECTILE_MUZZLE_OFFSET,
    PROJECTILE_SPEED, PROJECTILE_SPEED_SCALE, STARTING_HEALTH, STARTING_SUN, SUNFLOWER_HARVEST,
    WAVE_CLEAR_BONUS,
};

#[derive(Clone, Copy, Debug)]
struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    lane: Lane,
    x: f32,
    health: u32,
    max_health: u32,
    speed: f32,
}

#[derive(Clone, Copy, Debug)]
struct Defender {
    id: DefenderId,
    kind: DefenderKind,
    lane: Lane,
    x: f32,
    cooldown: Duration,
}

#[derive(Clone, Copy, Debug)]
struct Projectile {
    id: ProjectileId,
    kind: ProjectileKind,
    lane: Lane,
    x: f32,
    damage: u32,
    speed: f32,
}

/// One play-through of the combat mini-game, created fresh per round and
/// discarded on return to the garden.
#[derive(Debug)]
pub(crate) struct Round {
    phase: RoundPhase,
    wave: u32,
    score: u32,
    sun: u32,
    health: u32,
    max_health: u32,
    selected: Option<DefenderKind>,
    enemies: Vec<Enemy>,
    defenders: Vec<Defender>,
    projectiles: Vec<Projectile>,
    next_enemy_id: u32,
    next_defender_id: u32,
    next_projectile_id: u32,
    boss_felled: bool,
}

impl Round {
    pub(crate) fn new() -> Self {
        Self {
            phase: RoundPhase::Playing,
            wave: 1,
            score: 0,
            sun: STARTING_SUN,
            health: STARTING_HEALTH,
            max_health: STARTING_HEALTH,
            selected: None,
            enemies: Vec::new(),
            defenders: Vec::new(),
            projectiles: Vec::new(),
            next_enemy_id: 0,
            next_defender_id: 0,
            next_projectile_id: 0,
            boss_felled: false,
        }
    }

    pub(crate) fn wave(&self) -> u32 {
        self.wave
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.phase == RoundPhase::Playing
    }

    pub(crate) fn boss_felled(&self) -> bool {
        self.boss_felled
    }

    pub(crate) fn flawless(&self) -> bool {
        self.health == self.max_health
    }

    pub(crate) fn pause(&mut self) {
        if self.phase == RoundPhase::Playing {
            self.phase = RoundPhase::Paused;
        }
    }

    pub(crate) fn resume(&mut self) {
        if self.phase == RoundPhase::Paused {
            self.phase = RoundPhase::Playing;
        }
    }

    pub(crate) fn select(&mut self, selection: Option<DefenderKind>) {
        if !matches!(self.phase, RoundPhase::Ended(_)) {
            self.selected = selection;
        }
    }

    pub(crate) fn spawn_enemy(&mut self, kind: EnemyKind, lane: Lane) -> EnemyId {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        self.enemies.push(Enemy {
            id,
            kind,
            lane,
            x: ENEMY_SPAWN_X,
            health: kind.health(),
            max_health: kind.health(),
            speed: kind.speed(),
        });
        id
    }

    pub(crate) fn can_advance_wave(&self) -> bool {
        self.is_playing() && self.enemies.is_empty() && self.wave < FINAL_WAVE
    }

    pub(crate) fn advance_wave(&mut self) -> u32 {
        self.wave += 1;
        self.score = self.score.saturating_add(WAVE_CLEAR_BONUS);
        self.wave
    }

    pub(crate) fn status(&self) -> RoundStatus {
        RoundStatus {
            phase: self.phase,
            wave: self.wave,
            score: self.score,
            sun: self.sun,
            health: self.health,
            max_health: self.max_health,
            selected: self.selected,
            enemy_count: self.enemies.len(),
        }
    }

    pub(crate) fn enemy_snapshots(&self) -> Vec<EnemySnapshot> {
        self.enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                kind: enemy.kind,
                lane: enemy.lane,
                x: enemy.x,
                health: enemy.health,
                max_health: enemy.max_health,
            })
            .collect()
    }

    pub(crate) fn defender_snapshots(&self) -> Vec<DefenderSnapshot> {
        self.defenders
            .iter()
            .map(|defender| DefenderSnapshot {
                id: defender.id,
                kind: defender.kind,
                lane: defender.lane,
                x: defender.x,
                cooldown: defender.cooldown,
            })
            .collect()
    }

    pub(crate) fn projectile_snapshots(&self) -> Vec<ProjectileSnapshot> {
        self.projectiles
            .iter()
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                kind: projectile.kind,
                lane: projectile.lane,
                x: projectile.x,
                damage: projectile.damage,
            })
            .collect()
    }
}

/// Applies the placement rule, deducting sun and clearing the selection on
/// success. Violations emit a rejection event and change nothing.
pub(crate) fn place_defender(
    round: &mut Round,
    lane: Lane,
    x: f32,
    out_events: &mut Vec<Event>,
) {
    if !round.is_playing() {
        out_events.push(Event::DefenderRejected {
            kind: round.selected,
            lane,
            reason: PlacementError::InvalidPhase,
        });
        return;
    }
    let Some(kind) = round.selected else {
        out_events.push(Event::DefenderRejected {
            kind: None,
            lane,
            reason: PlacementError::NoSelection,
        });
        return;
    };
    if round.sun < kind.cost() {
        out_events.push(Event::DefenderRejected {
            kind: Some(kind),
            lane,
            reason: PlacementError::InsufficientSun,
        });
        return;
    }
    let crowded = round
        .defenders
        .iter()
        .any(|defender| defender.lane == lane && (defender.x - x).abs() < DEFENDER_SPACING);
    if crowded {
        out_events.push(Event::DefenderRejected {
            kind: Some(kind),
            lane,
            reason: PlacementError::Crowded,
        });
        return;
    }

    round.sun -= kind.cost();
    let id = DefenderId::new(round.next_defender_id);
    round.next_defender_id = round.next_defender_id.wrapping_add(1);
    round.defenders.push(Defender {
        id,
        kind,
        lane,
        x,
        cooldown: Duration::ZERO,
    });
    // Selection is single-use per successful placement.
    round.selected = None;
    out_events.push(Event::DefenderPlaced {
        defender: id,
        kind,
        lane,
        x,
    });
}

/// Advances the round by one tick of `dt` elapsed time.
///
/// Returns the terminal outcome on the tick the round ends, and `None`
/// otherwise. The caller must not invoke this for paused or ended rounds.
pub(crate) fn advance(
    round: &mut Round,
    dt: Duration,
    out_events: &mut Vec<Event>,
) -> Option<RoundOutcome> {
    let dt_millis = dt.as_secs_f32() * 1000.0;

    // Enemies march toward the base.
    for enemy in &mut round.enemies {
        enemy.x -= enemy.speed * dt_millis * ENEMY_SPEED_SCALE;
    }

    // Breaches remove the enemy and bleed health and score; simultaneous
    // breaches stack additively within the tick.
    let mut breaches = 0u32;
    round.enemies.retain(|enemy| {
        if enemy.x <= BASE_LINE_X {
            out_events.push(Event::EnemyBreached { enemy: enemy.id });
            breaches += 1;
            false
        } else {
            true
        }
    });
    if breaches > 0 {
        round.health = round.health.saturating_sub(BREACH_DAMAGE * breaches);
        round.score = round.score.saturating_sub(BREACH_SCORE_PENALTY * breaches);
        log::debug!("base breached by {breaches} enemies; health {}", round.health);
    }

    // Projectiles fly outward and expire at the field edge.
    for projectile in &mut round.projectiles {
        projectile.x += projectile.speed * dt_millis * PROJECTILE_SPEED_SCALE;
    }
    round.projectiles.retain(|projectile| projectile.x < FIELD_EXIT_X);

    // Each projectile connects with the nearest enemy ahead of it in its
    // lane, at most once per tick; the hit consumes the projectile.
    let mut consumed = vec![false; round.projectiles.len()];
    for (index, projectile) in round.projectiles.iter().enumerate() {
        let mut target: Option<(usize, f32)> = None;
        for (enemy_index, enemy) in round.enemies.iter().enumerate() {
            if enemy.lane != projectile.lane {
                continue;
            }
            let gap = enemy.x - projectile.x;
            if gap <= 0.0 || gap >= HIT_RADIUS {
                continue;
            }
            if target.map_or(true, |(_, best)| gap < best) {
                target = Some((enemy_index, gap));
            }
        }
        if let Some((enemy_index, _)) = target {
            let enemy = &mut round.enemies[enemy_index];
            enemy.health = enemy.health.saturating_sub(projectile.damage);
            consumed[index] = true;
        }
    }
    let mut drop_index = 0;
    round.projectiles.retain(|_| {
        let keep = !consumed[drop_index];
        drop_index += 1;
        keep
    });

    // Depleted enemies fall, crediting their point value exactly once.
    let mut felled_points = 0u32;
    let mut boss_felled = false;
    round.enemies.retain(|enemy| {
        if enemy.health > 0 {
            return true;
        }
        felled_points = felled_points.saturating_add(enemy.kind.points());
        boss_felled |= enemy.kind == EnemyKind::Boss;
        out_events.push(Event::EnemyFelled {
            enemy: enemy.id,
            kind: enemy.kind,
            points: enemy.kind.points(),
        });
        false
    });
    round.score = round.score.saturating_add(felled_points);
    round.boss_felled |= boss_felled;

    // Defender cooldowns drain; elapsed ones act according to their role.
    for index in 0..round.defenders.len() {
        let remaining = round.defenders[index].cooldown.saturating_sub(dt);
        round.defenders[index].cooldown = remaining;
        if !remaining.is_zero() {
            continue;
        }
        let Defender { id, kind, lane, x, .. } = round.defenders[index];
        match kind.role() {
            DefenderRole::Harvest => {
                round.sun = round.sun.saturating_add(SUNFLOWER_HARVEST);
                round.defenders[index].cooldown = kind.cooldown();
                out_events.push(Event::SunHarvested {
                    defender: id,
                    amount: SUNFLOWER_HARVEST,
                });
            }
            DefenderRole::Shoot => {
                let has_target = round
                    .enemies
                    .iter()
                    .any(|enemy| enemy.lane == lane && enemy.x > x);
                // Without a target the cooldown stays at zero and the
                // check repeats next tick.
                if !has_target {
                    continue;
                }
                let Some(projectile_kind) = kind.projectile_kind() else {
                    continue;
                };
                let projectile_id = ProjectileId::new(round.next_projectile_id);
                round.next_projectile_id = round.next_projectile_id.wrapping_add(1);
                round.projectiles.push(Projectile {
                    id: projectile_id,
                    kind: projectile_kind,
                    lane,
                    x: x + PROJECTILE_MUZZLE_OFFSET,
                    damage: kind.damage(),
                    speed: PROJECTILE_SPEED,
                });
                round.defenders[index].cooldown = kind.cooldown();
                out_events.push(Event::ProjectileFired {
                    projectile: projectile_id,
                    defender: id,
                    lane,
                });
            }
            DefenderRole::Block => {}
        }
    }

    // Terminal evaluation: defeat takes precedence over victory when both
    // conditions hold on the same tick.
    if round.health == 0 {
        round.phase = RoundPhase::Ended(RoundOutcome::Defeat);
        out_events.push(Event::RoundEnded {
            outcome: RoundOutcome::Defeat,
            score: round.score,
            wave: round.wave,
        });
        return Some(RoundOutcome::Defeat);
    }
    if round.wave >= FINAL_WAVE && round.enemies.is_empty() {
        round.phase = RoundPhase::Ended(RoundOutcome::Victory);
        out_events.push(Event::RoundEnded {
            outcome: RoundOutcome::Victory,
            score: round.score,
            wave: round.wave,
        });
        return Some(RoundOutcome::Victory);
    }
    None
}
