//! Persistent economy aggregate: points, coins, trees, badges, certificates.

use zen_garden_core::{
    BadgeId, BadgeProgress, Certificate, CertificateKind, CertificateNumber, DayStamp, Event,
    GardenSlot, ProfileSnapshot, Timestamp, TreeId, TreeKind, TreeLevel, TreeSnapshot,
    ECO_WARRIOR_POINTS, STREAK_BADGE_TARGET,
};

const MINT_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const MINT_INCREMENT: u64 = 1;
const SUFFIX_DIGITS: usize = 7;
const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A planted tree owned by the profile.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Tree {
    pub(crate) id: TreeId,
    pub(crate) slot: GardenSlot,
    pub(crate) kind: TreeKind,
    pub(crate) points: u32,
    pub(crate) level: TreeLevel,
    pub(crate) planted_at: Timestamp,
}

impl Tree {
    pub(crate) fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            id: self.id,
            slot: self.slot,
            kind: self.kind,
            level: self.level,
            points: self.points,
            planted_at: self.planted_at,
        }
    }
}

/// The long-lived economy state shared by the garden and the combat rounds.
#[derive(Debug)]
pub(crate) struct Profile {
    total_points: u64,
    coins: u64,
    trees: Vec<Tree>,
    next_tree_id: u32,
    badges: Vec<BadgeProgress>,
    certificates: Vec<Certificate>,
    games_played: u32,
    high_score: u32,
    streak: u32,
    last_played: Option<DayStamp>,
}

impl Profile {
    pub(crate) fn from_snapshot(snapshot: ProfileSnapshot) -> Self {
        let next_tree_id = snapshot
            .trees
            .iter()
            .map(|tree| tree.id.get().saturating_add(1))
            .max()
            .unwrap_or(0);
        // The badge catalog is fixed in shape; merge whatever the snapshot
        // recorded onto the canonical ordering.
        let badges = BadgeId::ALL
            .into_iter()
            .map(|badge| BadgeProgress {
                badge,
                earned_at: snapshot
                    .badges
                    .iter()
                    .find(|entry| entry.badge == badge)
                    .and_then(|entry| entry.earned_at),
            })
            .collect();
        Self {
            total_points: snapshot.total_points,
            coins: snapshot.coins,
            trees: snapshot
                .trees
                .into_iter()
                .map(|tree| Tree {
                    id: tree.id,
                    slot: tree.slot,
                    kind: tree.kind,
                    points: tree.points,
                    level: tree.level,
                    planted_at: tree.planted_at,
                })
                .collect(),
            next_tree_id,
            badges,
            certificates: snapshot.certificates,
            games_played: snapshot.games_played,
            high_score: snapshot.high_score,
            streak: snapshot.streak,
            last_played: snapshot.last_played,
        }
    }

    pub(crate) fn snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot {
            total_points: self.total_points,
            coins: self.coins,
            trees: self.trees.iter().map(Tree::snapshot).collect(),
            badges: self.badges.clone(),
            certificates: self.certificates.clone(),
            games_played: self.games_played,
            high_score: self.high_score,
            streak: self.streak,
            last_played: self.last_played,
        }
    }

    pub(crate) fn total_points(&self) -> u64 {
        self.total_points
    }

    pub(crate) fn coins(&self) -> u64 {
        self.coins
    }

    pub(crate) fn high_score(&self) -> u32 {
        self.high_score
    }

    pub(crate) fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub(crate) fn slot_occupied(&self, slot: GardenSlot) -> bool {
        self.trees.iter().any(|tree| tree.slot == slot)
    }

    pub(crate) fn tree_stats(&self, id: TreeId) -> Option<(TreeLevel, u32)> {
        self.trees
            .iter()
            .find(|tree| tree.id == id)
            .map(|tree| (tree.level, tree.points))
    }

    /// Credits lifetime points and coins together, as every grant does.
    pub(crate) fn add_points(
        &mut self,
        amount: u64,
        now: Timestamp,
        mint: &mut CertificateMint,
        out_events: &mut Vec<Event>,
    ) {
        self.total_points = self.total_points.saturating_add(amount);
        self.coins = self.coins.saturating_add(amount);
        log::debug!(
            "credited {amount} points; total {}, coins {}",
            self.total_points,
            self.coins
        );
        if self.total_points >= ECO_WARRIOR_POINTS {
            self.issue_certificate(CertificateKind::EcoWarrior, now, mint, out_events);
        }
    }

    /// Removes coins already validated against the balance by the caller.
    pub(crate) fn debit(&mut self, cost: u64) {
        debug_assert!(cost <= self.coins, "debit exceeds balance");
        self.coins = self.coins.saturating_sub(cost);
    }

    pub(crate) fn plant_tree(
        &mut self,
        slot: GardenSlot,
        kind: TreeKind,
        now: Timestamp,
    ) -> TreeId {
        let id = TreeId::new(self.next_tree_id);
        self.next_tree_id = self.next_tree_id.wrapping_add(1);
        let points = TreeLevel::MIN.threshold();
        self.trees.push(Tree {
            id,
            slot,
            kind,
            points,
            level: TreeLevel::for_points(points),
            planted_at: now,
        });
        id
    }

    pub(crate) fn apply_upgrade(&mut self, id: TreeId, next: TreeLevel) {
        if let Some(tree) = self.trees.iter_mut().find(|tree| tree.id == id) {
            tree.points = next.threshold();
            tree.level = next;
        }
    }

    pub(crate) fn raise_high_score(&mut self, score: u32) {
        self.high_score = self.high_score.max(score);
    }

    /// Flips a badge to earned exactly once; already-earned badges are
    /// never re-timestamped.
    pub(crate) fn earn_badge(
        &mut self,
        badge: BadgeId,
        now: Timestamp,
        out_events: &mut Vec<Event>,
    ) {
        let Some(entry) = self.badges.iter_mut().find(|entry| entry.badge == badge) else {
            return;
        };
        if entry.earned_at.is_some() {
            return;
        }
        entry.earned_at = Some(now);
        log::info!("badge earned: {}", badge.definition().name);
        out_events.push(Event::BadgeEarned { badge });
    }

    pub(crate) fn has_certificate(&self, kind: CertificateKind) -> bool {
        self.certificates
            .iter()
            .any(|certificate| certificate.kind == kind)
    }

    /// Appends a certificate of the given kind, or does nothing when one
    /// already exists.
    pub(crate) fn issue_certificate(
        &mut self,
        kind: CertificateKind,
        now: Timestamp,
        mint: &mut CertificateMint,
        out_events: &mut Vec<Event>,
    ) {
        if self.has_certificate(kind) {
            return;
        }
        let number = mint.issue(now);
        log::info!("certificate issued: {} ({})", kind.definition().name, number);
        out_events.push(Event::CertificateIssued {
            kind,
            number: number.clone(),
        });
        self.certificates.push(Certificate {
            kind,
            earned_at: now,
            number,
            storage_url: None,
        });
    }

    /// Bumps play counters and the daily streak when a round begins.
    pub(crate) fn record_round_start(
        &mut self,
        now: Timestamp,
        out_events: &mut Vec<Event>,
    ) {
        self.games_played = self.games_played.saturating_add(1);
        let today = now.day();
        match self.last_played {
            Some(last) if last == today => {}
            Some(last) if today.follows(last) => {
                self.streak = self.streak.saturating_add(1);
            }
            _ => self.streak = 1,
        }
        self.last_played = Some(today);
        if self.streak >= STREAK_BADGE_TARGET {
            self.earn_badge(BadgeId::ZenStreak, now, out_events);
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::from_snapshot(ProfileSnapshot::default())
    }
}

/// Seeded generator for best-effort-unique certificate numbers.
///
/// Numbers read `ZEN-<millis>-<suffix>`; uniqueness leans on the timestamp
/// and is not a hard guarantee.
#[derive(Debug)]
pub(crate) struct CertificateMint {
    state: u64,
}

impl CertificateMint {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub(crate) fn issue(&mut self, now: Timestamp) -> CertificateNumber {
        self.state = self
            .state
            .wrapping_mul(MINT_MULTIPLIER)
            .wrapping_add(MINT_INCREMENT);
        let mut digits = ['0'; SUFFIX_DIGITS];
        let mut value = self.state;
        for slot in digits.iter_mut().rev() {
            *slot = BASE36[(value % 36) as usize] as char;
            value /= 36;
        }
        let suffix: String = digits.iter().collect();
        CertificateNumber::new(format!("ZEN-{}-{suffix}", now.millis()))
    }
}
