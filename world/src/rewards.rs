//! One-time conversion of a finished round into economy mutations.

use zen_garden_core::{BadgeId, Event, RoundOutcome, Timestamp};

use crate::combat::Round;
use crate::profile::{CertificateMint, Profile};

const ECO_DEFENDER_SCORE: u32 = 500;
const FOREST_GUARDIAN_WAVE: u32 = 5;

/// Settles the round into the profile on the tick it terminates.
///
/// Called exactly once per round, at the transition out of `Playing`; the
/// frozen terminal phase guarantees no second settlement.
pub(crate) fn settle(
    profile: &mut Profile,
    round: &Round,
    outcome: RoundOutcome,
    now: Timestamp,
    mint: &mut CertificateMint,
    out_events: &mut Vec<Event>,
) {
    let score = round.score();
    log::info!(
        "round over: {outcome:?} at wave {} with score {score}",
        round.wave()
    );

    profile.add_points(u64::from(score), now, mint, out_events);
    profile.raise_high_score(score);
    out_events.push(Event::RewardGranted {
        score,
        total_points: profile.total_points(),
        coins: profile.coins(),
        high_score: profile.high_score(),
    });

    if score >= ECO_DEFENDER_SCORE {
        profile.earn_badge(BadgeId::EcoDefender, now, out_events);
    }
    if round.wave() >= FOREST_GUARDIAN_WAVE {
        profile.earn_badge(BadgeId::ForestGuardian, now, out_events);
    }
    if round.boss_felled() {
        profile.earn_badge(BadgeId::BossSlayer, now, out_events);
    }
    if outcome == RoundOutcome::Victory && round.flawless() {
        profile.earn_badge(BadgeId::PerfectRun, now, out_events);
    }
}
