//! Garden mutations: planting, upgrading, and the completion check.

use zen_garden_core::{
    BadgeId, CertificateKind, Event, GardenSlot, PlantError, Timestamp, TreeId, TreeKind,
    UpgradeError, GARDEN_SLOT_COUNT, TREE_PLANT_COST,
};

use crate::profile::{CertificateMint, Profile};

/// Plants a level-one tree into an empty slot for 300 coins.
///
/// Violations change nothing and are signalled by a rejection event.
pub(crate) fn plant(
    profile: &mut Profile,
    slot: GardenSlot,
    kind: TreeKind,
    now: Timestamp,
    mint: &mut CertificateMint,
    out_events: &mut Vec<Event>,
) {
    if !slot.in_bounds() {
        out_events.push(Event::TreePlantRejected {
            slot,
            reason: PlantError::InvalidSlot,
        });
        return;
    }
    if profile.slot_occupied(slot) {
        out_events.push(Event::TreePlantRejected {
            slot,
            reason: PlantError::SlotOccupied,
        });
        return;
    }
    if profile.coins() < u64::from(TREE_PLANT_COST) {
        out_events.push(Event::TreePlantRejected {
            slot,
            reason: PlantError::InsufficientCoins,
        });
        return;
    }

    profile.debit(u64::from(TREE_PLANT_COST));
    let tree = profile.plant_tree(slot, kind, now);
    log::debug!("planted tree {} in slot {}", tree.get(), slot.get());
    out_events.push(Event::TreePlanted { tree, slot, kind });
    profile.earn_badge(BadgeId::FirstTree, now, out_events);
    completion_check(profile, now, mint, out_events);
}

/// Buys the next level for a tree, snapping its points to the threshold.
pub(crate) fn upgrade(
    profile: &mut Profile,
    tree: TreeId,
    now: Timestamp,
    mint: &mut CertificateMint,
    out_events: &mut Vec<Event>,
) {
    let Some((level, points)) = profile.tree_stats(tree) else {
        out_events.push(Event::TreeUpgradeRejected {
            tree,
            reason: UpgradeError::UnknownTree,
        });
        return;
    };
    let Some(next) = level.next() else {
        out_events.push(Event::TreeUpgradeRejected {
            tree,
            reason: UpgradeError::MaxLevel,
        });
        return;
    };
    let cost = u64::from(next.threshold().saturating_sub(points));
    if profile.coins() < cost {
        out_events.push(Event::TreeUpgradeRejected {
            tree,
            reason: UpgradeError::InsufficientCoins,
        });
        return;
    }

    profile.debit(cost);
    profile.apply_upgrade(tree, next);
    log::debug!("upgraded tree {} to level {}", tree.get(), next.get());
    out_events.push(Event::TreeUpgraded { tree, level: next });
    if next.is_max() {
        profile.earn_badge(BadgeId::MaxTree, now, out_events);
    }
    completion_check(profile, now, mint, out_events);
}

/// Issues completion certificates once their conditions hold.
///
/// Idempotent and order-insensitive: the master-gardener and first-garden
/// checks are independent, and issuance is a no-op for kinds that exist.
pub(crate) fn completion_check(
    profile: &mut Profile,
    now: Timestamp,
    mint: &mut CertificateMint,
    out_events: &mut Vec<Event>,
) {
    let full = profile.trees().len() == usize::from(GARDEN_SLOT_COUNT);
    let all_max = full && profile.trees().iter().all(|tree| tree.level.is_max());

    if all_max && !profile.has_certificate(CertificateKind::MasterGardener) {
        profile.issue_certificate(CertificateKind::MasterGardener, now, mint, out_events);
        profile.earn_badge(BadgeId::FullGarden, now, out_events);
    }

    if full && !profile.has_certificate(CertificateKind::FirstGarden) {
        profile.issue_certificate(CertificateKind::FirstGarden, now, mint, out_events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zen_garden_core::TreeLevel;

    fn funded_profile(coins: u64) -> (Profile, CertificateMint, Vec<Event>) {
        let mut profile = Profile::default();
        let mut mint = CertificateMint::new(11);
        let mut events = Vec::new();
        profile.add_points(coins, Timestamp::from_millis(0), &mut mint, &mut events);
        events.clear();
        (profile, mint, events)
    }

    #[test]
    fn planting_debits_and_starts_at_level_one() {
        let (mut profile, mut mint, mut events) = funded_profile(300);
        plant(
            &mut profile,
            GardenSlot::new(0),
            TreeKind::Oak,
            Timestamp::from_millis(1),
            &mut mint,
            &mut events,
        );
        assert_eq!(profile.coins(), 0);
        assert_eq!(profile.trees().len(), 1);
        assert_eq!(profile.trees()[0].level, TreeLevel::MIN);
        assert_eq!(profile.trees()[0].points, 300);
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::TreePlanted { .. })));
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::BadgeEarned { badge: BadgeId::FirstTree })));
    }

    #[test]
    fn planting_an_occupied_slot_is_a_silent_no_op() {
        let (mut profile, mut mint, mut events) = funded_profile(900);
        plant(
            &mut profile,
            GardenSlot::new(3),
            TreeKind::Oak,
            Timestamp::from_millis(1),
            &mut mint,
            &mut events,
        );
        events.clear();
        plant(
            &mut profile,
            GardenSlot::new(3),
            TreeKind::Cherry,
            Timestamp::from_millis(2),
            &mut mint,
            &mut events,
        );
        assert_eq!(profile.trees().len(), 1);
        assert_eq!(profile.coins(), 600);
        assert_eq!(
            events,
            vec![Event::TreePlantRejected {
                slot: GardenSlot::new(3),
                reason: PlantError::SlotOccupied,
            }],
        );
    }

    #[test]
    fn planting_without_coins_is_rejected() {
        let (mut profile, mut mint, mut events) = funded_profile(299);
        plant(
            &mut profile,
            GardenSlot::new(0),
            TreeKind::Pine,
            Timestamp::from_millis(1),
            &mut mint,
            &mut events,
        );
        assert!(profile.trees().is_empty());
        assert_eq!(profile.coins(), 299);
        assert_eq!(
            events,
            vec![Event::TreePlantRejected {
                slot: GardenSlot::new(0),
                reason: PlantError::InsufficientCoins,
            }],
        );
    }

    #[test]
    fn upgrade_cost_is_the_gap_to_the_next_threshold() {
        let (mut profile, mut mint, mut events) = funded_profile(400);
        plant(
            &mut profile,
            GardenSlot::new(0),
            TreeKind::Maple,
            Timestamp::from_millis(1),
            &mut mint,
            &mut events,
        );
        let tree = profile.trees()[0].id;
        events.clear();

        // Level 1 -> 2 costs 400 - 300 = 100 coins.
        upgrade(&mut profile, tree, Timestamp::from_millis(2), &mut mint, &mut events);
        assert_eq!(profile.coins(), 0);
        assert_eq!(profile.trees()[0].level, TreeLevel::new(2));
        assert_eq!(profile.trees()[0].points, 400);
    }

    #[test]
    fn upgrade_past_max_level_is_rejected() {
        let (mut profile, mut mint, mut events) = funded_profile(1000);
        plant(
            &mut profile,
            GardenSlot::new(0),
            TreeKind::Redwood,
            Timestamp::from_millis(1),
            &mut mint,
            &mut events,
        );
        let tree = profile.trees()[0].id;
        for _ in 0..5 {
            upgrade(&mut profile, tree, Timestamp::from_millis(2), &mut mint, &mut events);
        }
        assert_eq!(profile.trees()[0].level, TreeLevel::MAX);
        events.clear();

        upgrade(&mut profile, tree, Timestamp::from_millis(3), &mut mint, &mut events);
        assert_eq!(
            events,
            vec![Event::TreeUpgradeRejected {
                tree,
                reason: UpgradeError::MaxLevel,
            }],
        );
    }

    #[test]
    fn max_level_upgrade_earns_the_ancient_wisdom_badge() {
        let (mut profile, mut mint, mut events) = funded_profile(1000);
        plant(
            &mut profile,
            GardenSlot::new(0),
            TreeKind::Willow,
            Timestamp::from_millis(1),
            &mut mint,
            &mut events,
        );
        let tree = profile.trees()[0].id;
        events.clear();
        for _ in 0..5 {
            upgrade(&mut profile, tree, Timestamp::from_millis(2), &mut mint, &mut events);
        }
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::BadgeEarned { badge: BadgeId::MaxTree })));
    }

    #[test]
    fn completed_garden_issues_both_certificates_exactly_once() {
        // 9 trees at 300 points each, then 500 more coins per tree to max
        // them out: plant cost 300 + upgrades (800 - 300) = 800 per slot.
        let (mut profile, mut mint, mut events) = funded_profile(9 * 800);
        for slot in 0..GARDEN_SLOT_COUNT {
            plant(
                &mut profile,
                GardenSlot::new(slot),
                TreeKind::Oak,
                Timestamp::from_millis(1),
                &mut mint,
                &mut events,
            );
        }
        // All nine slots filled: first-garden exists, master-gardener not yet.
        assert!(profile.has_certificate(CertificateKind::FirstGarden));
        assert!(!profile.has_certificate(CertificateKind::MasterGardener));

        let trees: Vec<TreeId> = profile.trees().iter().map(|tree| tree.id).collect();
        for tree in trees {
            for _ in 0..5 {
                upgrade(&mut profile, tree, Timestamp::from_millis(2), &mut mint, &mut events);
            }
        }
        assert!(profile.has_certificate(CertificateKind::MasterGardener));

        events.clear();
        completion_check(&mut profile, Timestamp::from_millis(3), &mut mint, &mut events);
        assert!(events.is_empty(), "completion check must be idempotent");

        let issued = profile
            .snapshot()
            .certificates
            .iter()
            .filter(|certificate| {
                matches!(
                    certificate.kind,
                    CertificateKind::FirstGarden | CertificateKind::MasterGardener
                )
            })
            .count();
        assert_eq!(issued, 2);
    }

    #[test]
    fn out_of_bounds_slot_is_rejected() {
        let (mut profile, mut mint, mut events) = funded_profile(300);
        plant(
            &mut profile,
            GardenSlot::new(GARDEN_SLOT_COUNT),
            TreeKind::Oak,
            Timestamp::from_millis(1),
            &mut mint,
            &mut events,
        );
        assert!(profile.trees().is_empty());
        assert_eq!(
            events,
            vec![Event::TreePlantRejected {
                slot: GardenSlot::new(GARDEN_SLOT_COUNT),
                reason: PlantError::InvalidSlot,
            }],
        );
    }
}
