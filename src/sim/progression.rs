//! XP curve, leveling, currency and pickup drops

use glam::Vec2;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::entities::{Pickup, PickupKind};
use crate::from_angle;
use crate::tuning::{DropWeight, Tuning};

/// XP needed to advance from `level` to `level + 1`
pub fn xp_required(level: u32, base: f64, growth: f64) -> u64 {
    let exponent = level.saturating_sub(1) as i32;
    (base * growth.powi(exponent)).round() as u64
}

/// XP, level and currency for the current run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    /// XP toward the next level (the requirement is subtracted on level-up)
    pub xp: u64,
    pub level: u32,
    pub currency: u64,
    base: f64,
    growth: f64,
}

impl Progression {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            xp: 0,
            level: 1,
            currency: 0,
            base: tuning.xp_level_base,
            growth: tuning.xp_level_growth,
        }
    }

    /// XP needed for the next level
    pub fn required(&self) -> u64 {
        xp_required(self.level, self.base, self.growth)
    }

    /// Grant XP. Level-ups chain: each is re-checked against the new, larger
    /// requirement. Returns how many levels were gained.
    pub fn add_xp(&mut self, amount: u64) -> u32 {
        self.xp += amount;
        let mut gained = 0;
        loop {
            let required = self.required();
            if self.xp < required {
                break;
            }
            self.xp -= required;
            self.level += 1;
            gained += 1;
            log::info!("Level up -> {}", self.level);
        }
        gained
    }

    pub fn add_currency(&mut self, amount: u64) {
        self.currency += amount;
    }
}

/// Weighted selection over a fixed amount table
#[derive(Debug, Clone)]
pub struct DropTable {
    amounts: Vec<u32>,
    index: Option<WeightedIndex<f64>>,
}

impl DropTable {
    pub fn new(weights: &[DropWeight]) -> Self {
        let amounts = weights.iter().map(|w| w.amount).collect();
        let index = match WeightedIndex::new(weights.iter().map(|w| w.weight.max(0.0))) {
            Ok(index) => Some(index),
            Err(e) => {
                log::warn!("Drop table cannot be sampled ({e}), falling back to last entry");
                None
            }
        };
        Self { amounts, index }
    }

    /// Roll an amount. An unsampleable table yields its last amount (or 0).
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        match &self.index {
            Some(index) => self.amounts[index.sample(rng)],
            None => self.amounts.last().copied().unwrap_or(0),
        }
    }
}

/// XP-orb and currency drop tables
#[derive(Debug, Clone)]
pub struct Drops {
    pub xp: DropTable,
    pub currency: DropTable,
}

impl Drops {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            xp: DropTable::new(&tuning.xp_drop_weights),
            currency: DropTable::new(&tuning.currency_drop_weights),
        }
    }

    /// Pickups for an asteroid destroyed at `at`: a cluster of XP orbs and
    /// possibly one currency orb, each jittered 8-24 px from the site.
    pub fn spawn_pickups<R: Rng + ?Sized>(&self, at: Vec2, tuning: &Tuning, rng: &mut R) -> Vec<Pickup> {
        fn jitter<R: Rng + ?Sized>(at: Vec2, rng: &mut R) -> Vec2 {
            let angle = rng.random::<f32>() * TAU;
            let radius = 8.0 + rng.random::<f32>() * 16.0;
            at + from_angle(angle) * radius
        }

        let xp_count = self.xp.pick(rng);
        let mut pickups: Vec<Pickup> = (0..xp_count)
            .map(|_| {
                let pos = jitter(at, rng);
                Pickup::new(PickupKind::Xp, tuning.xp_pickup_value, pos, tuning, rng)
            })
            .collect();

        if rng.random_bool(tuning.currency_drop_chance.clamp(0.0, 1.0)) {
            let pos = jitter(at, rng);
            let amount = self.currency.pick(rng) as u64;
            pickups.push(Pickup::new(PickupKind::Currency, amount, pos, tuning, rng));
        }
        pickups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_xp_required_curve() {
        assert_eq!(xp_required(1, 300.0, 1.25), 300);
        assert_eq!(xp_required(2, 300.0, 1.25), 375);
        assert_eq!(xp_required(3, 300.0, 1.25), 469);
        // Level 0 is treated like level 1
        assert_eq!(xp_required(0, 300.0, 1.25), 300);
    }

    #[test]
    fn test_single_level_up() {
        let mut p = Progression::new(&Tuning::default());
        assert_eq!(p.add_xp(299), 0);
        assert_eq!(p.add_xp(1), 1);
        assert_eq!(p.level, 2);
        assert_eq!(p.xp, 0);
    }

    #[test]
    fn test_level_ups_chain() {
        let mut p = Progression::new(&Tuning::default());
        let gained = p.add_xp(300 + 375 + 469 + 10);
        assert_eq!(gained, 3);
        assert_eq!(p.level, 4);
        assert_eq!(p.xp, 10);
    }

    #[test]
    fn test_currency_accumulates() {
        let mut p = Progression::new(&Tuning::default());
        p.add_currency(3);
        p.add_currency(4);
        assert_eq!(p.currency, 7);
    }

    #[test]
    fn test_drop_table_only_yields_listed_amounts() {
        let table = DropTable::new(&crate::tuning::bell_drop_table());
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..500 {
            assert!((1..=5).contains(&table.pick(&mut rng)));
        }
    }

    #[test]
    fn test_zero_weight_table_falls_back_to_last() {
        let table = DropTable::new(&[
            DropWeight { amount: 1, weight: 0.0 },
            DropWeight { amount: 9, weight: 0.0 },
        ]);
        let mut rng = Pcg32::seed_from_u64(5);
        assert_eq!(table.pick(&mut rng), 9);
    }

    #[test]
    fn test_spawn_pickups_cluster_near_site() {
        let tuning = Tuning {
            currency_drop_chance: 1.0,
            ..Tuning::default()
        };
        let drops = Drops::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(9);
        let at = Vec2::new(500.0, 500.0);
        let pickups = drops.spawn_pickups(at, &tuning, &mut rng);

        let xp = pickups.iter().filter(|p| p.kind == PickupKind::Xp).count();
        let currency = pickups.iter().filter(|p| p.kind == PickupKind::Currency).count();
        assert!((1..=5).contains(&xp));
        assert_eq!(currency, 1);
        for p in &pickups {
            let d = p.pos.distance(at);
            assert!((8.0 - 1e-3..=24.0 + 1e-3).contains(&d));
        }
    }

    #[test]
    fn test_no_currency_when_chance_is_zero() {
        let tuning = Tuning {
            currency_drop_chance: 0.0,
            ..Tuning::default()
        };
        let drops = Drops::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..50 {
            let pickups = drops.spawn_pickups(Vec2::ZERO, &tuning, &mut rng);
            assert!(pickups.iter().all(|p| p.kind == PickupKind::Xp));
        }
    }

    proptest! {
        #[test]
        fn prop_requirement_strictly_increases(level in 1u32..40) {
            prop_assert!(xp_required(level + 1, 300.0, 1.25) > xp_required(level, 300.0, 1.25));
        }

        #[test]
        fn prop_xp_stays_below_requirement(grants in prop::collection::vec(0u64..2000, 1..20)) {
            let mut p = Progression::new(&Tuning::default());
            for g in grants {
                p.add_xp(g);
                prop_assert!(p.xp < p.required());
            }
        }
    }
}
