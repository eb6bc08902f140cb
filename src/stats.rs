//! Fleet statistics: detection (LoS) per formation, air power range and fleet speed.
//!
//! All functions are pure and skip sentinel ships (`id <= 0`).

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Serialize, Serializer};

use crate::model::fleet::{Fleet, Item, Ship};
use crate::model::master::item_type;

/// Additive `{min, max}` air power range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct AirPower {
    pub min: u32,
    pub max: u32,
}

impl AirPower {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

impl Add for AirPower {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            min: self.min + rhs.min,
            max: self.max + rhs.max,
        }
    }
}

impl AddAssign for AirPower {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for AirPower {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Speed tier. A fleet moves at the tier of its slowest equipped ship.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Speed(pub u8);

impl Speed {
    pub const SLOW: Self = Self(5);
    pub const FAST: Self = Self(10);
    pub const FAST_PLUS: Self = Self(15);
    pub const FASTEST: Self = Self(20);
    /// No-speed-constraint baseline: what a fleet without equipped ships reports.
    pub const UNCONSTRAINED: Self = Self::FASTEST;
}

/// Detection value for each of the five formations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoS([f64; 5]);

impl LoS {
    pub const FORMATIONS: [u8; 5] = [1, 2, 3, 4, 5];

    /// Evaluate [`compute_los`] once per formation.
    pub fn compute(ships: &[Ship], hqlv: u32) -> Self {
        Self(Self::FORMATIONS.map(|formation| compute_los(ships, hqlv, formation)))
    }

    pub fn from_values(values: [f64; 5]) -> Self {
        Self(values)
    }

    /// Value for `formation` in `1..=5`.
    pub fn get(&self, formation: u8) -> Option<f64> {
        let idx = usize::from(formation).checked_sub(1)?;
        self.0.get(idx).copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        Self::FORMATIONS.into_iter().zip(self.0.iter().copied())
    }
}

impl Serialize for LoS {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries().map(|(k, v)| (k.to_string(), v)))
    }
}

/// Statistics handed to a fleet renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FleetStats {
    pub los: LoS,
    pub air_power: AirPower,
    pub speed: Speed,
}

pub fn fleet_stats(ships: &[Ship], hqlv: u32) -> FleetStats {
    FleetStats {
        los: LoS::compute(ships, hqlv),
        air_power: compute_air_power(ships),
        speed: compute_speed(ships),
    }
}

fn los_coefficient(kind: u32) -> f64 {
    match kind {
        item_type::CARRIER_TORPEDO_BOMBER => 0.8,
        item_type::CARRIER_RECON | item_type::CARRIER_RECON_II => 1.0,
        item_type::SEAPLANE_RECON => 1.2,
        item_type::SEAPLANE_BOMBER => 1.1,
        item_type::FLYING_BOAT => 1.0,
        _ => 0.6,
    }
}

fn los_improvement_bonus(kind: u32, improvement: u8) -> f64 {
    let rf = f64::from(improvement).sqrt();
    match kind {
        item_type::SEAPLANE_RECON => 1.2 * rf,
        item_type::SMALL_RADAR => 1.25 * rf,
        item_type::LARGE_RADAR => 1.4 * rf,
        item_type::SEAPLANE_BOMBER => 1.15 * rf,
        _ => 0.0,
    }
}

/// Detection value of a fleet under HQ level `hqlv` for `formation` (1..=5).
///
/// `Σ√ship_los + formation · Σ coef·(item_los + improvement) − ⌈0.4·hqlv⌉ + 2·(6 − ships)`,
/// rounded to two decimals.
pub fn compute_los(ships: &[Ship], hqlv: u32, formation: u8) -> f64 {
    let equipped: Vec<&Ship> = ships.iter().filter(|s| s.is_equipped()).collect();

    let ship_term: f64 = equipped
        .iter()
        .map(|s| f64::from(s.los_base).sqrt())
        .sum();
    let item_term: f64 = equipped
        .iter()
        .flat_map(|s| s.all_items())
        .filter(|i| i.is_equipped())
        .map(|i| {
            los_coefficient(i.item_type)
                * (f64::from(i.los) + los_improvement_bonus(i.item_type, i.improvement))
        })
        .sum();
    let hq_term = (0.4 * f64::from(hqlv)).ceil();
    let vacancy = 2.0 * (6.0 - equipped.len() as f64);

    let raw = ship_term + f64::from(formation) * item_term - hq_term + vacancy;
    (raw * 100.0).round() / 100.0
}

pub fn compute_air_power(ships: &[Ship]) -> AirPower {
    ships
        .iter()
        .filter(|s| s.is_equipped())
        .map(|s| s.air_power)
        .sum()
}

pub fn compute_speed(ships: &[Ship]) -> Speed {
    ships
        .iter()
        .filter(|s| s.is_equipped())
        .map(|s| s.speed)
        .fold(Speed::UNCONSTRAINED, Speed::min)
}

/// True iff any equipped ship across `fleets` has exactly five equipment slots.
pub fn has_five_slot(fleets: &[Fleet]) -> bool {
    fleets
        .iter()
        .flat_map(Fleet::equipped)
        .any(|s| s.slot_num == 5)
}

/// Internal proficiency bounds per proficiency rank 0..=7.
const INTERNAL_PROFICIENCY: [(u32, u32); 8] = [
    (0, 9),
    (10, 24),
    (25, 39),
    (40, 54),
    (55, 69),
    (70, 84),
    (85, 99),
    (100, 120),
];
const FIGHTER_PROFICIENCY_BONUS: [u32; 8] = [0, 0, 2, 5, 9, 14, 14, 22];
const SEAPLANE_BOMBER_PROFICIENCY_BONUS: [u32; 8] = [0, 0, 1, 1, 1, 3, 3, 6];

fn is_fighter(kind: u32) -> bool {
    matches!(
        kind,
        item_type::CARRIER_FIGHTER | item_type::SEAPLANE_FIGHTER | item_type::JET_FIGHTER
    )
}

fn is_air_combat(kind: u32) -> bool {
    is_fighter(kind)
        || matches!(
            kind,
            item_type::CARRIER_DIVE_BOMBER
                | item_type::CARRIER_TORPEDO_BOMBER
                | item_type::SEAPLANE_BOMBER
                | item_type::JET_BOMBER
                | item_type::JET_TORPEDO_BOMBER
        )
}

fn item_air_power(item: &Item, aircraft: u32) -> AirPower {
    let rf = f64::from(item.improvement);
    let improvement = if is_fighter(item.item_type) {
        0.2 * rf
    } else if item.item_type == item_type::CARRIER_DIVE_BOMBER && item.aa > 0 {
        0.25 * rf
    } else {
        0.0
    };
    let aa = f64::from(item.aa.max(0)) + improvement;
    let base = (f64::from(aircraft).sqrt() * aa).floor() as u32;

    let rank = usize::from(item.proficiency.min(7));
    let (lo, hi) = INTERNAL_PROFICIENCY[rank];
    let type_bonus = if is_fighter(item.item_type) {
        FIGHTER_PROFICIENCY_BONUS[rank]
    } else if item.item_type == item_type::SEAPLANE_BOMBER {
        SEAPLANE_BOMBER_PROFICIENCY_BONUS[rank]
    } else {
        0
    };
    let bonus = |internal: u32| (f64::from(internal) / 10.0).sqrt().floor() as u32 + type_bonus;

    AirPower::new(base + bonus(lo), base + bonus(hi))
}

/// Air power contributed by one ship's regular slots.
///
/// Only air-combat aircraft in slots with a positive aircraft count contribute.
pub fn ship_air_power(items: &[Item], aircraft: &[u32]) -> AirPower {
    items
        .iter()
        .zip(aircraft)
        .filter(|(item, count)| item.is_equipped() && **count > 0 && is_air_combat(item.item_type))
        .map(|(item, count)| item_air_power(item, *count))
        .sum()
}
