//! Validated fleet model produced by the deck parser. Immutable once built.

use serde::Serialize;

use crate::model::deck::{AirState, Lang};
use crate::stats::{AirPower, Speed};

/// One equipment slot. `id <= 0` marks an empty slot.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub item_type: u32,
    pub los: i32,
    pub aa: i32,
    pub improvement: u8,
    pub proficiency: u8,
}

impl Item {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_equipped(&self) -> bool {
        self.id > 0
    }
}

/// A ship position in a fleet. `id <= 0` is a sentinel for an empty position and is excluded
/// from every aggregate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ship {
    pub id: i64,
    pub name: String,
    pub level: u32,
    pub hp: Option<u32>,
    pub luck: Option<i32>,
    pub slot_num: u8,
    /// Line of sight without equipment.
    pub los_base: u32,
    /// Regular slots, `slot_num` long; empty slots are kept as empty items.
    pub items: Vec<Item>,
    pub extra_item: Option<Item>,
    /// This ship's own air power contribution.
    pub air_power: AirPower,
    pub speed: Speed,
}

impl Ship {
    /// Sentinel for an empty fleet position.
    pub fn empty() -> Self {
        Self {
            id: 0,
            name: String::new(),
            level: 0,
            hp: None,
            luck: None,
            slot_num: 0,
            los_base: 0,
            items: Vec::new(),
            extra_item: None,
            air_power: AirPower::default(),
            speed: Speed::UNCONSTRAINED,
        }
    }

    pub fn is_equipped(&self) -> bool {
        self.id > 0
    }

    /// Regular items followed by the expansion-slot item, empty slots included.
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().chain(self.extra_item.iter())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Fleet {
    pub name: String,
    /// Ordered positions; sentinel ships hold empty positions.
    pub ships: Vec<Ship>,
}

impl Fleet {
    pub fn equipped(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter().filter(|s| s.is_equipped())
    }

    /// At least one position is occupied by a real ship.
    pub fn has_ships(&self) -> bool {
        self.ships.iter().any(Ship::is_equipped)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Airbase {
    pub mode: u8,
    pub items: Vec<Item>,
}

impl Airbase {
    /// An airbase is active iff at least one item has a positive id.
    pub fn is_active(&self) -> bool {
        self.items.iter().any(Item::is_equipped)
    }
}

/// Parsed deck-builder record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Deck {
    pub lang: Lang,
    pub theme: String,
    pub hqlv: u32,
    pub fleets: Vec<Fleet>,
    pub airbases: Vec<Airbase>,
    pub air_state: AirState,
    pub comment: String,
}

impl Deck {
    pub fn uses_airbase(&self) -> bool {
        self.airbases.iter().any(Airbase::is_active)
    }

    /// Ships of up to the first two fleets, concatenated in order.
    pub fn leading_ships(&self) -> Vec<Ship> {
        self.fleets
            .iter()
            .take(2)
            .flat_map(|f| f.ships.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ship(id: i64) -> Ship {
        Ship {
            id,
            ..Ship::empty()
        }
    }

    #[test]
    fn airbase_activity_follows_positive_item_ids() {
        let idle = Airbase {
            mode: 1,
            items: vec![Item::empty()],
        };
        assert!(!idle.is_active());

        let active = Airbase {
            mode: 1,
            items: vec![
                Item::empty(),
                Item {
                    id: 7,
                    ..Item::default()
                },
            ],
        };
        assert!(active.is_active());
    }

    #[test]
    fn fleet_with_only_sentinels_has_no_ships() {
        let fleet = Fleet {
            name: "f1".to_string(),
            ships: vec![ship(0), ship(-1)],
        };
        assert!(!fleet.has_ships());
        assert_eq!(fleet.equipped().count(), 0);

        let fleet = Fleet {
            name: "f1".to_string(),
            ships: vec![ship(0), ship(3)],
        };
        assert!(fleet.has_ships());
    }

    #[test]
    fn leading_ships_takes_first_two_fleets() {
        let fleets = (1..=3)
            .map(|n| Fleet {
                name: format!("f{n}"),
                ships: vec![ship(n), ship(0)],
            })
            .collect();
        let deck = Deck {
            lang: Lang::Jp,
            theme: "dark".to_string(),
            hqlv: 120,
            fleets,
            airbases: vec![],
            air_state: AirState::Supremacy,
            comment: String::new(),
        };
        let ids: Vec<i64> = deck.leading_ships().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 0, 2, 0]);
    }
}
