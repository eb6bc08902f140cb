use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{DeckImageError, DeckImageResult};

/// Equipment category ids (third entry of an item's `api_type`).
pub mod item_type {
    pub const CARRIER_FIGHTER: u32 = 6;
    pub const CARRIER_DIVE_BOMBER: u32 = 7;
    pub const CARRIER_TORPEDO_BOMBER: u32 = 8;
    pub const CARRIER_RECON: u32 = 9;
    pub const SEAPLANE_RECON: u32 = 10;
    pub const SEAPLANE_BOMBER: u32 = 11;
    pub const SMALL_RADAR: u32 = 12;
    pub const LARGE_RADAR: u32 = 13;
    pub const FLYING_BOAT: u32 = 41;
    pub const SEAPLANE_FIGHTER: u32 = 45;
    pub const JET_FIGHTER: u32 = 56;
    pub const JET_BOMBER: u32 = 57;
    pub const JET_TORPEDO_BOMBER: u32 = 58;
    pub const CARRIER_RECON_II: u32 = 94;
}

/// Static attributes of a ship class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterShip {
    #[serde(rename = "api_id")]
    pub id: u32,
    #[serde(rename = "api_name", default)]
    pub name: String,
    /// Speed tier (5 slow, 10 fast, 15 fast+, 20 fastest).
    #[serde(rename = "api_soku", default)]
    pub speed: u8,
    #[serde(rename = "api_slot_num", default)]
    pub slot_num: u8,
    /// Aircraft capacity per regular slot.
    #[serde(rename = "api_maxeq", default)]
    pub max_aircraft: Vec<u32>,
}

/// Static attributes of an equipment item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterItem {
    #[serde(rename = "api_id")]
    pub id: u32,
    #[serde(rename = "api_name", default)]
    pub name: String,
    #[serde(rename = "api_type", default)]
    pub types: Vec<u32>,
    #[serde(rename = "api_saku", default)]
    pub los: i32,
    #[serde(rename = "api_tyku", default)]
    pub aa: i32,
}

impl MasterItem {
    /// Equipment category used by the LoS and air power formulas.
    pub fn item_type(&self) -> u32 {
        self.types.get(2).copied().unwrap_or(0)
    }
}

#[derive(Deserialize)]
struct MasterDataDef {
    #[serde(default)]
    api_mst_ship: Vec<MasterShip>,
    #[serde(default)]
    api_mst_slotitem: Vec<MasterItem>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MasterDocument {
    Wrapped { api_data: MasterDataDef },
    Bare(MasterDataDef),
}

/// Read-only reference dataset keyed by entity id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MasterData {
    ships: BTreeMap<u32, MasterShip>,
    items: BTreeMap<u32, MasterItem>,
}

impl MasterData {
    pub fn new(
        ships: impl IntoIterator<Item = MasterShip>,
        items: impl IntoIterator<Item = MasterItem>,
    ) -> Self {
        Self {
            ships: ships.into_iter().map(|s| (s.id, s)).collect(),
            items: items.into_iter().map(|i| (i.id, i)).collect(),
        }
    }

    /// Parse a master document, either bare or wrapped in `api_data`.
    pub fn from_slice(bytes: &[u8]) -> DeckImageResult<Self> {
        let doc: MasterDocument = serde_json::from_slice(bytes)
            .map_err(|e| DeckImageError::reference(format!("parse master data JSON: {e}")))?;
        let def = match doc {
            MasterDocument::Wrapped { api_data } => api_data,
            MasterDocument::Bare(def) => def,
        };
        Ok(Self::new(def.api_mst_ship, def.api_mst_slotitem))
    }

    pub fn ship(&self, id: u32) -> Option<&MasterShip> {
        self.ships.get(&id)
    }

    pub fn item(&self, id: u32) -> Option<&MasterItem> {
        self.items.get(&id)
    }

    pub fn ship_count(&self) -> usize {
        self.ships.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Level-dependent stat bounds from the per-ship detail resource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRange {
    pub min: u32,
    pub max: u32,
}

impl StatRange {
    /// Linear interpolation between level 0 (`min`) and level 99 (`max`), floored.
    pub fn at_level(self, level: u32) -> u32 {
        let min = f64::from(self.min);
        let max = f64::from(self.max);
        (min + (max - min) * f64::from(level) / 99.0).floor().max(0.0) as u32
    }
}

/// Per-ship detail resource (`<ship base>/<id>.json`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipStats {
    pub los: StatRange,
}

impl ShipStats {
    pub fn from_slice(bytes: &[u8]) -> DeckImageResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| DeckImageError::reference(format!("parse ship stats JSON: {e}")))
    }
}

/// Everything the deck parser reads: master data plus the ship details it needed.
#[derive(Clone, Debug, Default)]
pub struct ReferenceData {
    pub master: MasterData,
    pub ship_stats: BTreeMap<u32, ShipStats>,
}
