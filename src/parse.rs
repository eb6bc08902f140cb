//! Deck parser: raw deck-builder record + reference data -> validated [`Deck`].

use std::collections::BTreeSet;

use crate::foundation::error::{DeckImageError, DeckImageResult};
use crate::model::deck::{
    DEFAULT_HQ_LEVEL, DeckBuilder, DeckBuilderAirbase, DeckBuilderFleet, DeckBuilderItem,
    DeckBuilderShip,
};
use crate::model::fleet::{Airbase, Deck, Fleet, Item, Ship};
use crate::model::master::{MasterData, ReferenceData};
use crate::stats::{Speed, ship_air_power};

const MAX_HQ_LEVEL: u32 = 120;
const MAX_IMPROVEMENT: u8 = 10;
const MAX_PROFICIENCY: u8 = 7;
const DEFAULT_FLEET_SIZE: usize = 6;
const AIRBASE_SLOTS: usize = 4;

/// Ship ids whose LoS must come from the per-ship detail resource.
pub fn required_ship_stats(raw: &DeckBuilder) -> BTreeSet<u32> {
    raw.fleets()
        .flat_map(|(_, f)| f.slots())
        .flatten()
        .filter(|s| s.id > 0 && s.los.is_none())
        .filter_map(|s| u32::try_from(s.id).ok())
        .collect()
}

/// Validate and normalize a raw record. Any missing reference entry fails the whole deck.
pub fn parse_deck(raw: &DeckBuilder, refs: &ReferenceData) -> DeckImageResult<Deck> {
    let hqlv = raw.hqlv.unwrap_or(DEFAULT_HQ_LEVEL);
    if !(1..=MAX_HQ_LEVEL).contains(&hqlv) {
        return Err(DeckImageError::validation(format!(
            "hqlv must be in 1..={MAX_HQ_LEVEL}, got {hqlv}"
        )));
    }

    let fleets = raw
        .fleets()
        .map(|(key, f)| parse_fleet(key, f, refs))
        .collect::<DeckImageResult<Vec<_>>>()?;
    if fleets.is_empty() {
        return Err(DeckImageError::validation("deck has no fleets"));
    }

    let airbases = raw
        .airbases()
        .map(|(key, a)| parse_airbase(key, a, &refs.master))
        .collect::<DeckImageResult<Vec<_>>>()?;

    Ok(Deck {
        lang: raw.lang,
        theme: raw.theme_tag().to_string(),
        hqlv,
        fleets,
        airbases,
        air_state: raw.air_state,
        comment: raw.comment.clone().unwrap_or_default(),
    })
}

fn parse_fleet(key: &str, raw: &DeckBuilderFleet, refs: &ReferenceData) -> DeckImageResult<Fleet> {
    let slots = raw.slots();
    let len = slots
        .iter()
        .rposition(Option::is_some)
        .map_or(0, |last| last + 1)
        .max(DEFAULT_FLEET_SIZE);

    let ships = slots[..len]
        .iter()
        .enumerate()
        .map(|(i, slot)| match slot {
            Some(s) if s.id > 0 => parse_ship(&format!("{key}.s{}", i + 1), s, refs),
            _ => Ok(Ship::empty()),
        })
        .collect::<DeckImageResult<Vec<_>>>()?;

    Ok(Fleet {
        name: raw.name.clone().unwrap_or_else(|| key.to_string()),
        ships,
    })
}

fn parse_ship(path: &str, raw: &DeckBuilderShip, refs: &ReferenceData) -> DeckImageResult<Ship> {
    let id = u32::try_from(raw.id).map_err(|_| {
        DeckImageError::validation(format!("{path}: ship id {} out of range", raw.id))
    })?;
    let master = refs
        .master
        .ship(id)
        .ok_or_else(|| DeckImageError::validation(format!("{path}: unknown ship id {id}")))?;

    let los_base = match raw.los {
        Some(los) => los,
        None => refs
            .ship_stats
            .get(&id)
            .map(|stats| stats.los.at_level(raw.lv))
            .ok_or_else(|| {
                DeckImageError::validation(format!("{path}: no ship stats for ship id {id}"))
            })?,
    };

    let slot_num = usize::from(master.slot_num);
    let regular = raw.items.regular();
    let items = (0..slot_num)
        .map(|i| match regular.get(i).copied().flatten() {
            Some(item) => parse_item(&format!("{path}.i{}", i + 1), item, &refs.master),
            None => Ok(Item::empty()),
        })
        .collect::<DeckImageResult<Vec<_>>>()?;
    let extra_item = raw
        .items
        .ix
        .as_ref()
        .map(|item| parse_item(&format!("{path}.ix"), item, &refs.master))
        .transpose()?;

    let aircraft: Vec<u32> = (0..slot_num)
        .map(|i| master.max_aircraft.get(i).copied().unwrap_or(0))
        .collect();
    let air_power = ship_air_power(&items, &aircraft);

    Ok(Ship {
        id: raw.id,
        name: master.name.clone(),
        level: raw.lv,
        hp: raw.hp,
        luck: raw.luck,
        slot_num: master.slot_num,
        los_base,
        items,
        extra_item,
        air_power,
        speed: Speed(master.speed),
    })
}

fn parse_item(path: &str, raw: &DeckBuilderItem, master: &MasterData) -> DeckImageResult<Item> {
    if raw.id <= 0 {
        return Ok(Item::empty());
    }
    if raw.rf > MAX_IMPROVEMENT {
        return Err(DeckImageError::validation(format!(
            "{path}: improvement {} exceeds {MAX_IMPROVEMENT}",
            raw.rf
        )));
    }
    if raw.mas > MAX_PROFICIENCY {
        return Err(DeckImageError::validation(format!(
            "{path}: proficiency {} exceeds {MAX_PROFICIENCY}",
            raw.mas
        )));
    }

    let entry = u32::try_from(raw.id)
        .ok()
        .and_then(|id| master.item(id))
        .ok_or_else(|| DeckImageError::validation(format!("{path}: unknown item id {}", raw.id)))?;

    Ok(Item {
        id: raw.id,
        name: entry.name.clone(),
        item_type: entry.item_type(),
        los: entry.los,
        aa: entry.aa,
        improvement: raw.rf,
        proficiency: raw.mas,
    })
}

fn parse_airbase(
    key: &str,
    raw: &DeckBuilderAirbase,
    master: &MasterData,
) -> DeckImageResult<Airbase> {
    let slots = raw.items.regular();
    let items = slots[..AIRBASE_SLOTS]
        .iter()
        .enumerate()
        .map(|(i, slot)| match slot {
            Some(item) => parse_item(&format!("{key}.i{}", i + 1), item, master),
            None => Ok(Item::empty()),
        })
        .collect::<DeckImageResult<Vec<_>>>()?;

    Ok(Airbase {
        mode: raw.mode,
        items,
    })
}
