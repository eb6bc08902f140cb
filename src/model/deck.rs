//! Raw deck-builder record, as supplied by the caller.
//!
//! Ids may arrive as JSON numbers or numeric strings; both are accepted.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::foundation::error::{DeckImageError, DeckImageResult};

/// Output language for renderer labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Jp,
    En,
    Kr,
    Scn,
}

impl std::str::FromStr for Lang {
    type Err = DeckImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jp" => Ok(Self::Jp),
            "en" => Ok(Self::En),
            "kr" => Ok(Self::Kr),
            "scn" => Ok(Self::Scn),
            other => Err(DeckImageError::validation(format!(
                "unknown lang \"{other}\" (expected jp, en, kr or scn)"
            ))),
        }
    }
}

/// Air-superiority state shown on the dark parameter panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AirState {
    #[default]
    #[serde(rename = "AS+")]
    Supremacy,
    #[serde(rename = "AS")]
    Superiority,
    #[serde(rename = "AP")]
    Parity,
    #[serde(rename = "AD")]
    Denial,
    #[serde(rename = "AI")]
    Incapability,
}

impl AirState {
    pub fn code(self) -> &'static str {
        match self {
            Self::Supremacy => "AS+",
            Self::Superiority => "AS",
            Self::Parity => "AP",
            Self::Denial => "AD",
            Self::Incapability => "AI",
        }
    }
}

impl fmt::Display for AirState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

pub(crate) const DEFAULT_THEME: &str = "dark";
pub(crate) const DEFAULT_HQ_LEVEL: u32 = 120;

/// The deck-builder record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckBuilder {
    #[serde(default)]
    pub lang: Lang,
    /// Theme tag. Resolved against the renderer table at generation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hqlv: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f1: Option<DeckBuilderFleet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f2: Option<DeckBuilderFleet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f3: Option<DeckBuilderFleet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f4: Option<DeckBuilderFleet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a1: Option<DeckBuilderAirbase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a2: Option<DeckBuilderAirbase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a3: Option<DeckBuilderAirbase>,
    #[serde(rename = "s", default)]
    pub air_state: AirState,
    #[serde(rename = "cmt", default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl DeckBuilder {
    pub fn from_json(s: &str) -> DeckImageResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| DeckImageError::validation(format!("parse deck builder JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> DeckImageResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            DeckImageError::validation(format!("open deck builder JSON '{}': {e}", path.display()))
        })?;
        Self::from_json(&s)
    }

    pub fn theme_tag(&self) -> &str {
        self.theme.as_deref().unwrap_or(DEFAULT_THEME)
    }

    /// Present fleets in key order, with their key.
    pub fn fleets(&self) -> impl Iterator<Item = (&'static str, &DeckBuilderFleet)> {
        [
            ("f1", &self.f1),
            ("f2", &self.f2),
            ("f3", &self.f3),
            ("f4", &self.f4),
        ]
        .into_iter()
        .filter_map(|(key, f)| f.as_ref().map(|f| (key, f)))
    }

    /// Present airbases in key order, with their key.
    pub fn airbases(&self) -> impl Iterator<Item = (&'static str, &DeckBuilderAirbase)> {
        [("a1", &self.a1), ("a2", &self.a2), ("a3", &self.a3)]
            .into_iter()
            .filter_map(|(key, a)| a.as_ref().map(|a| (key, a)))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckBuilderFleet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s1: Option<DeckBuilderShip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s2: Option<DeckBuilderShip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3: Option<DeckBuilderShip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s4: Option<DeckBuilderShip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s5: Option<DeckBuilderShip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s6: Option<DeckBuilderShip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s7: Option<DeckBuilderShip>,
}

impl DeckBuilderFleet {
    pub fn slots(&self) -> [Option<&DeckBuilderShip>; 7] {
        [
            self.s1.as_ref(),
            self.s2.as_ref(),
            self.s3.as_ref(),
            self.s4.as_ref(),
            self.s5.as_ref(),
            self.s6.as_ref(),
            self.s7.as_ref(),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckBuilderShip {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: i64,
    #[serde(default = "default_level")]
    pub lv: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub luck: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<u32>,
    /// Explicit line-of-sight base. Without it the per-ship detail resource is consulted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub los: Option<u32>,
    #[serde(default)]
    pub items: DeckBuilderItems,
}

fn default_level() -> u32 {
    1
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckBuilderItems {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i1: Option<DeckBuilderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i2: Option<DeckBuilderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i3: Option<DeckBuilderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i4: Option<DeckBuilderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i5: Option<DeckBuilderItem>,
    /// Reinforcement expansion slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ix: Option<DeckBuilderItem>,
}

impl DeckBuilderItems {
    pub fn regular(&self) -> [Option<&DeckBuilderItem>; 5] {
        [
            self.i1.as_ref(),
            self.i2.as_ref(),
            self.i3.as_ref(),
            self.i4.as_ref(),
            self.i5.as_ref(),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckBuilderItem {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: i64,
    /// Improvement level (0..=10).
    #[serde(default)]
    pub rf: u8,
    /// Aircraft proficiency (0..=7).
    #[serde(default)]
    pub mas: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckBuilderAirbase {
    #[serde(default)]
    pub mode: u8,
    #[serde(default)]
    pub items: DeckBuilderItems,
}

fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Num(i64),
        Str(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Num(n) => Ok(n),
        Repr::Str(s) if s.trim().is_empty() => Ok(0),
        Repr::Str(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid id \"{s}\""))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_minimal_record() {
        let d = DeckBuilder::from_json(r#"{"f1":{}}"#).unwrap();
        assert_eq!(d.lang, Lang::Jp);
        assert_eq!(d.theme_tag(), "dark");
        assert_eq!(d.air_state, AirState::Supremacy);
        assert_eq!(d.fleets().count(), 1);
        assert_eq!(d.airbases().count(), 0);
    }

    #[test]
    fn lang_parses_lowercase_tags() {
        assert_eq!("scn".parse::<Lang>().unwrap(), Lang::Scn);
        assert!("EN".parse::<Lang>().is_err());
    }

    #[test]
    fn ids_accept_strings_and_numbers() {
        let d = DeckBuilder::from_json(
            r#"{"lang":"en","theme":"74sb","s":"AP","cmt":"hi",
                "f2":{"s1":{"id":"123","lv":99,"items":{"i1":{"id":5,"rf":4},"ix":{"id":"7"}}}}}"#,
        )
        .unwrap();
        assert_eq!(d.lang, Lang::En);
        assert_eq!(d.theme_tag(), "74sb");
        assert_eq!(d.air_state.to_string(), "AP");
        let (key, fleet) = d.fleets().next().unwrap();
        assert_eq!(key, "f2");
        let ship = fleet.s1.as_ref().unwrap();
        assert_eq!(ship.id, 123);
        assert_eq!(ship.items.i1.as_ref().unwrap().rf, 4);
        assert_eq!(ship.items.ix.as_ref().unwrap().id, 7);
    }

    #[test]
    fn unknown_language_is_validation_error() {
        let err = DeckBuilder::from_json(r#"{"lang":"xx"}"#).unwrap_err();
        assert!(matches!(err, DeckImageError::Validation(_)));
    }
}
