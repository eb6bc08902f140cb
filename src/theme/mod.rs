//! Theme dispatch: a lookup table from theme tag to renderer capability.
//!
//! The dispatcher never draws. It resolves the deck's theme tag, assembles the shared render
//! input, and hands each fleet to the registered [`FleetRenderer`]. Unknown tags are rejected
//! with [`DeckImageError::UnknownTheme`].

pub mod builtin;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::foundation::core::{Canvas, DARK_BACKGROUND, LIGHT_BACKGROUND, Rgba8};
use crate::foundation::error::{DeckImageError, DeckImageResult};
use crate::model::deck::{AirState, Lang};
use crate::model::fleet::{Airbase, Fleet, Ship};
use crate::stats::{AirPower, FleetStats, LoS, Speed};

/// Closed set of supported themes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Theme {
    /// Full-detail dark theme with parameter and airbase panels.
    Dark,
    /// Compact large-card layout (`74lc`).
    LargeCard,
    /// Compact medium cut-in layout (`74mc`).
    MediumCutin,
    /// Compact small-banner layout (`74sb`).
    SmallBanner,
}

impl Theme {
    pub const ALL: [Self; 4] = [
        Self::Dark,
        Self::LargeCard,
        Self::MediumCutin,
        Self::SmallBanner,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::LargeCard => "74lc",
            Self::MediumCutin => "74mc",
            Self::SmallBanner => "74sb",
        }
    }

    /// Compact themes that always tile fleets in two columns.
    pub fn is_two_column(self) -> bool {
        matches!(self, Self::LargeCard | Self::SmallBanner)
    }

    /// Backdrop behind the composite.
    pub fn background(self) -> Rgba8 {
        match self {
            Self::Dark => DARK_BACKGROUND,
            _ => LIGHT_BACKGROUND,
        }
    }

    /// Themes whose fleet renderer receives the five-slot hint.
    pub fn wants_five_slot_hint(self) -> bool {
        matches!(self, Self::MediumCutin | Self::SmallBanner)
    }

    /// Themes that add the parameter and airbase panels next to the fleet strip.
    pub fn has_panels(self) -> bool {
        matches!(self, Self::Dark)
    }
}

impl FromStr for Theme {
    type Err = DeckImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.tag() == s)
            .ok_or_else(|| DeckImageError::unknown_theme(s))
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Shared input contract for every fleet renderer.
#[derive(Clone, Copy, Debug)]
pub struct FleetRenderInput<'a> {
    /// Position of the fleet in the deck (0-based).
    pub index: usize,
    pub name: &'a str,
    pub ships: &'a [Ship],
    pub los: LoS,
    pub air_power: AirPower,
    pub speed: Speed,
    pub lang: Lang,
    /// Present only for themes that take the five-slot hint.
    pub five_slot: Option<bool>,
}

/// Input for the dark theme's parameter panel.
#[derive(Clone, Copy, Debug)]
pub struct ParameterPanelInput<'a> {
    pub ships: &'a [Ship],
    pub air_state: AirState,
    pub comment: &'a str,
    pub lang: Lang,
}

/// Produces one fleet's sub-image.
pub trait FleetRenderer: Send + Sync {
    fn render_fleet(&self, input: &FleetRenderInput<'_>) -> DeckImageResult<Canvas>;
}

/// Produces the dark theme's shared panels.
pub trait PanelRenderer: Send + Sync {
    fn render_parameters(&self, input: &ParameterPanelInput<'_>) -> DeckImageResult<Canvas>;

    fn render_airbases(&self, airbases: &[Airbase], lang: Lang) -> DeckImageResult<Canvas>;
}

/// Theme tag -> renderer lookup table.
#[derive(Clone, Default)]
pub struct ThemeRegistry {
    fleets: BTreeMap<Theme, Arc<dyn FleetRenderer>>,
    panels: Option<Arc<dyn PanelRenderer>>,
}

impl fmt::Debug for ThemeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeRegistry")
            .field("themes", &self.fleets.keys().collect::<Vec<_>>())
            .field("panels", &self.panels.is_some())
            .finish()
    }
}

impl ThemeRegistry {
    /// A table with no renderers; every theme resolves to `UnknownTheme`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in SVG renderers for all four themes.
    pub fn builtin() -> Self {
        builtin::registry(builtin::SvgRasterizer::with_system_fonts())
    }

    pub fn with_fleet_renderer(
        mut self,
        theme: Theme,
        renderer: impl FleetRenderer + 'static,
    ) -> Self {
        self.fleets.insert(theme, Arc::new(renderer));
        self
    }

    pub fn with_panel_renderer(mut self, renderer: impl PanelRenderer + 'static) -> Self {
        self.panels = Some(Arc::new(renderer));
        self
    }

    pub fn themes(&self) -> impl Iterator<Item = Theme> + '_ {
        self.fleets.keys().copied()
    }

    /// Resolve a theme tag to its renderer.
    pub fn resolve(&self, tag: &str) -> DeckImageResult<(Theme, Arc<dyn FleetRenderer>)> {
        let theme = Theme::from_str(tag)?;
        let renderer = self
            .fleets
            .get(&theme)
            .cloned()
            .ok_or_else(|| DeckImageError::unknown_theme(tag))?;
        Ok((theme, renderer))
    }

    pub fn panels(&self) -> DeckImageResult<Arc<dyn PanelRenderer>> {
        self.panels
            .clone()
            .ok_or_else(|| DeckImageError::render("panels", "no panel renderer registered"))
    }
}

/// Route one fleet to `renderer`, attaching the five-slot hint only where the theme takes it.
pub fn dispatch_fleet(
    renderer: &dyn FleetRenderer,
    theme: Theme,
    index: usize,
    fleet: &Fleet,
    stats: &FleetStats,
    lang: Lang,
    five_slot: bool,
) -> DeckImageResult<Canvas> {
    let input = FleetRenderInput {
        index,
        name: &fleet.name,
        ships: &fleet.ships,
        los: stats.los,
        air_power: stats.air_power,
        speed: stats.speed,
        lang,
        five_slot: theme.wants_five_slot_hint().then_some(five_slot),
    };
    renderer
        .render_fleet(&input)
        .map_err(|e| e.in_stage(format!("fleet #{}", index + 1)))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Option<bool>>>);

    impl FleetRenderer for Arc<Recorder> {
        fn render_fleet(&self, input: &FleetRenderInput<'_>) -> DeckImageResult<Canvas> {
            self.0.lock().unwrap().push(input.five_slot);
            Ok(Canvas::new(1, 1))
        }
    }

    struct Failing;

    impl FleetRenderer for Failing {
        fn render_fleet(&self, _input: &FleetRenderInput<'_>) -> DeckImageResult<Canvas> {
            Err(DeckImageError::render("renderer", "out of ink"))
        }
    }

    fn fleet() -> Fleet {
        Fleet {
            name: "f1".to_string(),
            ships: vec![Ship::empty()],
        }
    }

    fn stats() -> FleetStats {
        crate::stats::fleet_stats(&[], 120)
    }

    #[test]
    fn tags_round_trip_and_unknown_is_rejected() {
        for theme in Theme::ALL {
            assert_eq!(theme.tag().parse::<Theme>().unwrap(), theme);
        }
        let err = "nonexistent".parse::<Theme>().unwrap_err();
        assert!(matches!(err, DeckImageError::UnknownTheme(tag) if tag == "nonexistent"));
    }

    #[test]
    fn theme_properties() {
        assert!(Theme::LargeCard.is_two_column());
        assert!(Theme::SmallBanner.is_two_column());
        assert!(!Theme::MediumCutin.is_two_column());
        assert!(!Theme::Dark.is_two_column());
        assert_eq!(Theme::Dark.background(), DARK_BACKGROUND);
        assert_eq!(Theme::MediumCutin.background(), LIGHT_BACKGROUND);
        assert!(Theme::Dark.has_panels());
        assert!(!Theme::SmallBanner.has_panels());
    }

    #[test]
    fn registered_but_missing_theme_is_unknown() {
        let reg = ThemeRegistry::empty().with_fleet_renderer(Theme::Dark, Failing);
        assert!(reg.resolve("dark").is_ok());
        assert!(matches!(
            reg.resolve("74lc"),
            Err(DeckImageError::UnknownTheme(_))
        ));
        assert!(reg.panels().is_err());
    }

    #[test]
    fn five_slot_hint_only_reaches_compact_banner_themes() {
        let rec = Arc::new(Recorder::default());
        for theme in Theme::ALL {
            dispatch_fleet(&rec, theme, 0, &fleet(), &stats(), Lang::En, true).unwrap();
        }
        let seen = rec.0.lock().unwrap().clone();
        assert_eq!(seen, vec![None, None, Some(true), Some(true)]);
    }

    #[test]
    fn renderer_failure_names_the_fleet() {
        let err = dispatch_fleet(&Failing, Theme::Dark, 2, &fleet(), &stats(), Lang::Jp, false)
            .unwrap_err();
        assert_eq!(err.to_string(), "render error (fleet #3): out of ink");
    }
}
