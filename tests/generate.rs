use std::sync::{Arc, Mutex};

use deckimage::model::fleet::Airbase;
use deckimage::{
    Canvas, DARK_BACKGROUND, DeckBuilder, DeckImageError, DeckImageResult, FleetRenderInput,
    FleetRenderer, Generator, GeneratorConfig, LIGHT_BACKGROUND, Lang, MasterData, PanelRenderer,
    ParameterPanelInput, Rgba8, ShipStats, Speed, StaticSource, Theme, ThemeRegistry,
};

const FLEET_WIDTH: u32 = 100;
const ROW: u32 = 10;
const PANEL: (u32, u32) = (30, 20);
const PARAMS: Rgba8 = Rgba8::opaque(0, 200, 0);
const AIRBASE: Rgba8 = Rgba8::opaque(0, 0, 200);

fn fleet_color(index: usize) -> Rgba8 {
    Rgba8::opaque(40 * (index as u8 + 1), 0, 0)
}

/// One row per equipped ship plus a header row.
struct SolidFleet;

impl FleetRenderer for SolidFleet {
    fn render_fleet(&self, input: &FleetRenderInput<'_>) -> DeckImageResult<Canvas> {
        let rows = input.ships.iter().filter(|s| s.is_equipped()).count() as u32 + 1;
        Ok(Canvas::filled(FLEET_WIDTH, rows * ROW, fleet_color(input.index)))
    }
}

#[derive(Clone, Default)]
struct SolidPanels {
    parameter_ships: Arc<Mutex<Vec<usize>>>,
}

impl PanelRenderer for SolidPanels {
    fn render_parameters(&self, input: &ParameterPanelInput<'_>) -> DeckImageResult<Canvas> {
        self.parameter_ships.lock().unwrap().push(input.ships.len());
        Ok(Canvas::filled(PANEL.0, PANEL.1, PARAMS))
    }

    fn render_airbases(&self, _airbases: &[Airbase], _lang: Lang) -> DeckImageResult<Canvas> {
        Ok(Canvas::filled(PANEL.0, PANEL.1, AIRBASE))
    }
}

struct FailOnSecond;

impl FleetRenderer for FailOnSecond {
    fn render_fleet(&self, input: &FleetRenderInput<'_>) -> DeckImageResult<Canvas> {
        if input.index == 1 {
            return Err(DeckImageError::render("test", "boom"));
        }
        SolidFleet.render_fleet(input)
    }
}

fn master() -> MasterData {
    MasterData::from_slice(include_bytes!("data/START2.json")).unwrap()
}

fn source() -> StaticSource {
    let stats = |min, max| ShipStats {
        los: deckimage::model::master::StatRange { min, max },
    };
    StaticSource::new(master())
        .with_ship_stats(10, stats(49, 89))
        .with_ship_stats(30, stats(12, 39))
}

fn registry() -> ThemeRegistry {
    Theme::ALL
        .into_iter()
        .fold(ThemeRegistry::empty(), |r, t| r.with_fleet_renderer(t, SolidFleet))
        .with_panel_renderer(SolidPanels::default())
}

fn generator(registry: ThemeRegistry) -> Generator {
    Generator::new(source(), registry, GeneratorConfig::default()).unwrap()
}

fn ship(id: u32) -> String {
    format!(r#"{{"id":{id},"lv":50,"los":9}}"#)
}

/// A fleet holding `n` destroyers.
fn fleet(n: usize) -> String {
    let slots: Vec<String> = (1..=n).map(|i| format!(r#""s{i}":{}"#, ship(20))).collect();
    format!("{{{}}}", slots.join(","))
}

fn deck(theme: &str, fleets: &[usize], airbase: bool) -> DeckBuilder {
    let mut parts = vec![format!(r#""theme":"{theme}""#)];
    for (i, n) in fleets.iter().enumerate() {
        parts.push(format!(r#""f{}":{}"#, i + 1, fleet(*n)));
    }
    if airbase {
        parts.push(r#""a1":{"mode":1,"items":{"i1":{"id":100}}}"#.to_string());
    } else {
        parts.push(r#""a1":{"mode":1,"items":{"i1":{"id":0}}}"#.to_string());
    }
    DeckBuilder::from_json(&format!("{{{}}}", parts.join(","))).unwrap()
}

#[test]
fn dark_single_fleet_places_parameters_beside_strip() {
    let img = generator(registry())
        .generate(&deck("dark", &[1], false))
        .unwrap();
    assert_eq!((img.width(), img.height()), (FLEET_WIDTH + PANEL.0 + 2, 2 * ROW));
    assert_eq!(img.pixel(0, 0), Some(fleet_color(0)));
    assert_eq!(img.pixel(FLEET_WIDTH, 0), Some(DARK_BACKGROUND));
    assert_eq!(img.pixel(FLEET_WIDTH + 2, 0), Some(PARAMS));
}

#[test]
fn dark_single_fleet_with_airbase_reserves_extra_column() {
    let img = generator(registry())
        .generate(&deck("dark", &[1], true))
        .unwrap();
    assert_eq!(img.width(), FLEET_WIDTH + 2 * (PANEL.0 + 2));
    assert_eq!(img.pixel(FLEET_WIDTH + 2, 0), Some(AIRBASE));
    assert_eq!(img.pixel(FLEET_WIDTH + PANEL.0 + 4, 0), Some(PARAMS));
}

#[test]
fn dark_many_fleets_wrap_into_two_columns() {
    let img = generator(registry())
        .generate(&deck("dark", &[2, 1, 1], true))
        .unwrap();
    // rows of 30 and 20 pixels, two 100-pixel columns, panel column on the right
    assert_eq!((img.width(), img.height()), (2 * FLEET_WIDTH + PANEL.0 + 2, 50));
    assert_eq!(img.pixel(0, 0), Some(fleet_color(0)));
    assert_eq!(img.pixel(FLEET_WIDTH, 0), Some(fleet_color(1)));
    assert_eq!(img.pixel(FLEET_WIDTH, 25), Some(DARK_BACKGROUND));
    assert_eq!(img.pixel(0, 30), Some(fleet_color(2)));

    let x = 2 * FLEET_WIDTH + 2;
    assert_eq!(img.pixel(x, 0), Some(AIRBASE));
    assert_eq!(img.pixel(x, PANEL.1), Some(PARAMS));
    assert_eq!(img.pixel(x, 2 * PANEL.1 + 5), Some(DARK_BACKGROUND));
}

fn contains_color(img: &Canvas, color: Rgba8) -> bool {
    img.as_image().pixels().any(|p| Rgba8::from(*p) == color)
}

#[test]
fn airbase_with_only_empty_items_draws_no_panel() {
    let img = generator(registry())
        .generate(&deck("dark", &[2, 1, 1], false))
        .unwrap();
    assert_eq!(img.width(), 2 * FLEET_WIDTH + PANEL.0 + 2);
    assert!(!contains_color(&img, AIRBASE));
    let x = 2 * FLEET_WIDTH + 2;
    assert_eq!(img.pixel(x, 0), Some(DARK_BACKGROUND));
    assert_eq!(img.pixel(x, PANEL.1), Some(PARAMS));

    let single = generator(registry())
        .generate(&deck("dark", &[1], false))
        .unwrap();
    assert!(!contains_color(&single, AIRBASE));
}

#[test]
fn two_fleets_stay_in_one_column() {
    let img = generator(registry())
        .generate(&deck("dark", &[1, 3], false))
        .unwrap();
    assert_eq!(img.height(), 2 * ROW + 4 * ROW);
    assert_eq!(img.pixel(0, 2 * ROW), Some(fleet_color(1)));
    // parameter panel drops below the (absent) airbase band
    assert_eq!(img.pixel(FLEET_WIDTH + 2, 0), Some(DARK_BACKGROUND));
    assert_eq!(img.pixel(FLEET_WIDTH + 2, PANEL.1), Some(PARAMS));
}

#[test]
fn compact_themes_use_two_columns_and_white_gaps() {
    let img = generator(registry())
        .generate(&deck("74sb", &[2, 1], true))
        .unwrap();
    assert_eq!((img.width(), img.height()), (2 * FLEET_WIDTH, 3 * ROW));
    assert_eq!(img.pixel(FLEET_WIDTH, 2 * ROW + 1), Some(LIGHT_BACKGROUND));
    assert_eq!(img.pixel(FLEET_WIDTH, 0), Some(fleet_color(1)));
}

#[test]
fn parameter_panel_sees_first_two_fleets() {
    let panels = SolidPanels::default();
    let registry = ThemeRegistry::empty()
        .with_fleet_renderer(Theme::Dark, SolidFleet)
        .with_panel_renderer(panels.clone());
    generator(registry)
        .generate(&deck("dark", &[1, 2, 3], false))
        .unwrap();
    assert_eq!(*panels.parameter_ships.lock().unwrap(), vec![12]);
}

#[test]
fn unknown_theme_fails() {
    let err = generator(registry())
        .generate(&deck("nonexistent", &[1], false))
        .unwrap_err();
    assert!(matches!(err, DeckImageError::UnknownTheme(tag) if tag == "nonexistent"));
}

#[test]
fn theme_without_renderer_fails() {
    let registry = ThemeRegistry::empty().with_fleet_renderer(Theme::Dark, SolidFleet);
    let err = generator(registry)
        .generate(&deck("74lc", &[1], false))
        .unwrap_err();
    assert!(matches!(err, DeckImageError::UnknownTheme(_)));
}

#[test]
fn one_failing_fleet_fails_the_whole_image() {
    let registry = ThemeRegistry::empty().with_fleet_renderer(Theme::LargeCard, FailOnSecond);
    let err = generator(registry)
        .generate(&deck("74lc", &[1, 1, 1], false))
        .unwrap_err();
    match err {
        DeckImageError::Render { stage, message } => {
            assert_eq!(stage, "fleet #2");
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn serial_and_parallel_agree() {
    let raw = deck("dark", &[2, 1, 4, 1], true);
    let parallel = generator(registry()).generate(&raw).unwrap();
    let serial = Generator::new(
        source(),
        registry(),
        GeneratorConfig {
            parallel: false,
            ..GeneratorConfig::default()
        },
    )
    .unwrap()
    .generate(&raw)
    .unwrap();
    assert_eq!(parallel.as_image(), serial.as_image());
}

#[test]
fn caller_supplied_master_bypasses_source() {
    let empty = Generator::new(
        StaticSource::default(),
        registry(),
        GeneratorConfig::default(),
    )
    .unwrap();
    let raw = deck("dark", &[1], false);
    assert!(matches!(
        empty.generate(&raw).unwrap_err(),
        DeckImageError::Validation(_)
    ));
    let img = empty.generate_with_master(&raw, master()).unwrap();
    assert_eq!(img.height(), 2 * ROW);
}

#[test]
fn missing_ship_details_fail_validation() {
    let raw = DeckBuilder::from_json(r#"{"f1":{"s1":{"id":40,"lv":10}}}"#).unwrap();
    let err = generator(registry()).generate(&raw).unwrap_err();
    assert!(matches!(err, DeckImageError::Validation(msg) if msg.contains("ship 40")));
}

#[test]
fn fleet_stats_cover_every_fleet_in_order() {
    let raw = DeckBuilder::from_json(&format!(
        r#"{{"f1":{{"s1":{{"id":30,"lv":99}},"s2":{}}},"f2":{{}}}}"#,
        ship(20)
    ))
    .unwrap();
    let stats = generator(ThemeRegistry::empty()).fleet_stats(&raw).unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].speed, Speed::SLOW);
    assert_eq!(stats[1].speed, Speed::UNCONSTRAINED);
    assert_eq!(stats[1].air_power, deckimage::AirPower::default());
    assert_eq!(stats[0].los.entries().count(), 5);
}
