use std::path::PathBuf;

use deckimage::theme::builtin::{self, SvgRasterizer};
use deckimage::{DARK_BACKGROUND, DeckBuilder, DirSource, Generator, GeneratorConfig, Speed};

fn data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn generator() -> Generator {
    let source = DirSource::new(data("START2.json")).with_ship_dir(data("ship"));
    Generator::new(
        source,
        builtin::registry(SvgRasterizer::without_fonts()),
        GeneratorConfig::default(),
    )
    .unwrap()
}

fn deck() -> DeckBuilder {
    DeckBuilder::from_path(data("deck.json")).unwrap()
}

#[test]
fn dark_fixture_renders_with_panel_column() {
    let img = generator().generate(&deck()).unwrap();
    // two six-slot fleets stacked, one panel column with airbase over parameters
    assert_eq!((img.width(), img.height()), (640 + 300 + 2, 2 * 420));
    assert_eq!(img.pixel(641, 0), Some(DARK_BACKGROUND));
    assert_eq!(img.pixel(941, 839), Some(DARK_BACKGROUND));

    let png = img.to_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!(decoded.width(), img.width());
}

#[test]
fn compact_themes_render_side_by_side() {
    let generator = generator();
    for (theme, fleet_width) in [("74lc", 632), ("74mc", 560), ("74sb", 618)] {
        let mut raw = deck();
        raw.theme = Some(theme.to_string());
        let img = generator.generate(&raw).unwrap();
        assert_eq!(img.width(), 2 * fleet_width, "theme {theme}");
    }
}

#[test]
fn every_language_renders() {
    let generator = generator();
    for lang in ["jp", "en", "kr", "scn"] {
        let mut raw = deck();
        raw.lang = lang.parse().unwrap();
        assert!(generator.generate(&raw).is_ok(), "lang {lang}");
    }
}

#[test]
fn fixture_statistics() {
    let stats = generator().fleet_stats(&deck()).unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].speed, Speed::SLOW);
    assert_eq!(stats[1].speed, Speed::FAST);
    assert!(stats[0].air_power.min > 0);
    assert!(stats[0].air_power.min <= stats[0].air_power.max);
    assert_eq!(stats[1].air_power.max, 0);
    for (formation, value) in stats[0].los.entries() {
        assert!(value.is_finite(), "formation {formation}");
    }
}
