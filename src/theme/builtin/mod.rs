//! Built-in renderers. Each builds an SVG document from the computed statistics and
//! rasterizes it; pixel layout inside a sub-image is not part of any contract.

mod banner;
mod card;
mod cutin;
mod dark;
mod labels;
mod svg;

pub use banner::SmallBannerRenderer;
pub use card::LargeCardRenderer;
pub use cutin::MediumCutinRenderer;
pub use dark::{DarkFleetRenderer, DarkPanelRenderer};
pub use svg::SvgRasterizer;

use crate::foundation::core::Rgba8;
use crate::model::fleet::Ship;
use crate::stats::{AirPower, LoS};
use crate::theme::{FleetRenderInput, Theme, ThemeRegistry};

use labels::Labels;
use svg::{Anchor, SvgDoc};

pub(crate) struct Palette {
    pub(crate) panel: Rgba8,
    pub(crate) text: Rgba8,
    pub(crate) dim: Rgba8,
    pub(crate) accent: Rgba8,
    pub(crate) rule: Rgba8,
}

pub(crate) const DARK_PALETTE: Palette = Palette {
    panel: Rgba8::opaque(0x2c, 0x2c, 0x2c),
    text: Rgba8::opaque(0xfa, 0xfa, 0xfa),
    dim: Rgba8::opaque(0x9e, 0x9e, 0x9e),
    accent: Rgba8::opaque(0x4f, 0xc3, 0xf7),
    rule: Rgba8::opaque(0x42, 0x42, 0x42),
};

pub(crate) const LIGHT_PALETTE: Palette = Palette {
    panel: Rgba8::opaque(0xf5, 0xf5, 0xf5),
    text: Rgba8::opaque(0x21, 0x21, 0x21),
    dim: Rgba8::opaque(0x75, 0x75, 0x75),
    accent: Rgba8::opaque(0x15, 0x65, 0xc0),
    rule: Rgba8::opaque(0xe0, 0xe0, 0xe0),
};

/// A registry holding the built-in renderer for every theme, sharing one rasterizer.
pub fn registry(raster: SvgRasterizer) -> ThemeRegistry {
    ThemeRegistry::empty()
        .with_fleet_renderer(Theme::Dark, DarkFleetRenderer::new(raster.clone()))
        .with_fleet_renderer(Theme::LargeCard, LargeCardRenderer::new(raster.clone()))
        .with_fleet_renderer(Theme::MediumCutin, MediumCutinRenderer::new(raster.clone()))
        .with_fleet_renderer(Theme::SmallBanner, SmallBannerRenderer::new(raster.clone()))
        .with_panel_renderer(DarkPanelRenderer::new(raster))
}

pub(crate) fn format_air_power(ap: AirPower) -> String {
    if ap.min == ap.max {
        ap.min.to_string()
    } else {
        format!("{} ~ {}", ap.min, ap.max)
    }
}

pub(crate) fn format_los_table(los: &LoS) -> String {
    los.entries()
        .map(|(formation, v)| format!("{formation}:{v:.2}"))
        .collect::<Vec<_>>()
        .join("  ")
}

pub(crate) fn item_names(ship: &Ship) -> Vec<&str> {
    ship.all_items()
        .filter(|i| i.is_equipped())
        .map(|i| i.name.as_str())
        .collect()
}

pub(crate) fn fleet_title(input: &FleetRenderInput<'_>, labels: &Labels) -> String {
    let title = labels.fleet_title(input.index);
    let default_key = format!("f{}", input.index + 1);
    if input.name.is_empty() || input.name == default_key {
        title
    } else {
        format!("{title}  {}", input.name)
    }
}

/// Title plus the summary line shared by the compact themes: formation-1 LoS and air power.
pub(crate) fn compact_header(doc: &mut SvgDoc, input: &FleetRenderInput<'_>, labels: &Labels) {
    let width = f64::from(doc.width());
    let p = &LIGHT_PALETTE;
    let los = input.los.get(1).unwrap_or_default();
    doc.rect(0.0, 0.0, width, 48.0, 0.0, p.accent)
        .text(
            16.0,
            31.0,
            18.0,
            true,
            Anchor::Start,
            Rgba8::opaque(0xff, 0xff, 0xff),
            &fleet_title(input, labels),
        )
        .text(
            width - 16.0,
            31.0,
            13.0,
            false,
            Anchor::End,
            Rgba8::opaque(0xff, 0xff, 0xff),
            &format!(
                "{} {los:.2}   {} {}",
                labels.los,
                labels.air_power,
                format_air_power(input.air_power)
            ),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::deck::Lang;
    use crate::stats::Speed;

    #[test]
    fn air_power_collapses_equal_bounds() {
        assert_eq!(format_air_power(AirPower::new(3, 3)), "3");
        assert_eq!(format_air_power(AirPower::new(3, 7)), "3 ~ 7");
    }

    #[test]
    fn los_table_lists_every_formation() {
        let los = LoS::from_values([1.0, 2.5, 3.0, 4.0, 5.126]);
        assert_eq!(
            format_los_table(&los),
            "1:1.00  2:2.50  3:3.00  4:4.00  5:5.13"
        );
    }

    #[test]
    fn custom_fleet_names_follow_the_title() {
        let labels = Labels::for_lang(Lang::En);
        let mut input = FleetRenderInput {
            index: 1,
            name: "f2",
            ships: &[],
            los: LoS::from_values([0.0; 5]),
            air_power: AirPower::default(),
            speed: Speed::UNCONSTRAINED,
            lang: Lang::En,
            five_slot: None,
        };
        assert_eq!(fleet_title(&input, labels), "Fleet 2");
        input.name = "Strike Force";
        assert_eq!(fleet_title(&input, labels), "Fleet 2  Strike Force");
    }

    #[test]
    fn builtin_registry_covers_every_theme() {
        let reg = registry(SvgRasterizer::without_fonts());
        assert_eq!(reg.themes().collect::<Vec<_>>(), Theme::ALL.to_vec());
        assert!(reg.panels().is_ok());
    }
}
