use crate::foundation::core::Canvas;
use crate::foundation::error::DeckImageResult;
use crate::model::deck::Lang;
use crate::model::fleet::{Airbase, Ship};
use crate::stats::compute_air_power;
use crate::theme::{FleetRenderInput, FleetRenderer, PanelRenderer, ParameterPanelInput};

use super::labels::Labels;
use super::svg::{Anchor, SvgDoc, SvgRasterizer, truncate};
use super::{DARK_PALETTE, fleet_title, format_air_power, format_los_table, item_names};

const FLEET_WIDTH: u32 = 640;
const FLEET_HEADER: u32 = 76;
const SHIP_ROW: u32 = 56;
const PANEL_WIDTH: u32 = 300;
const PANEL_HEIGHT: u32 = 240;
const COMMENT_LINE_CHARS: usize = 20;
const COMMENT_LINES: usize = 5;

/// Full-detail fleet sheet: every formation's LoS, air power range and speed.
#[derive(Clone, Debug)]
pub struct DarkFleetRenderer {
    raster: SvgRasterizer,
}

impl DarkFleetRenderer {
    pub fn new(raster: SvgRasterizer) -> Self {
        Self { raster }
    }
}

impl FleetRenderer for DarkFleetRenderer {
    fn render_fleet(&self, input: &FleetRenderInput<'_>) -> DeckImageResult<Canvas> {
        let labels = Labels::for_lang(input.lang);
        let p = &DARK_PALETTE;
        let rows = input.ships.len().max(1) as u32;
        let mut doc = SvgDoc::new(FLEET_WIDTH, FLEET_HEADER + rows * SHIP_ROW + 8);
        let width = f64::from(FLEET_WIDTH);

        doc.rect(4.0, 4.0, width - 8.0, f64::from(doc.height()) - 8.0, 6.0, p.panel)
            .text(16.0, 30.0, 18.0, true, Anchor::Start, p.text, &fleet_title(input, labels))
            .text(
                width - 16.0,
                30.0,
                13.0,
                false,
                Anchor::End,
                p.accent,
                &format!(
                    "{} {}   {} {}",
                    labels.air_power,
                    format_air_power(input.air_power),
                    labels.speed,
                    labels.speed_name(input.speed)
                ),
            )
            .text(
                16.0,
                58.0,
                12.0,
                false,
                Anchor::Start,
                p.dim,
                &format!("{}  {}", labels.los, format_los_table(&input.los)),
            );

        for (i, ship) in input.ships.iter().enumerate() {
            let y0 = f64::from(FLEET_HEADER + i as u32 * SHIP_ROW);
            doc.line(12.0, y0, width - 12.0, y0, p.rule);
            if !ship.is_equipped() {
                doc.text(16.0, y0 + 33.0, 13.0, false, Anchor::Start, p.dim, labels.empty);
                continue;
            }
            doc.text(16.0, y0 + 22.0, 15.0, true, Anchor::Start, p.text, &ship.name)
                .text(
                    width - 16.0,
                    y0 + 22.0,
                    13.0,
                    false,
                    Anchor::End,
                    p.text,
                    &ship_detail(ship, labels),
                )
                .text(
                    16.0,
                    y0 + 44.0,
                    11.0,
                    false,
                    Anchor::Start,
                    p.dim,
                    &truncate(&item_names(ship).join(" / "), 80),
                );
        }

        self.raster.rasterize(&doc)
    }
}

/// Parameter and airbase panels that sit beside the dark fleet strip.
#[derive(Clone, Debug)]
pub struct DarkPanelRenderer {
    raster: SvgRasterizer,
}

impl DarkPanelRenderer {
    pub fn new(raster: SvgRasterizer) -> Self {
        Self { raster }
    }
}

fn ship_detail(ship: &Ship, labels: &Labels) -> String {
    let mut parts = vec![format!("{}{}", labels.level, ship.level)];
    if let Some(hp) = ship.hp {
        parts.push(format!("{} {hp}", labels.hp));
    }
    if let Some(luck) = ship.luck {
        parts.push(format!("{} {luck}", labels.luck));
    }
    parts.join("  ")
}

fn airbase_heading(index: usize, base: &Airbase, labels: &Labels) -> String {
    format!("#{} {}", index + 1, labels.airbase_mode_name(base.mode))
}

fn wrap_comment(comment: &str) -> Vec<String> {
    let chars: Vec<char> = comment.lines().flat_map(|l| l.chars().chain([' '])).collect();
    let mut lines: Vec<String> = chars
        .chunks(COMMENT_LINE_CHARS)
        .map(|c| c.iter().collect::<String>().trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    if lines.len() > COMMENT_LINES {
        lines.truncate(COMMENT_LINES);
        if let Some(last) = lines.last_mut() {
            *last = truncate(&format!("{last}……"), COMMENT_LINE_CHARS);
        }
    }
    lines
}

impl PanelRenderer for DarkPanelRenderer {
    fn render_parameters(&self, input: &ParameterPanelInput<'_>) -> DeckImageResult<Canvas> {
        let labels = Labels::for_lang(input.lang);
        let p = &DARK_PALETTE;
        let width = f64::from(PANEL_WIDTH);
        let mut doc = SvgDoc::new(PANEL_WIDTH, PANEL_HEIGHT);

        let equipped: Vec<_> = input.ships.iter().filter(|s| s.is_equipped()).collect();
        let total_level: u32 = equipped.iter().map(|s| s.level).sum();

        doc.rect(4.0, 4.0, width - 8.0, f64::from(PANEL_HEIGHT) - 8.0, 6.0, p.panel)
            .text(16.0, 30.0, 13.0, false, Anchor::Start, p.dim, labels.air_state)
            .text(
                width - 16.0,
                30.0,
                15.0,
                true,
                Anchor::End,
                p.accent,
                &format!(
                    "{} ({})",
                    labels.air_state_name(input.air_state),
                    input.air_state
                ),
            )
            .text(16.0, 56.0, 13.0, false, Anchor::Start, p.dim, labels.air_power)
            .text(
                width - 16.0,
                56.0,
                13.0,
                false,
                Anchor::End,
                p.text,
                &format_air_power(compute_air_power(input.ships)),
            )
            .text(
                16.0,
                82.0,
                13.0,
                false,
                Anchor::Start,
                p.dim,
                &format!("{} {}", equipped.len(), labels.ships),
            )
            .text(
                width - 16.0,
                82.0,
                13.0,
                false,
                Anchor::End,
                p.text,
                &format!("Σ{}{total_level}", labels.level),
            )
            .line(12.0, 96.0, width - 12.0, 96.0, p.rule)
            .text(16.0, 118.0, 12.0, false, Anchor::Start, p.dim, labels.comment);

        for (i, line) in wrap_comment(input.comment).iter().enumerate() {
            doc.text(
                16.0,
                140.0 + i as f64 * 18.0,
                13.0,
                false,
                Anchor::Start,
                p.text,
                line,
            );
        }

        self.raster.rasterize(&doc)
    }

    fn render_airbases(&self, airbases: &[Airbase], lang: Lang) -> DeckImageResult<Canvas> {
        let labels = Labels::for_lang(lang);
        let p = &DARK_PALETTE;
        let width = f64::from(PANEL_WIDTH);
        let mut doc = SvgDoc::new(PANEL_WIDTH, PANEL_HEIGHT);

        doc.rect(4.0, 4.0, width - 8.0, f64::from(PANEL_HEIGHT) - 8.0, 6.0, p.panel)
            .text(16.0, 28.0, 14.0, true, Anchor::Start, p.text, labels.airbase);

        for (i, base) in airbases.iter().take(3).enumerate() {
            let y0 = 40.0 + i as f64 * 64.0;
            let names: Vec<&str> = base
                .items
                .iter()
                .filter(|item| item.is_equipped())
                .map(|item| item.name.as_str())
                .collect();
            let body = if names.is_empty() {
                labels.empty.to_string()
            } else {
                names.join(" / ")
            };
            doc.line(12.0, y0, width - 12.0, y0, p.rule)
                .text(
                    16.0,
                    y0 + 20.0,
                    12.0,
                    true,
                    Anchor::Start,
                    p.accent,
                    &airbase_heading(i, base, labels),
                )
                .text(
                    16.0,
                    y0 + 42.0,
                    11.0,
                    false,
                    Anchor::Start,
                    p.dim,
                    &truncate(&body, 44),
                );
        }

        self.raster.rasterize(&doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::deck::AirState;
    use crate::model::fleet::{Item, Ship};
    use crate::stats::{AirPower, LoS, Speed};

    fn renderer() -> (DarkFleetRenderer, DarkPanelRenderer) {
        let raster = SvgRasterizer::without_fonts();
        (
            DarkFleetRenderer::new(raster.clone()),
            DarkPanelRenderer::new(raster),
        )
    }

    #[test]
    fn fleet_height_tracks_positions() {
        let (fleet, _) = renderer();
        let ships = vec![
            Ship {
                id: 1,
                name: "<Ship & Co>".to_string(),
                level: 99,
                ..Ship::empty()
            },
            Ship::empty(),
        ];
        let input = FleetRenderInput {
            index: 0,
            name: "f1",
            ships: &ships,
            los: LoS::from_values([1.0; 5]),
            air_power: AirPower::new(1, 2),
            speed: Speed::FAST,
            lang: Lang::En,
            five_slot: None,
        };
        let canvas = fleet.render_fleet(&input).unwrap();
        assert_eq!(canvas.width(), FLEET_WIDTH);
        assert_eq!(canvas.height(), FLEET_HEADER + 2 * SHIP_ROW + 8);
    }

    #[test]
    fn panels_have_fixed_size() {
        let (_, panels) = renderer();
        let input = ParameterPanelInput {
            ships: &[],
            air_state: AirState::Denial,
            comment: "a very long comment that will need to wrap across lines",
            lang: Lang::Jp,
        };
        let p = panels.render_parameters(&input).unwrap();
        assert_eq!((p.width(), p.height()), (PANEL_WIDTH, PANEL_HEIGHT));

        let bases = vec![Airbase {
            mode: 1,
            items: vec![Item::empty()],
        }];
        let a = panels.render_airbases(&bases, Lang::Scn).unwrap();
        assert_eq!((a.width(), a.height()), (PANEL_WIDTH, PANEL_HEIGHT));
    }

    #[test]
    fn ship_detail_adds_hp_and_luck_when_known() {
        let en = Labels::for_lang(Lang::En);
        let mut ship = Ship {
            id: 1,
            level: 99,
            ..Ship::empty()
        };
        assert_eq!(ship_detail(&ship, en), "Lv99");
        ship.hp = Some(37);
        ship.luck = Some(12);
        assert_eq!(ship_detail(&ship, en), "Lv99  HP 37  Luck 12");
    }

    #[test]
    fn airbase_heading_names_the_mode() {
        let en = Labels::for_lang(Lang::En);
        let base = Airbase {
            mode: 2,
            items: vec![Item::empty()],
        };
        assert_eq!(airbase_heading(0, &base, en), "#1 Air Defense");
        assert_eq!(
            airbase_heading(2, &Airbase { mode: 0, ..base }, Labels::for_lang(Lang::Jp)),
            "#3 待機"
        );
    }

    #[test]
    fn comment_wraps_and_caps_lines() {
        assert!(wrap_comment("").is_empty());
        assert_eq!(wrap_comment("short"), vec!["short".to_string()]);
        let long = "x".repeat(500);
        let lines = wrap_comment(&long);
        assert_eq!(lines.len(), COMMENT_LINES);
        assert!(lines.last().unwrap().ends_with('…'));
    }
}
