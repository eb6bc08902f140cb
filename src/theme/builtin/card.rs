use crate::foundation::core::Canvas;
use crate::foundation::error::DeckImageResult;
use crate::theme::{FleetRenderInput, FleetRenderer};

use super::labels::Labels;
use super::svg::{Anchor, SvgDoc, SvgRasterizer, truncate};
use super::{LIGHT_PALETTE, compact_header, format_air_power};

const CARD_WIDTH: u32 = 200;
const CARD_HEIGHT: u32 = 220;
const CARDS_PER_ROW: u32 = 3;
const GAP: u32 = 8;
const HEADER: u32 = 48;

/// Large-card layout: one card per position, three per row.
#[derive(Clone, Debug)]
pub struct LargeCardRenderer {
    raster: SvgRasterizer,
}

impl LargeCardRenderer {
    pub fn new(raster: SvgRasterizer) -> Self {
        Self { raster }
    }
}

impl FleetRenderer for LargeCardRenderer {
    fn render_fleet(&self, input: &FleetRenderInput<'_>) -> DeckImageResult<Canvas> {
        let labels = Labels::for_lang(input.lang);
        let p = &LIGHT_PALETTE;
        let rows = (input.ships.len() as u32).div_ceil(CARDS_PER_ROW).max(1);
        let width = GAP + CARDS_PER_ROW * (CARD_WIDTH + GAP);
        let height = HEADER + GAP + rows * (CARD_HEIGHT + GAP);
        let mut doc = SvgDoc::new(width, height);
        compact_header(&mut doc, input, labels);

        for (i, ship) in input.ships.iter().enumerate() {
            let i = i as u32;
            let x = f64::from(GAP + (i % CARDS_PER_ROW) * (CARD_WIDTH + GAP));
            let y = f64::from(HEADER + GAP + (i / CARDS_PER_ROW) * (CARD_HEIGHT + GAP));
            let w = f64::from(CARD_WIDTH);
            doc.rect(x, y, w, f64::from(CARD_HEIGHT), 8.0, p.panel);
            if !ship.is_equipped() {
                doc.text(x + w / 2.0, y + 110.0, 13.0, false, Anchor::Middle, p.dim, labels.empty);
                continue;
            }
            let name = truncate(&ship.name, 12);
            doc.text(x + 10.0, y + 24.0, 14.0, true, Anchor::Start, p.text, &name)
                .text(
                    x + w - 10.0,
                    y + 24.0,
                    12.0,
                    false,
                    Anchor::End,
                    p.dim,
                    &format!("{}{}", labels.level, ship.level),
                )
                .line(x + 8.0, y + 34.0, x + w - 8.0, y + 34.0, p.rule);
            for (row, item) in ship.all_items().filter(|it| it.is_equipped()).enumerate() {
                doc.text(
                    x + 10.0,
                    y + 54.0 + row as f64 * 22.0,
                    11.0,
                    false,
                    Anchor::Start,
                    p.text,
                    &truncate(&item.name, 16),
                );
            }
            if ship.air_power.max > 0 {
                doc.text(
                    x + w - 10.0,
                    y + f64::from(CARD_HEIGHT) - 12.0,
                    11.0,
                    false,
                    Anchor::End,
                    p.accent,
                    &format!("{} {}", labels.air_power, format_air_power(ship.air_power)),
                );
            }
        }

        self.raster.rasterize(&doc)
    }
}
