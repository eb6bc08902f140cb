use crate::foundation::core::Canvas;
use crate::foundation::error::DeckImageResult;
use crate::theme::{FleetRenderInput, FleetRenderer};

use super::labels::Labels;
use super::svg::{Anchor, SvgDoc, SvgRasterizer, truncate};
use super::{LIGHT_PALETTE, compact_header, item_names};

const BANNER_WIDTH: u32 = 260;
/// Wider banners leave room for a fifth item icon row.
const FIVE_SLOT_BANNER_WIDTH: u32 = 300;
const BANNER_HEIGHT: u32 = 60;
const PER_ROW: u32 = 2;
const GAP: u32 = 6;
const HEADER: u32 = 48;

/// Small-banner layout: two slim banners per row.
#[derive(Clone, Debug)]
pub struct SmallBannerRenderer {
    raster: SvgRasterizer,
}

impl SmallBannerRenderer {
    pub fn new(raster: SvgRasterizer) -> Self {
        Self { raster }
    }
}

impl FleetRenderer for SmallBannerRenderer {
    fn render_fleet(&self, input: &FleetRenderInput<'_>) -> DeckImageResult<Canvas> {
        let labels = Labels::for_lang(input.lang);
        let p = &LIGHT_PALETTE;
        let banner_width = if input.five_slot.unwrap_or(false) {
            FIVE_SLOT_BANNER_WIDTH
        } else {
            BANNER_WIDTH
        };
        let rows = (input.ships.len() as u32).div_ceil(PER_ROW).max(1);
        let width = GAP + PER_ROW * (banner_width + GAP);
        let height = HEADER + GAP + rows * (BANNER_HEIGHT + GAP);
        let mut doc = SvgDoc::new(width, height);
        compact_header(&mut doc, input, labels);

        for (i, ship) in input.ships.iter().enumerate() {
            let i = i as u32;
            let x = f64::from(GAP + (i % PER_ROW) * (banner_width + GAP));
            let y = f64::from(HEADER + GAP + (i / PER_ROW) * (BANNER_HEIGHT + GAP));
            let w = f64::from(banner_width);
            doc.rect(x, y, w, f64::from(BANNER_HEIGHT), 4.0, p.panel);
            if !ship.is_equipped() {
                doc.text(x + 10.0, y + 36.0, 12.0, false, Anchor::Start, p.dim, labels.empty);
                continue;
            }
            let name = truncate(&ship.name, 14);
            doc.text(x + 10.0, y + 22.0, 13.0, true, Anchor::Start, p.text, &name)
                .text(
                    x + w - 10.0,
                    y + 22.0,
                    11.0,
                    false,
                    Anchor::End,
                    p.dim,
                    &format!("{}{}", labels.level, ship.level),
                )
                .text(
                    x + 10.0,
                    y + 46.0,
                    10.0,
                    false,
                    Anchor::Start,
                    p.text,
                    &truncate(&item_names(ship).join(" / "), 40),
                );
        }

        self.raster.rasterize(&doc)
    }
}
