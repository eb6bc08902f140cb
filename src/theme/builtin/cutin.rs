use crate::foundation::core::Canvas;
use crate::foundation::error::DeckImageResult;
use crate::theme::{FleetRenderInput, FleetRenderer};

use super::labels::Labels;
use super::svg::{Anchor, SvgDoc, SvgRasterizer, truncate};
use super::{LIGHT_PALETTE, compact_header, item_names};

const WIDTH: u32 = 560;
const HEADER: u32 = 48;
const ROW: u32 = 96;
/// Extra row height when some ship in the deck carries five slots.
const FIVE_SLOT_EXTRA: u32 = 20;

/// Medium cut-in layout: one wide strip per position.
#[derive(Clone, Debug)]
pub struct MediumCutinRenderer {
    raster: SvgRasterizer,
}

impl MediumCutinRenderer {
    pub fn new(raster: SvgRasterizer) -> Self {
        Self { raster }
    }
}

impl FleetRenderer for MediumCutinRenderer {
    fn render_fleet(&self, input: &FleetRenderInput<'_>) -> DeckImageResult<Canvas> {
        let labels = Labels::for_lang(input.lang);
        let p = &LIGHT_PALETTE;
        let row = ROW + if input.five_slot.unwrap_or(false) { FIVE_SLOT_EXTRA } else { 0 };
        let rows = (input.ships.len() as u32).max(1);
        let mut doc = SvgDoc::new(WIDTH, HEADER + rows * row + 4);
        compact_header(&mut doc, input, labels);
        let width = f64::from(WIDTH);

        for (i, ship) in input.ships.iter().enumerate() {
            let y = f64::from(HEADER + 4 + i as u32 * row);
            doc.rect(4.0, y, width - 8.0, f64::from(row) - 4.0, 4.0, p.panel);
            if !ship.is_equipped() {
                doc.text(16.0, y + 28.0, 13.0, false, Anchor::Start, p.dim, labels.empty);
                continue;
            }
            doc.text(16.0, y + 26.0, 15.0, true, Anchor::Start, p.text, &ship.name)
                .text(
                    width - 16.0,
                    y + 26.0,
                    12.0,
                    false,
                    Anchor::End,
                    p.dim,
                    &format!("{}{}", labels.level, ship.level),
                );
            for (n, name) in item_names(ship).chunks(2).enumerate() {
                doc.text(
                    16.0,
                    y + 48.0 + n as f64 * 18.0,
                    11.0,
                    false,
                    Anchor::Start,
                    p.text,
                    &truncate(&name.join(" / "), 70),
                );
            }
        }

        self.raster.rasterize(&doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::deck::Lang;
    use crate::model::fleet::Ship;
    use crate::stats::{AirPower, LoS, Speed};

    fn render(five_slot: Option<bool>) -> Canvas {
        let ships = vec![Ship::empty(); 2];
        let input = FleetRenderInput {
            index: 0,
            name: "f1",
            ships: &ships,
            los: LoS::from_values([0.0; 5]),
            air_power: AirPower::default(),
            speed: Speed::UNCONSTRAINED,
            lang: Lang::En,
            five_slot,
        };
        MediumCutinRenderer::new(SvgRasterizer::without_fonts())
            .render_fleet(&input)
            .unwrap()
    }

    #[test]
    fn five_slot_hint_grows_rows() {
        assert_eq!(render(Some(false)).height(), HEADER + 2 * ROW + 4);
        assert_eq!(render(None).height(), HEADER + 2 * ROW + 4);
        assert_eq!(
            render(Some(true)).height(),
            HEADER + 2 * (ROW + FIVE_SLOT_EXTRA) + 4
        );
    }
}
