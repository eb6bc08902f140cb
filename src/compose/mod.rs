//! Compositor: stacks per-fleet sub-images into a strip and, for the dark theme, places the
//! shared parameter and airbase panels beside it.

pub mod stick;

use crate::foundation::core::{Canvas, DARK_BACKGROUND, Rgba8};
use crate::model::fleet::Fleet;
use crate::theme::Theme;

pub use stick::stick;

/// Pixels between the fleet strip and each panel.
pub const PANEL_GUTTER: u32 = 2;

/// Two columns for the two-column compact themes or when more than two fleets hold ships.
pub fn column_count(theme: Theme, fleets: &[Fleet]) -> usize {
    if theme.is_two_column() || fleets.iter().filter(|f| f.has_ships()).count() > 2 {
        2
    } else {
        1
    }
}

pub fn background_for(theme: Theme) -> Rgba8 {
    theme.background()
}

/// Geometry of the dark-theme composite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DarkLayout {
    pub width: u32,
    pub height: u32,
    pub parameters: (i64, i64),
    pub airbase: Option<(i64, i64)>,
}

impl DarkLayout {
    /// The fleet strip sits at the origin. With a single fleet and an active airbase, an extra
    /// panel-wide column is reserved for the airbase panel; with several fleets the airbase panel
    /// takes the top band of the panel column and the parameter panel moves down one panel height.
    pub fn compute(
        strip: (u32, u32),
        panel: (u32, u32),
        fleet_count: usize,
        use_airbase: bool,
    ) -> Self {
        let (strip_w, strip_h) = strip;
        let (panel_w, panel_h) = panel;
        let reserve = if fleet_count == 1 && use_airbase {
            panel_w + PANEL_GUTTER
        } else {
            0
        };

        let parameters_y = if fleet_count == 1 { 0 } else { i64::from(panel_h) };
        Self {
            width: strip_w + panel_w + PANEL_GUTTER + reserve,
            height: strip_h,
            parameters: (i64::from(strip_w + PANEL_GUTTER + reserve), parameters_y),
            airbase: use_airbase.then_some((i64::from(strip_w + PANEL_GUTTER), 0)),
        }
    }
}

/// Lay out the dark composite. `airbase` is `Some` iff any airbase is active.
pub fn compose_dark(
    strip: &Canvas,
    parameters: &Canvas,
    airbase: Option<&Canvas>,
    fleet_count: usize,
) -> Canvas {
    let layout = DarkLayout::compute(
        (strip.width(), strip.height()),
        (parameters.width(), parameters.height()),
        fleet_count,
        airbase.is_some(),
    );
    tracing::debug!(?layout, "dark composite layout");

    let mut canvas = Canvas::filled(layout.width, layout.height, DARK_BACKGROUND);
    canvas.draw_image(strip, 0, 0);
    canvas.draw_image(parameters, layout.parameters.0, layout.parameters.1);
    if let (Some(image), Some((x, y))) = (airbase, layout.airbase) {
        canvas.draw_image(image, x, y);
    }
    canvas
}

/// Final image from the already-joined fleet images, in fleet order.
pub fn compose(
    theme: Theme,
    fleets: &[Fleet],
    fleet_images: &[Canvas],
    panels: Option<(&Canvas, Option<&Canvas>)>,
) -> Canvas {
    let columns = column_count(theme, fleets);
    let strip = stick(fleet_images, columns, background_for(theme));
    tracing::debug!(
        %theme,
        columns,
        width = strip.width(),
        height = strip.height(),
        "stacked fleet strip"
    );

    match panels {
        Some((parameters, airbase)) if theme.has_panels() => {
            compose_dark(&strip, parameters, airbase, fleets.len())
        }
        _ => strip,
    }
}
