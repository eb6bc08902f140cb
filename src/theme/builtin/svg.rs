use std::sync::Arc;

use usvg::fontdb;

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{DeckImageError, DeckImageResult};

const MAX_DIM: u32 = 16_384;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_attr(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Minimal SVG document builder used by the built-in renderers.
#[derive(Clone, Debug)]
pub(crate) struct SvgDoc {
    width: u32,
    height: u32,
    body: String,
}

impl SvgDoc {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn rect(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        radius: f64,
        fill: Rgba8,
    ) -> &mut Self {
        self.body.push_str(&format!(
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" rx="{radius}" {}/>"#,
            paint("fill", fill)
        ));
        self
    }

    pub(crate) fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: Rgba8) -> &mut Self {
        self.body.push_str(&format!(
            r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke-width="1" {}/>"#,
            paint("stroke", stroke)
        ));
        self
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn text(
        &mut self,
        x: f64,
        y: f64,
        size: f64,
        bold: bool,
        anchor: Anchor,
        fill: Rgba8,
        content: &str,
    ) -> &mut Self {
        let weight = if bold { "bold" } else { "normal" };
        self.body.push_str(&format!(
            r#"<text x="{x}" y="{y}" font-family="sans-serif" font-size="{size}" font-weight="{weight}" text-anchor="{}" {}>{}</text>"#,
            anchor.as_attr(),
            paint("fill", fill),
            escape_xml(content)
        ));
        self
    }

    pub(crate) fn finish(&self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{body}</svg>"#,
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

fn paint(attr: &str, c: Rgba8) -> String {
    if c.a == 255 {
        format!(r#"{attr}="{}""#, c.to_hex())
    } else {
        let hex = Rgba8::opaque(c.r, c.g, c.b).to_hex();
        let opacity = f64::from(c.a) / 255.0;
        format!(r#"{attr}="{hex}" {attr}-opacity="{opacity:.3}""#)
    }
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Truncate to at most `max` characters, marking the cut with an ellipsis.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Rasterizes [`SvgDoc`]s with a font database loaded once and shared across threads.
#[derive(Clone, Debug)]
pub struct SvgRasterizer {
    fontdb: Arc<fontdb::Database>,
}

impl SvgRasterizer {
    pub fn with_system_fonts() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// No fonts: text elements are dropped, shapes still render.
    pub fn without_fonts() -> Self {
        Self {
            fontdb: Arc::new(fontdb::Database::new()),
        }
    }

    /// Number of font faces available to text elements.
    pub fn font_faces(&self) -> usize {
        self.fontdb.len()
    }

    pub(crate) fn rasterize(&self, doc: &SvgDoc) -> DeckImageResult<Canvas> {
        let (width, height) = (doc.width(), doc.height());
        if width == 0 || height == 0 || width > MAX_DIM || height > MAX_DIM {
            return Err(DeckImageError::render(
                "svg",
                format!("invalid raster size {width}x{height} (max {MAX_DIM}x{MAX_DIM})"),
            ));
        }

        let opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(&doc.finish(), &opts)
            .map_err(|e| DeckImageError::render("svg", format!("parse svg tree: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| DeckImageError::render("svg", "failed to allocate svg pixmap"))?;
        resvg::render(&tree, resvg::tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        let mut rgba = pixmap.take();
        demultiply_rgba8_in_place(&mut rgba);
        let image = image::RgbaImage::from_raw(width, height, rgba)
            .ok_or_else(|| DeckImageError::render("svg", "pixmap size mismatch"))?;
        Ok(Canvas::from_image(image))
    }
}

fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}
