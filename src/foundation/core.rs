use std::io::Cursor;
use std::path::Path;

use anyhow::Context as _;
use image::RgbaImage;

use crate::foundation::error::DeckImageResult;

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// `#rrggbb`, with a trailing alpha byte only when not fully opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Rgba8> for image::Rgba<u8> {
    fn from(c: Rgba8) -> Self {
        image::Rgba([c.r, c.g, c.b, c.a])
    }
}

impl From<image::Rgba<u8>> for Rgba8 {
    fn from(p: image::Rgba<u8>) -> Self {
        let [r, g, b, a] = p.0;
        Self { r, g, b, a }
    }
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Straight-alpha source-over. Opaque and fully transparent sources take exact fast paths.
fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    match src[3] {
        0 => return dst,
        255 => return src,
        _ => {}
    }

    let sa = u16::from(src[3]);
    let da = mul_div255(u16::from(dst[3]), 255 - sa);
    let out_a = sa + da;

    let mut out = [0u8; 4];
    out[3] = out_a.min(255) as u8;
    for i in 0..3 {
        let num = u32::from(src[i]) * u32::from(sa) + u32::from(dst[i]) * u32::from(da);
        out[i] = ((num + u32::from(out_a) / 2) / u32::from(out_a)).min(255) as u8;
    }
    out
}

/// Dark backdrop behind the dark theme (`#212121`).
pub const DARK_BACKGROUND: Rgba8 = Rgba8::opaque(0x21, 0x21, 0x21);
/// Light backdrop behind every other theme (white).
pub const LIGHT_BACKGROUND: Rgba8 = Rgba8::opaque(0xff, 0xff, 0xff);

/// An owned RGBA8 raster surface.
///
/// Canvases move by value between pipeline stages; only the current owner draws into one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba8::TRANSPARENT.into()),
        }
    }

    pub fn filled(width: u32, height: u32, color: Rgba8) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, color.into()),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Source-over blend `src` with its top-left corner at `(x, y)`. Parts outside are clipped.
    pub fn draw_image(&mut self, src: &Canvas, x: i64, y: i64) {
        let (dw, dh) = (i64::from(self.width()), i64::from(self.height()));
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + i64::from(src.width())).min(dw);
        let y1 = (y + i64::from(src.height())).min(dh);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        for dy in y0..y1 {
            for dx in x0..x1 {
                let s = src.image.get_pixel((dx - x) as u32, (dy - y) as u32).0;
                let d = self.image.get_pixel_mut(dx as u32, dy as u32);
                d.0 = over(d.0, s);
            }
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        self.image.get_pixel_checked(x, y).map(|p| Rgba8::from(*p))
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Encode as PNG bytes.
    pub fn to_png(&self) -> DeckImageResult<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buf, image::ImageFormat::Png)
            .context("encode png")?;
        Ok(buf.into_inner())
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> DeckImageResult<()> {
        let path = path.as_ref();
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}
