//! Star image assets.
//!
//! The embedding application supplies a "white" and a "black" star. Raster formats go through
//! `image`, SVG through `usvg`/`resvg`. Either way the result is a square, premultiplied pixmap:
//! non-square inputs are center-cropped, which is what `object-fit: cover` does to a square box.

use std::path::Path;

use anyhow::Context as _;
use resvg::tiny_skia::{IntSize, Pixmap};

use crate::foundation::{
    error::{LogoError, LogoResult},
    math::premultiply_rgba8_in_place,
};

/// Side length SVG stars are rasterized at.
pub const SVG_STAR_RASTER_PX: u32 = 400;

#[derive(Clone, Debug)]
pub struct StarImage {
    pixmap: Pixmap,
}

impl StarImage {
    pub fn side(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Decode PNG/JPEG/... bytes, or SVG when the bytes look like SVG.
    pub fn from_bytes(bytes: &[u8]) -> LogoResult<Self> {
        if looks_like_svg(bytes) {
            rasterize_svg(bytes, SVG_STAR_RASTER_PX)
        } else {
            decode_image(bytes)
        }
    }

    pub fn from_file(path: &Path) -> LogoResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read star image '{}'", path.display()))?;
        Self::from_bytes(&bytes)
            .map_err(|e| LogoError::validation(format!("star image '{}': {e}", path.display())))
    }
}

#[derive(Clone, Debug)]
pub struct StarAssets {
    pub white: StarImage,
    pub black: StarImage,
}

impl StarAssets {
    pub fn from_files(white: &Path, black: &Path) -> LogoResult<Self> {
        Ok(Self {
            white: StarImage::from_file(white)?,
            black: StarImage::from_file(black)?,
        })
    }

    pub fn from_bytes(white: &[u8], black: &[u8]) -> LogoResult<Self> {
        Ok(Self {
            white: StarImage::from_bytes(white)?,
            black: StarImage::from_bytes(black)?,
        })
    }

    /// Vector stars used when the application does not supply its own.
    pub fn builtin() -> LogoResult<Self> {
        let white = builtin_star_svg("#FFFFFF", "#1A1A1A");
        let black = builtin_star_svg("#111111", "#FFFFFF");
        Ok(Self {
            white: rasterize_svg(white.as_bytes(), SVG_STAR_RASTER_PX)?,
            black: rasterize_svg(black.as_bytes(), SVG_STAR_RASTER_PX)?,
        })
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start_matches('\u{feff}').trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

pub(crate) fn decode_image(bytes: &[u8]) -> LogoResult<StarImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let (w, h) = (dyn_img.width(), dyn_img.height());
    if w == 0 || h == 0 {
        return Err(LogoError::validation("image has zero size"));
    }
    let side = w.min(h);
    let cropped = dyn_img.crop_imm((w - side) / 2, (h - side) / 2, side, side);

    let mut rgba8_premul = cropped.to_rgba8().into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    let size = IntSize::from_wh(side, side)
        .ok_or_else(|| LogoError::validation("image has invalid size"))?;
    let pixmap = Pixmap::from_vec(rgba8_premul, size)
        .ok_or_else(|| LogoError::evaluation("failed to wrap decoded image in a pixmap"))?;
    Ok(StarImage { pixmap })
}

pub(crate) fn rasterize_svg(bytes: &[u8], side: u32) -> LogoResult<StarImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;

    let size = tree.size();
    let (w, h) = (size.width(), size.height());
    if !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0 {
        return Err(LogoError::validation("svg has invalid width/height"));
    }

    let mut pixmap = Pixmap::new(side, side)
        .ok_or_else(|| LogoError::evaluation("failed to allocate svg pixmap"))?;

    // cover: scale the short side to fit, center the long side
    let scale = (side as f32 / w).max(side as f32 / h);
    let dx = (side as f32 - w * scale) / 2.0;
    let dy = (side as f32 - h * scale) / 2.0;
    let xform = resvg::tiny_skia::Transform::from_row(scale, 0.0, 0.0, scale, dx, dy);

    resvg::render(&tree, xform, &mut pixmap.as_mut());
    Ok(StarImage { pixmap })
}

fn builtin_star_svg(fill: &str, stroke: &str) -> String {
    const POINTS: usize = 5;
    const OUTER: f64 = 92.0;
    const INNER: f64 = 38.0;

    let mut pts = Vec::with_capacity(POINTS * 2);
    for i in 0..POINTS * 2 {
        let r = if i % 2 == 0 { OUTER } else { INNER };
        let a = std::f64::consts::PI * (i as f64) / POINTS as f64 - std::f64::consts::FRAC_PI_2;
        pts.push(format!("{:.2},{:.2}", 100.0 + r * a.cos(), 100.0 + r * a.sin()));
    }
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="0 0 200 200"><polygon points="{}" fill="{fill}" stroke="{stroke}" stroke-width="4" stroke-linejoin="round"/></svg>"#,
        pts.join(" ")
    )
}
