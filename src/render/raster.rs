use anyhow::Context as _;
use kurbo::Affine;
use resvg::tiny_skia::{self, Color, FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::{
    assets::{StarAssets, StarImage},
    foundation::error::{LogoError, LogoResult},
    logo::scene::{FrameScene, StarLayer},
    render::{
        backend::FrameRGBA,
        markup::{LOGO_BOX_PX, shape_layer_svg, star_affine},
    },
};

fn to_skia(a: Affine) -> Transform {
    let [a, b, c, d, e, f] = a.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

/// CPU rasterizer: shape layer through `resvg`, stars drawn on top with `tiny-skia`.
#[derive(Clone, Debug)]
pub struct CpuRasterizer {
    size_px: u32,
    background: Option<[u8; 4]>,
    stars: StarAssets,
}

impl CpuRasterizer {
    pub fn new(size_px: u32, background: Option<[u8; 4]>, stars: StarAssets) -> LogoResult<Self> {
        if size_px == 0 {
            return Err(LogoError::validation("raster size must be > 0"));
        }
        Ok(Self {
            size_px,
            background,
            stars,
        })
    }

    pub fn size_px(&self) -> u32 {
        self.size_px
    }

    #[tracing::instrument(skip_all, fields(t = scene.time.0))]
    pub fn render(&self, scene: &FrameScene) -> LogoResult<FrameRGBA> {
        let mut pixmap = Pixmap::new(self.size_px, self.size_px)
            .ok_or_else(|| LogoError::evaluation("failed to allocate frame pixmap"))?;
        if let Some([r, g, b, a]) = self.background {
            pixmap.fill(Color::from_rgba8(r, g, b, a));
        }

        if scene.shape.pose.opacity > 0.0 {
            let svg = shape_layer_svg(&scene.shape, self.size_px);
            let tree = usvg::Tree::from_str(&svg, &usvg::Options::default())
                .context("parse shape layer svg")?;
            resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
        }

        let to_px = Affine::scale(f64::from(self.size_px) / LOGO_BOX_PX);
        self.draw_star(&mut pixmap, &scene.white_star, &self.stars.white, to_px);
        self.draw_star(&mut pixmap, &scene.black_star, &self.stars.black, to_px);

        tracing::trace!(
            cursor = scene.state.cursor,
            phase = ?scene.state.phase,
            star = ?scene.state.star,
            "frame rasterized"
        );
        Ok(FrameRGBA {
            width: self.size_px,
            height: self.size_px,
            data: pixmap.take(),
            premultiplied: true,
        })
    }

    fn draw_star(&self, dst: &mut Pixmap, layer: &StarLayer, image: &StarImage, to_px: Affine) {
        if !layer.visible || layer.pose.opacity <= 0.0 || layer.pose.scale <= 0.0 {
            return;
        }
        let xform = to_px * star_affine(layer.pose, f64::from(image.side()));
        let paint = PixmapPaint {
            opacity: layer.pose.opacity.clamp(0.0, 1.0) as f32,
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        dst.draw_pixmap(0, 0, image.pixmap().as_ref(), &paint, to_skia(xform), None);
    }
}

/// Read back a pixel as straight RGBA; handy for inspecting frames.
pub fn sample_straight(frame: &FrameRGBA, x: u32, y: u32) -> Option<[u8; 4]> {
    let [r, g, b, a] = frame.pixel(x, y)?;
    if !frame.premultiplied {
        return Some([r, g, b, a]);
    }
    let c = tiny_skia::PremultipliedColorU8::from_rgba(r, g, b, a)?;
    let s = c.demultiply();
    Some([s.red(), s.green(), s.blue(), s.alpha()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::LogoTiming, foundation::core::TimeMs, logo::scene::SceneEvaluator};

    fn setup(size: u32) -> (SceneEvaluator, CpuRasterizer) {
        let ev = SceneEvaluator::new(LogoTiming::default()).unwrap();
        let r = CpuRasterizer::new(size, None, StarAssets::builtin().unwrap()).unwrap();
        (ev, r)
    }

    #[test]
    fn frame_has_requested_size() {
        let (ev, r) = setup(100);
        let f = r.render(&ev.evaluate(TimeMs(0))).unwrap();
        assert_eq!((f.width, f.height), (100, 100));
        assert_eq!(f.data.len(), 100 * 100 * 4);
        assert!(f.premultiplied);
    }

    #[test]
    fn white_star_covers_center_at_start() {
        let (ev, r) = setup(200);
        let f = r.render(&ev.evaluate(TimeMs(0))).unwrap();
        assert_eq!(sample_straight(&f, 100, 100), Some([255, 255, 255, 255]));
    }

    #[test]
    fn gradient_shape_visible_outside_star_box() {
        let (ev, r) = setup(200);
        let f = r.render(&ev.evaluate(TimeMs(0))).unwrap();
        // (30, 100) sits inside circle1 but left of the star box.
        let [_, _, b, a] = sample_straight(&f, 30, 100).unwrap();
        assert_eq!(a, 255);
        assert!(b > 150);
    }

    #[test]
    fn hidden_shape_leaves_corner_region_clear() {
        let (ev, r) = setup(200);
        let f = r.render(&ev.evaluate(TimeMs(19_700))).unwrap();
        assert_eq!(f.pixel(30, 100), Some([0, 0, 0, 0]));
        let [rr, gg, bb, a] = sample_straight(&f, 100, 100).unwrap();
        assert_eq!(a, 255);
        assert!(rr < 40 && gg < 40 && bb < 40);
    }

    #[test]
    fn background_fills_empty_pixels() {
        let ev = SceneEvaluator::new(LogoTiming::default()).unwrap();
        let r = CpuRasterizer::new(50, Some([10, 20, 30, 255]), StarAssets::builtin().unwrap())
            .unwrap();
        let f = r.render(&ev.evaluate(TimeMs(19_700))).unwrap();
        assert_eq!(f.pixel(0, 0), Some([10, 20, 30, 255]));
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(CpuRasterizer::new(0, None, StarAssets::builtin().unwrap()).is_err());
    }
}
