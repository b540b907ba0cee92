//! Named keyframe animations and classes that go with the logo.
//!
//! These are the presentation half of the component: the state machine picks a class, the
//! stylesheet says what that class looks like over time. [`StyleSheet::to_css`] emits the same
//! rules as CSS for embedding next to the markup from [`render::markup`](crate::render::markup).

use std::fmt::Write as _;

use crate::{
    animation::{
        ease::Ease,
        keyframes::{FillMode, Iterations, KeyframeAnimation, Lerp},
    },
    foundation::{core::Rgb8, error::LogoResult},
    logo::{
        phase::{ShapeClass, StarState},
        shapes::SHAPE_VIEWBOX,
    },
    render::markup::LOGO_BOX_PX,
};

/// Rotation, uniform scale and opacity of a layer about its center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerPose {
    pub rotate_deg: f64,
    pub scale: f64,
    pub opacity: f64,
}

impl LayerPose {
    pub const REST: Self = Self::new(0.0, 1.0, 1.0);
    pub const HIDDEN: Self = Self::new(0.0, 0.01, 0.0);

    pub const fn new(rotate_deg: f64, scale: f64, opacity: f64) -> Self {
        Self {
            rotate_deg,
            scale,
            opacity,
        }
    }
}

impl Lerp for LayerPose {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            rotate_deg: f64::lerp(&a.rotate_deg, &b.rotate_deg, t),
            scale: f64::lerp(&a.scale, &b.scale, t),
            opacity: f64::lerp(&a.opacity, &b.opacity, t),
        }
    }
}

/// Declarations a keyframe value contributes inside a `@keyframes` block.
pub trait CssDeclarations {
    fn css_declarations(&self) -> String;
}

impl CssDeclarations for LayerPose {
    fn css_declarations(&self) -> String {
        format!(
            "transform: rotate({}deg) scale({}); opacity: {};",
            self.rotate_deg, self.scale, self.opacity
        )
    }
}

impl CssDeclarations for Rgb8 {
    fn css_declarations(&self) -> String {
        format!("stop-color: {};", self.to_hex())
    }
}

#[derive(Clone, Debug)]
pub struct StyleSheet {
    pub rotate_background: KeyframeAnimation<LayerPose>,
    pub collapse_shape: KeyframeAnimation<LayerPose>,
    pub rotate_and_collapse: KeyframeAnimation<LayerPose>,
    pub emerge_and_rotate: KeyframeAnimation<LayerPose>,
    pub shift_color_start: KeyframeAnimation<Rgb8>,
    pub shift_color_end: KeyframeAnimation<Rgb8>,
    /// Outline interpolation curve after a cursor change.
    pub morph_ease: Ease,
}

impl StyleSheet {
    pub fn standard() -> LogoResult<Self> {
        let once = Iterations::Count(1);
        Ok(Self {
            rotate_background: KeyframeAnimation::new(
                "rotateBackground",
                5_000,
                Ease::Linear,
                Iterations::Infinite,
                FillMode::None,
                [
                    (0.0, LayerPose::REST),
                    (1.0, LayerPose::new(360.0, 1.0, 1.0)),
                ],
            )?,
            collapse_shape: KeyframeAnimation::new(
                "collapseShape",
                2_000,
                Ease::CSS_EASE,
                once,
                FillMode::Forwards,
                [
                    (0.0, LayerPose::REST),
                    (1.0, LayerPose::new(540.0, 0.01, 0.0)),
                ],
            )?,
            rotate_and_collapse: KeyframeAnimation::new(
                "rotateAndCollapse",
                2_000,
                Ease::CSS_EASE,
                once,
                FillMode::Forwards,
                [
                    (0.0, LayerPose::REST),
                    (1.0, LayerPose::new(180.0, 0.01, 0.0)),
                ],
            )?,
            emerge_and_rotate: KeyframeAnimation::new(
                "emergeAndRotate",
                2_000,
                Ease::CSS_EASE,
                once,
                FillMode::Forwards,
                [
                    (0.0, LayerPose::new(0.0, 0.01, 0.0)),
                    (0.5, LayerPose::new(180.0, 0.5, 0.5)),
                    (1.0, LayerPose::new(360.0, 1.0, 1.0)),
                ],
            )?,
            shift_color_start: KeyframeAnimation::new(
                "shiftColorStart",
                6_000,
                Ease::Linear,
                Iterations::Infinite,
                FillMode::None,
                [
                    (0.0, Rgb8::new(0x00, 0x66, 0xCC)),
                    (0.25, Rgb8::new(0x00, 0x80, 0xFF)),
                    (0.5, Rgb8::new(0x41, 0x69, 0xE1)),
                    (0.75, Rgb8::new(0x1E, 0x90, 0xFF)),
                    (1.0, Rgb8::new(0x00, 0x66, 0xCC)),
                ],
            )?,
            shift_color_end: KeyframeAnimation::new(
                "shiftColorEnd",
                6_000,
                Ease::Linear,
                Iterations::Infinite,
                FillMode::None,
                [
                    (0.0, Rgb8::new(0x1E, 0x90, 0xFF)),
                    (0.25, Rgb8::new(0x46, 0x82, 0xB4)),
                    (0.5, Rgb8::new(0x99, 0x32, 0xCC)),
                    (0.75, Rgb8::new(0x8A, 0x2B, 0xE2)),
                    (1.0, Rgb8::new(0x1E, 0x90, 0xFF)),
                ],
            )?,
            morph_ease: Ease::CSS_EASE_IN_OUT,
        })
    }

    /// Pose of the shape layer `elapsed_ms` after `class` was applied.
    pub fn shape_pose(&self, class: ShapeClass, elapsed_ms: u64) -> LayerPose {
        let pose = match class {
            ShapeClass::Rotating => self.rotate_background.sample(elapsed_ms),
            ShapeClass::Collapsing => self.collapse_shape.sample(elapsed_ms),
            ShapeClass::Hidden => Some(LayerPose::HIDDEN),
        };
        pose.unwrap_or(LayerPose::REST)
    }

    /// Pose of the white star `elapsed_ms` into `star`. Only meaningful while it is visible.
    pub fn white_star_pose(&self, star: StarState, elapsed_ms: u64) -> LayerPose {
        match star {
            StarState::Collapsing => self
                .rotate_and_collapse
                .sample(elapsed_ms)
                .unwrap_or(LayerPose::REST),
            _ => LayerPose::REST,
        }
    }

    /// Pose of the black star `elapsed_ms` into `star`. Only meaningful while it is visible.
    pub fn black_star_pose(&self, star: StarState, elapsed_ms: u64) -> LayerPose {
        match star {
            StarState::Black => self
                .emerge_and_rotate
                .sample(elapsed_ms)
                .unwrap_or(LayerPose::REST),
            _ => LayerPose::REST,
        }
    }

    /// Gradient stop colors `since_mount_ms` after mount.
    pub fn gradient_stops(&self, since_mount_ms: u64) -> [Rgb8; 2] {
        let start = self
            .shift_color_start
            .sample(since_mount_ms)
            .unwrap_or(Rgb8::new(0x00, 0x66, 0xCC));
        let end = self
            .shift_color_end
            .sample(since_mount_ms)
            .unwrap_or(Rgb8::new(0x1E, 0x90, 0xFF));
        [start, end]
    }

    /// The full stylesheet as CSS text.
    pub fn to_css(&self, morph_ms: u64) -> String {
        let mut out = String::new();

        // Transforms in SVG pivot on the viewport origin unless told otherwise.
        let shape_origin = pivot_css(SHAPE_VIEWBOX / 2.0);
        let rules: [(&str, String); 9] = [
            (
                ".shape-rotating",
                format!(
                    "{shape_origin} animation: {};",
                    shorthand(&self.rotate_background)
                ),
            ),
            (
                ".shape-collapsing",
                format!(
                    "{shape_origin} animation: {};",
                    shorthand(&self.collapse_shape)
                ),
            ),
            (
                ".shape-hidden",
                format!(
                    "{shape_origin} opacity: {}; transform: scale({});",
                    LayerPose::HIDDEN.opacity,
                    LayerPose::HIDDEN.scale
                ),
            ),
            (
                ".morph-path",
                format!(
                    "transition: d {} {};",
                    css_secs(morph_ms),
                    self.morph_ease.css()
                ),
            ),
            (".star", pivot_css(LOGO_BOX_PX / 2.0)),
            (
                ".star-collapsing",
                format!("animation: {};", shorthand(&self.rotate_and_collapse)),
            ),
            (
                ".star-emerging",
                format!("animation: {};", shorthand(&self.emerge_and_rotate)),
            ),
            (
                ".gradient-start",
                format!("animation: {};", shorthand(&self.shift_color_start)),
            ),
            (
                ".gradient-end",
                format!("animation: {};", shorthand(&self.shift_color_end)),
            ),
        ];
        for (selector, body) in rules {
            let _ = writeln!(out, "{selector} {{ {body} }}");
        }

        out.push('\n');
        write_keyframes(&mut out, &self.rotate_background);
        write_keyframes(&mut out, &self.collapse_shape);
        write_keyframes(&mut out, &self.rotate_and_collapse);
        write_keyframes(&mut out, &self.emerge_and_rotate);
        write_keyframes(&mut out, &self.shift_color_start);
        write_keyframes(&mut out, &self.shift_color_end);
        out
    }
}

fn pivot_css(center: f64) -> String {
    format!("transform-box: view-box; transform-origin: {center}px {center}px;")
}

fn css_secs(ms: u64) -> String {
    format!("{}s", ms as f64 / 1000.0)
}

fn shorthand<T>(anim: &KeyframeAnimation<T>) -> String {
    let mut s = format!(
        "{} {} {}",
        anim.name,
        css_secs(anim.duration_ms),
        anim.timing.css()
    );
    match anim.iterations {
        Iterations::Infinite => s.push_str(" infinite"),
        Iterations::Count(1) => {}
        Iterations::Count(n) => {
            let _ = write!(s, " {n}");
        }
    }
    if anim.fill == FillMode::Forwards {
        s.push_str(" forwards");
    }
    s
}

fn write_keyframes<T: CssDeclarations>(out: &mut String, anim: &KeyframeAnimation<T>) {
    let _ = writeln!(out, "@keyframes {} {{", anim.name);
    for key in &anim.keys {
        let _ = writeln!(
            out,
            "  {}% {{ {} }}",
            key.offset * 100.0,
            key.value.css_declarations()
        );
    }
    out.push_str("}\n");
}
