use crate::foundation::error::{LogoError, LogoResult};

pub use kurbo::{Affine, BezPath, Point, Vec2};

/// Milliseconds since the component was mounted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeMs(pub u64);

impl TimeMs {
    pub const ZERO: Self = Self(0);

    pub fn saturating_add(self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }

    pub fn saturating_sub(self, other: Self) -> u64 {
        self.0.saturating_sub(other.0)
    }
}

impl std::fmt::Display for TimeMs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> LogoResult<Self> {
        if den == 0 {
            return Err(LogoError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(LogoError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Timestamp of `frame`, floored to whole milliseconds.
    pub fn frame_to_time(self, frame: FrameIndex) -> TimeMs {
        let ms = u128::from(frame.0) * 1000 * u128::from(self.den) / u128::from(self.num);
        TimeMs(u64::try_from(ms).unwrap_or(u64::MAX))
    }

    /// Number of frames whose timestamp falls inside `[0, duration_ms)`.
    pub fn frames_in(self, duration_ms: u64) -> u64 {
        let num = u128::from(duration_ms) * u128::from(self.num);
        let den = 1000 * u128::from(self.den);
        u64::try_from(num.div_ceil(den)).unwrap_or(u64::MAX)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

/// Straight (non-premultiplied) sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Rotate/scale about an anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform2D {
    pub rotation_rad: f64,
    pub scale: Vec2,  // default (1,1)
    pub anchor: Vec2, // pivot in local space
}

impl Transform2D {
    /// Uniform scale and rotation (degrees) about `anchor`, the way a CSS transform with
    /// `transform-origin: center` behaves.
    pub fn about(anchor: Vec2, rotation_deg: f64, scale: f64) -> Self {
        Self {
            rotation_rad: rotation_deg.to_radians(),
            scale: Vec2::new(scale, scale),
            anchor,
        }
    }

    pub fn to_affine(self) -> Affine {
        let t_anchor = Affine::translate(self.anchor);
        let t_unanchor = Affine::translate(-self.anchor);
        let t_rotate = Affine::rotate(self.rotation_rad);
        let t_scale = Affine::scale_non_uniform(self.scale.x, self.scale.y);

        // T(anchor) * R(rot) * S(scale) * T(-anchor)
        t_anchor * t_rotate * t_scale * t_unanchor
    }
}
