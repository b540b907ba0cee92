//! The fixed outline sequence the logo cycles through.
//!
//! All outlines live in a 300×300 user space centered on (150, 150).

use kurbo::{BezPath, PathEl, Point};

use crate::foundation::error::{LogoError, LogoResult};

/// Number of outlines in the cycle.
pub const SHAPE_COUNT: usize = 7;

/// Side of the square user space the outlines are authored in.
pub const SHAPE_VIEWBOX: f64 = 300.0;

const CIRCLE_WIDE: &str = "M150 20 C230 20 280 70 280 150 C280 230 230 280 150 280 C70 280 20 230 20 150 C20 70 70 20 150 20 Z";
const CIRCLE_NARROW: &str = "M150 20 C220 20 270 70 270 150 C270 230 220 280 150 280 C80 280 30 230 30 150 C30 70 80 20 150 20 Z";
const PETALS: &str = "M150,150 L265.48,102.16 Q300.00,150.00 265.48,197.84 Z M150,150 L265.48,197.84 Q256.07,256.07 197.84,265.48 Z M150,150 L197.84,265.48 Q150.00,300.00 102.16,265.48 Z M150,150 L102.16,265.48 Q43.93,256.07 34.52,197.84 Z M150,150 L34.52,197.84 Q0.00,150.00 34.52,102.16 Z M150,150 L34.52,102.16 Q43.93,43.93 102.16,34.52 Z M150,150 L102.16,34.52 Q150.00,0.00 197.84,34.52 Z M150,150 L197.84,34.52 Q256.07,43.93 265.48,102.16 Z";
const HEXAGON: &str = "M131.29 16.80 Q150.00 6.00 168.71 16.80 L256.00 67.20 Q274.71 78.00 274.71 99.60 L274.71 200.40 Q274.71 222.00 256.00 232.80 L168.71 283.20 Q150.00 294.00 131.29 283.20 L44.00 232.80 Q25.29 222.00 25.29 200.40 L25.29 99.60 Q25.29 78.00 44.00 67.20 Z";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Circle1,
    Circle2,
    Star,
    Hexagon,
    Circle3,
    Circle4,
    Hexagon2,
}

impl ShapeKind {
    /// Cycle order; the cursor indexes into this.
    pub const SEQUENCE: [ShapeKind; SHAPE_COUNT] = [
        ShapeKind::Circle1,
        ShapeKind::Circle2,
        ShapeKind::Star,
        ShapeKind::Hexagon,
        ShapeKind::Circle3,
        ShapeKind::Circle4,
        ShapeKind::Hexagon2,
    ];

    pub fn at(cursor: usize) -> Self {
        Self::SEQUENCE[cursor % SHAPE_COUNT]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Circle1 => "circle1",
            Self::Circle2 => "circle2",
            Self::Star => "star",
            Self::Hexagon => "hexagon",
            Self::Circle3 => "circle3",
            Self::Circle4 => "circle4",
            Self::Hexagon2 => "hexagon2",
        }
    }

    /// SVG path data, verbatim.
    pub fn path_data(self) -> &'static str {
        match self {
            Self::Circle1 | Self::Circle4 => CIRCLE_WIDE,
            Self::Circle2 | Self::Circle3 => CIRCLE_NARROW,
            Self::Star => PETALS,
            Self::Hexagon | Self::Hexagon2 => HEXAGON,
        }
    }
}

/// Parsed outlines, indexed like [`ShapeKind::SEQUENCE`].
#[derive(Clone, Debug)]
pub struct ShapeSet {
    paths: Vec<BezPath>,
}

impl ShapeSet {
    pub fn parse() -> LogoResult<Self> {
        let paths = ShapeKind::SEQUENCE
            .iter()
            .map(|kind| {
                BezPath::from_svg(kind.path_data()).map_err(|e| {
                    LogoError::validation(format!("shape '{}' has invalid path data: {e}", kind.name()))
                })
            })
            .collect::<LogoResult<Vec<_>>>()?;
        Ok(Self { paths })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn get(&self, cursor: usize) -> &BezPath {
        &self.paths[cursor % self.paths.len()]
    }

    /// Outline partway through the transition from `from` to `to`.
    ///
    /// `eased` is the already-eased progress. Outlines with matching element structure blend
    /// point by point; anything else flips at the halfway mark.
    pub fn morph(&self, from: usize, to: usize, eased: f64) -> BezPath {
        let a = self.get(from);
        let b = self.get(to);
        if eased <= 0.0 {
            return a.clone();
        }
        if eased >= 1.0 {
            return b.clone();
        }
        match lerp_paths(a, b, eased) {
            Some(p) => p,
            None if eased < 0.5 => a.clone(),
            None => b.clone(),
        }
    }
}

/// `true` when `a` and `b` can be blended element by element.
pub fn paths_compatible(a: &BezPath, b: &BezPath) -> bool {
    let (ea, eb) = (a.elements(), b.elements());
    ea.len() == eb.len()
        && ea
            .iter()
            .zip(eb)
            .all(|(x, y)| std::mem::discriminant(x) == std::mem::discriminant(y))
}

fn lerp_paths(a: &BezPath, b: &BezPath, t: f64) -> Option<BezPath> {
    if !paths_compatible(a, b) {
        return None;
    }
    let lp = |p: Point, q: Point| p.lerp(q, t);
    let els = a
        .elements()
        .iter()
        .zip(b.elements())
        .map(|(x, y)| match (*x, *y) {
            (PathEl::MoveTo(p), PathEl::MoveTo(q)) => PathEl::MoveTo(lp(p, q)),
            (PathEl::LineTo(p), PathEl::LineTo(q)) => PathEl::LineTo(lp(p, q)),
            (PathEl::QuadTo(p1, p2), PathEl::QuadTo(q1, q2)) => {
                PathEl::QuadTo(lp(p1, q1), lp(p2, q2))
            }
            (PathEl::CurveTo(p1, p2, p3), PathEl::CurveTo(q1, q2, q3)) => {
                PathEl::CurveTo(lp(p1, q1), lp(p2, q2), lp(p3, q3))
            }
            _ => PathEl::ClosePath,
        })
        .collect::<Vec<_>>();
    Some(BezPath::from_vec(els))
}

#[cfg(test)]
mod tests {
    use kurbo::Shape as _;

    use super::*;

    #[test]
    fn all_shapes_parse() {
        let set = ShapeSet::parse().unwrap();
        assert_eq!(set.len(), SHAPE_COUNT);
        for i in 0..SHAPE_COUNT {
            let bbox = set.get(i).bounding_box();
            assert!(bbox.x0 >= 0.0 && bbox.y0 >= 0.0, "{i}: {bbox:?}");
            assert!(bbox.x1 <= SHAPE_VIEWBOX && bbox.y1 <= SHAPE_VIEWBOX, "{i}: {bbox:?}");
        }
    }

    #[test]
    fn cursor_wraps_modulo_count() {
        assert_eq!(ShapeKind::at(0), ShapeKind::Circle1);
        assert_eq!(ShapeKind::at(2), ShapeKind::Star);
        assert_eq!(ShapeKind::at(7), ShapeKind::Circle1);
        assert_eq!(ShapeKind::at(13), ShapeKind::Hexagon2);
    }

    #[test]
    fn circles_blend_pointwise() {
        let set = ShapeSet::parse().unwrap();
        assert!(paths_compatible(set.get(0), set.get(1)));

        let mid = set.morph(0, 1, 0.5);
        let PathEl::CurveTo(c1, _, end) = mid.elements()[1] else {
            panic!("expected curve");
        };
        // C230 20 .. 280 150 halfway to C220 20 .. 270 150
        assert!((c1.x - 225.0).abs() < 1e-9);
        assert!((end.x - 275.0).abs() < 1e-9);
    }

    #[test]
    fn incompatible_shapes_flip_at_half() {
        let set = ShapeSet::parse().unwrap();
        assert!(!paths_compatible(set.get(1), set.get(2)));
        assert_eq!(set.morph(1, 2, 0.49), *set.get(1));
        assert_eq!(set.morph(1, 2, 0.5), *set.get(2));
    }

    #[test]
    fn morph_endpoints_are_exact() {
        let set = ShapeSet::parse().unwrap();
        assert_eq!(set.morph(4, 5, 0.0), *set.get(4));
        assert_eq!(set.morph(4, 5, 1.0), *set.get(5));
    }
}
