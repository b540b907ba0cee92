/// Easing functions used to map normalized animation progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`. `x1` and `x2` must lie in `[0, 1]`.
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Ease {
    /// CSS `ease`.
    pub const CSS_EASE: Self = Self::CubicBezier {
        x1: 0.25,
        y1: 0.1,
        x2: 0.25,
        y2: 1.0,
    };

    /// CSS `ease-in-out`.
    pub const CSS_EASE_IN_OUT: Self = Self::CubicBezier {
        x1: 0.42,
        y1: 0.0,
        x2: 0.58,
        y2: 1.0,
    };

    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicBezier { x1, y1, x2, y2 } => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let s = solve_bezier_param(t, x1.clamp(0.0, 1.0), x2.clamp(0.0, 1.0));
                bezier_coord(s, y1, y2)
            }
        }
    }

    /// CSS `<easing-function>` text for this curve.
    pub fn css(self) -> String {
        match self {
            Self::Linear => "linear".to_owned(),
            e if e == Self::CSS_EASE => "ease".to_owned(),
            e if e == Self::CSS_EASE_IN_OUT => "ease-in-out".to_owned(),
            Self::CubicBezier { x1, y1, x2, y2 } => format!("cubic-bezier({x1}, {y1}, {x2}, {y2})"),
        }
    }
}

// One axis of a unit cubic bezier with endpoints 0 and 1.
fn bezier_coord(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_coord_deriv(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find `s` with `x(s) == x`. Newton first, bisection if it stalls.
fn solve_bezier_param(x: f64, x1: f64, x2: f64) -> f64 {
    const EPS: f64 = 1e-9;

    let mut s = x;
    for _ in 0..8 {
        let err = bezier_coord(s, x1, x2) - x;
        if err.abs() < EPS {
            return s;
        }
        let d = bezier_coord_deriv(s, x1, x2);
        if d.abs() < 1e-6 {
            break;
        }
        s -= err / d;
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    s = x;
    for _ in 0..64 {
        let v = bezier_coord(s, x1, x2);
        if (v - x).abs() < EPS {
            break;
        }
        if v < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 3] = [
        Ease::Linear,
        Ease::CSS_EASE,
        Ease::CSS_EASE_IN_OUT,
    ];

    #[test]
    fn endpoints_are_stable() {
        for ease in ALL {
            assert_eq!(ease.apply(0.0), 0.0);
            assert_eq!(ease.apply(1.0), 1.0);
        }
    }

    #[test]
    fn monotonic_spot_check() {
        for ease in ALL {
            let a = ease.apply(0.25);
            let b = ease.apply(0.5);
            let c = ease.apply(0.75);
            assert!(a < b, "{ease:?}");
            assert!(b < c, "{ease:?}");
        }
    }

    #[test]
    fn css_ease_in_out_is_symmetric() {
        let e = Ease::CSS_EASE_IN_OUT;
        assert!((e.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((e.apply(0.2) + e.apply(0.8) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn css_ease_runs_ahead_of_linear_midway() {
        // `ease` reaches roughly 80% of its output at half time.
        let v = Ease::CSS_EASE.apply(0.5);
        assert!((v - 0.8024).abs() < 1e-3, "{v}");
    }

    #[test]
    fn css_names() {
        assert_eq!(Ease::Linear.css(), "linear");
        assert_eq!(Ease::CSS_EASE.css(), "ease");
        assert_eq!(Ease::CSS_EASE_IN_OUT.css(), "ease-in-out");
        let custom = Ease::CubicBezier {
            x1: 0.5,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
        };
        assert_eq!(custom.css(), "cubic-bezier(0.5, 0, 1, 1)");
    }
}
