use crate::{
    animation::ease::Ease,
    foundation::core::Rgb8,
    foundation::error::{LogoError, LogoResult},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Rgb8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe<T> {
    pub offset: f64, // 0.0 ..= 1.0
    pub value: T,
    pub ease: Ease, // ease applied toward next key
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Iterations {
    Count(u32),
    Infinite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillMode {
    None,
    Forwards,
}

/// A named `@keyframes` rule bound to its `animation` shorthand settings.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyframeAnimation<T> {
    pub name: &'static str,
    pub duration_ms: u64,
    pub timing: Ease,
    pub iterations: Iterations,
    pub fill: FillMode,
    pub keys: Vec<Keyframe<T>>, // sorted by offset
}

impl<T> KeyframeAnimation<T>
where
    T: Lerp + Clone,
{
    /// Build an animation whose every keyframe interval uses `timing`.
    pub fn new(
        name: &'static str,
        duration_ms: u64,
        timing: Ease,
        iterations: Iterations,
        fill: FillMode,
        stops: impl IntoIterator<Item = (f64, T)>,
    ) -> LogoResult<Self> {
        let anim = Self {
            name,
            duration_ms,
            timing,
            iterations,
            fill,
            keys: stops
                .into_iter()
                .map(|(offset, value)| Keyframe {
                    offset,
                    value,
                    ease: timing,
                })
                .collect(),
        };
        anim.validate()?;
        Ok(anim)
    }

    pub fn validate(&self) -> LogoResult<()> {
        if self.duration_ms == 0 {
            return Err(LogoError::animation(format!(
                "animation '{}' duration must be > 0",
                self.name
            )));
        }
        if self.keys.is_empty() {
            return Err(LogoError::animation(format!(
                "animation '{}' must have at least one keyframe",
                self.name
            )));
        }
        if self
            .keys
            .iter()
            .any(|k| !k.offset.is_finite() || !(0.0..=1.0).contains(&k.offset))
        {
            return Err(LogoError::animation(format!(
                "animation '{}' keyframe offsets must lie in [0, 1]",
                self.name
            )));
        }
        if !self.keys.windows(2).all(|w| w[0].offset <= w[1].offset) {
            return Err(LogoError::animation(format!(
                "animation '{}' keyframes must be sorted by offset",
                self.name
            )));
        }
        if let Iterations::Count(0) = self.iterations {
            return Err(LogoError::animation(format!(
                "animation '{}' iteration count must be > 0",
                self.name
            )));
        }
        Ok(())
    }

    /// Value `elapsed_ms` after the animation was applied, or `None` once a finite animation
    /// without forward fill has ended.
    pub fn sample(&self, elapsed_ms: u64) -> Option<T> {
        let progress = match self.iterations {
            Iterations::Infinite => (elapsed_ms % self.duration_ms) as f64 / self.duration_ms as f64,
            Iterations::Count(n) => {
                let total = self.duration_ms.saturating_mul(u64::from(n));
                if elapsed_ms >= total {
                    match self.fill {
                        FillMode::Forwards => 1.0,
                        FillMode::None => return None,
                    }
                } else {
                    (elapsed_ms % self.duration_ms) as f64 / self.duration_ms as f64
                }
            }
        };
        Some(self.sample_progress(progress))
    }

    /// Value at normalized iteration progress `p` in `[0, 1]`.
    pub fn sample_progress(&self, p: f64) -> T {
        let p = p.clamp(0.0, 1.0);
        let idx = self.keys.partition_point(|k| k.offset <= p);

        if idx == 0 {
            return self.keys[0].value.clone();
        }
        if idx >= self.keys.len() {
            return self.keys[self.keys.len() - 1].value.clone();
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let span = b.offset - a.offset;
        if span <= 0.0 {
            return a.value.clone();
        }

        let t = (p - a.offset) / span;
        T::lerp(&a.value, &b.value, a.ease.apply(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(iterations: Iterations, fill: FillMode) -> KeyframeAnimation<f64> {
        KeyframeAnimation::new(
            "ramp",
            1000,
            Ease::Linear,
            iterations,
            fill,
            [(0.0, 0.0), (1.0, 10.0)],
        )
        .unwrap()
    }

    #[test]
    fn linear_interpolates_within_segment() {
        let anim = ramp(Iterations::Count(1), FillMode::None);
        assert_eq!(anim.sample(0), Some(0.0));
        assert_eq!(anim.sample(500), Some(5.0));
    }

    #[test]
    fn finite_without_fill_ends() {
        let anim = ramp(Iterations::Count(1), FillMode::None);
        assert_eq!(anim.sample(1000), None);
    }

    #[test]
    fn forwards_fill_holds_last_key() {
        let anim = ramp(Iterations::Count(1), FillMode::Forwards);
        assert_eq!(anim.sample(1000), Some(10.0));
        assert_eq!(anim.sample(60_000), Some(10.0));
    }

    #[test]
    fn infinite_wraps() {
        let anim = ramp(Iterations::Infinite, FillMode::None);
        assert_eq!(anim.sample(1250), Some(2.5));
        assert_eq!(anim.sample(2000), Some(0.0));
    }

    #[test]
    fn midpoint_key_splits_segments() {
        let anim = KeyframeAnimation::new(
            "tri",
            2000,
            Ease::Linear,
            Iterations::Count(1),
            FillMode::Forwards,
            [(0.0, 0.0), (0.5, 180.0), (1.0, 360.0)],
        )
        .unwrap();
        assert_eq!(anim.sample(500), Some(90.0));
        assert_eq!(anim.sample(1000), Some(180.0));
        assert_eq!(anim.sample(1500), Some(270.0));
    }

    #[test]
    fn color_lerp_rounds_channels() {
        let a = Rgb8::new(0, 0, 0);
        let b = Rgb8::new(255, 100, 1);
        assert_eq!(Rgb8::lerp(&a, &b, 0.5), Rgb8::new(128, 50, 1));
    }

    #[test]
    fn validate_rejects_bad_input() {
        assert!(
            KeyframeAnimation::new(
                "zero",
                0,
                Ease::Linear,
                Iterations::Infinite,
                FillMode::None,
                [(0.0, 1.0)],
            )
            .is_err()
        );
        assert!(
            KeyframeAnimation::<f64>::new(
                "empty",
                10,
                Ease::Linear,
                Iterations::Infinite,
                FillMode::None,
                [],
            )
            .is_err()
        );
        assert!(
            KeyframeAnimation::new(
                "unsorted",
                10,
                Ease::Linear,
                Iterations::Infinite,
                FillMode::None,
                [(1.0, 1.0), (0.0, 0.0)],
            )
            .is_err()
        );
    }
}
