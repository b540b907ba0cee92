use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;

use crate::foundation::{
    core::Fps,
    error::{LogoError, LogoResult},
};

/// Hold times and intervals driving the logo cycle, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogoTiming {
    /// INITIAL / WHITE: the outline cycles through every shape.
    pub showcase_ms: u64,
    /// COLLAPSING / COLLAPSING.
    pub collapse_ms: u64,
    /// EMERGING / BLACK.
    pub emerge_ms: u64,
    /// PAUSED / PAUSED.
    pub pause_ms: u64,
    /// Cursor tick period while INITIAL.
    pub shape_interval_ms: u64,
    /// Outline interpolation after each cursor change.
    pub morph_ms: u64,
}

impl Default for LogoTiming {
    fn default() -> Self {
        Self {
            showcase_ms: 15_400,
            collapse_ms: 2_000,
            emerge_ms: 2_200,
            pause_ms: 1_200,
            shape_interval_ms: 2_200,
            morph_ms: 1_500,
        }
    }
}

impl LogoTiming {
    pub fn cycle_ms(&self) -> u64 {
        self.showcase_ms + self.collapse_ms + self.emerge_ms + self.pause_ms
    }

    pub fn validate(&self) -> LogoResult<()> {
        for (name, v) in [
            ("showcase_ms", self.showcase_ms),
            ("collapse_ms", self.collapse_ms),
            ("emerge_ms", self.emerge_ms),
            ("pause_ms", self.pause_ms),
            ("shape_interval_ms", self.shape_interval_ms),
        ] {
            if v == 0 {
                return Err(LogoError::validation(format!("timing.{name} must be > 0")));
            }
        }
        if self.shape_interval_ms > self.showcase_ms {
            return Err(LogoError::validation(
                "timing.shape_interval_ms must not exceed timing.showcase_ms",
            ));
        }
        if self
            .showcase_ms
            .checked_add(self.collapse_ms)
            .and_then(|v| v.checked_add(self.emerge_ms))
            .and_then(|v| v.checked_add(self.pause_ms))
            .is_none()
        {
            return Err(LogoError::validation("timing cycle length overflows"));
        }
        Ok(())
    }
}

/// Top-level settings for rendering and driving the logo.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogoConfig {
    pub timing: LogoTiming,
    /// Output box side in pixels. The star overlay covers the central half.
    pub size_px: u32,
    pub fps: Fps,
    /// Straight RGBA8 clear color; transparent when unset.
    pub background: Option<[u8; 4]>,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            timing: LogoTiming::default(),
            size_px: 400,
            fps: Fps::default(),
            background: None,
        }
    }
}

impl LogoConfig {
    pub fn validate(&self) -> LogoResult<()> {
        self.timing.validate()?;
        if self.size_px == 0 {
            return Err(LogoError::validation("size_px must be > 0"));
        }
        if self.size_px > 8192 {
            return Err(LogoError::validation("size_px must be <= 8192"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        Ok(())
    }

    pub fn from_json_str(s: &str) -> LogoResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: &Path) -> LogoResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_cycle() {
        let t = LogoTiming::default();
        assert_eq!(t.cycle_ms(), 20_800);
        assert_eq!(t.showcase_ms, 7 * t.shape_interval_ms);
        LogoConfig::default().validate().unwrap();
    }

    #[test]
    fn empty_json_is_default() {
        let cfg = LogoConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, LogoConfig::default());
    }

    #[test]
    fn partial_timing_override() {
        let cfg = LogoConfig::from_json_str(r#"{"timing": {"pause_ms": 500}, "size_px": 200}"#)
            .unwrap();
        assert_eq!(cfg.timing.pause_ms, 500);
        assert_eq!(cfg.timing.showcase_ms, 15_400);
        assert_eq!(cfg.size_px, 200);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = LogoConfig::from_json_str(r#"{"sizepx": 10}"#).unwrap_err();
        assert!(matches!(err, LogoError::Serde(_)));
    }

    #[test]
    fn zero_durations_are_rejected() {
        let err = LogoConfig::from_json_str(r#"{"timing": {"collapse_ms": 0}}"#).unwrap_err();
        assert!(err.to_string().contains("collapse_ms"));
    }

    #[test]
    fn interval_longer_than_showcase_is_rejected() {
        let timing = LogoTiming {
            showcase_ms: 1_000,
            shape_interval_ms: 2_000,
            ..LogoTiming::default()
        };
        assert!(timing.validate().is_err());
    }

    #[test]
    fn zero_fps_is_rejected() {
        let cfg = LogoConfig {
            fps: Fps { num: 0, den: 1 },
            ..LogoConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
