use crate::config::LogoTiming;

/// Stage of the outline/star cycle; selects the class on the shape layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnimationPhase {
    Initial,
    Collapsing,
    Emerging,
    Paused,
}

impl AnimationPhase {
    /// Class applied to the shape layer while in this phase.
    pub fn shape_class(self) -> ShapeClass {
        match self {
            Self::Initial => ShapeClass::Rotating,
            Self::Collapsing => ShapeClass::Collapsing,
            Self::Emerging | Self::Paused => ShapeClass::Hidden,
        }
    }
}

/// Which star image is shown and what it is doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StarState {
    White,
    Black,
    Collapsing,
    Paused,
}

impl StarState {
    pub fn white_visible(self) -> bool {
        matches!(self, Self::White | Self::Collapsing)
    }

    pub fn black_visible(self) -> bool {
        matches!(self, Self::Black | Self::Paused)
    }

    /// Animation class carried by the white star image, if any.
    pub fn white_star_class(self) -> Option<&'static str> {
        match self {
            Self::Collapsing => Some("star-collapsing"),
            _ => None,
        }
    }

    /// Animation class carried by the black star image, if any.
    pub fn black_star_class(self) -> Option<&'static str> {
        match self {
            Self::Black => Some("star-emerging"),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeClass {
    Rotating,
    Collapsing,
    Hidden,
}

impl ShapeClass {
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Rotating => "shape-rotating",
            Self::Collapsing => "shape-collapsing",
            Self::Hidden => "shape-hidden",
        }
    }
}

/// One step of the phase loop. Phase and star state always change together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CycleStep {
    Showcase,
    Collapse,
    Emerge,
    Pause,
}

impl CycleStep {
    pub const ORDER: [CycleStep; 4] = [
        CycleStep::Showcase,
        CycleStep::Collapse,
        CycleStep::Emerge,
        CycleStep::Pause,
    ];

    pub fn phase(self) -> AnimationPhase {
        match self {
            Self::Showcase => AnimationPhase::Initial,
            Self::Collapse => AnimationPhase::Collapsing,
            Self::Emerge => AnimationPhase::Emerging,
            Self::Pause => AnimationPhase::Paused,
        }
    }

    pub fn star(self) -> StarState {
        match self {
            Self::Showcase => StarState::White,
            Self::Collapse => StarState::Collapsing,
            Self::Emerge => StarState::Black,
            Self::Pause => StarState::Paused,
        }
    }

    pub fn hold_ms(self, timing: &LogoTiming) -> u64 {
        match self {
            Self::Showcase => timing.showcase_ms,
            Self::Collapse => timing.collapse_ms,
            Self::Emerge => timing.emerge_ms,
            Self::Pause => timing.pause_ms,
        }
    }

    /// Offset of this step from the start of its cycle.
    pub fn offset_ms(self, timing: &LogoTiming) -> u64 {
        Self::ORDER
            .iter()
            .take_while(|s| **s != self)
            .map(|s| s.hold_ms(timing))
            .sum()
    }

    /// The step that follows; `Pause` wraps to `Showcase`.
    pub fn next(self) -> Self {
        match self {
            Self::Showcase => Self::Collapse,
            Self::Collapse => Self::Emerge,
            Self::Emerge => Self::Pause,
            Self::Pause => Self::Showcase,
        }
    }

    /// Step active `cycle_offset_ms` into a cycle.
    pub fn at_offset(timing: &LogoTiming, cycle_offset_ms: u64) -> Self {
        let mut start = 0;
        for step in Self::ORDER {
            let end = start + step.hold_ms(timing);
            if cycle_offset_ms < end {
                return step;
            }
            start = end;
        }
        Self::Pause
    }
}
