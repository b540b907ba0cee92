use kurbo::BezPath;

use crate::{
    config::LogoTiming,
    foundation::{
        core::{Rgb8, TimeMs},
        error::LogoResult,
    },
    logo::{
        component::LogoState,
        phase::ShapeClass,
        shapes::ShapeSet,
        styles::{LayerPose, StyleSheet},
        timeline::Timeline,
    },
};

#[derive(Clone, Debug, PartialEq)]
pub struct ShapeLayer {
    pub class: ShapeClass,
    /// Outline in the 300×300 shape user space, mid-morph if a transition is running.
    pub path: BezPath,
    pub pose: LayerPose,
    /// Gradient stop colors at 0% and 100%.
    pub gradient: [Rgb8; 2],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarLayer {
    pub visible: bool,
    /// `star-collapsing` / `star-emerging` while the matching animation runs.
    pub class: Option<&'static str>,
    pub pose: LayerPose,
}

/// Everything needed to draw one instant of the logo.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameScene {
    pub time: TimeMs,
    pub state: LogoState,
    pub shape: ShapeLayer,
    pub white_star: StarLayer,
    pub black_star: StarLayer,
}

/// Pure `time -> FrameScene` evaluation.
#[derive(Clone, Debug)]
pub struct SceneEvaluator {
    timeline: Timeline,
    styles: StyleSheet,
    shapes: ShapeSet,
}

impl SceneEvaluator {
    pub fn new(timing: LogoTiming) -> LogoResult<Self> {
        Ok(Self {
            timeline: Timeline::new(timing)?,
            styles: StyleSheet::standard()?,
            shapes: ShapeSet::parse()?,
        })
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    pub fn shapes(&self) -> &ShapeSet {
        &self.shapes
    }

    #[tracing::instrument(skip(self))]
    pub fn evaluate(&self, t: TimeMs) -> FrameScene {
        let sample = self.timeline.sample(t);
        let state = sample.state;
        let step_elapsed = sample.step_elapsed(t);

        let morph_ms = self.timeline.timing().morph_ms;
        let since_change = t.saturating_sub(sample.cursor_since);
        let path = match sample.previous_cursor {
            Some(prev) if since_change < morph_ms => {
                let eased = self
                    .styles
                    .morph_ease
                    .apply(since_change as f64 / morph_ms as f64);
                self.shapes.morph(prev, state.cursor, eased)
            }
            _ => self.shapes.get(state.cursor).clone(),
        };

        let class = state.shape_class();
        let shape = ShapeLayer {
            class,
            path,
            pose: self.styles.shape_pose(class, step_elapsed),
            gradient: self.styles.gradient_stops(t.0),
        };

        FrameScene {
            time: t,
            state,
            shape,
            white_star: StarLayer {
                visible: state.white_visible(),
                class: state.star.white_star_class(),
                pose: self.styles.white_star_pose(state.star, step_elapsed),
            },
            black_star: StarLayer {
                visible: state.black_visible(),
                class: state.star.black_star_class(),
                pose: self.styles.black_star_pose(state.star, step_elapsed),
            },
        }
    }
}
