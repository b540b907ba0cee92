//! logomorph renders an animated logo: a gradient-filled outline that morphs through seven shapes
//! and periodically collapses into a star, which flips from white to black and back.
//!
//! Two ways in:
//!
//! - [`AnimatedLogo`]: the stateful component. Mount it, then drive it with a [`Driver`] (or call
//!   [`AnimatedLogo::advance_to`] yourself) and react to [`LogoEvent`]s.
//! - [`RenderSession`]: pure `time -> frame` rendering for stills, PNG sequences and MP4 output.
#![forbid(unsafe_code)]

mod foundation;

/// Easing and keyframe sampling.
pub mod animation;
/// Star image loading.
pub mod assets;
/// JSON configuration.
pub mod config;
/// Frame sinks.
pub mod encode;
/// The logo component, its state machine and its scene model.
pub mod logo;
/// SVG and raster output.
pub mod render;
/// Timers and the driving loop.
pub mod runtime;
/// Session-oriented rendering API.
pub mod session;

pub use crate::foundation::core::{
    Affine, BezPath, Fps, FrameIndex, Point, Rgb8, TimeMs, Transform2D, Vec2,
};
pub use crate::foundation::error::{LogoError, LogoResult};

pub use crate::animation::ease::Ease;
pub use crate::assets::{StarAssets, StarImage};
pub use crate::config::{LogoConfig, LogoTiming};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use crate::logo::component::{AnimatedLogo, LogoEvent, LogoState};
pub use crate::logo::phase::{AnimationPhase, CycleStep, ShapeClass, StarState};
pub use crate::logo::scene::{FrameScene, SceneEvaluator};
pub use crate::logo::shapes::{ShapeKind, ShapeSet};
pub use crate::logo::styles::{LayerPose, StyleSheet};
pub use crate::logo::timeline::{Timeline, TimelineSample};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::markup::StarHrefs;
pub use crate::render::raster::CpuRasterizer;
pub use crate::runtime::driver::{Clock, Driver, ManualClock, RunStats, SystemClock};
pub use crate::runtime::timers::TimerQueue;
pub use crate::session::{RenderSession, RenderStats};
