use crate::assets::StarAssets;
use crate::config::LogoConfig;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, TimeMs};
use crate::foundation::error::{LogoError, LogoResult};
use crate::logo::scene::{FrameScene, SceneEvaluator};
use crate::render::backend::FrameRGBA;
use crate::render::markup::{StarHrefs, frame_document_svg, shape_layer_svg};
use crate::render::raster::CpuRasterizer;

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames pushed into the sink.
    pub frames_total: u64,
    /// Timeline start of the range.
    pub start: TimeMs,
    /// Timeline time of the last frame pushed.
    pub last: TimeMs,
}

/// Session-oriented renderer for the logo.
///
/// A session front-loads config validation, shape parsing and star decoding, then evaluates and
/// rasterizes frames on demand.
#[derive(Clone, Debug)]
pub struct RenderSession {
    config: LogoConfig,
    evaluator: SceneEvaluator,
    raster: CpuRasterizer,
}

impl RenderSession {
    pub fn new(config: LogoConfig, stars: StarAssets) -> LogoResult<Self> {
        config.validate()?;
        let evaluator = SceneEvaluator::new(config.timing)?;
        let raster = CpuRasterizer::new(config.size_px, config.background, stars)?;
        Ok(Self {
            config,
            evaluator,
            raster,
        })
    }

    pub fn config(&self) -> &LogoConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &SceneEvaluator {
        &self.evaluator
    }

    /// Evaluated scene at `t` ms since mount.
    pub fn scene_at(&self, t: TimeMs) -> FrameScene {
        self.evaluator.evaluate(t)
    }

    /// Render a single frame at `t` ms since mount.
    pub fn render_at(&self, t: TimeMs) -> LogoResult<FrameRGBA> {
        self.raster.render(&self.evaluator.evaluate(t))
    }

    /// Full-frame SVG document at `t`, with stars referenced by `hrefs`.
    pub fn svg_at(&self, t: TimeMs, hrefs: &StarHrefs) -> String {
        frame_document_svg(&self.evaluator.evaluate(t), hrefs)
    }

    /// Standalone SVG of only the shape layer at `t`.
    pub fn shape_svg_at(&self, t: TimeMs) -> String {
        shape_layer_svg(&self.evaluator.evaluate(t).shape, self.config.size_px)
    }

    /// Stylesheet text for embedding the logo in a page.
    pub fn css(&self) -> String {
        self.evaluator
            .styles()
            .to_css(self.config.timing.morph_ms)
    }

    /// Render `duration_ms` of timeline starting at `start` and stream frames into a sink.
    ///
    /// Frame `i` samples `start + i / fps`; the sink receives frames in increasing index order.
    #[tracing::instrument(skip(self, sink), fields(start = start.0))]
    pub fn render_range(
        &self,
        start: TimeMs,
        duration_ms: u64,
        sink: &mut dyn FrameSink,
    ) -> LogoResult<RenderStats> {
        let fps = self.config.fps;
        let frames = fps.frames_in(duration_ms);
        if frames == 0 {
            return Err(LogoError::validation(
                "render_range duration must be non-zero",
            ));
        }

        sink.begin(SinkConfig {
            width: self.config.size_px,
            height: self.config.size_px,
            fps,
        })?;

        let mut stats = RenderStats {
            start,
            last: start,
            ..RenderStats::default()
        };
        if let Err(e) = self.push_range(start, frames, sink, &mut stats) {
            tracing::warn!(frames = stats.frames_total, error = %e, "range render failed, aborting sink");
            sink.abort();
            return Err(e);
        }
        sink.end()?;

        tracing::debug!(frames = stats.frames_total, last = stats.last.0, "range rendered");
        Ok(stats)
    }

    fn push_range(
        &self,
        start: TimeMs,
        frames: u64,
        sink: &mut dyn FrameSink,
        stats: &mut RenderStats,
    ) -> LogoResult<()> {
        let fps = self.config.fps;
        for i in 0..frames {
            let idx = FrameIndex(i);
            let t = TimeMs(start.0.saturating_add(fps.frame_to_time(idx).0));
            let frame = self.render_at(t)?;
            sink.push_frame(idx, &frame)?;
            stats.frames_total += 1;
            stats.last = t;
        }
        Ok(())
    }
}
