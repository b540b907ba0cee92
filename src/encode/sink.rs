use std::path::PathBuf;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{LogoError, LogoResult};
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] at the start of a range render.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order within the
/// requested render range.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> LogoResult<()>;
    /// Push one frame in strictly increasing timeline order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> LogoResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> LogoResult<()>;
    /// Called instead of `end` when the range fails partway. Releases whatever `begin` acquired.
    fn abort(&mut self) {}
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    /// Frames in timeline order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> LogoResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> LogoResult<()> {
        if self.cfg.is_none() {
            return Err(LogoError::evaluation("in-memory sink not started"));
        }
        if let Some((last, _)) = self.frames.last()
            && idx <= *last
        {
            return Err(LogoError::evaluation(
                "in-memory sink received out-of-order frame index",
            ));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> LogoResult<()> {
        Ok(())
    }
}

/// Writes `frame_000000.png`, `frame_000001.png`, ... into a directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    prefix: String,
    overwrite: bool,
    last_idx: Option<FrameIndex>,
    written: u64,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: "frame_".to_owned(),
            overwrite: true,
            last_idx: None,
            written: 0,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Fail instead of replacing a frame file that already exists.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn path_for(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("{}{:06}.png", self.prefix, idx.0))
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> LogoResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(LogoError::validation(
                "png sink width/height must be non-zero",
            ));
        }
        use anyhow::Context as _;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        self.last_idx = None;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> LogoResult<()> {
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(LogoError::evaluation(
                "png sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);
        let path = self.path_for(idx);
        if !self.overwrite && path.exists() {
            return Err(LogoError::validation(format!(
                "output file '{}' already exists",
                path.display()
            )));
        }
        frame.save_png(&path)?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> LogoResult<()> {
        tracing::debug!(dir = %self.dir.display(), frames = self.written, "png sequence written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> FrameRGBA {
        FrameRGBA {
            width: 1,
            height: 1,
            data: vec![0, 0, 0, 0],
            premultiplied: true,
        }
    }

    fn cfg() -> SinkConfig {
        SinkConfig {
            width: 1,
            height: 1,
            fps: Fps::new(30, 1).unwrap(),
        }
    }

    #[test]
    fn in_memory_rejects_out_of_order() {
        let mut sink = InMemorySink::new();
        sink.begin(cfg()).unwrap();
        sink.push_frame(FrameIndex(1), &frame()).unwrap();
        assert!(sink.push_frame(FrameIndex(1), &frame()).is_err());
        assert!(sink.push_frame(FrameIndex(0), &frame()).is_err());
        sink.push_frame(FrameIndex(5), &frame()).unwrap();
        assert_eq!(sink.frames().len(), 2);
    }

    #[test]
    fn in_memory_requires_begin() {
        let mut sink = InMemorySink::new();
        assert!(sink.push_frame(FrameIndex(0), &frame()).is_err());
    }

    #[test]
    fn png_sequence_names_are_zero_padded() {
        let sink = PngSequenceSink::new("out").with_prefix("logo_");
        assert_eq!(
            sink.path_for(FrameIndex(42)),
            PathBuf::from("out").join("logo_000042.png")
        );
    }

    #[test]
    fn png_sequence_writes_files() {
        let dir = PathBuf::from("target").join("png_sequence_sink_test");
        let _ = std::fs::remove_dir_all(&dir);
        let mut sink = PngSequenceSink::new(&dir);
        sink.begin(cfg()).unwrap();
        sink.push_frame(FrameIndex(0), &frame()).unwrap();
        sink.push_frame(FrameIndex(1), &frame()).unwrap();
        assert!(sink.push_frame(FrameIndex(1), &frame()).is_err());
        sink.end().unwrap();
        assert_eq!(sink.written(), 2);
        assert!(sink.path_for(FrameIndex(1)).exists());
    }

    #[test]
    fn png_sequence_can_refuse_to_overwrite() {
        let dir = PathBuf::from("target").join("png_sequence_no_overwrite");
        let _ = std::fs::remove_dir_all(&dir);
        let mut first = PngSequenceSink::new(&dir);
        first.begin(cfg()).unwrap();
        first.push_frame(FrameIndex(0), &frame()).unwrap();

        let mut again = PngSequenceSink::new(&dir).with_overwrite(false);
        again.begin(cfg()).unwrap();
        let err = again.push_frame(FrameIndex(0), &frame()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        again.push_frame(FrameIndex(1), &frame()).unwrap();
    }
}
