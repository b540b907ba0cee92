use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{LogoError, LogoResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::backend::FrameRGBA;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Background the logo is flattened onto (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [255, 255, 255, 255],
        }
    }

    pub fn with_background(mut self, bg_rgba: [u8; 4]) -> Self {
        self.bg_rgba = bg_rgba;
        self
    }
}

/// Spawns the system `ffmpeg` and streams opaque RGBA frames into its stdin.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> LogoResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(LogoError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(LogoError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(LogoError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(LogoError::evaluation(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });

        // Frames are flattened to opaque straight RGBA before they reach the pipe.
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]);
        cmd.arg(&self.opts.out_path);

        tracing::debug!(out = %self.opts.out_path.display(), w = cfg.width, h = cfg.height, "spawning ffmpeg");
        let mut child = cmd.spawn().map_err(|e| {
            LogoError::evaluation(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| LogoError::evaluation("failed to open ffmpeg stdin"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| LogoError::evaluation("failed to open ffmpeg stderr"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> LogoResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| LogoError::evaluation("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(LogoError::evaluation(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(LogoError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(LogoError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        flatten_to_opaque_rgba8(
            &mut self.scratch,
            &frame.data,
            frame.premultiplied,
            self.opts.bg_rgba,
        )?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(LogoError::evaluation("ffmpeg sink is already finalized"));
        };
        use std::io::Write as _;
        stdin.write_all(&self.scratch).map_err(|e| {
            LogoError::evaluation(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> LogoResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| LogoError::evaluation("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            LogoError::evaluation(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| LogoError::evaluation("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| LogoError::evaluation(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(LogoError::evaluation(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.cfg = None;
        Ok(())
    }

    fn abort(&mut self) {
        drop(self.stdin.take());
        let Some(mut child) = self.child.take() else {
            return;
        };
        // Closing stdin alone would let ffmpeg finalize a truncated file.
        let _ = child.kill();
        let _ = child.wait();
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
        if let Err(e) = std::fs::remove_file(&self.opts.out_path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(out = %self.opts.out_path.display(), error = %e, "failed to remove partial output");
        }
        tracing::debug!(out = %self.opts.out_path.display(), "ffmpeg encode aborted");
        self.cfg = None;
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Composite RGBA8 pixels over `bg_rgba`, producing opaque pixels.
fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    premultiplied: bool,
    bg_rgba: [u8; 4],
) -> LogoResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(LogoError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        let inv = 255 - a;
        for c in 0..3 {
            let fg = if premultiplied {
                u16::from(s[c])
            } else {
                mul_div255_u16(u16::from(s[c]), a)
            };
            d[c] = (fg + mul_div255_u16(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> LogoResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Fps;

    #[test]
    fn flatten_premul_alpha_0_returns_bg() {
        let src = vec![0u8, 0, 0, 0];
        let mut dst = vec![0u8; 4];
        flatten_to_opaque_rgba8(&mut dst, &src, true, [10, 20, 30, 255]).unwrap();
        assert_eq!(dst, vec![10, 20, 30, 255]);
    }

    #[test]
    fn flatten_premul_alpha_255_is_identity() {
        let src = vec![1u8, 2, 3, 255];
        let mut dst = vec![0u8; 4];
        flatten_to_opaque_rgba8(&mut dst, &src, true, [10, 20, 30, 255]).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn flatten_straight_over_black() {
        let src = vec![255u8, 0, 0, 128];
        let mut dst = vec![0u8; 4];
        flatten_to_opaque_rgba8(&mut dst, &src, false, [0, 0, 0, 255]).unwrap();
        assert_eq!(dst, vec![128, 0, 0, 255]);
    }

    #[test]
    fn odd_dimensions_are_rejected_before_spawning() {
        let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/never.mp4"));
        let err = sink
            .begin(SinkConfig {
                width: 401,
                height: 400,
                fps: Fps::default(),
            })
            .unwrap_err();
        assert!(err.to_string().contains("even"));
    }

    #[test]
    fn abort_before_begin_leaves_existing_output_alone() {
        let out = std::path::PathBuf::from("target").join("ffmpeg_abort_untouched.mp4");
        ensure_parent_dir(&out).unwrap();
        std::fs::write(&out, b"keep").unwrap();
        {
            let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out));
            sink.abort();
        }
        assert_eq!(std::fs::read(&out).unwrap(), b"keep");
    }

    #[test]
    fn dropping_mid_encode_removes_partial_output() {
        if !is_ffmpeg_on_path() {
            return;
        }
        let out = std::path::PathBuf::from("target").join("ffmpeg_abort_partial.mp4");
        let _ = std::fs::remove_file(&out);
        {
            let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out));
            sink.begin(SinkConfig {
                width: 16,
                height: 16,
                fps: Fps::default(),
            })
            .unwrap();
            let frame = FrameRGBA {
                width: 16,
                height: 16,
                data: vec![255; 16 * 16 * 4],
                premultiplied: true,
            };
            sink.push_frame(FrameIndex(0), &frame).unwrap();
        }
        assert!(!out.exists());
    }

    #[test]
    fn push_before_begin_fails() {
        let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/never.mp4"));
        let frame = FrameRGBA {
            width: 2,
            height: 2,
            data: vec![0; 16],
            premultiplied: true,
        };
        assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    }
}
