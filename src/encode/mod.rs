/// MP4 output through the system `ffmpeg`.
pub mod ffmpeg;
/// Frame sink contract plus in-memory and PNG-sequence sinks.
pub mod sink;
