use crate::av::StreamCodecData;
use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;

pub mod testing;

/// Codec-native pixel layouts.
///
/// These are the identifiers the caller-facing
/// [`VideoFrameFormat`](crate::session::VideoFrameFormat) enum translates
/// into. Planar and packed layouts declare their own frame-size and stride
/// rules in [`crate::session::formats`]; a layout without a declared rule is
/// rejected there rather than guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Yuv420p,
    Nv12,
    Nv21,
    Rgb24,
    Bgr24,
    Argb,
    Rgba,
    Abgr,
    Bgra,
    Rgb565Le,
    Rgb565Be,
    Bgr565Le,
    Bgr565Be,
}

/// Codec-native raw sample layouts (interleaved).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    U8,
    S16,
    S32,
    Flt,
    Dbl,
}

/// One encoded output buffer produced by a single encode call.
#[derive(Debug, Clone)]
pub struct EncodedChunk {
    pub data: Bytes,
    pub is_key: bool,
}

/// A complete raw picture, already in the encoder's required pixel layout,
/// with its presentation timestamp in the video stream's time base.
#[derive(Debug, Clone, Copy)]
pub struct VideoPicture<'a> {
    pub data: &'a [u8],
    pub pts: i64,
}

/// A complete block of interleaved raw samples, exactly one codec frame
/// long, with its presentation timestamp in the audio stream's time base.
#[derive(Debug, Clone, Copy)]
pub struct AudioBlock<'a> {
    pub data: &'a [u8],
    pub pts: i64,
}

/// Video bitstream encoder seam.
///
/// `encode` may return `Ok(None)` when the codec buffers input internally
/// before emitting a packet; that is a valid outcome, distinct from failure.
#[async_trait]
pub trait VideoEncoder: Send {
    fn codec_data(&self) -> StreamCodecData;
    /// Pixel layout this encoder requires its input pictures in.
    fn pixel_format(&self) -> PixelFormat;
    async fn encode(&mut self, picture: VideoPicture<'_>) -> Result<Option<EncodedChunk>>;
    fn close(&mut self);
}

/// Audio bitstream encoder seam.
#[async_trait]
pub trait AudioEncoder: Send {
    fn codec_data(&self) -> StreamCodecData;
    /// Samples per channel one encode call consumes.
    fn frame_length(&self) -> usize;
    async fn encode(&mut self, block: AudioBlock<'_>) -> Result<Option<EncodedChunk>>;
    fn close(&mut self);
}

/// Pixel layout conversion seam. A converter is created once per
/// (source, target, width, height) combination and reused across frames.
pub trait PixelConverter: Send {
    fn convert(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()>;
}
