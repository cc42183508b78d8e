//! Deterministic in-memory encoders for tests and examples.
//!
//! Both encoders pass their input through unchanged so tests can assert on
//! exact payload bytes; `MockVideoEncoder` can be told to swallow its first
//! few pictures to exercise the buffered-output path real codecs exhibit.

use super::{
    AudioBlock, AudioEncoder, EncodedChunk, PixelConverter, PixelFormat, VideoEncoder, VideoPicture,
};
use crate::av::{CodecType, StreamCodecData};
use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;

pub struct MockVideoEncoder {
    width: u32,
    height: u32,
    time_base: u32,
    keyframe_interval: u64,
    warmup: u64,
    frames_in: u64,
    closed: bool,
}

impl MockVideoEncoder {
    pub fn new(width: u32, height: u32, time_base: u32) -> Self {
        Self {
            width,
            height,
            time_base,
            keyframe_interval: 30,
            warmup: 0,
            frames_in: 0,
            closed: false,
        }
    }

    /// Every `interval`-th picture (starting with the first) is marked as a
    /// keyframe.
    pub fn with_keyframe_interval(mut self, interval: u64) -> Self {
        self.keyframe_interval = interval.max(1);
        self
    }

    /// Swallow the first `frames` pictures, returning `None` for each.
    pub fn with_warmup(mut self, frames: u64) -> Self {
        self.warmup = frames;
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait]
impl VideoEncoder for MockVideoEncoder {
    fn codec_data(&self) -> StreamCodecData {
        StreamCodecData {
            codec_type: CodecType::H264,
            width: Some(self.width),
            height: Some(self.height),
            channels: None,
            sample_rate: None,
            time_base: self.time_base,
            extra_data: None,
        }
    }

    fn pixel_format(&self) -> PixelFormat {
        PixelFormat::Yuv420p
    }

    async fn encode(&mut self, picture: VideoPicture<'_>) -> Result<Option<EncodedChunk>> {
        let index = self.frames_in;
        self.frames_in += 1;
        if index < self.warmup {
            return Ok(None);
        }
        Ok(Some(EncodedChunk {
            data: Bytes::copy_from_slice(picture.data),
            is_key: (index - self.warmup) % self.keyframe_interval == 0,
        }))
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

pub struct MockAudioEncoder {
    channels: u8,
    sample_rate: u32,
    frame_length: usize,
    closed: bool,
}

impl MockAudioEncoder {
    pub fn new(channels: u8, sample_rate: u32, frame_length: usize) -> Self {
        Self {
            channels,
            sample_rate,
            frame_length,
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait]
impl AudioEncoder for MockAudioEncoder {
    fn codec_data(&self) -> StreamCodecData {
        StreamCodecData {
            codec_type: CodecType::AAC,
            width: None,
            height: None,
            channels: Some(self.channels),
            sample_rate: Some(self.sample_rate),
            time_base: self.sample_rate,
            extra_data: None,
        }
    }

    fn frame_length(&self) -> usize {
        self.frame_length
    }

    async fn encode(&mut self, block: AudioBlock<'_>) -> Result<Option<EncodedChunk>> {
        Ok(Some(EncodedChunk {
            data: Bytes::copy_from_slice(block.data),
            is_key: true,
        }))
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

/// Byte-inverting converter; lets tests tell converted frames from copies.
pub struct InvertingConverter;

impl PixelConverter for InvertingConverter {
    fn convert(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        let n = src.len().min(dst.len());
        for (d, s) in dst[..n].iter_mut().zip(&src[..n]) {
            *d = !*s;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_video_warmup_buffers_output() {
        let mut enc = MockVideoEncoder::new(4, 4, 90_000).with_warmup(2);
        let frame = vec![1u8; 24];
        let picture = VideoPicture {
            data: &frame,
            pts: 0,
        };
        assert!(enc.encode(picture).await.unwrap().is_none());
        assert!(enc.encode(picture).await.unwrap().is_none());
        let chunk = enc.encode(picture).await.unwrap().unwrap();
        assert_eq!(&chunk.data[..], frame.as_slice());
        assert!(chunk.is_key);
    }

    #[tokio::test]
    async fn test_keyframe_interval() {
        let mut enc = MockVideoEncoder::new(4, 4, 90_000).with_keyframe_interval(2);
        let frame = vec![0u8; 24];
        let mut keys = Vec::new();
        for pts in 0..4 {
            let chunk = enc
                .encode(VideoPicture {
                    data: &frame,
                    pts,
                })
                .await
                .unwrap()
                .unwrap();
            keys.push(chunk.is_key);
        }
        assert_eq!(keys, vec![true, false, true, false]);
    }
}
