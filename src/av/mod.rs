mod packet;
pub use packet::*;

/// Codecs a recording stream can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecType {
    H264,
    AAC,
}

/// Stream-level codec description handed to the container muxer.
pub trait CodecData: Send + Sync {
    fn codec_type(&self) -> CodecType;
    fn width(&self) -> Option<u32>;
    fn height(&self) -> Option<u32>;
    fn channels(&self) -> Option<u8>;
    fn sample_rate(&self) -> Option<u32>;
    /// Ticks per second of this stream's presentation time base.
    fn time_base(&self) -> u32;
    fn extra_data(&self) -> Option<&[u8]>;
}

/// Plain-data `CodecData` carrier used by encoders and sessions.
#[derive(Debug, Clone)]
pub struct StreamCodecData {
    pub codec_type: CodecType,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub channels: Option<u8>,
    pub sample_rate: Option<u32>,
    pub time_base: u32,
    pub extra_data: Option<Vec<u8>>,
}

impl CodecData for StreamCodecData {
    fn codec_type(&self) -> CodecType {
        self.codec_type
    }

    fn width(&self) -> Option<u32> {
        self.width
    }

    fn height(&self) -> Option<u32> {
        self.height
    }

    fn channels(&self) -> Option<u8> {
        self.channels
    }

    fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    fn time_base(&self) -> u32 {
        self.time_base
    }

    fn extra_data(&self) -> Option<&[u8]> {
        self.extra_data.as_deref()
    }
}
