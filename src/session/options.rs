use super::formats;
use crate::config;
use crate::error::{AvrecError, Result};

/// Raw video frame layouts a caller may supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoFrameFormat {
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

/// Raw audio sample layouts a caller may supply (interleaved).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioSampleFormat {
    U8,
    S16,
    S32,
    Flt,
    Dbl,
}

/// Validated video stream configuration. Built once before `open` and
/// immutable afterward.
#[derive(Debug, Clone)]
pub struct VideoOptions {
    pub format: VideoFrameFormat,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub bitrate: u32,
    /// Ticks per second of the video presentation time base.
    pub time_base: u32,
}

impl VideoOptions {
    pub fn new(
        format: VideoFrameFormat,
        width: u32,
        height: u32,
        fps: Option<u32>,
        bitrate: u32,
    ) -> Result<Self> {
        // 4:2:0 encode targets need even dimensions
        if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
            return Err(AvrecError::InvalidData(format!(
                "invalid video dimensions {}x{}",
                width, height
            )));
        }
        let pixel_format = formats::pixel_format(format)?;
        formats::frame_size(pixel_format, width, height)?;
        Ok(Self {
            format,
            width,
            height,
            fps: fps.unwrap_or_else(config::default_fps),
            bitrate,
            time_base: config::video_tick_rate(),
        })
    }
}

/// Validated audio stream configuration.
#[derive(Debug, Clone)]
pub struct AudioOptions {
    pub format: AudioSampleFormat,
    pub channels: u8,
    pub sample_rate: u32,
    pub bitrate: u32,
}

impl AudioOptions {
    pub fn new(
        format: AudioSampleFormat,
        channels: u8,
        sample_rate: u32,
        bitrate: u32,
    ) -> Result<Self> {
        if channels == 0 {
            return Err(AvrecError::InvalidData("zero audio channels".to_string()));
        }
        if sample_rate == 0 {
            return Err(AvrecError::InvalidData("zero sample rate".to_string()));
        }
        Ok(Self {
            format,
            channels,
            sample_rate,
            bitrate,
        })
    }

    /// Bytes of one interleaved sample frame (all channels).
    pub fn bytes_per_entry(&self) -> usize {
        formats::bytes_per_sample(formats::sample_format(self.format)) * self.channels as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_options_reject_odd_dimensions() {
        assert!(VideoOptions::new(VideoFrameFormat::Yuv420p, 641, 480, None, 500_000).is_err());
        assert!(VideoOptions::new(VideoFrameFormat::Yuv420p, 640, 0, None, 500_000).is_err());
    }

    #[test]
    fn test_video_options_reject_undeclared_stride_formats() {
        let err = VideoOptions::new(VideoFrameFormat::Rgb565Le, 640, 480, None, 500_000)
            .unwrap_err();
        assert!(matches!(err, AvrecError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_video_options_default_fps_and_time_base() {
        let opts = VideoOptions::new(VideoFrameFormat::Nv21, 640, 480, None, 500_000).unwrap();
        assert_eq!(opts.fps, 30);
        assert_eq!(opts.time_base, 90_000);
    }

    #[test]
    fn test_audio_options_entry_size() {
        let opts = AudioOptions::new(AudioSampleFormat::S16, 2, 44_100, 128_000).unwrap();
        assert_eq!(opts.bytes_per_entry(), 4);
        assert!(AudioOptions::new(AudioSampleFormat::S16, 0, 44_100, 128_000).is_err());
    }
}
