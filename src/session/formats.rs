//! Translation between caller-facing format enums and codec-native layout
//! identifiers, with per-format size and stride rules.
//!
//! Every layout supported for capture declares its own frame-size and
//! row-stride functions here. A format whose stride rule is not declared is
//! reported as unsupported at configuration time instead of being encoded
//! with a guessed layout.

use super::options::{AudioSampleFormat, VideoFrameFormat};
use crate::codec::{PixelFormat, SampleFormat};
use crate::error::{AvrecError, Result};

/// Maps a caller pixel format to its codec-native identifier.
///
/// The RGB565 family is carried by the enum for API completeness but has no
/// declared conversion stride rule, so it is rejected here as a
/// configuration failure.
pub fn pixel_format(format: VideoFrameFormat) -> Result<PixelFormat> {
    match format {
        VideoFrameFormat::Yuv420p => Ok(PixelFormat::Yuv420p),
        VideoFrameFormat::Nv12 => Ok(PixelFormat::Nv12),
        VideoFrameFormat::Nv21 => Ok(PixelFormat::Nv21),
        VideoFrameFormat::Rgb24 => Ok(PixelFormat::Rgb24),
        VideoFrameFormat::Bgr24 => Ok(PixelFormat::Bgr24),
        VideoFrameFormat::Argb => Ok(PixelFormat::Argb),
        VideoFrameFormat::Rgba => Ok(PixelFormat::Rgba),
        VideoFrameFormat::Abgr => Ok(PixelFormat::Abgr),
        VideoFrameFormat::Bgra => Ok(PixelFormat::Bgra),
        VideoFrameFormat::Rgb565Le
        | VideoFrameFormat::Rgb565Be
        | VideoFrameFormat::Bgr565Le
        | VideoFrameFormat::Bgr565Be => Err(AvrecError::UnsupportedFormat(format!(
            "{:?} has no declared stride rule",
            format
        ))),
    }
}

/// Maps a caller sample format to its codec-native identifier.
pub fn sample_format(format: AudioSampleFormat) -> SampleFormat {
    match format {
        AudioSampleFormat::U8 => SampleFormat::U8,
        AudioSampleFormat::S16 => SampleFormat::S16,
        AudioSampleFormat::S32 => SampleFormat::S32,
        AudioSampleFormat::Flt => SampleFormat::Flt,
        AudioSampleFormat::Dbl => SampleFormat::Dbl,
    }
}

/// Bytes per sample, per channel.
pub fn bytes_per_sample(format: SampleFormat) -> usize {
    match format {
        SampleFormat::U8 => 1,
        SampleFormat::S16 => 2,
        SampleFormat::S32 => 4,
        SampleFormat::Flt => 4,
        SampleFormat::Dbl => 8,
    }
}

/// Row stride in bytes of the format's first plane.
pub fn row_stride(format: PixelFormat, width: u32) -> Result<usize> {
    let width = width as usize;
    match format {
        // Planar/semi-planar luma plane is one byte per pixel
        PixelFormat::Yuv420p | PixelFormat::Nv12 | PixelFormat::Nv21 => Ok(width),
        PixelFormat::Rgb24 | PixelFormat::Bgr24 => Ok(width * 3),
        PixelFormat::Argb | PixelFormat::Rgba | PixelFormat::Abgr | PixelFormat::Bgra => {
            Ok(width * 4)
        }
        PixelFormat::Rgb565Le
        | PixelFormat::Rgb565Be
        | PixelFormat::Bgr565Le
        | PixelFormat::Bgr565Be => Err(AvrecError::UnsupportedStride(format!("{:?}", format))),
    }
}

/// Total bytes of one raw frame in the given layout.
pub fn frame_size(format: PixelFormat, width: u32, height: u32) -> Result<usize> {
    let pixels = width as usize * height as usize;
    match format {
        // 4:2:0: full-res luma plane plus two quarter-res chroma planes
        PixelFormat::Yuv420p | PixelFormat::Nv12 | PixelFormat::Nv21 => Ok(pixels * 3 / 2),
        PixelFormat::Rgb24 | PixelFormat::Bgr24 => Ok(pixels * 3),
        PixelFormat::Argb | PixelFormat::Rgba | PixelFormat::Abgr | PixelFormat::Bgra => {
            Ok(pixels * 4)
        }
        PixelFormat::Rgb565Le
        | PixelFormat::Rgb565Be
        | PixelFormat::Bgr565Le
        | PixelFormat::Bgr565Be => Err(AvrecError::UnsupportedStride(format!("{:?}", format))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_format_mapping() {
        assert_eq!(
            pixel_format(VideoFrameFormat::Yuv420p).unwrap(),
            PixelFormat::Yuv420p
        );
        assert_eq!(
            pixel_format(VideoFrameFormat::Bgra).unwrap(),
            PixelFormat::Bgra
        );
    }

    #[test]
    fn test_565_family_rejected() {
        for format in [
            VideoFrameFormat::Rgb565Le,
            VideoFrameFormat::Rgb565Be,
            VideoFrameFormat::Bgr565Le,
            VideoFrameFormat::Bgr565Be,
        ] {
            assert!(matches!(
                pixel_format(format),
                Err(AvrecError::UnsupportedFormat(_))
            ));
        }
    }

    #[test]
    fn test_frame_sizes() {
        assert_eq!(frame_size(PixelFormat::Yuv420p, 640, 480).unwrap(), 460_800);
        assert_eq!(frame_size(PixelFormat::Rgb24, 640, 480).unwrap(), 921_600);
        assert_eq!(frame_size(PixelFormat::Rgba, 2, 2).unwrap(), 16);
    }

    #[test]
    fn test_row_stride_declared_per_format() {
        assert_eq!(row_stride(PixelFormat::Nv12, 640).unwrap(), 640);
        assert_eq!(row_stride(PixelFormat::Bgr24, 640).unwrap(), 1920);
        assert!(matches!(
            row_stride(PixelFormat::Rgb565Le, 640),
            Err(AvrecError::UnsupportedStride(_))
        ));
    }

    #[test]
    fn test_bytes_per_sample() {
        assert_eq!(bytes_per_sample(SampleFormat::U8), 1);
        assert_eq!(bytes_per_sample(SampleFormat::S16), 2);
        assert_eq!(bytes_per_sample(SampleFormat::Dbl), 8);
    }
}
