use log::debug;

use super::formats;
use crate::codec::{PixelConverter, PixelFormat};
use crate::error::{AvrecError, Result};

/// Factory signature for the external pixel conversion collaborator.
pub type PixelConverterFactory =
    dyn Fn(PixelFormat, PixelFormat, u32, u32) -> Result<Box<dyn PixelConverter>> + Send + Sync;

/// Per-session video frame staging: one buffer in the caller's raw layout
/// contract, one in the encoder's required layout.
///
/// Both sizes are fixed when the stream opens and never change. When the
/// source layout differs from the encoder's, a conversion context is created
/// once on the first divergent frame and reused for the rest of the session.
pub struct VideoFrameBuffers {
    source_format: PixelFormat,
    target_format: PixelFormat,
    width: u32,
    height: u32,
    source_size: usize,
    converted: Vec<u8>,
    converter: Option<Box<dyn PixelConverter>>,
}

impl VideoFrameBuffers {
    pub fn new(
        source_format: PixelFormat,
        target_format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let source_size = formats::frame_size(source_format, width, height)?;
        let target_size = formats::frame_size(target_format, width, height)?;
        Ok(Self {
            source_format,
            target_format,
            width,
            height,
            source_size,
            converted: vec![0u8; target_size],
            converter: None,
        })
    }

    pub fn source_size(&self) -> usize {
        self.source_size
    }

    /// Stages one raw frame for encoding and returns the encode-ready bytes.
    ///
    /// Matching layouts are copied straight into the encode buffer. Divergent
    /// layouts go through the conversion collaborator, created lazily via
    /// `factory` on the first such frame.
    pub fn prepare(
        &mut self,
        frame: &[u8],
        factory: Option<&PixelConverterFactory>,
    ) -> Result<&[u8]> {
        if frame.len() != self.source_size {
            return Err(AvrecError::InvalidData(format!(
                "video frame is {} bytes, expected {} for {:?} {}x{}",
                frame.len(),
                self.source_size,
                self.source_format,
                self.width,
                self.height
            )));
        }

        if self.source_format == self.target_format {
            self.converted.copy_from_slice(frame);
            return Ok(&self.converted);
        }

        if self.converter.is_none() {
            // The collaborator must be told the true row stride; formats
            // without a declared rule cannot be converted.
            formats::row_stride(self.source_format, self.width)?;
            let factory = factory.ok_or_else(|| {
                AvrecError::Codec("no pixel converter collaborator configured".to_string())
            })?;
            debug!(
                "creating pixel converter {:?} -> {:?} at {}x{}",
                self.source_format, self.target_format, self.width, self.height
            );
            self.converter = Some(factory(
                self.source_format,
                self.target_format,
                self.width,
                self.height,
            )?);
        }

        if let Some(converter) = self.converter.as_mut() {
            converter.convert(frame, &mut self.converted)?;
        }
        Ok(&self.converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::testing::InvertingConverter;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_passthrough_copies_without_converter() {
        let mut buffers =
            VideoFrameBuffers::new(PixelFormat::Yuv420p, PixelFormat::Yuv420p, 4, 4).unwrap();
        let frame = vec![9u8; buffers.source_size()];
        let out = buffers.prepare(&frame, None).unwrap();
        assert_eq!(out, frame.as_slice());
    }

    #[test]
    fn test_converter_created_once_and_reused() {
        let creations = Arc::new(AtomicUsize::new(0));
        let counter = creations.clone();
        let factory: Box<PixelConverterFactory> = Box::new(move |_, _, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(InvertingConverter))
        });

        let mut buffers =
            VideoFrameBuffers::new(PixelFormat::Rgb24, PixelFormat::Yuv420p, 4, 4).unwrap();
        let frame = vec![0xF0u8; buffers.source_size()];
        for _ in 0..3 {
            let out = buffers.prepare(&frame, Some(factory.as_ref())).unwrap();
            assert_eq!(out[0], 0x0F);
        }
        assert_eq!(creations.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_wrong_frame_size_rejected() {
        let mut buffers =
            VideoFrameBuffers::new(PixelFormat::Yuv420p, PixelFormat::Yuv420p, 4, 4).unwrap();
        assert!(matches!(
            buffers.prepare(&[0u8; 3], None),
            Err(AvrecError::InvalidData(_))
        ));
    }

    #[test]
    fn test_divergent_frame_without_factory_fails() {
        let mut buffers =
            VideoFrameBuffers::new(PixelFormat::Bgra, PixelFormat::Yuv420p, 4, 4).unwrap();
        let frame = vec![0u8; buffers.source_size()];
        assert!(matches!(
            buffers.prepare(&frame, None),
            Err(AvrecError::Codec(_))
        ));
    }
}
