use crate::av::{CodecData, CodecType, Packet};
use crate::error::AvrecError;
use crate::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

/// Elementary-stream file muxer.
///
/// Writes each stream's packet payloads back to back into its own file next
/// to the given base path (`capture.h264`, `capture.aac`, ...). There is no
/// container framing, so the output is only meaningful for bitstreams that
/// are self-delimiting, which both H.264 Annex B and ADTS AAC are. Useful as
/// a debug sink and as the concrete muxer for tests that want real files.
pub struct RawFileMuxer {
    base: PathBuf,
    writers: Vec<BufWriter<File>>,
}

impl RawFileMuxer {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            writers: Vec::new(),
        }
    }

    fn stream_path(&self, index: usize, codec_type: CodecType) -> PathBuf {
        let ext = match codec_type {
            CodecType::H264 => "h264",
            CodecType::AAC => "aac",
        };
        let mut name = self
            .base
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_else(|| "capture".into());
        name.push(format!(".{}.{}", index, ext));
        self.base.with_file_name(name)
    }
}

#[async_trait]
impl super::Muxer for RawFileMuxer {
    async fn write_header(&mut self, streams: &[Box<dyn CodecData>]) -> Result<()> {
        if streams.is_empty() {
            return Err(AvrecError::Muxer(
                "raw muxer requires at least one stream".to_string(),
            ));
        }
        for (index, stream) in streams.iter().enumerate() {
            let path = self.stream_path(index, stream.codec_type());
            let file = File::create(&path).await?;
            self.writers.push(BufWriter::new(file));
        }
        Ok(())
    }

    async fn write_packet(&mut self, packet: &Packet) -> Result<()> {
        let writer = self
            .writers
            .get_mut(packet.stream_index)
            .ok_or_else(|| {
                AvrecError::Muxer(format!("unknown stream index {}", packet.stream_index))
            })?;
        writer.write_all(&packet.data).await?;
        Ok(())
    }

    async fn write_trailer(&mut self) -> Result<()> {
        for writer in &mut self.writers {
            writer.flush().await?;
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        for writer in &mut self.writers {
            writer.flush().await?;
        }
        Ok(())
    }
}
