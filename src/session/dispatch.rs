use log::debug;
use std::time::Duration;

use crate::av::Packet;
use crate::codec::{AudioBlock, AudioEncoder, VideoEncoder, VideoPicture};
use crate::error::Result;
use crate::format::Muxer;

/// Hands ready frames to the codec encoders and forwards the resulting
/// packets to the container muxer.
///
/// Packets are submitted in the order they are produced; interleaving is the
/// muxer's job. An encoder returning no output (internal buffering) is a
/// valid outcome and submits nothing.
pub struct EncodeDispatcher {
    debug: bool,
}

impl EncodeDispatcher {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    /// Encodes one converted picture; returns whether a packet was written.
    pub async fn dispatch_video(
        &self,
        encoder: &mut dyn VideoEncoder,
        muxer: &mut dyn Muxer,
        stream_index: usize,
        picture: VideoPicture<'_>,
    ) -> Result<bool> {
        let pts = picture.pts;
        let Some(chunk) = encoder.encode(picture).await? else {
            if self.debug {
                debug!("video encoder buffered frame at pts {}", pts);
            }
            return Ok(false);
        };

        if self.debug {
            debug!(
                "video packet: {} bytes, pts {}, key {}",
                chunk.data.len(),
                pts,
                chunk.is_key
            );
        }
        let packet = Packet::new(chunk.data)
            .with_stream_index(stream_index)
            .with_pts(pts)
            .with_key_flag(chunk.is_key);
        muxer.write_packet(&packet).await?;
        Ok(true)
    }

    /// Encodes one complete audio frame; returns whether a packet was written.
    pub async fn dispatch_audio(
        &self,
        encoder: &mut dyn AudioEncoder,
        muxer: &mut dyn Muxer,
        stream_index: usize,
        block: AudioBlock<'_>,
        frame_duration: Duration,
    ) -> Result<bool> {
        let pts = block.pts;
        let Some(chunk) = encoder.encode(block).await? else {
            if self.debug {
                debug!("audio encoder buffered frame at pts {}", pts);
            }
            return Ok(false);
        };

        if self.debug {
            debug!("audio packet: {} bytes, pts {}", chunk.data.len(), pts);
        }
        let packet = Packet::new(chunk.data)
            .with_stream_index(stream_index)
            .with_pts(pts)
            .with_key_flag(chunk.is_key)
            .with_duration(frame_duration);
        muxer.write_packet(&packet).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::testing::{MockAudioEncoder, MockVideoEncoder};
    use crate::format::tests::TestMuxer;

    #[tokio::test]
    async fn test_buffered_video_output_writes_nothing() {
        let dispatcher = EncodeDispatcher::new(false);
        let mut encoder = MockVideoEncoder::new(4, 4, 90_000).with_warmup(1);
        let mut muxer = TestMuxer::new();
        let frame = vec![0u8; 24];

        let wrote = dispatcher
            .dispatch_video(
                &mut encoder,
                &mut muxer,
                0,
                VideoPicture {
                    data: &frame,
                    pts: 0,
                },
            )
            .await
            .unwrap();
        assert!(!wrote);
        assert!(muxer.packets().is_empty());
    }

    #[tokio::test]
    async fn test_packet_carries_stream_attribution() {
        let dispatcher = EncodeDispatcher::new(false);
        let mut encoder = MockAudioEncoder::new(2, 44_100, 1024);
        let mut muxer = TestMuxer::new();
        let block_data = vec![3u8; 1024 * 4];

        let wrote = dispatcher
            .dispatch_audio(
                &mut encoder,
                &mut muxer,
                1,
                AudioBlock {
                    data: &block_data,
                    pts: 2048,
                },
                Duration::from_millis(23),
            )
            .await
            .unwrap();
        assert!(wrote);

        let packets = muxer.packets();
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].stream_index, 1);
        assert_eq!(packets[0].pts, Some(2048));
        assert_eq!(packets[0].data.len(), 1024 * 4);
    }
}
