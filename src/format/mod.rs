use crate::av::{CodecData, Packet};
use crate::Result;

pub mod raw;

/// Common trait for container muxers
///
/// Packets arrive in dispatcher production order; any interleaving or
/// reordering the container format requires is the muxer's responsibility.
#[async_trait::async_trait]
pub trait Muxer: Send {
    /// Write container header information for the given streams
    async fn write_header(&mut self, streams: &[Box<dyn CodecData>]) -> Result<()>;

    /// Write one packet (interleaved)
    async fn write_packet(&mut self, packet: &Packet) -> Result<()>;

    /// Write container trailer information
    async fn write_trailer(&mut self) -> Result<()>;

    /// Flush any buffered output
    async fn flush(&mut self) -> Result<()>;
}

pub mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default)]
    pub struct TestMuxerState {
        pub packets: Vec<Packet>,
        pub header_stream_count: Option<usize>,
        pub trailer_written: bool,
    }

    /// A muxer that records everything it is given, for assertions.
    ///
    /// Cloning yields another handle onto the same recorded state, so a test
    /// can hand one clone to a session and keep the other for inspection.
    #[derive(Debug, Clone, Default)]
    pub struct TestMuxer {
        state: Arc<Mutex<TestMuxerState>>,
    }

    impl TestMuxer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn packets(&self) -> Vec<Packet> {
            self.state.lock().unwrap().packets.clone()
        }

        pub fn header_stream_count(&self) -> Option<usize> {
            self.state.lock().unwrap().header_stream_count
        }

        pub fn trailer_written(&self) -> bool {
            self.state.lock().unwrap().trailer_written
        }
    }

    #[async_trait::async_trait]
    impl Muxer for TestMuxer {
        async fn write_header(&mut self, streams: &[Box<dyn CodecData>]) -> Result<()> {
            self.state.lock().unwrap().header_stream_count = Some(streams.len());
            Ok(())
        }

        async fn write_packet(&mut self, packet: &Packet) -> Result<()> {
            self.state.lock().unwrap().packets.push(packet.clone());
            Ok(())
        }

        async fn write_trailer(&mut self) -> Result<()> {
            self.state.lock().unwrap().trailer_written = true;
            Ok(())
        }

        async fn flush(&mut self) -> Result<()> {
            Ok(())
        }
    }
}

pub use self::raw::RawFileMuxer;
