use bytes::Bytes;
use log::debug;

use crate::error::{AvrecError, Result};

/// Buffers variable-length audio chunks into fixed-length codec frames.
///
/// The accumulator owns one frame's worth of bytes. `feed` copies caller
/// samples in at the current leftover offset and emits a completed frame
/// every time the buffer fills, so a single call can emit zero, one, or
/// several frames. Samples are never dropped or duplicated: over a session,
/// frames emitted × frame length + leftover = total samples fed.
pub struct AudioAccumulator {
    buf: Vec<u8>,
    /// Samples per channel one codec frame holds.
    frame_length: usize,
    /// Bytes of one interleaved sample frame (all channels).
    bytes_per_entry: usize,
    /// Samples already buffered from previous calls; 0 <= leftover < frame_length.
    leftover: usize,
}

impl AudioAccumulator {
    pub fn new(frame_length: usize, bytes_per_entry: usize) -> Self {
        Self {
            buf: vec![0u8; frame_length * bytes_per_entry],
            frame_length,
            bytes_per_entry,
            leftover: 0,
        }
    }

    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    pub fn leftover(&self) -> usize {
        self.leftover
    }

    /// Feeds `sample_count` interleaved samples, returning every codec frame
    /// completed by this chunk in input order.
    pub fn feed(&mut self, chunk: &[u8], sample_count: usize) -> Result<Vec<Bytes>> {
        if chunk.len() != sample_count * self.bytes_per_entry {
            return Err(AvrecError::InvalidData(format!(
                "audio chunk is {} bytes but {} samples require {}",
                chunk.len(),
                sample_count,
                sample_count * self.bytes_per_entry
            )));
        }

        let mut frames = Vec::new();
        let mut offset = 0;
        let mut remaining = sample_count;

        while remaining > 0 {
            let room = self.frame_length - self.leftover;
            let take = room.min(remaining);
            let dst = self.leftover * self.bytes_per_entry;
            let len = take * self.bytes_per_entry;
            self.buf[dst..dst + len].copy_from_slice(&chunk[offset..offset + len]);
            self.leftover += take;
            offset += len;
            remaining -= take;

            if self.leftover == self.frame_length {
                frames.push(Bytes::copy_from_slice(&self.buf));
                self.leftover = 0;
            }
        }

        if !frames.is_empty() {
            debug!(
                "audio accumulator emitted {} frame(s), leftover {} samples",
                frames.len(),
                self.leftover
            );
        }
        Ok(frames)
    }

    /// Discards buffered samples. Called at session close; at most one
    /// partial frame of trailing audio is lost, by design.
    pub fn clear(&mut self) -> usize {
        let dropped = self.leftover;
        self.leftover = 0;
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quickcheck_macros::quickcheck;

    fn mono_u8(frame_length: usize) -> AudioAccumulator {
        AudioAccumulator::new(frame_length, 1)
    }

    fn chunk(start: u8, samples: usize) -> Vec<u8> {
        (0..samples).map(|i| start.wrapping_add(i as u8)).collect()
    }

    #[test]
    fn test_three_chunks_fill_one_frame_exactly() {
        let mut acc = mono_u8(924);
        assert!(acc.feed(&chunk(0, 300), 300).unwrap().is_empty());
        assert!(acc.feed(&chunk(0, 300), 300).unwrap().is_empty());
        let frames = acc.feed(&chunk(0, 324), 324).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(acc.leftover(), 0);
    }

    #[test]
    fn test_chunks_spanning_frame_boundaries() {
        let mut acc = mono_u8(924);
        let frames = acc.feed(&chunk(0, 1000), 1000).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(acc.leftover(), 76);
        let frames = acc.feed(&chunk(0, 1000), 1000).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(acc.leftover(), 152);
    }

    #[test]
    fn test_single_chunk_spanning_multiple_frames() {
        let mut acc = mono_u8(100);
        let frames = acc.feed(&chunk(0, 350), 350).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(acc.leftover(), 50);
    }

    #[test]
    fn test_zero_samples_is_a_noop() {
        let mut acc = mono_u8(924);
        acc.feed(&chunk(0, 10), 10).unwrap();
        assert!(acc.feed(&[], 0).unwrap().is_empty());
        assert_eq!(acc.leftover(), 10);
    }

    #[test]
    fn test_byte_length_mismatch_rejected() {
        let mut acc = AudioAccumulator::new(924, 4);
        assert!(acc.feed(&[0u8; 10], 10).is_err());
    }

    #[test]
    fn test_split_feeding_preserves_frame_bytes() {
        let data = chunk(7, 2000);

        let mut one_call = mono_u8(924);
        let whole = one_call.feed(&data, 2000).unwrap();

        let mut many_calls = mono_u8(924);
        let mut split = Vec::new();
        for piece in data.chunks(13) {
            split.extend(many_calls.feed(piece, piece.len()).unwrap());
        }

        assert_eq!(whole, split);
        assert_eq!(one_call.leftover(), many_calls.leftover());
    }

    #[test]
    fn test_clear_reports_dropped_samples() {
        let mut acc = mono_u8(924);
        acc.feed(&chunk(0, 500), 500).unwrap();
        assert_eq!(acc.clear(), 500);
        assert_eq!(acc.leftover(), 0);
    }

    #[quickcheck]
    fn prop_conservation(chunks: Vec<u8>, frame_length_seed: u8) -> bool {
        let frame_length = 1 + frame_length_seed as usize % 64;
        let mut acc = mono_u8(frame_length);
        let mut emitted = 0usize;
        let mut total = 0usize;
        // Interpret each byte as a chunk size
        for size in chunks.iter().map(|&b| b as usize % 97) {
            let data = chunk(0, size);
            emitted += acc.feed(&data, size).unwrap().len();
            total += size;
        }
        emitted == total / frame_length && acc.leftover() == total % frame_length
    }
}
