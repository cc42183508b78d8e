use log::debug;

/// Derives presentation timestamps for both streams from one shared origin.
///
/// The origin is the caller-supplied timestamp of the first video frame;
/// every later video frame is expressed relative to it in a fixed
/// high-resolution tick rate, so the first frame's pts is exactly 0. Audio
/// never consults the origin: its pts is the running count of samples
/// already encoded, in the sample-rate time base, which keeps audio
/// monotonic and gap-free regardless of video timing jitter and makes
/// audio-only sessions work unchanged.
pub struct TimestampSynchronizer {
    origin_ms: Option<i64>,
    video_tick_rate: u32,
    audio_samples_encoded: u64,
}

impl TimestampSynchronizer {
    pub fn new(video_tick_rate: u32) -> Self {
        Self {
            origin_ms: None,
            video_tick_rate,
            audio_samples_encoded: 0,
        }
    }

    pub fn origin_ms(&self) -> Option<i64> {
        self.origin_ms
    }

    /// Presentation timestamp for a video frame captured at `timestamp_ms`.
    /// The first call fixes the shared origin.
    pub fn video_pts(&mut self, timestamp_ms: i64) -> i64 {
        let origin = *self.origin_ms.get_or_insert_with(|| {
            debug!("timestamp origin fixed at {} ms", timestamp_ms);
            timestamp_ms
        });
        let relative_ms = timestamp_ms - origin;
        relative_ms * self.video_tick_rate as i64 / 1000
    }

    /// Presentation timestamp for the next audio frame, advancing the
    /// running sample count by `frame_length`.
    pub fn audio_pts(&mut self, frame_length: usize) -> i64 {
        let pts = self.audio_samples_encoded as i64;
        self.audio_samples_encoded += frame_length as u64;
        pts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_video_frame_is_zero() {
        let mut sync = TimestampSynchronizer::new(90_000);
        assert_eq!(sync.video_pts(1234), 0);
        assert_eq!(sync.origin_ms(), Some(1234));
    }

    #[test]
    fn test_video_pts_vector() {
        let mut sync = TimestampSynchronizer::new(90_000);
        let pts: Vec<i64> = [1, 26, 51].iter().map(|&ms| sync.video_pts(ms)).collect();
        assert_eq!(pts, vec![0, 2250, 4500]);
    }

    #[test]
    fn test_video_pts_strictly_increasing() {
        let mut sync = TimestampSynchronizer::new(90_000);
        let mut last = sync.video_pts(10);
        for ms in [11, 15, 40, 41, 1000] {
            let pts = sync.video_pts(ms);
            assert!(pts > last);
            last = pts;
        }
    }

    #[test]
    fn test_origin_set_exactly_once() {
        let mut sync = TimestampSynchronizer::new(90_000);
        sync.video_pts(100);
        sync.video_pts(500);
        assert_eq!(sync.origin_ms(), Some(100));
    }

    #[test]
    fn test_audio_pts_gap_free() {
        let mut sync = TimestampSynchronizer::new(90_000);
        assert_eq!(sync.audio_pts(1024), 0);
        assert_eq!(sync.audio_pts(1024), 1024);
        assert_eq!(sync.audio_pts(1024), 2048);
    }

    #[test]
    fn test_audio_independent_of_video_origin() {
        let mut sync = TimestampSynchronizer::new(90_000);
        assert_eq!(sync.audio_pts(924), 0);
        sync.video_pts(777);
        assert_eq!(sync.audio_pts(924), 924);
    }
}
