//! The recording session: buffers caller-supplied raw media, synchronizes
//! presentation timestamps across streams, and drives the codec encoders and
//! container muxer collaborators.
//!
//! Call order is `set_video_options`/`set_audio_options`, `open`, `start`,
//! any number of `supply_video_frame`/`supply_audio_samples`, then `close`.
//! Calls outside that order return [`AvrecError::InvalidState`] instead of
//! aborting. A closed session can be reopened with its existing
//! configuration.
//!
//! Sessions are single-writer: every supply call fully processes its input
//! before returning, and no internal locking is performed. Hosts feeding
//! audio and video from separate capture threads must serialize access
//! themselves.

mod audio;
mod dispatch;
pub mod formats;
mod options;
mod timestamp;
mod video;

pub use audio::AudioAccumulator;
pub use dispatch::EncodeDispatcher;
pub use options::{AudioOptions, AudioSampleFormat, VideoFrameFormat, VideoOptions};
pub use timestamp::TimestampSynchronizer;
pub use video::{PixelConverterFactory, VideoFrameBuffers};

use log::{debug, info, warn};
use std::path::Path;
use std::time::Duration;

use crate::av::CodecData;
use crate::codec::{AudioBlock, AudioEncoder, VideoEncoder, VideoPicture};
use crate::config;
use crate::error::{AvrecError, Result};
use crate::format::Muxer;

/// Factory locating a video encoder for the configured stream.
pub type VideoEncoderFactory =
    Box<dyn Fn(&VideoOptions) -> Result<Box<dyn VideoEncoder>> + Send + Sync>;

/// Factory locating an audio encoder for the configured stream.
pub type AudioEncoderFactory =
    Box<dyn Fn(&AudioOptions) -> Result<Box<dyn AudioEncoder>> + Send + Sync>;

/// Factory opening a container muxer for the session's output path.
pub type MuxerFactory = Box<dyn Fn(&Path) -> Result<Box<dyn Muxer>> + Send + Sync>;

/// External collaborators a session drives. The codec library and container
/// format stay behind these factories; the session owns everything they
/// return.
pub struct SessionOptions {
    pub find_video_encoder: Option<VideoEncoderFactory>,
    pub find_audio_encoder: Option<AudioEncoderFactory>,
    pub find_pixel_converter: Option<Box<PixelConverterFactory>>,
    pub open_muxer: MuxerFactory,
}

/// Lifecycle of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unconfigured,
    Configured,
    Opened,
    Started,
    Closed,
}

struct VideoStream {
    encoder: Box<dyn VideoEncoder>,
    buffers: VideoFrameBuffers,
    index: usize,
}

struct AudioStream {
    encoder: Box<dyn AudioEncoder>,
    accumulator: AudioAccumulator,
    index: usize,
    frame_duration: Duration,
}

/// A live capture-to-container encoding session.
pub struct RecorderSession {
    options: SessionOptions,
    state: SessionState,
    video_options: Option<VideoOptions>,
    audio_options: Option<AudioOptions>,
    debug: bool,
    muxer: Option<Box<dyn Muxer>>,
    stream_infos: Vec<Box<dyn CodecData>>,
    video: Option<VideoStream>,
    audio: Option<AudioStream>,
    sync: TimestampSynchronizer,
    dispatcher: EncodeDispatcher,
}

impl RecorderSession {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            state: SessionState::Unconfigured,
            video_options: None,
            audio_options: None,
            debug: false,
            muxer: None,
            stream_infos: Vec::new(),
            video: None,
            audio: None,
            sync: TimestampSynchronizer::new(config::video_tick_rate()),
            dispatcher: EncodeDispatcher::new(false),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn ensure_configurable(&self, operation: &str) -> Result<()> {
        match self.state {
            SessionState::Unconfigured | SessionState::Configured => Ok(()),
            state => Err(AvrecError::InvalidState(format!(
                "{} is not legal in state {:?}",
                operation, state
            ))),
        }
    }

    /// Configures the video stream. Legal before `open` only; a failed call
    /// leaves any prior configuration unchanged.
    pub fn set_video_options(
        &mut self,
        format: VideoFrameFormat,
        width: u32,
        height: u32,
        fps: Option<u32>,
        bitrate: u32,
    ) -> Result<()> {
        self.ensure_configurable("set_video_options")?;
        let opts = VideoOptions::new(format, width, height, fps, bitrate)?;
        self.video_options = Some(opts);
        self.state = SessionState::Configured;
        Ok(())
    }

    /// Configures the audio stream. Legal before `open` only; a failed call
    /// leaves any prior configuration unchanged.
    pub fn set_audio_options(
        &mut self,
        format: AudioSampleFormat,
        channels: u8,
        sample_rate: u32,
        bitrate: u32,
    ) -> Result<()> {
        self.ensure_configurable("set_audio_options")?;
        let opts = AudioOptions::new(format, channels, sample_rate, bitrate)?;
        self.audio_options = Some(opts);
        self.state = SessionState::Configured;
        Ok(())
    }

    /// Allocates encoders, frame buffers, and the container muxer for one
    /// recording. Legal from `Configured`, or from `Closed` to reuse the
    /// session with its existing configuration.
    ///
    /// The video stream (when configured) always comes first in the
    /// container; audio is included iff `has_audio`. With `debug` set the
    /// session traces every supplied frame through the `log` facade.
    pub async fn open(
        &mut self,
        path: impl AsRef<Path>,
        has_audio: bool,
        debug: bool,
    ) -> Result<()> {
        match self.state {
            SessionState::Configured | SessionState::Closed => {}
            SessionState::Opened | SessionState::Started => {
                return Err(AvrecError::InvalidState(
                    "open called twice without an intervening close".to_string(),
                ));
            }
            SessionState::Unconfigured => {
                return Err(AvrecError::InvalidState(
                    "open called before any stream was configured".to_string(),
                ));
            }
        }
        if has_audio && self.audio_options.is_none() {
            return Err(AvrecError::InvalidState(
                "audio requested but audio options were never set".to_string(),
            ));
        }
        if self.video_options.is_none() && !has_audio {
            return Err(AvrecError::InvalidState(
                "session has no streams to record".to_string(),
            ));
        }

        let mut stream_infos: Vec<Box<dyn CodecData>> = Vec::new();

        let video = match &self.video_options {
            Some(vopts) => {
                let find = self.options.find_video_encoder.as_ref().ok_or_else(|| {
                    AvrecError::Codec("no video encoder collaborator configured".to_string())
                })?;
                let encoder = find(vopts)?;
                let source = formats::pixel_format(vopts.format)?;
                let buffers = VideoFrameBuffers::new(
                    source,
                    encoder.pixel_format(),
                    vopts.width,
                    vopts.height,
                )?;
                let index = stream_infos.len();
                stream_infos.push(Box::new(encoder.codec_data()));
                Some(VideoStream {
                    encoder,
                    buffers,
                    index,
                })
            }
            None => None,
        };

        let audio = if has_audio {
            // Presence checked above
            let aopts = self.audio_options.as_ref().ok_or_else(|| {
                AvrecError::InvalidState("audio options missing".to_string())
            })?;
            let find = self.options.find_audio_encoder.as_ref().ok_or_else(|| {
                AvrecError::Codec("no audio encoder collaborator configured".to_string())
            })?;
            let encoder = find(aopts)?;
            let frame_length = encoder.frame_length();
            if frame_length == 0 {
                return Err(AvrecError::Codec(
                    "audio encoder reports a zero frame length".to_string(),
                ));
            }
            let accumulator = AudioAccumulator::new(frame_length, aopts.bytes_per_entry());
            let frame_duration = Duration::from_nanos(
                frame_length as u64 * 1_000_000_000 / aopts.sample_rate as u64,
            );
            let index = stream_infos.len();
            stream_infos.push(Box::new(encoder.codec_data()));
            Some(AudioStream {
                encoder,
                accumulator,
                index,
                frame_duration,
            })
        } else {
            None
        };

        // Encoders are built before the muxer so a muxer failure drops them
        // without ever having touched the output path's container state.
        let muxer = (self.options.open_muxer)(path.as_ref())?;

        let tick_rate = self
            .video_options
            .as_ref()
            .map(|v| v.time_base)
            .unwrap_or_else(config::video_tick_rate);
        self.sync = TimestampSynchronizer::new(tick_rate);
        self.dispatcher = EncodeDispatcher::new(debug);
        self.debug = debug;
        self.muxer = Some(muxer);
        self.stream_infos = stream_infos;
        self.video = video;
        self.audio = audio;
        self.state = SessionState::Opened;
        info!(
            "session opened at {:?} with {} stream(s)",
            path.as_ref(),
            self.stream_infos.len()
        );
        Ok(())
    }

    /// Writes the container header. Legal from `Opened` only.
    pub async fn start(&mut self) -> Result<()> {
        if self.state != SessionState::Opened {
            return Err(AvrecError::InvalidState(
                "start called outside an opened session".to_string(),
            ));
        }
        let muxer = self.muxer.as_mut().ok_or_else(|| {
            AvrecError::InvalidState("muxer missing from opened session".to_string())
        })?;
        muxer.write_header(&self.stream_infos).await?;
        self.state = SessionState::Started;
        Ok(())
    }

    /// Supplies one raw video frame captured at `timestamp_ms` (caller
    /// clock, milliseconds). The first frame fixes the session's shared
    /// presentation-time origin.
    pub async fn supply_video_frame(&mut self, frame: &[u8], timestamp_ms: i64) -> Result<()> {
        if self.state != SessionState::Started {
            return Err(AvrecError::InvalidState(
                "supply_video_frame outside a started session".to_string(),
            ));
        }
        let video = self.video.as_mut().ok_or_else(|| {
            AvrecError::InvalidState("no video stream configured".to_string())
        })?;
        let muxer = self.muxer.as_mut().ok_or_else(|| {
            AvrecError::InvalidState("muxer missing from started session".to_string())
        })?;

        let pts = self.sync.video_pts(timestamp_ms);
        if self.debug {
            debug!(
                "video frame: {} bytes at {} ms -> pts {}",
                frame.len(),
                timestamp_ms,
                pts
            );
        }

        let VideoStream {
            encoder,
            buffers,
            index,
        } = video;
        let data = buffers.prepare(frame, self.options.find_pixel_converter.as_deref())?;
        self.dispatcher
            .dispatch_video(
                encoder.as_mut(),
                muxer.as_mut(),
                *index,
                VideoPicture { data, pts },
            )
            .await?;
        Ok(())
    }

    /// Supplies `sample_count` interleaved raw audio samples. Chunks may be
    /// any size; complete codec frames are encoded as they fill.
    pub async fn supply_audio_samples(&mut self, samples: &[u8], sample_count: usize) -> Result<()> {
        if self.state != SessionState::Started {
            return Err(AvrecError::InvalidState(
                "supply_audio_samples outside a started session".to_string(),
            ));
        }
        let audio = self.audio.as_mut().ok_or_else(|| {
            AvrecError::InvalidState("no audio stream configured".to_string())
        })?;
        let muxer = self.muxer.as_mut().ok_or_else(|| {
            AvrecError::InvalidState("muxer missing from started session".to_string())
        })?;

        if self.debug {
            debug!(
                "audio chunk: {} samples, {} leftover",
                sample_count,
                audio.accumulator.leftover()
            );
        }

        let frames = audio.accumulator.feed(samples, sample_count)?;
        let frame_length = audio.accumulator.frame_length();
        for data in frames {
            let pts = self.sync.audio_pts(frame_length);
            self.dispatcher
                .dispatch_audio(
                    audio.encoder.as_mut(),
                    muxer.as_mut(),
                    audio.index,
                    AudioBlock { data: &data, pts },
                    audio.frame_duration,
                )
                .await?;
        }
        Ok(())
    }

    /// Flushes the container trailer, closes the encoders, and releases all
    /// per-recording resources. Legal from `Opened` or `Started`; the
    /// session can then be reopened. Trailing audio shorter than one codec
    /// frame is dropped, not encoded.
    pub async fn close(&mut self) -> Result<()> {
        match self.state {
            SessionState::Opened | SessionState::Started => {}
            _ => {
                return Err(AvrecError::InvalidState(
                    "close called without a matching open".to_string(),
                ));
            }
        }

        if let Some(audio) = self.audio.as_mut() {
            let dropped = audio.accumulator.clear();
            if dropped > 0 {
                warn!(
                    "dropping {} trailing audio samples (less than one codec frame)",
                    dropped
                );
            }
        }

        // Resources are released even when the trailer write fails.
        let trailer = match (self.state, self.muxer.as_mut()) {
            (SessionState::Started, Some(muxer)) => muxer.write_trailer().await,
            _ => Ok(()),
        };

        if let Some(mut video) = self.video.take() {
            video.encoder.close();
        }
        if let Some(mut audio) = self.audio.take() {
            audio.encoder.close();
        }
        self.muxer = None;
        self.stream_infos.clear();
        self.state = SessionState::Closed;
        info!("session closed");
        trailer
    }
}
