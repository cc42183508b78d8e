#![doc(html_root_url = "https://docs.rs/avrec/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # avrec - live A/V recording sessions for Rust
//!
//! `avrec` bridges irregular, caller-paced capture input (raw video frames
//! and raw audio sample chunks of arbitrary size) to the fixed-size,
//! fixed-format input media codecs require, and hands the encoded packets to
//! a container muxer on a single shared presentation-time axis.
//!
//! The codec bitstream encoders, pixel conversion math, and container format
//! are external collaborators behind traits; `avrec` owns the hard middle:
//!
//! - accumulating partial audio input across calls with zero sample loss or
//!   duplication
//! - converting arbitrary raw pixel layouts to the encoder's required layout
//!   through a session-cached conversion context
//! - deriving presentation timestamps that keep two independently-clocked
//!   streams in sync
//! - preserving packet production order into the muxer
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use avrec::codec::testing::{MockAudioEncoder, MockVideoEncoder};
//! use avrec::format::RawFileMuxer;
//! use avrec::session::{
//!     AudioOptions, AudioSampleFormat, RecorderSession, SessionOptions, VideoFrameFormat,
//!     VideoOptions,
//! };
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> avrec::Result<()> {
//!     let options = SessionOptions {
//!         find_video_encoder: Some(Box::new(|opts: &VideoOptions| {
//!             Ok(Box::new(MockVideoEncoder::new(opts.width, opts.height, opts.time_base))
//!                 as Box<_>)
//!         })),
//!         find_audio_encoder: Some(Box::new(|opts: &AudioOptions| {
//!             Ok(Box::new(MockAudioEncoder::new(opts.channels, opts.sample_rate, 1024))
//!                 as Box<_>)
//!         })),
//!         find_pixel_converter: None,
//!         open_muxer: Box::new(|path: &Path| Ok(Box::new(RawFileMuxer::new(path)) as Box<_>)),
//!     };
//!
//!     let mut session = RecorderSession::new(options);
//!     session.set_video_options(VideoFrameFormat::Yuv420p, 640, 480, Some(30), 1_000_000)?;
//!     session.set_audio_options(AudioSampleFormat::S16, 2, 44_100, 128_000)?;
//!     session.open("capture.out", true, false).await?;
//!     session.start().await?;
//!
//!     let frame = vec![0u8; 640 * 480 * 3 / 2];
//!     session.supply_video_frame(&frame, 0).await?;
//!     let samples = vec![0u8; 512 * 2 * 2];
//!     session.supply_audio_samples(&samples, 512).await?;
//!
//!     session.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - `session`: the encoding session core — state machine, audio
//!   accumulator, video frame conversion, timestamp synchronization, and
//!   encode dispatch
//! - `av`: shared A/V types — codec descriptions and the `Packet` handed to
//!   muxers
//! - `codec`: encoder and pixel-converter collaborator traits, plus
//!   deterministic mock encoders for tests
//! - `format`: the container muxer trait, a recording `TestMuxer`, and an
//!   elementary-stream `RawFileMuxer`
//! - `error`: error types and the crate-wide `Result` alias
//! - `config`: process-wide recording defaults

/// Audio/Video base types shared between sessions, encoders, and muxers
pub mod av;

/// Encoder and pixel-converter collaborator traits
pub mod codec;

/// Error types and utilities
pub mod error;

/// Container muxer trait and bundled muxer implementations
pub mod format;

/// The recording session core
pub mod session;

/// Configuration module
pub mod config;

pub use error::{AvrecError, Result};
pub use session::{RecorderSession, SessionOptions, SessionState};
