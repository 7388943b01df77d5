//! YMF262 (OPL3) FM Synthesis Emulator
//!
//! A bit-accurate emulator of the Yamaha YMF262 FM synthesis chip, the sound
//! engine of the Sound Blaster 16 and Pro 2 era of PC audio. Register command
//! streams captured from or authored for real hardware produce the same
//! samples the chip would.
//!
//! # Features
//! - 36 operators, 18 channels, 2-op and 4-op voices
//! - Full envelope generator including the hardware's rate quirks
//! - Rhythm mode with the exact percussion phase logic
//! - All 8 OPL3 waveforms, feedback, tremolo and vibrato
//! - 4-channel output (DAC A-D) and the stereo-extension pan registers
//! - Timed register write buffer emulating the chip's write latency
//! - Linear resampling from the native 49716 Hz to any output rate
//!
//! # Crate feature flags
//! - `serde` (optional): `Serialize`/`Deserialize` for [`Opl3Config`]
//!
//! # Backend Trait
//! The [`Opl3Backend`] trait lets players drive any OPL3 implementation
//! through the same register/sample interface.
//!
//! # Quick start
//! ```no_run
//! use ymf262::Opl3;
//!
//! let mut chip = Opl3::new(44_100)?;
//! chip.write_register(0x20, 0x21); // Modulator: sustain, MULT=1
//! chip.write_register(0x23, 0x21); // Carrier: sustain, MULT=1
//! chip.write_register(0x43, 0x00); // Carrier: full volume
//! chip.write_register(0x63, 0xf0); // Carrier: instant attack
//! chip.write_register(0xc0, 0x30); // Channel 0: left + right
//! chip.write_register(0xa0, 0x41); // F-number low
//! chip.write_register(0xb0, 0x32); // Key on, block 4
//!
//! let mut buffer = vec![0i16; 2 * 1024];
//! chip.generate_stream(&mut buffer, 1024)?;
//! # Ok::<(), ymf262::Ymf262Error>(())
//! ```

#![warn(missing_docs)]

pub mod backend; // Backend trait abstraction
pub mod channel;
pub mod channel_state; // Snapshot for visualization
pub mod chip; // Chip aggregate and sample generation
pub mod config;
pub mod envelope;
pub mod mixer;
pub mod operator;
pub mod phase;
pub mod resampler;
pub mod rhythm;
pub mod routing; // Algorithm topologies
pub mod tables; // ROMs and constants
pub mod timers;
pub mod util; // Frequency helpers
pub mod waveform;
pub mod write_buffer;

/// Error types for YMF262 emulator operations
///
/// Register writes never fail; these cover invalid configuration and
/// caller-provided buffers.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Ymf262Error {
    /// Output buffer cannot hold the requested frames
    #[error("Buffer too small: {required} samples required, {provided} provided")]
    BufferTooSmall {
        /// Samples needed
        required: usize,
        /// Samples available
        provided: usize,
    },

    /// Output sample rate outside the supported range
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, Ymf262Error>;

// Public API exports
pub use backend::Opl3Backend;
pub use channel::ChannelType;
pub use channel_state::{ChannelState, ChannelStates, OperatorState};
pub use chip::Opl3;
pub use config::Opl3Config;
pub use envelope::EnvelopePhase;
pub use rhythm::RhythmFlags;
pub use routing::Algorithm;
pub use tables::NATIVE_SAMPLE_RATE;
pub use waveform::Waveform;
