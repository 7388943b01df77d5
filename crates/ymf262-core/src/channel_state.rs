//! Channel state extraction for visualization.
//!
//! [`ChannelStates::from_registers`] decodes a 512-byte register image (as
//! returned by [`Opl3::dump_registers`](crate::Opl3::dump_registers)) into
//! per-channel pitch, key and routing information.
//! [`Opl3::channel_states`](crate::Opl3::channel_states) additionally fills in
//! the live envelope state of every operator.
//!
//! # Example
//!
//! ```
//! use ymf262::Opl3;
//!
//! let mut chip = Opl3::new(44_100).unwrap();
//! chip.write_register(0xa0, 0x44);
//! chip.write_register(0xb0, 0x32);
//!
//! let states = chip.channel_states();
//! for (i, ch) in states.active_channels() {
//!     println!("Channel {}: {:?} Hz", i, ch.frequency_hz);
//! }
//! ```

use crate::channel::ChannelType;
use crate::envelope::EnvelopePhase;
use crate::rhythm::RhythmFlags;
use crate::routing::Algorithm;
use crate::tables::NUM_CHANNELS;
use crate::util::{fnum_to_frequency, frequency_to_midi};
use crate::waveform::Waveform;

/// Number of register addresses (two banks of 256).
pub const REGISTER_SPACE: usize = 0x200;

/// State of one operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperatorState {
    /// Slot number.
    pub slot: usize,
    /// Selected waveform.
    pub waveform: Waveform,
    /// Total level register (0 = loudest).
    pub total_level: u8,
    /// ADSR phase (live state only).
    pub envelope_phase: EnvelopePhase,
    /// Envelope attenuation, 0 to 0x1FF (live state only).
    pub attenuation: u16,
}

/// State of one channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelState {
    /// 10-bit frequency number.
    pub f_num: u16,
    /// Octave.
    pub block: u8,
    /// Pitch in Hz (None if the frequency number is 0).
    pub frequency_hz: Option<f32>,
    /// Nearest MIDI note.
    pub midi_note: Option<u8>,
    /// Key-on bit of register 0xB0.
    pub key_on: bool,
    /// Feedback level (0-7).
    pub feedback: u8,
    /// Role of the channel.
    pub kind: ChannelType,
    /// Active connection topology.
    pub algorithm: Algorithm,
    /// The channel's two operators.
    pub operators: [OperatorState; 2],
}

/// State of all 18 channels and the global mode registers.
#[derive(Debug, Clone, Default)]
pub struct ChannelStates {
    /// Channels 0-17.
    pub channels: [ChannelState; NUM_CHANNELS],
    /// Register 0xBD.
    pub rhythm: RhythmFlags,
    /// OPL3 mode (register 0x105 bit 0).
    pub new_mode: bool,
    /// 4-op enables (register 0x104).
    pub four_op_mask: u8,
}

/// Register offset of a slot within its bank.
fn slot_register_offset(slot: usize) -> usize {
    let local = slot % 18;
    (slot / 18) * 0x100 + (local / 6) * 8 + local % 6
}

impl ChannelStates {
    /// Extract channel states from a register image.
    ///
    /// # Arguments
    ///
    /// * `regs` - 512-byte register image, bank 1 at offset 0x100
    pub fn from_registers(regs: &[u8; REGISTER_SPACE]) -> Self {
        let rhythm = RhythmFlags::from_register(regs[0xbd]);
        let new_mode = regs[0x105] & 0x01 != 0;
        let four_op_mask = regs[0x104] & 0x3f;

        let kind_of = |ch: usize| -> ChannelType {
            let n = ch % 9;
            if ch < 9 && (6..=8).contains(&n) && rhythm.is_rhythm_enabled() {
                return ChannelType::Drum;
            }
            let bit = (ch / 9) * 3 + n % 3;
            match n {
                0..=2 if four_op_mask & (1 << bit) != 0 => ChannelType::FourOp,
                3..=5 if four_op_mask & (1 << bit) != 0 => ChannelType::FourOpPair,
                _ => ChannelType::TwoOp,
            }
        };
        let connection = |ch: usize| regs[(ch / 9) * 0x100 + 0xc0 + ch % 9] & 0x01 != 0;

        let channels = std::array::from_fn(|ch| {
            let base = (ch / 9) * 0x100 + ch % 9;
            let a0 = regs[base + 0xa0];
            let b0 = regs[base + 0xb0];
            let c0 = regs[base + 0xc0];
            let f_num = a0 as u16 | (((b0 & 0x03) as u16) << 8);
            let block = (b0 >> 2) & 0x07;
            let frequency_hz = (f_num > 0).then(|| fnum_to_frequency(f_num, block));

            let kind = kind_of(ch);
            let algorithm = match kind {
                ChannelType::FourOp if new_mode => Algorithm::Merged,
                ChannelType::FourOpPair if new_mode => {
                    Algorithm::four_op(connection(ch - 3), connection(ch))
                }
                _ => Algorithm::two_op(connection(ch)),
            };

            let first = crate::tables::CHANNEL_FIRST_SLOT[ch];
            let operators = [first, first + 3].map(|slot| {
                let offset = slot_register_offset(slot);
                let waveform_mask = if new_mode { 0x07 } else { 0x03 };
                OperatorState {
                    slot,
                    waveform: Waveform::from_bits(regs[offset + 0xe0] & waveform_mask),
                    total_level: regs[offset + 0x40] & 0x3f,
                    envelope_phase: EnvelopePhase::Release,
                    attenuation: crate::envelope::MAX_ATTENUATION,
                }
            });

            ChannelState {
                f_num,
                block,
                frequency_hz,
                midi_note: frequency_hz.and_then(frequency_to_midi),
                key_on: b0 & 0x20 != 0,
                feedback: (c0 >> 1) & 0x07,
                kind,
                algorithm,
                operators,
            }
        });

        ChannelStates {
            channels,
            rhythm,
            new_mode,
            four_op_mask,
        }
    }

    /// Channels with their key-on bit set.
    pub fn active_channels(&self) -> impl Iterator<Item = (usize, &ChannelState)> {
        self.channels
            .iter()
            .enumerate()
            .filter(|(_, ch)| ch.key_on)
    }

    /// Number of channels combined into 4-op voices (counted once per voice).
    pub fn four_op_voices(&self) -> usize {
        self.channels
            .iter()
            .filter(|ch| ch.algorithm.is_four_op())
            .count()
    }
}
