//! Channel registers and output routing.

use crate::routing::Algorithm;
use crate::tables::CHANNEL_FIRST_SLOT;

/// Role of a channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChannelType {
    /// Independent 2-operator voice.
    #[default]
    TwoOp,
    /// Lower half of a 4-operator voice (channels 0-2, 9-11). Receives
    /// key-on and frequency writes for the whole voice.
    FourOp,
    /// Upper half of a 4-operator voice (channels 3-5, 12-14). Holds the
    /// combined algorithm and output taps.
    FourOpPair,
    /// Rhythm-mode channel (6-8).
    Drum,
}

/// One of the 18 channels.
#[derive(Clone, Debug, Default)]
pub struct Channel {
    pub(crate) index: usize,
    pub(crate) slots: [usize; 2],
    pub(crate) pair: Option<usize>,
    pub(crate) kind: ChannelType,
    pub(crate) f_num: u16,
    pub(crate) block: u8,
    pub(crate) feedback: u8,
    pub(crate) connection: bool,
    pub(crate) algorithm: Algorithm,
    pub(crate) key_scale: u8,
    /// Output enables for DAC outputs A-D, 0xFFFF or 0.
    pub(crate) output_mask: [u16; 4],
    pub(crate) left_pan: i32,
    pub(crate) right_pan: i32,
    /// Operators summed into the channel output.
    pub(crate) taps: [Option<usize>; 4],
}

impl Channel {
    /// Power-on state of channel `index`.
    pub fn new(index: usize) -> Self {
        let first = CHANNEL_FIRST_SLOT[index];
        let pair = match index % 9 {
            0..=2 => Some(index + 3),
            3..=5 => Some(index - 3),
            _ => None,
        };
        Self {
            index,
            slots: [first, first + 3],
            pair,
            output_mask: [0xffff, 0xffff, 0, 0],
            left_pan: 0x10000,
            right_pan: 0x10000,
            ..Self::default()
        }
    }

    /// Channel number, 0-17.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Operator indices of this channel.
    #[inline]
    pub fn slots(&self) -> [usize; 2] {
        self.slots
    }

    /// 4-op partner, if this channel can pair.
    #[inline]
    pub fn pair(&self) -> Option<usize> {
        self.pair
    }

    /// Channel role.
    #[inline]
    pub fn kind(&self) -> ChannelType {
        self.kind
    }

    /// Active connection topology.
    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// 10-bit frequency number.
    #[inline]
    pub fn f_num(&self) -> u16 {
        self.f_num
    }

    /// Octave.
    #[inline]
    pub fn block(&self) -> u8 {
        self.block
    }

    /// 0xA0: frequency number low byte.
    pub fn write_frequency_low(&mut self, value: u8, note_select: u8) {
        self.f_num = (self.f_num & 0x300) | value as u16;
        self.update_key_scale(note_select);
    }

    /// 0xB0: frequency number high bits and block. Returns the key-on bit.
    pub fn write_frequency_high(&mut self, value: u8, note_select: u8) -> bool {
        self.f_num = (self.f_num & 0xff) | (((value & 0x03) as u16) << 8);
        self.block = (value >> 2) & 0x07;
        self.update_key_scale(note_select);
        value & 0x20 != 0
    }

    /// Copy pitch from the lower half of a 4-op voice.
    pub fn copy_pitch_from(&mut self, other: &Channel) {
        self.f_num = other.f_num;
        self.block = other.block;
        self.key_scale = other.key_scale;
    }

    fn update_key_scale(&mut self, note_select: u8) {
        self.key_scale = (self.block << 1) | ((self.f_num >> (9 - note_select)) & 0x01) as u8;
    }

    /// 0xC0: output enables, feedback and connection.
    pub fn write_feedback_connection(&mut self, value: u8, new_mode: bool, stereo_ext: bool) {
        self.feedback = (value & 0x0e) >> 1;
        self.connection = value & 0x01 != 0;
        if new_mode {
            for (bit, mask) in self.output_mask.iter_mut().enumerate() {
                *mask = if value & (0x10 << bit) != 0 { 0xffff } else { 0 };
            }
        } else {
            self.output_mask = [0xffff, 0xffff, 0, 0];
        }
        if !stereo_ext {
            self.left_pan = (self.output_mask[0] as i32) << 16;
            self.right_pan = (self.output_mask[1] as i32) << 16;
        }
    }

    /// 0xD0: stereo-extension pan position.
    pub fn write_pan(&mut self, value: u8, pan_lut: &[i32; 256]) {
        self.left_pan = pan_lut[(value ^ 0xff) as usize];
        self.right_pan = pan_lut[value as usize];
    }

    /// Clear output taps.
    pub fn clear_taps(&mut self) {
        self.taps = [None; 4];
    }
}
