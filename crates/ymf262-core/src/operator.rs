//! FM operator (slot).

use bitflags::bitflags;

use crate::envelope::{EnvelopeClock, EnvelopeGenerator, EnvelopePhase};
use crate::phase::{PhaseGenerator, Vibrato};
use crate::routing::ModSource;
use crate::waveform::Waveform;

bitflags! {
    /// Key-on sources. An operator sounds while any bit is set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct KeyFlags: u8 {
        /// Channel key-on (register 0xB0 bit 5).
        const NORMAL = 0x01;
        /// Rhythm key-on (register 0xBD bits 0-4).
        const DRUM = 0x02;
    }
}

/// Operator registers as written through 0x20, 0x40, 0x60, 0x80 and 0xE0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OperatorRegisters {
    /// Amplitude modulation enable.
    pub tremolo: bool,
    /// Vibrato enable.
    pub vibrato: bool,
    /// Envelope type: hold at sustain level while keyed.
    pub sustained: bool,
    /// Key-scale rate.
    pub key_scale_rate: bool,
    /// Frequency multiplier index.
    pub multiple: u8,
    /// Key-scale level (0-3).
    pub key_scale_level: u8,
    /// Total level, 0.75 dB steps.
    pub total_level: u8,
    /// Attack rate.
    pub attack_rate: u8,
    /// Decay rate.
    pub decay_rate: u8,
    /// Sustain level; 15 is stored as 31 (-93 dB).
    pub sustain_level: u8,
    /// Release rate.
    pub release_rate: u8,
    /// Waveform select.
    pub waveform: Waveform,
}

/// Chip-wide modulators sampled by an operator on one step.
#[derive(Clone, Copy, Debug, Default)]
pub struct OperatorClock {
    /// Envelope timing.
    pub envelope: EnvelopeClock,
    /// Current tremolo attenuation.
    pub tremolo: u8,
    /// Current vibrato position and depth.
    pub vibrato: Vibrato,
}

/// One of the 36 operators.
#[derive(Clone, Debug, Default)]
pub struct Operator {
    pub(crate) index: usize,
    pub(crate) channel: usize,
    pub(crate) regs: OperatorRegisters,
    pub(crate) key: KeyFlags,
    pub(crate) envelope: EnvelopeGenerator,
    pub(crate) phase: PhaseGenerator,
    pub(crate) modulation: ModSource,
    out: i16,
    previous_out: i16,
    feedback: i16,
}

impl Operator {
    /// Create operator `index` belonging to `channel`.
    pub fn new(index: usize, channel: usize) -> Self {
        Self {
            index,
            channel,
            ..Self::default()
        }
    }

    /// Slot number, 0-35.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Owning channel.
    #[inline]
    pub fn channel(&self) -> usize {
        self.channel
    }

    /// Register contents.
    #[inline]
    pub fn registers(&self) -> &OperatorRegisters {
        &self.regs
    }

    /// Most recent output sample.
    #[inline]
    pub fn out(&self) -> i16 {
        self.out
    }

    /// Self-feedback modulation computed on this step.
    #[inline]
    pub fn feedback(&self) -> i16 {
        self.feedback
    }

    /// Current envelope phase.
    #[inline]
    pub fn envelope_phase(&self) -> EnvelopePhase {
        self.envelope.phase()
    }

    /// Raw envelope attenuation.
    #[inline]
    pub fn envelope_level(&self) -> u16 {
        self.envelope.level()
    }

    /// Whether any key-on source is active.
    #[inline]
    pub fn is_keyed(&self) -> bool {
        !self.key.is_empty()
    }

    // ========================================================================
    // Register writes
    // ========================================================================

    /// 0x20: AM, VIB, EGT, KSR, MULT.
    pub fn write_control(&mut self, value: u8) {
        self.regs.tremolo = value & 0x80 != 0;
        self.regs.vibrato = value & 0x40 != 0;
        self.regs.sustained = value & 0x20 != 0;
        self.regs.key_scale_rate = value & 0x10 != 0;
        self.regs.multiple = value & 0x0f;
    }

    /// 0x40: KSL, TL. Needs the channel pitch to refresh key scaling.
    pub fn write_level(&mut self, value: u8, f_num: u16, block: u8) {
        self.regs.key_scale_level = (value >> 6) & 0x03;
        self.regs.total_level = value & 0x3f;
        self.envelope.update_key_scale_level(f_num, block);
    }

    /// 0x60: AR, DR.
    pub fn write_attack_decay(&mut self, value: u8) {
        self.regs.attack_rate = (value >> 4) & 0x0f;
        self.regs.decay_rate = value & 0x0f;
    }

    /// 0x80: SL, RR.
    pub fn write_sustain_release(&mut self, value: u8) {
        self.regs.sustain_level = (value >> 4) & 0x0f;
        if self.regs.sustain_level == 0x0f {
            self.regs.sustain_level = 0x1f;
        }
        self.regs.release_rate = value & 0x0f;
    }

    /// 0xE0: waveform select. Only the two low bits apply outside OPL3 mode.
    pub fn write_waveform(&mut self, value: u8, new_mode: bool) {
        let mask = if new_mode { 0x07 } else { 0x03 };
        self.regs.waveform = Waveform::from_bits(value & mask);
    }

    /// Set a key-on source.
    #[inline]
    pub fn key_on(&mut self, source: KeyFlags) {
        self.key |= source;
    }

    /// Clear a key-on source.
    #[inline]
    pub fn key_off(&mut self, source: KeyFlags) {
        self.key &= !source;
    }

    // ========================================================================
    // Per-sample processing
    // ========================================================================

    /// Latch self-feedback from the last two outputs. Runs before anything
    /// else on a step.
    pub fn update_feedback(&mut self, level: u8) {
        self.feedback = if level != 0 {
            (((self.previous_out as i32) + (self.out as i32)) >> (9 - level)) as i16
        } else {
            0
        };
        self.previous_out = self.out;
    }

    /// Run the envelope and phase generators. Returns the pre-advance phase.
    pub fn clock(&mut self, f_num: u16, block: u8, key_scale: u8, clock: OperatorClock) -> u16 {
        let restart = self.envelope.clock(
            &self.regs,
            self.is_keyed(),
            key_scale,
            clock.tremolo,
            clock.envelope,
        );
        let f_num = if self.regs.vibrato {
            clock.vibrato.apply(f_num)
        } else {
            f_num
        };
        self.phase.clock(f_num, block, self.regs.multiple, restart)
    }

    /// Produce this step's output from the phase, envelope and modulation input.
    pub fn generate(&mut self, modulation: i16) {
        let phase = self.phase.output().wrapping_add(modulation as u16);
        self.out = self.regs.waveform.output(phase, self.envelope.output());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_decoding() {
        let mut op = Operator::new(0, 0);
        op.write_control(0xf5);
        assert!(op.regs.tremolo && op.regs.vibrato && op.regs.sustained && op.regs.key_scale_rate);
        assert_eq!(op.regs.multiple, 5);

        op.write_level(0xbf, 0, 0);
        assert_eq!(op.regs.key_scale_level, 2);
        assert_eq!(op.regs.total_level, 0x3f);

        op.write_attack_decay(0xa3);
        assert_eq!((op.regs.attack_rate, op.regs.decay_rate), (0x0a, 0x03));
    }

    #[test]
    fn test_sustain_level_fifteen_maps_to_thirty_one() {
        let mut op = Operator::new(0, 0);
        op.write_sustain_release(0xf2);
        assert_eq!(op.regs.sustain_level, 0x1f);
        assert_eq!(op.regs.release_rate, 0x02);
        op.write_sustain_release(0xe0);
        assert_eq!(op.regs.sustain_level, 0x0e);
    }

    #[test]
    fn test_waveform_masked_outside_new_mode() {
        let mut op = Operator::new(0, 0);
        op.write_waveform(0x06, false);
        assert_eq!(op.regs.waveform, Waveform::AbsSine);
        op.write_waveform(0x06, true);
        assert_eq!(op.regs.waveform, Waveform::Square);
    }

    #[test]
    fn test_key_sources_are_independent() {
        let mut op = Operator::new(13, 7);
        op.key_on(KeyFlags::NORMAL);
        op.key_on(KeyFlags::DRUM);
        op.key_off(KeyFlags::NORMAL);
        assert!(op.is_keyed());
        op.key_off(KeyFlags::DRUM);
        assert!(!op.is_keyed());
    }

    #[test]
    fn test_feedback_disabled_at_level_zero() {
        let mut op = Operator::new(0, 0);
        op.out = 1000;
        op.update_feedback(0);
        assert_eq!(op.feedback(), 0);
        op.update_feedback(7);
        assert_eq!(op.feedback(), (1000 + 1000) >> 2);
    }
}
