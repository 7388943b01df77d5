//! Envelope generator.
//!
//! One ADSR state machine per operator, advanced once per native sample.
//! Rates are combined with the channel's key-scale value and gated by the
//! chip-wide envelope clock, so a slow rate only moves on some samples.

use crate::operator::OperatorRegisters;
use crate::tables::{EG_INCREMENT_STEP, KSL_ROM, KSL_SHIFT};

/// Maximum attenuation (silence).
pub const MAX_ATTENUATION: u16 = 0x1ff;

/// ADSR state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EnvelopePhase {
    /// Level falls toward 0 along the exponential attack curve.
    Attack,
    /// Level rises toward the sustain level.
    Decay,
    /// Held at the sustain level, or decaying at the release rate for
    /// non-sustained (percussive) operators.
    Sustain,
    /// Level rises toward silence.
    #[default]
    Release,
}

/// Chip-wide envelope clock sampled by every operator on a given step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnvelopeClock {
    /// Derived from the lowest set bit of the global envelope timer.
    pub add: u8,
    /// Low two bits of the global envelope timer.
    pub timer_lo: u8,
    /// Alternating half-rate phase.
    pub state: bool,
}

/// Per-operator envelope state.
#[derive(Clone, Debug)]
pub struct EnvelopeGenerator {
    level: u16,
    output: u16,
    phase: EnvelopePhase,
    key_scale_level: u8,
}

impl EnvelopeGenerator {
    /// Create a silent generator in the Release phase.
    pub fn new() -> Self {
        Self {
            level: MAX_ATTENUATION,
            output: MAX_ATTENUATION,
            phase: EnvelopePhase::Release,
            key_scale_level: 0,
        }
    }

    /// Current ADSR phase.
    #[inline]
    pub fn phase(&self) -> EnvelopePhase {
        self.phase
    }

    /// Raw envelope level, 0 (loudest) to 0x1FF (silent).
    #[inline]
    pub fn level(&self) -> u16 {
        self.level
    }

    /// Total attenuation fed to the waveform lookup.
    #[inline]
    pub fn output(&self) -> u16 {
        self.output
    }

    /// Recompute the key-scale level attenuation from the channel pitch.
    pub fn update_key_scale_level(&mut self, f_num: u16, block: u8) {
        let level = ((KSL_ROM[(f_num >> 6) as usize & 0x0f] as i16) << 2)
            - ((8 - block as i16) << 5);
        self.key_scale_level = level.max(0) as u8;
    }

    /// Advance one native sample.
    ///
    /// `key_scale` is the channel's key-scale value and `tremolo` the current
    /// tremolo depth. Returns `true` when the phase generator must restart
    /// (key-on while releasing).
    pub fn clock(
        &mut self,
        regs: &OperatorRegisters,
        key_on: bool,
        key_scale: u8,
        tremolo: u8,
        clock: EnvelopeClock,
    ) -> bool {
        let tremolo = if regs.tremolo { tremolo as u16 } else { 0 };
        self.output = self
            .level
            .wrapping_add((regs.total_level as u16) << 2)
            .wrapping_add((self.key_scale_level as u16) >> KSL_SHIFT[regs.key_scale_level as usize])
            .wrapping_add(tremolo);

        let reset = key_on && self.phase == EnvelopePhase::Release;
        let rate_register = if reset {
            regs.attack_rate
        } else {
            match self.phase {
                EnvelopePhase::Attack => regs.attack_rate,
                EnvelopePhase::Decay => regs.decay_rate,
                EnvelopePhase::Sustain if regs.sustained => 0,
                EnvelopePhase::Sustain | EnvelopePhase::Release => regs.release_rate,
            }
        };

        let key_scale = key_scale >> if regs.key_scale_rate { 0 } else { 2 };
        let rate = key_scale + (rate_register << 2);
        let mut rate_hi = rate >> 2;
        let rate_lo = rate & 0x03;
        if rate_hi & 0x10 != 0 {
            rate_hi = 0x0f;
        }

        let shift = if rate_register == 0 {
            0
        } else if rate_hi < 12 {
            match (clock.state, rate_hi + clock.add) {
                (true, 12) => 1,
                (true, 13) => (rate_lo >> 1) & 0x01,
                (true, 14) => rate_lo & 0x01,
                _ => 0,
            }
        } else {
            let step = (rate_hi & 0x03)
                + EG_INCREMENT_STEP[rate_lo as usize][(clock.timer_lo & 0x03) as usize];
            match step {
                s if s & 0x04 != 0 => 0x03,
                0 => clock.state as u8,
                s => s,
            }
        };

        let mut level = self.level as i32;
        if reset && rate_hi == 0x0f {
            // Instant attack
            level = 0;
        }
        let off = self.level & 0x1f8 == 0x1f8;
        if self.phase != EnvelopePhase::Attack && !reset && off {
            level = MAX_ATTENUATION as i32;
        }

        let mut increment = 0i32;
        match self.phase {
            EnvelopePhase::Attack => {
                if self.level == 0 {
                    self.phase = EnvelopePhase::Decay;
                } else if key_on && shift > 0 && rate_hi != 0x0f {
                    increment = !(self.level as i32) >> (4 - shift);
                }
            }
            EnvelopePhase::Decay => {
                if self.level >> 4 == regs.sustain_level as u16 {
                    self.phase = EnvelopePhase::Sustain;
                } else if !off && !reset && shift > 0 {
                    increment = 1 << (shift - 1);
                }
            }
            EnvelopePhase::Sustain | EnvelopePhase::Release => {
                if !off && !reset && shift > 0 {
                    increment = 1 << (shift - 1);
                }
            }
        }

        self.level = ((level + increment) & 0x1ff) as u16;

        if reset {
            self.phase = EnvelopePhase::Attack;
        }
        if !key_on {
            self.phase = EnvelopePhase::Release;
        }
        reset
    }
}

impl Default for EnvelopeGenerator {
    fn default() -> Self {
        Self::new()
    }
}
