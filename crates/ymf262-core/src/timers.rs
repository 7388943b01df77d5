//! Chip-wide oscillators: tremolo, vibrato and the envelope clock.

use crate::envelope::EnvelopeClock;
use crate::phase::Vibrato;

/// Tremolo triangle length in steps.
const TREMOLO_STEPS: u8 = 210;

/// Envelope timer width (36 bits).
const EG_TIMER_MASK: u64 = 0xf_ffff_ffff;

/// Global timers advanced once per native sample.
#[derive(Clone, Debug)]
pub struct GlobalTimers {
    timer: u16,
    tremolo: u8,
    tremolo_pos: u8,
    tremolo_shift: u8,
    vibrato_pos: u8,
    vibrato_shift: u8,
    eg_timer: u64,
    eg_timer_carry: bool,
    eg_state: bool,
    eg_add: u8,
    eg_timer_lo: u8,
}

impl GlobalTimers {
    /// Power-on state (shallow tremolo and vibrato).
    pub fn new() -> Self {
        Self {
            timer: 0,
            tremolo: 0,
            tremolo_pos: 0,
            tremolo_shift: 4,
            vibrato_pos: 0,
            vibrato_shift: 1,
            eg_timer: 0,
            eg_timer_carry: false,
            eg_state: false,
            eg_add: 0,
            eg_timer_lo: 0,
        }
    }

    /// Apply the depth bits of register 0xBD.
    pub fn set_depth(&mut self, deep_tremolo: bool, deep_vibrato: bool) {
        self.tremolo_shift = if deep_tremolo { 2 } else { 4 };
        self.vibrato_shift = if deep_vibrato { 0 } else { 1 };
    }

    /// Current tremolo attenuation.
    #[inline]
    pub fn tremolo(&self) -> u8 {
        self.tremolo
    }

    /// Current vibrato step.
    #[inline]
    pub fn vibrato(&self) -> Vibrato {
        Vibrato {
            position: self.vibrato_pos,
            shift: self.vibrato_shift,
        }
    }

    /// Envelope clock for the current sample.
    #[inline]
    pub fn envelope_clock(&self) -> EnvelopeClock {
        EnvelopeClock {
            add: self.eg_add,
            timer_lo: self.eg_timer_lo,
            state: self.eg_state,
        }
    }

    /// Raw 36-bit envelope timer.
    #[inline]
    pub fn eg_timer(&self) -> u64 {
        self.eg_timer
    }

    /// Advance one native sample.
    pub fn tick(&mut self) {
        if self.timer & 0x3f == 0x3f {
            self.tremolo_pos = (self.tremolo_pos + 1) % TREMOLO_STEPS;
        }
        self.tremolo = if self.tremolo_pos < TREMOLO_STEPS / 2 {
            self.tremolo_pos >> self.tremolo_shift
        } else {
            (TREMOLO_STEPS - self.tremolo_pos) >> self.tremolo_shift
        };

        if self.timer & 0x3ff == 0x3ff {
            self.vibrato_pos = (self.vibrato_pos + 1) & 0x07;
        }
        self.timer = self.timer.wrapping_add(1);

        if self.eg_state {
            let shift = self.eg_timer.trailing_zeros().min(13) as u8;
            self.eg_add = if shift > 12 { 0 } else { shift + 1 };
            self.eg_timer_lo = (self.eg_timer & 0x03) as u8;
        }

        if self.eg_timer_carry || self.eg_state {
            if self.eg_timer == EG_TIMER_MASK {
                self.eg_timer = 0;
                self.eg_timer_carry = true;
            } else {
                self.eg_timer += 1;
                self.eg_timer_carry = false;
            }
        }

        self.eg_state = !self.eg_state;
    }
}

impl Default for GlobalTimers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_timer_advances_every_other_sample() {
        let mut timers = GlobalTimers::new();
        for _ in 0..10 {
            timers.tick();
        }
        assert_eq!(timers.eg_timer(), 5);
    }

    #[test]
    fn test_eg_add_from_lowest_set_bit() {
        let mut timers = GlobalTimers::new();
        // eg_add is sampled on odd ticks from the timer value at that point
        timers.tick();
        timers.tick();
        assert_eq!(timers.envelope_clock().add, 0, "timer 0 has no set bit");
        timers.tick();
        timers.tick();
        assert_eq!(timers.envelope_clock().add, 1, "timer 1");
        timers.tick();
        timers.tick();
        assert_eq!(timers.envelope_clock().add, 2, "timer 2");
    }

    #[test]
    fn test_tremolo_triangle_peak() {
        let mut timers = GlobalTimers::new();
        timers.set_depth(true, false);
        let mut peak = 0;
        for _ in 0..(64 * 210) {
            timers.tick();
            peak = peak.max(timers.tremolo());
        }
        assert_eq!(peak, 105 >> 2);
        assert_eq!(timers.tremolo(), 0, "full cycle returns to zero");
    }

    #[test]
    fn test_vibrato_position_wraps() {
        let mut timers = GlobalTimers::new();
        for _ in 0..(1024 * 8) {
            timers.tick();
        }
        assert_eq!(timers.vibrato().position, 0);
        timers.set_depth(false, true);
        assert_eq!(timers.vibrato().shift, 0);
    }
}
