//! YMF262 chip emulation
//!
//! Sample-accurate OPL3 emulation at the native rate of 49716 Hz
//! (14.31818 MHz / 288). Every call to [`Opl3::generate_4ch`] advances all 36
//! operators by one step in hardware order, mixes the 18 channels and then
//! advances the chip-wide oscillators.

use crate::backend::{normalize_sample, Opl3Backend};
use crate::channel::{Channel, ChannelType};
use crate::channel_state::{ChannelStates, REGISTER_SPACE};
use crate::config::Opl3Config;
use crate::mixer::Mixer;
use crate::operator::{KeyFlags, Operator, OperatorClock};
use crate::phase::NoiseGenerator;
use crate::resampler::Resampler;
use crate::rhythm::{RhythmFlags, RhythmLatch, DRUM_KEYS};
use crate::routing::{self, Algorithm, ModSource, Node, Source};
use crate::tables::{slot_channel, ADDRESS_TO_SLOT, NUM_CHANNELS, NUM_OPERATORS, PAN_LUT};
use crate::timers::GlobalTimers;
use crate::write_buffer::WriteBuffer;
use crate::{Result, Ymf262Error};

/// Output channels produced per frame by the 4-channel paths.
const QUAD: usize = 4;

/// Output channels produced per frame by the stereo paths.
const STEREO: usize = 2;

/// YMF262 (OPL3) FM synthesis chip emulator
///
/// # Features
///
/// - 36 operators in 18 channels, 2-op and 4-op voices
/// - Rhythm mode on channels 6-8
/// - 4 DAC outputs and stereo-extension panning
/// - Buffered register writes with hardware latency
/// - Linear resampling to the configured output rate
///
/// # Example
///
/// ```
/// use ymf262::Opl3;
///
/// let mut chip = Opl3::new(44_100).unwrap();
///
/// // Channel 0: carrier at full volume, instant attack, sustained
/// chip.write_register(0x23, 0x21);
/// chip.write_register(0x43, 0x00);
/// chip.write_register(0x63, 0xf0);
/// chip.write_register(0xa0, 0x44);
/// chip.write_register(0xb0, 0x32); // key on
///
/// let [left, right] = chip.generate_resampled();
/// # let _ = (left, right);
/// ```
#[derive(Clone)]
pub struct Opl3 {
    // Configuration
    config: Opl3Config,

    // Voices
    channels: [Channel; NUM_CHANNELS],
    operators: [Operator; NUM_OPERATORS],

    // Hardware registers
    registers: [u8; REGISTER_SPACE],
    new_mode: bool,
    stereo_ext: bool,
    note_select: u8,
    rhythm: RhythmFlags,
    four_op_mask: u8,

    // Global oscillators
    timers: GlobalTimers,
    noise: NoiseGenerator,
    rhythm_latch: RhythmLatch,

    // Output processing
    mixer: Mixer,
    resampler: Resampler,
    write_buffer: WriteBuffer,

    // Cached output for Backend trait
    last_frame: [i16; 2],
}

impl Opl3 {
    /// Create a chip producing `sample_rate` Hz on the resampled paths.
    ///
    /// # Errors
    ///
    /// [`Ymf262Error::InvalidSampleRate`] or [`Ymf262Error::ConfigError`] when
    /// the rate cannot be resampled to.
    pub fn new(sample_rate: u32) -> Result<Self> {
        Self::with_config(Opl3Config::new(sample_rate))
    }

    /// Create a chip from a configuration.
    pub fn with_config(config: Opl3Config) -> Result<Self> {
        config.validate()?;
        let resampler = Resampler::new(config.sample_rate)?;
        let mut chip = Self::power_on(config, resampler);
        chip.reset_state();
        log::debug!("OPL3 created: output rate {} Hz", config.sample_rate);
        Ok(chip)
    }

    fn power_on(config: Opl3Config, resampler: Resampler) -> Self {
        Self {
            config,
            channels: std::array::from_fn(Channel::new),
            operators: std::array::from_fn(|slot| Operator::new(slot, slot_channel(slot))),
            registers: [0; REGISTER_SPACE],
            new_mode: false,
            stereo_ext: false,
            note_select: 0,
            rhythm: RhythmFlags::empty(),
            four_op_mask: 0,
            timers: GlobalTimers::new(),
            noise: NoiseGenerator::new(),
            rhythm_latch: RhythmLatch::new(),
            mixer: Mixer::new(),
            resampler,
            write_buffer: WriteBuffer::new(),
            last_frame: [0; 2],
        }
    }

    /// Reinitialize all state and set a new output sample rate.
    ///
    /// Discards pending buffered writes. On error the chip is left untouched.
    pub fn reset(&mut self, sample_rate: u32) -> Result<()> {
        let config = Opl3Config::new(sample_rate);
        config.validate()?;
        self.resampler = Resampler::new(sample_rate)?;
        self.config = config;
        self.reset_state();
        log::debug!(
            "OPL3 reset: output rate {} Hz, ratio {}",
            sample_rate,
            self.resampler.ratio()
        );
        Ok(())
    }

    fn reset_state(&mut self) {
        self.channels = std::array::from_fn(Channel::new);
        self.operators = std::array::from_fn(|slot| Operator::new(slot, slot_channel(slot)));
        self.registers = [0; REGISTER_SPACE];
        self.new_mode = false;
        self.stereo_ext = false;
        self.note_select = 0;
        self.rhythm = RhythmFlags::empty();
        self.four_op_mask = 0;
        self.timers = GlobalTimers::new();
        self.noise.reset();
        self.rhythm_latch = RhythmLatch::new();
        self.mixer.reset();
        self.resampler.reset();
        self.write_buffer.reset();
        self.last_frame = [0; 2];

        for ch in 0..NUM_CHANNELS {
            self.setup_algorithm(ch);
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current configuration.
    pub fn config(&self) -> &Opl3Config {
        &self.config
    }

    /// Output sample rate of the resampled paths.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// Channel `index` (0-17).
    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    /// Operator `index` (0-35).
    pub fn operator(&self, index: usize) -> Option<&Operator> {
        self.operators.get(index)
    }

    /// OPL3 mode (register 0x105 bit 0).
    pub fn is_new_mode(&self) -> bool {
        self.new_mode
    }

    /// Stereo-extension panning (register 0x105 bit 1).
    pub fn is_stereo_extension(&self) -> bool {
        self.stereo_ext
    }

    /// Register 0xBD as last written (rhythm bits only).
    pub fn rhythm_flags(&self) -> RhythmFlags {
        self.rhythm
    }

    /// 4-op enable mask (register 0x104).
    pub fn four_op_mask(&self) -> u8 {
        self.four_op_mask
    }

    /// Number of buffered writes not yet applied.
    pub fn pending_writes(&self) -> usize {
        self.write_buffer.len()
    }

    /// Last value written to a register.
    ///
    /// The chip's registers are write-only; this reads a shadow copy.
    pub fn read_register(&self, address: u16) -> u8 {
        self.registers[(address & 0x1ff) as usize]
    }

    /// Shadow copy of all 512 registers.
    pub fn dump_registers(&self) -> [u8; REGISTER_SPACE] {
        self.registers
    }

    /// Per-channel state with live envelope information.
    pub fn channel_states(&self) -> ChannelStates {
        let mut states = ChannelStates::from_registers(&self.registers);
        for (state, channel) in states.channels.iter_mut().zip(&self.channels) {
            state.kind = channel.kind;
            state.algorithm = channel.algorithm;
            for (op_state, &slot) in state.operators.iter_mut().zip(&channel.slots) {
                let op = &self.operators[slot];
                op_state.envelope_phase = op.envelope_phase();
                op_state.attenuation = op.envelope_level();
            }
        }
        states
    }

    // ========================================================================
    // Register interface
    // ========================================================================

    /// Apply a register write immediately.
    ///
    /// Bit 8 of `address` selects bank 1. Addresses with no decode path
    /// are ignored.
    pub fn write_register(&mut self, address: u16, value: u8) {
        let address = address & 0x1ff;
        self.registers[address as usize] = value;
        self.apply_register(address, value);
    }

    /// Schedule a register write with the chip's write latency.
    ///
    /// Writes are spaced two native samples apart and applied in order.
    pub fn write_register_buffered(&mut self, address: u16, value: u8) {
        if let Some(evicted) = self.write_buffer.push(address, value) {
            log::warn!(
                "write buffer full, flushing {:#05x}={:#04x} early",
                evicted.address,
                evicted.value
            );
            self.write_register(evicted.address, evicted.value);
        }
        log::trace!(
            "buffered write {:#05x}={:#04x} at sample {}",
            address & 0x1ff,
            value,
            self.write_buffer.sample_count()
        );
    }

    fn apply_register(&mut self, address: u16, value: u8) {
        let bank = ((address >> 8) & 0x01) as usize;
        let reg = (address & 0xff) as u8;

        match reg & 0xf0 {
            0x00 => self.write_global(bank, reg, value),
            0x20 | 0x30 => {
                if let Some(slot) = Self::decode_slot(bank, reg) {
                    self.operators[slot].write_control(value);
                }
            }
            0x40 | 0x50 => {
                if let Some(slot) = Self::decode_slot(bank, reg) {
                    let channel = &self.channels[self.operators[slot].channel];
                    let (f_num, block) = (channel.f_num, channel.block);
                    self.operators[slot].write_level(value, f_num, block);
                }
            }
            0x60 | 0x70 => {
                if let Some(slot) = Self::decode_slot(bank, reg) {
                    self.operators[slot].write_attack_decay(value);
                }
            }
            0x80 | 0x90 => {
                if let Some(slot) = Self::decode_slot(bank, reg) {
                    self.operators[slot].write_sustain_release(value);
                }
            }
            0xe0 | 0xf0 => {
                if let Some(slot) = Self::decode_slot(bank, reg) {
                    self.operators[slot].write_waveform(value, self.new_mode);
                }
            }
            0xa0 => {
                if let Some(ch) = Self::decode_channel(bank, reg) {
                    self.write_frequency_low(ch, value);
                }
            }
            0xb0 if bank == 0 && reg == 0xbd => self.write_rhythm(value),
            0xb0 => {
                if let Some(ch) = Self::decode_channel(bank, reg) {
                    self.write_frequency_high(ch, value);
                }
            }
            0xc0 => {
                if let Some(ch) = Self::decode_channel(bank, reg) {
                    self.channels[ch].write_feedback_connection(value, self.new_mode, self.stereo_ext);
                    self.update_algorithm(ch);
                }
            }
            0xd0 => {
                if let Some(ch) = Self::decode_channel(bank, reg) {
                    if self.stereo_ext {
                        self.channels[ch].write_pan(value, &PAN_LUT);
                    }
                }
            }
            _ => log::trace!("ignored write to {address:#05x}"),
        }
    }

    #[inline]
    fn decode_slot(bank: usize, reg: u8) -> Option<usize> {
        ADDRESS_TO_SLOT[(reg & 0x1f) as usize].map(|slot| bank * 18 + slot as usize)
    }

    #[inline]
    fn decode_channel(bank: usize, reg: u8) -> Option<usize> {
        let n = (reg & 0x0f) as usize;
        (n < 9).then_some(bank * 9 + n)
    }

    fn write_global(&mut self, bank: usize, reg: u8, value: u8) {
        match (bank, reg) {
            (1, 0x04) => self.write_four_op(value),
            (1, 0x05) => {
                let new_mode = value & 0x01 != 0;
                let stereo_ext = value & 0x02 != 0;
                if new_mode != self.new_mode || stereo_ext != self.stereo_ext {
                    log::debug!("OPL3 mode: new={new_mode}, stereo extension={stereo_ext}");
                }
                self.new_mode = new_mode;
                self.stereo_ext = stereo_ext;
            }
            (0, 0x08) => self.note_select = (value >> 6) & 0x01,
            _ => log::trace!("ignored write to global register {reg:#04x} (bank {bank})"),
        }
    }

    fn write_frequency_low(&mut self, ch: usize, value: u8) {
        if self.new_mode && self.channels[ch].kind == ChannelType::FourOpPair {
            return;
        }
        self.channels[ch].write_frequency_low(value, self.note_select);
        self.update_key_scale_levels(ch);

        if let Some(pair) = self.four_op_partner(ch) {
            let (f_num, key_scale) = (self.channels[ch].f_num, self.channels[ch].key_scale);
            self.channels[pair].f_num = f_num;
            self.channels[pair].key_scale = key_scale;
            self.update_key_scale_levels(pair);
        }
    }

    fn write_frequency_high(&mut self, ch: usize, value: u8) {
        if self.new_mode && self.channels[ch].kind == ChannelType::FourOpPair {
            return;
        }
        let key_on = self.channels[ch].write_frequency_high(value, self.note_select);
        self.update_key_scale_levels(ch);

        if let Some(pair) = self.four_op_partner(ch) {
            let source = self.channels[ch].clone();
            self.channels[pair].copy_pitch_from(&source);
            self.update_key_scale_levels(pair);
        }

        if key_on {
            self.key_on_channel(ch);
        } else {
            self.key_off_channel(ch);
        }
    }

    /// Upper channel receiving mirrored pitch when `ch` leads a 4-op voice.
    fn four_op_partner(&self, ch: usize) -> Option<usize> {
        let channel = &self.channels[ch];
        if self.new_mode && channel.kind == ChannelType::FourOp {
            channel.pair
        } else {
            None
        }
    }

    fn update_key_scale_levels(&mut self, ch: usize) {
        let channel = &self.channels[ch];
        let (f_num, block) = (channel.f_num, channel.block);
        for slot in channel.slots {
            self.operators[slot]
                .envelope
                .update_key_scale_level(f_num, block);
        }
    }

    /// Operators keyed by a channel's 0xB0 key bit.
    fn keyed_slots(&self, ch: usize) -> impl Iterator<Item = usize> {
        let channel = &self.channels[ch];
        let (own, pair) = match (self.new_mode, channel.kind, channel.pair) {
            (false, ..) => (Some(channel.slots), None),
            (true, ChannelType::FourOp, Some(pair)) => {
                (Some(channel.slots), Some(self.channels[pair].slots))
            }
            (true, ChannelType::TwoOp | ChannelType::Drum, _) => (Some(channel.slots), None),
            _ => (None, None),
        };
        own.into_iter().chain(pair).flatten()
    }

    fn key_on_channel(&mut self, ch: usize) {
        for slot in self.keyed_slots(ch) {
            self.operators[slot].key_on(KeyFlags::NORMAL);
        }
    }

    fn key_off_channel(&mut self, ch: usize) {
        for slot in self.keyed_slots(ch) {
            self.operators[slot].key_off(KeyFlags::NORMAL);
        }
    }

    // ========================================================================
    // Routing
    // ========================================================================

    fn write_four_op(&mut self, value: u8) {
        let mask = value & 0x3f;
        if mask != self.four_op_mask {
            log::debug!("4-op mask {:#04x}", mask);
        }
        self.four_op_mask = mask;

        for bit in 0..6 {
            let lower = if bit < 3 { bit } else { bit + 6 };
            let upper = lower + 3;
            if mask & (1 << bit) != 0 {
                self.channels[lower].kind = ChannelType::FourOp;
                self.channels[upper].kind = ChannelType::FourOpPair;
                self.update_algorithm(lower);
            } else {
                self.channels[lower].kind = ChannelType::TwoOp;
                self.channels[upper].kind = ChannelType::TwoOp;
                self.update_algorithm(lower);
                self.update_algorithm(upper);
            }
        }
    }

    /// Derive a channel's algorithm from its connection bits and rewire.
    fn update_algorithm(&mut self, ch: usize) {
        let channel = &self.channels[ch];
        let (kind, connection, pair) = (channel.kind, channel.connection, channel.pair);
        self.channels[ch].algorithm = Algorithm::two_op(connection);

        if self.new_mode {
            match (kind, pair) {
                (ChannelType::FourOp, Some(upper)) => {
                    let upper_connection = self.channels[upper].connection;
                    self.channels[upper].algorithm = Algorithm::four_op(connection, upper_connection);
                    self.channels[ch].algorithm = Algorithm::Merged;
                    self.setup_algorithm(upper);
                    return;
                }
                (ChannelType::FourOpPair, Some(lower)) => {
                    let lower_connection = self.channels[lower].connection;
                    self.channels[ch].algorithm = Algorithm::four_op(lower_connection, connection);
                    self.channels[lower].algorithm = Algorithm::Merged;
                }
                _ => {}
            }
        }
        self.setup_algorithm(ch);
    }

    /// Resolve the channel's topology into modulation sources and taps.
    fn setup_algorithm(&mut self, ch: usize) {
        let channel = &self.channels[ch];
        let Some(topology) = routing::topology(channel.kind, channel.algorithm, ch) else {
            return;
        };
        let own = channel.slots;
        let pair = channel.pair;
        let pair_slots = pair.map(|p| self.channels[p].slots);

        let resolve = |node: Node| match node {
            Node::Own(i) => Some(own[i]),
            Node::Pair(i) => pair_slots.map(|slots| slots[i]),
        };

        for &(target, source) in topology.modulation {
            let Some(target) = resolve(target) else {
                continue;
            };
            self.operators[target].modulation = match source {
                Source::Silent => ModSource::None,
                Source::Feedback => ModSource::Feedback,
                Source::Output(node) => resolve(node).map_or(ModSource::None, ModSource::Operator),
            };
        }

        if topology.clear_pair_taps {
            if let Some(p) = pair {
                self.channels[p].clear_taps();
            }
        }
        if let Some(taps) = topology.taps {
            let channel = &mut self.channels[ch];
            channel.clear_taps();
            for (tap, &node) in channel.taps.iter_mut().zip(taps) {
                *tap = resolve(node);
            }
        }
    }

    fn write_rhythm(&mut self, value: u8) {
        let flags = RhythmFlags::from_register(value);
        self.timers.set_depth(
            flags.contains(RhythmFlags::TREMOLO_DEPTH),
            flags.contains(RhythmFlags::VIBRATO_DEPTH),
        );

        let rhythm = flags & !(RhythmFlags::TREMOLO_DEPTH | RhythmFlags::VIBRATO_DEPTH);
        if rhythm.is_rhythm_enabled() != self.rhythm.is_rhythm_enabled() {
            log::debug!("rhythm mode {}", if rhythm.is_rhythm_enabled() { "on" } else { "off" });
        }
        self.rhythm = rhythm;

        if rhythm.is_rhythm_enabled() {
            // Bass drum carrier is tapped twice
            let bass_drum = self.channels[6].slots[1];
            self.channels[6].taps = [Some(bass_drum), Some(bass_drum), None, None];
            for ch in [7, 8] {
                let [s0, s1] = self.channels[ch].slots;
                self.channels[ch].taps = [Some(s0), Some(s0), Some(s1), Some(s1)];
            }
            for ch in 6..=8 {
                self.channels[ch].kind = ChannelType::Drum;
                self.setup_algorithm(ch);
            }
            for &(flag, ch, positions) in DRUM_KEYS.iter() {
                for &position in positions {
                    let slot = self.channels[ch].slots[position];
                    if rhythm.contains(flag) {
                        self.operators[slot].key_on(KeyFlags::DRUM);
                    } else {
                        self.operators[slot].key_off(KeyFlags::DRUM);
                    }
                }
            }
        } else {
            for ch in 6..=8 {
                self.channels[ch].kind = ChannelType::TwoOp;
                self.setup_algorithm(ch);
                for slot in self.channels[ch].slots {
                    self.operators[slot].key_off(KeyFlags::DRUM);
                }
            }
        }
    }

    // ========================================================================
    // Sample generation
    // ========================================================================

    fn process_operator(&mut self, index: usize, clock: OperatorClock) {
        let channel = &self.channels[self.operators[index].channel];
        let (f_num, block, key_scale, feedback) =
            (channel.f_num, channel.block, channel.key_scale, channel.feedback);

        let op = &mut self.operators[index];
        op.update_feedback(feedback);
        let phase = op.clock(f_num, block, key_scale, clock);

        let rhythm = self.rhythm.is_rhythm_enabled();
        self.rhythm_latch.capture(index, phase, rhythm);
        if rhythm {
            if let Some(phase) = self.rhythm_latch.phase_for(index, self.noise.bit() != 0) {
                self.operators[index].phase.override_output(phase);
            }
        }
        self.noise.clock();

        let modulation = match self.operators[index].modulation {
            ModSource::None => 0,
            ModSource::Feedback => self.operators[index].feedback(),
            ModSource::Operator(source) => self.operators[source].out(),
        };
        self.operators[index].generate(modulation);
    }

    /// Advance one native sample and return outputs A, B, C, D.
    ///
    /// B and D lag A and C by one sample, as on the chip's DAC interface.
    pub fn generate_4ch(&mut self) -> [i16; 4] {
        let clock = OperatorClock {
            envelope: self.timers.envelope_clock(),
            tremolo: self.timers.tremolo(),
            vibrato: self.timers.vibrato(),
        };
        for index in 0..NUM_OPERATORS {
            self.process_operator(index, clock);
        }

        let sums: [i32; NUM_CHANNELS] = std::array::from_fn(|ch| {
            self.channels[ch]
                .taps
                .iter()
                .flatten()
                .map(|&slot| self.operators[slot].out() as i32)
                .sum()
        });
        let frame = self.mixer.mix(&sums, &self.channels, self.stereo_ext);

        self.timers.tick();

        while let Some(write) = self.write_buffer.pop_due() {
            self.write_register(write.address, write.value);
        }
        self.write_buffer.advance();

        frame
    }

    /// Advance one native sample and return the stereo pair (A, B).
    pub fn generate(&mut self) -> [i16; 2] {
        let [a, b, _, _] = self.generate_4ch();
        [a, b]
    }

    /// One 4-channel frame at the configured output rate.
    pub fn generate_4ch_resampled(&mut self) -> [i16; 4] {
        while self.resampler.needs_frame() {
            let frame = self.generate_4ch();
            self.resampler.push(frame);
        }
        self.resampler.next_frame()
    }

    /// One stereo frame at the configured output rate.
    pub fn generate_resampled(&mut self) -> [i16; 2] {
        let [a, b, _, _] = self.generate_4ch_resampled();
        [a, b]
    }

    /// Fill `buffer` with `frames` interleaved stereo frames at the output rate.
    ///
    /// # Returns
    ///
    /// Number of samples written (`2 * frames`).
    ///
    /// # Errors
    ///
    /// [`Ymf262Error::BufferTooSmall`] when `buffer` holds fewer than
    /// `2 * frames` samples. Nothing is generated in that case.
    pub fn generate_stream(&mut self, buffer: &mut [i16], frames: usize) -> Result<usize> {
        let required = Self::check_buffer(buffer.len(), frames, STEREO)?;
        for frame in buffer[..required].chunks_exact_mut(STEREO) {
            frame.copy_from_slice(&self.generate_resampled());
        }
        Ok(required)
    }

    /// Fill `buffer` with `frames` interleaved 4-channel frames at the output rate.
    pub fn generate_4ch_stream(&mut self, buffer: &mut [i16], frames: usize) -> Result<usize> {
        let required = Self::check_buffer(buffer.len(), frames, QUAD)?;
        for frame in buffer[..required].chunks_exact_mut(QUAD) {
            frame.copy_from_slice(&self.generate_4ch_resampled());
        }
        Ok(required)
    }

    fn check_buffer(provided: usize, frames: usize, channels: usize) -> Result<usize> {
        let required = frames.saturating_mul(channels);
        if provided < required {
            return Err(Ymf262Error::BufferTooSmall { required, provided });
        }
        Ok(required)
    }
}

impl Default for Opl3 {
    /// Chip running at the native rate.
    fn default() -> Self {
        let mut chip = Self::power_on(Opl3Config::native(), Resampler::default());
        chip.reset_state();
        chip
    }
}

impl std::fmt::Debug for Opl3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Opl3")
            .field("sample_rate", &self.config.sample_rate)
            .field("new_mode", &self.new_mode)
            .field("stereo_ext", &self.stereo_ext)
            .field("rhythm", &self.rhythm)
            .field("four_op_mask", &self.four_op_mask)
            .field("pending_writes", &self.write_buffer.len())
            .finish_non_exhaustive()
    }
}

impl Opl3Backend for Opl3 {
    fn reset(&mut self, sample_rate: u32) -> Result<()> {
        Opl3::reset(self, sample_rate)
    }

    fn write_register(&mut self, address: u16, value: u8) {
        Opl3::write_register(self, address, value);
    }

    fn write_register_buffered(&mut self, address: u16, value: u8) {
        Opl3::write_register_buffered(self, address, value);
    }

    fn clock(&mut self) {
        self.last_frame = self.generate_resampled();
    }

    fn frame(&self) -> [f32; 2] {
        self.last_frame.map(normalize_sample)
    }

    fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }
}
