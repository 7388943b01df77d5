//! Constant lookup data.
//!
//! Log-sine and exponent ROM contents, frequency multipliers, key-scale
//! levels, operator address decoding and the stereo-extension pan curve.
//! Everything here is immutable and shared by every chip instance.

use std::sync::LazyLock;

/// Native generation rate of the chip (master clock 14.31818 MHz / 288).
pub const NATIVE_SAMPLE_RATE: u32 = 49_716;

/// Fractional bits of the resampler's fixed-point accumulator.
pub const RESAMPLE_FRAC_BITS: u32 = 10;

/// Samples of latency between consecutive buffered register writes.
pub const WRITE_BUFFER_DELAY: u64 = 2;

/// Maximum number of pending buffered writes.
pub const WRITE_BUFFER_CAPACITY: usize = 1024;

/// Number of operators (slots).
pub const NUM_OPERATORS: usize = 36;

/// Number of channels.
pub const NUM_CHANNELS: usize = 18;

/// Quarter-wave log-sine ROM.
#[rustfmt::skip]
pub const LOG_SIN_ROM: [u16; 256] = [
    0x859, 0x6c3, 0x607, 0x58b, 0x52e, 0x4e4, 0x4a6, 0x471,
    0x443, 0x41a, 0x3f5, 0x3d3, 0x3b5, 0x398, 0x37e, 0x365,
    0x34e, 0x339, 0x324, 0x311, 0x2ff, 0x2ed, 0x2dc, 0x2cd,
    0x2bd, 0x2af, 0x2a0, 0x293, 0x286, 0x279, 0x26d, 0x261,
    0x256, 0x24b, 0x240, 0x236, 0x22c, 0x222, 0x218, 0x20f,
    0x206, 0x1fd, 0x1f5, 0x1ec, 0x1e4, 0x1dc, 0x1d4, 0x1cd,
    0x1c5, 0x1be, 0x1b7, 0x1b0, 0x1a9, 0x1a2, 0x19b, 0x195,
    0x18f, 0x188, 0x182, 0x17c, 0x177, 0x171, 0x16b, 0x166,
    0x160, 0x15b, 0x155, 0x150, 0x14b, 0x146, 0x141, 0x13c,
    0x137, 0x133, 0x12e, 0x129, 0x125, 0x121, 0x11c, 0x118,
    0x114, 0x10f, 0x10b, 0x107, 0x103, 0x0ff, 0x0fb, 0x0f8,
    0x0f4, 0x0f0, 0x0ec, 0x0e9, 0x0e5, 0x0e2, 0x0de, 0x0db,
    0x0d7, 0x0d4, 0x0d1, 0x0cd, 0x0ca, 0x0c7, 0x0c4, 0x0c1,
    0x0be, 0x0bb, 0x0b8, 0x0b5, 0x0b2, 0x0af, 0x0ac, 0x0a9,
    0x0a7, 0x0a4, 0x0a1, 0x09f, 0x09c, 0x099, 0x097, 0x094,
    0x092, 0x08f, 0x08d, 0x08a, 0x088, 0x086, 0x083, 0x081,
    0x07f, 0x07d, 0x07a, 0x078, 0x076, 0x074, 0x072, 0x070,
    0x06e, 0x06c, 0x06a, 0x068, 0x066, 0x064, 0x062, 0x060,
    0x05e, 0x05c, 0x05b, 0x059, 0x057, 0x055, 0x053, 0x052,
    0x050, 0x04e, 0x04d, 0x04b, 0x04a, 0x048, 0x046, 0x045,
    0x043, 0x042, 0x040, 0x03f, 0x03e, 0x03c, 0x03b, 0x039,
    0x038, 0x037, 0x035, 0x034, 0x033, 0x031, 0x030, 0x02f,
    0x02e, 0x02d, 0x02b, 0x02a, 0x029, 0x028, 0x027, 0x026,
    0x025, 0x024, 0x023, 0x022, 0x021, 0x020, 0x01f, 0x01e,
    0x01d, 0x01c, 0x01b, 0x01a, 0x019, 0x018, 0x017, 0x017,
    0x016, 0x015, 0x014, 0x014, 0x013, 0x012, 0x011, 0x011,
    0x010, 0x00f, 0x00f, 0x00e, 0x00d, 0x00d, 0x00c, 0x00c,
    0x00b, 0x00a, 0x00a, 0x009, 0x009, 0x008, 0x008, 0x007,
    0x007, 0x007, 0x006, 0x006, 0x005, 0x005, 0x005, 0x004,
    0x004, 0x004, 0x003, 0x003, 0x003, 0x002, 0x002, 0x002,
    0x002, 0x001, 0x001, 0x001, 0x001, 0x001, 0x001, 0x001,
    0x000, 0x000, 0x000, 0x000, 0x000, 0x000, 0x000, 0x000,
];

/// Exponent ROM, inverse of [`LOG_SIN_ROM`] in the attenuation domain.
#[rustfmt::skip]
pub const EXP_ROM: [u16; 256] = [
    0x7fa, 0x7f5, 0x7ef, 0x7ea, 0x7e4, 0x7df, 0x7da, 0x7d4,
    0x7cf, 0x7c9, 0x7c4, 0x7bf, 0x7b9, 0x7b4, 0x7ae, 0x7a9,
    0x7a4, 0x79f, 0x799, 0x794, 0x78f, 0x78a, 0x784, 0x77f,
    0x77a, 0x775, 0x770, 0x76a, 0x765, 0x760, 0x75b, 0x756,
    0x751, 0x74c, 0x747, 0x742, 0x73d, 0x738, 0x733, 0x72e,
    0x729, 0x724, 0x71f, 0x71a, 0x715, 0x710, 0x70b, 0x706,
    0x702, 0x6fd, 0x6f8, 0x6f3, 0x6ee, 0x6e9, 0x6e5, 0x6e0,
    0x6db, 0x6d6, 0x6d2, 0x6cd, 0x6c8, 0x6c4, 0x6bf, 0x6ba,
    0x6b5, 0x6b1, 0x6ac, 0x6a8, 0x6a3, 0x69e, 0x69a, 0x695,
    0x691, 0x68c, 0x688, 0x683, 0x67f, 0x67a, 0x676, 0x671,
    0x66d, 0x668, 0x664, 0x65f, 0x65b, 0x657, 0x652, 0x64e,
    0x649, 0x645, 0x641, 0x63c, 0x638, 0x634, 0x630, 0x62b,
    0x627, 0x623, 0x61e, 0x61a, 0x616, 0x612, 0x60e, 0x609,
    0x605, 0x601, 0x5fd, 0x5f9, 0x5f5, 0x5f0, 0x5ec, 0x5e8,
    0x5e4, 0x5e0, 0x5dc, 0x5d8, 0x5d4, 0x5d0, 0x5cc, 0x5c8,
    0x5c4, 0x5c0, 0x5bc, 0x5b8, 0x5b4, 0x5b0, 0x5ac, 0x5a8,
    0x5a4, 0x5a0, 0x59c, 0x599, 0x595, 0x591, 0x58d, 0x589,
    0x585, 0x581, 0x57e, 0x57a, 0x576, 0x572, 0x56f, 0x56b,
    0x567, 0x563, 0x560, 0x55c, 0x558, 0x554, 0x551, 0x54d,
    0x549, 0x546, 0x542, 0x53e, 0x53b, 0x537, 0x534, 0x530,
    0x52c, 0x529, 0x525, 0x522, 0x51e, 0x51b, 0x517, 0x514,
    0x510, 0x50c, 0x509, 0x506, 0x502, 0x4ff, 0x4fb, 0x4f8,
    0x4f4, 0x4f1, 0x4ed, 0x4ea, 0x4e7, 0x4e3, 0x4e0, 0x4dc,
    0x4d9, 0x4d6, 0x4d2, 0x4cf, 0x4cc, 0x4c8, 0x4c5, 0x4c2,
    0x4be, 0x4bb, 0x4b8, 0x4b5, 0x4b1, 0x4ae, 0x4ab, 0x4a8,
    0x4a4, 0x4a1, 0x49e, 0x49b, 0x498, 0x494, 0x491, 0x48e,
    0x48b, 0x488, 0x485, 0x482, 0x47e, 0x47b, 0x478, 0x475,
    0x472, 0x46f, 0x46c, 0x469, 0x466, 0x463, 0x460, 0x45d,
    0x45a, 0x457, 0x454, 0x451, 0x44e, 0x44b, 0x448, 0x445,
    0x442, 0x43f, 0x43c, 0x439, 0x436, 0x433, 0x430, 0x42d,
    0x42a, 0x428, 0x425, 0x422, 0x41f, 0x41c, 0x419, 0x416,
    0x414, 0x411, 0x40e, 0x40b, 0x408, 0x406, 0x403, 0x400,
];

/// Frequency multipliers, doubled so that MULT=0 (x0.5) stays integral.
#[rustfmt::skip]
pub const MULTIPLIER_TABLE: [u32; 16] = [
    1, 2, 4, 6, 8, 10, 12, 14, 16, 18, 20, 20, 24, 24, 30, 30,
];

/// Key-scale level attenuation by the top four bits of the frequency number.
#[rustfmt::skip]
pub const KSL_ROM: [u8; 16] = [
    0, 32, 40, 45, 48, 51, 53, 55, 56, 58, 59, 60, 61, 62, 63, 64,
];

/// Right shift applied to the key-scale level for each KSL register value.
pub const KSL_SHIFT: [u8; 4] = [8, 1, 2, 0];

/// Envelope increment pattern for coarse rates, indexed by
/// `[rate_lo][eg_timer_lo]`.
#[rustfmt::skip]
pub const EG_INCREMENT_STEP: [[u8; 4]; 4] = [
    [0, 0, 0, 0],
    [1, 0, 0, 0],
    [1, 0, 1, 0],
    [1, 1, 1, 0],
];

/// Maps the low five bits of an operator register address to a slot
/// within the bank.
#[rustfmt::skip]
pub const ADDRESS_TO_SLOT: [Option<u8>; 32] = [
    Some(0),  Some(1),  Some(2),  Some(3),  Some(4),  Some(5),  None, None,
    Some(6),  Some(7),  Some(8),  Some(9),  Some(10), Some(11), None, None,
    Some(12), Some(13), Some(14), Some(15), Some(16), Some(17), None, None,
    None,     None,     None,     None,     None,     None,     None, None,
];

/// First operator of each channel. The second is always three slots later.
#[rustfmt::skip]
pub const CHANNEL_FIRST_SLOT: [usize; NUM_CHANNELS] = [
    0, 1, 2, 6, 7, 8, 12, 13, 14, 18, 19, 20, 24, 25, 26, 30, 31, 32,
];

/// Stereo-extension pan weights, `sin(i * PI / 512) * 65536` for `i` in `0..256`.
pub static PAN_LUT: LazyLock<[i32; 256]> = LazyLock::new(|| {
    std::array::from_fn(|i| ((i as f64 * std::f64::consts::PI / 512.0).sin() * 65536.0) as i32)
});

/// Attenuation to linear amplitude through the exponent ROM.
///
/// Levels above 0x1fff saturate to silence.
#[inline]
pub fn attenuation_to_amplitude(level: u32) -> i16 {
    let level = level.min(0x1fff);
    (((EXP_ROM[(level & 0xff) as usize] as u32) << 1) >> (level >> 8)) as i16
}

/// Channel owning operator `slot`.
#[inline]
pub fn slot_channel(slot: usize) -> usize {
    let bank = slot / 18;
    let local = slot % 18;
    let column = local % 6;
    let channel = (local / 6) * 3 + column % 3;
    bank * 9 + channel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exp_rom_bounds() {
        assert_eq!(attenuation_to_amplitude(0), 0x7fa << 1);
        assert_eq!(attenuation_to_amplitude(0x1fff), 0);
        assert_eq!(attenuation_to_amplitude(0xffff), 0, "levels saturate");
    }

    #[test]
    fn test_log_sin_rom_monotonic() {
        for pair in LOG_SIN_ROM.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn test_slot_channel_matches_channel_table() {
        for (channel, &first) in CHANNEL_FIRST_SLOT.iter().enumerate() {
            assert_eq!(slot_channel(first), channel);
            assert_eq!(slot_channel(first + 3), channel);
        }
    }

    #[test]
    fn test_pan_lut_endpoints() {
        assert_eq!(PAN_LUT[0], 0);
        assert_eq!(PAN_LUT[128], 46340, "sin(pi/4) * 65536");
        assert!(PAN_LUT[255] < 65536);
    }

    #[test]
    fn test_address_decoding_gaps() {
        let mapped = ADDRESS_TO_SLOT.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(mapped, 18);
        assert_eq!(ADDRESS_TO_SLOT[0x06], None);
        assert_eq!(ADDRESS_TO_SLOT[0x15], Some(17));
    }
}
