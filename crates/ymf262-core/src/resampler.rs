//! Native-rate to output-rate conversion.
//!
//! Linear interpolation between the two most recent native frames using a
//! fixed-point position with [`RESAMPLE_FRAC_BITS`] fractional bits.
//!
//! The position counts how far the next output lies behind the newest native
//! frame, measured in units where one native frame spans `ratio` and one
//! output frame spans `1 << RESAMPLE_FRAC_BITS`.

use crate::tables::{NATIVE_SAMPLE_RATE, RESAMPLE_FRAC_BITS};
use crate::{Result, Ymf262Error};

const ONE: i64 = 1 << RESAMPLE_FRAC_BITS;

/// Linear resampler over 4-channel frames.
#[derive(Clone, Debug)]
pub struct Resampler {
    sample_rate: u32,
    ratio: i64,
    counter: i64,
    previous: [i16; 4],
    current: [i16; 4],
}

impl Resampler {
    /// Create a resampler producing `sample_rate` Hz.
    ///
    /// Fails when the rate is too low to yield a non-zero step ratio.
    pub fn new(sample_rate: u32) -> Result<Self> {
        let ratio = Self::ratio_for(sample_rate)?;
        Ok(Self {
            sample_rate,
            ratio,
            counter: -ONE,
            previous: [0; 4],
            current: [0; 4],
        })
    }

    /// Fixed-point step ratio for an output rate.
    pub fn ratio_for(sample_rate: u32) -> Result<i64> {
        let ratio = ((sample_rate as i64) << RESAMPLE_FRAC_BITS) / NATIVE_SAMPLE_RATE as i64;
        if ratio == 0 {
            return Err(Ymf262Error::InvalidSampleRate(sample_rate));
        }
        Ok(ratio)
    }

    /// Output rate in Hz.
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Fixed-point step ratio.
    #[inline]
    pub fn ratio(&self) -> i64 {
        self.ratio
    }

    /// Whether another native frame is needed before the next output.
    #[inline]
    pub fn needs_frame(&self) -> bool {
        self.counter < 0
    }

    /// Feed the next native frame.
    pub fn push(&mut self, frame: [i16; 4]) {
        self.previous = self.current;
        self.current = frame;
        self.counter += self.ratio;
    }

    /// Interpolate the output frame and advance one output step.
    ///
    /// The distance behind the newest frame weights the previous frame, so a
    /// ratio of one passes native frames through unchanged.
    pub fn next_frame(&mut self) -> [i16; 4] {
        let weight_previous = self.counter;
        let weight_current = self.ratio - self.counter;
        let frame = std::array::from_fn(|i| {
            ((self.previous[i] as i64 * weight_previous + self.current[i] as i64 * weight_current)
                / self.ratio) as i16
        });
        self.counter -= ONE;
        frame
    }

    /// Rewind to the initial position with cleared history.
    pub fn reset(&mut self) {
        self.counter = -ONE;
        self.previous = [0; 4];
        self.current = [0; 4];
    }
}

impl Default for Resampler {
    fn default() -> Self {
        Self {
            sample_rate: NATIVE_SAMPLE_RATE,
            ratio: ONE,
            counter: -ONE,
            previous: [0; 4],
            current: [0; 4],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(resampler: &mut Resampler, source: &mut impl Iterator<Item = i16>) -> i16 {
        while resampler.needs_frame() {
            let s = source.next().unwrap_or(0);
            resampler.push([s; 4]);
        }
        resampler.next_frame()[0]
    }

    #[test]
    fn test_native_rate_is_passthrough() {
        let mut resampler = Resampler::new(NATIVE_SAMPLE_RATE).unwrap();
        assert_eq!(resampler.ratio(), ONE);
        let input: Vec<i16> = (0..50).map(|i| (i * 37 - 900) as i16).collect();
        let mut source = input.clone().into_iter();
        let output: Vec<i16> = (0..50).map(|_| drive(&mut resampler, &mut source)).collect();
        assert_eq!(output, input);
    }

    #[test]
    fn test_rejects_tiny_rates() {
        assert!(matches!(
            Resampler::new(10),
            Err(Ymf262Error::InvalidSampleRate(10))
        ));
        assert!(Resampler::new(48).is_err());
        assert!(Resampler::new(49).is_ok());
    }

    #[test]
    fn test_downsampling_consumes_more_native_frames() {
        let mut resampler = Resampler::new(22_050).unwrap();
        let mut consumed = 0usize;
        for _ in 0..1000 {
            while resampler.needs_frame() {
                resampler.push([0; 4]);
                consumed += 1;
            }
            resampler.next_frame();
        }
        // 49716 / 22050 ~= 2.25 native frames per output frame
        assert!((2240..=2270).contains(&consumed), "consumed {consumed}");
    }

    #[test]
    fn test_ramp_advances_uniformly_when_downsampling() {
        let mut resampler = Resampler::new(44_100).unwrap();
        let mut source = (0..).map(|i: i32| (i * 100) as i16);
        let output: Vec<i16> = (0..200).map(|_| drive(&mut resampler, &mut source)).collect();

        // 49716 / 44100 native frames per output frame, 100 per native frame
        for step in output.windows(2).skip(1).map(|w| w[1] - w[0]) {
            assert!((111..=115).contains(&step), "step {step}");
        }
    }

    #[test]
    fn test_ramp_advances_uniformly_when_upsampling() {
        let mut resampler = Resampler::new(96_000).unwrap();
        let mut source = (0..).map(|i: i32| (i * 100) as i16);
        let output: Vec<i16> = (0..300).map(|_| drive(&mut resampler, &mut source)).collect();

        for step in output.windows(2).skip(1).map(|w| w[1] - w[0]) {
            assert!((50..=54).contains(&step), "step {step}");
        }
    }
}
