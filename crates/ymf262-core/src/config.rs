//! Emulator configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::resampler::Resampler;
use crate::tables::NATIVE_SAMPLE_RATE;
use crate::{Result, Ymf262Error};

/// Default output sample rate (44.1 kHz)
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Highest accepted output rate.
pub const MAX_SAMPLE_RATE: u32 = 1_000_000;

/// Output configuration for an [`Opl3`](crate::Opl3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Opl3Config {
    /// Output sample rate in Hz for the resampled paths.
    pub sample_rate: u32,
}

impl Opl3Config {
    /// Configuration for a given output rate.
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// Output at the chip's native rate; resampling becomes a passthrough.
    pub fn native() -> Self {
        Self::new(NATIVE_SAMPLE_RATE)
    }

    /// Check that the rate is usable.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate > MAX_SAMPLE_RATE {
            return Err(Ymf262Error::ConfigError(format!(
                "sample rate {} Hz exceeds {} Hz",
                self.sample_rate, MAX_SAMPLE_RATE
            )));
        }
        Resampler::ratio_for(self.sample_rate).map(|_| ())
    }

    /// Fixed-point resampling ratio (10 fractional bits).
    pub fn rate_ratio(&self) -> Result<i64> {
        self.validate()?;
        Resampler::ratio_for(self.sample_rate)
    }
}

impl Default for Opl3Config {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Opl3Config::default();
        assert_eq!(cfg.sample_rate, 44_100);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.rate_ratio(), Ok(908));
    }

    #[test]
    fn test_native_ratio_is_unity() {
        assert_eq!(Opl3Config::native().rate_ratio(), Ok(1 << 10));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(Opl3Config::new(0).validate().is_err());
        assert!(matches!(
            Opl3Config::new(5_000_000).validate(),
            Err(Ymf262Error::ConfigError(_))
        ));
    }
}
