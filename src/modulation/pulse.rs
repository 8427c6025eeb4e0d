//! Baseband pulse modulation: PAM, PWM, PPM
//!
//! None of these touch the carrier. Pulse edges are placed on sample
//! indices within the bit, so every bit period has the same shape.

use std::ops::Range;

use super::SampleContext;
use crate::bits::Bit;
use crate::config::SynthConfig;

/// Pulse height equals the bit level times amplitude.
pub fn pam(ctx: &SampleContext) -> f64 {
    ctx.bit.level() * ctx.amplitude
}

/// High for the first `duty(bit)` fraction of the bit period.
pub fn pwm(ctx: &SampleContext, config: &SynthConfig) -> f64 {
    if ctx.index < pwm_high_samples(ctx.bit, config) {
        ctx.amplitude
    } else {
        0.0
    }
}

/// One narrow pulse per bit, its start offset set by the bit.
pub fn ppm(ctx: &SampleContext, config: &SynthConfig) -> f64 {
    if ppm_pulse_window(ctx.bit, config).contains(&ctx.index) {
        ctx.amplitude
    } else {
        0.0
    }
}

/// Number of high samples at the start of a PWM bit
pub fn pwm_high_samples(bit: Bit, config: &SynthConfig) -> usize {
    let duty = match bit {
        Bit::One => config.pwm_duty_one,
        Bit::Zero => config.pwm_duty_zero,
    };
    ((duty * config.samples_per_bit as f64).floor() as usize)
        .min(config.samples_per_bit)
}

/// Sample indices (within a bit) covered by the PPM pulse.
///
/// The pulse is at least one sample wide and never spills into the next bit.
pub fn ppm_pulse_window(bit: Bit, config: &SynthConfig) -> Range<usize> {
    let s = config.samples_per_bit as f64;
    let offset = match bit {
        Bit::One => config.ppm_offset_one,
        Bit::Zero => config.ppm_offset_zero,
    };
    let start = ((offset * s).round() as usize).min(config.samples_per_bit - 1);
    let width = ((config.ppm_pulse_width * s).round() as usize).max(1);
    start..(start + width).min(config.samples_per_bit)
}
