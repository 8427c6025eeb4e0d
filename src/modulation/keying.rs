//! Carrier keying: ASK, FSK, PSK

use std::f64::consts::PI;

use super::SampleContext;
use crate::bits::Bit;
use crate::config::SynthConfig;

/// `A * sin(2πft)` at absolute time `t`
pub fn carrier(frequency: f64, amplitude: f64, t: f64) -> f64 {
    amplitude * cycles(frequency, t).sin()
}

/// `2π * (f * t)`. `f * t` counts periods and stays small even when `f`
/// alone is near `f64::MAX`.
fn cycles(frequency: f64, t: f64) -> f64 {
    2.0 * PI * (frequency * t)
}

/// On-off keying of the carrier: a '0' bit suppresses it completely.
pub fn ask(ctx: &SampleContext) -> f64 {
    match ctx.bit {
        Bit::One => carrier(ctx.frequency, ctx.amplitude, ctx.t),
        Bit::Zero => 0.0,
    }
}

/// Binary FSK. Mark tone is the carrier, space tone is
/// `frequency * fsk_space_ratio`. Phase restarts at every bit boundary.
pub fn fsk(ctx: &SampleContext, config: &SynthConfig) -> f64 {
    let tone = match ctx.bit {
        Bit::One => ctx.frequency,
        Bit::Zero => ctx.frequency * config.fsk_space_ratio,
    };
    carrier(tone, ctx.amplitude, ctx.t_local)
}

/// BPSK: phase 0 for '1', π for '0'.
pub fn psk(ctx: &SampleContext) -> f64 {
    let phase_offset = match ctx.bit {
        Bit::One => 0.0,
        Bit::Zero => PI,
    };
    ctx.amplitude * (cycles(ctx.frequency, ctx.t) + phase_offset).sin()
}
