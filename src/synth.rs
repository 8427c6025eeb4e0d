//! Waveform synthesizer
//!
//! Turns a symbol sequence into the four aligned series the plotting client
//! draws: time axis, digital input, analog carrier and modulated output.
//! Pure and deterministic; nothing is kept between calls.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bits::SymbolSequence;
use crate::config::SynthConfig;
use crate::error::{Result, SynthError, ensure_positive};
use crate::modulation::{SampleContext, Scheme, keying};

/// The four series, always the same length and sample-aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModulationResult {
    pub time: Vec<f64>,
    pub digital: Vec<f64>,
    pub carrier: Vec<f64>,
    pub modulated: Vec<f64>,
}

impl ModulationResult {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            time: Vec::with_capacity(capacity),
            digital: Vec::with_capacity(capacity),
            carrier: Vec::with_capacity(capacity),
            modulated: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Named series in wire order
    pub fn series(&self) -> [(&'static str, &[f64]); 4] {
        [
            ("time", self.time.as_slice()),
            ("digital", self.digital.as_slice()),
            ("carrier", self.carrier.as_slice()),
            ("modulated", self.modulated.as_slice()),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    config: SynthConfig,
}

impl Synthesizer {
    pub fn new(config: SynthConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Output sample rate for a carrier frequency (samples per second)
    pub fn sample_rate(&self, frequency: f64) -> f64 {
        self.config.samples_per_bit as f64 * frequency
    }

    /// Generate the waveforms for `symbols`.
    ///
    /// One bit lasts one carrier period (`1 / frequency`) and is sampled
    /// `samples_per_bit` times. Parameters are checked before anything is
    /// allocated.
    pub fn synthesize(
        &self,
        symbols: &SymbolSequence,
        frequency: f64,
        amplitude: f64,
        scheme: Scheme,
    ) -> Result<ModulationResult> {
        let frequency = ensure_positive("frequency", frequency)?;
        let amplitude = ensure_positive("amplitude", amplitude)?;

        let samples_per_bit = self.config.samples_per_bit;
        let bit_duration = 1.0 / frequency;
        let total_duration = symbols.len() as f64 * bit_duration;
        if !total_duration.is_finite() {
            return Err(SynthError::invalid_parameter(
                "frequency",
                format!("{frequency} Hz is too low to span {} bits", symbols.len()),
            ));
        }
        let dt = bit_duration / samples_per_bit as f64;
        let total_samples = sample_count(symbols.len(), samples_per_bit)?;

        debug!(
            "Synthesizing {}: {} bits, {} samples, bit duration {:.6}s",
            scheme,
            symbols.len(),
            total_samples,
            bit_duration
        );

        let mut result = ModulationResult::with_capacity(total_samples);
        for (bit_index, bit) in symbols.iter().enumerate() {
            let level = bit.level() * amplitude;
            for index in 0..samples_per_bit {
                let k = bit_index * samples_per_bit + index;
                let t = k as f64 * dt;
                let ctx = SampleContext {
                    bit,
                    t,
                    t_local: index as f64 * dt,
                    index,
                    frequency,
                    amplitude,
                };

                result.time.push(t);
                // zero-order hold
                result.digital.push(level);
                result
                    .carrier
                    .push(keying::carrier(frequency, amplitude, t));
                result
                    .modulated
                    .push(scheme.sample(&ctx, &self.config));
            }
        }

        Ok(result)
    }
}

/// `bits * samples_per_bit`, rejected instead of wrapping.
fn sample_count(bits: usize, samples_per_bit: usize) -> Result<usize> {
    bits.checked_mul(samples_per_bit).ok_or_else(|| {
        SynthError::invalid_parameter(
            "samples_per_bit",
            format!("{bits} bits x {samples_per_bit} samples overflows"),
        )
    })
}

/// Synthesize with the default configuration.
pub fn synthesize(
    symbols: &SymbolSequence,
    frequency: f64,
    amplitude: f64,
    scheme: Scheme,
) -> Result<ModulationResult> {
    Synthesizer::default().synthesize(symbols, frequency, amplitude, scheme)
}
