//! Synthesis configuration

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthError};
use crate::utils::consts::*;

/// Scheme constants shared by every request.
///
/// Missing fields in a config file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthConfig {
    pub samples_per_bit: usize,
    pub fsk_space_ratio: f64,
    pub pwm_duty_one: f64,
    pub pwm_duty_zero: f64,
    pub ppm_offset_one: f64,
    pub ppm_offset_zero: f64,
    pub ppm_pulse_width: f64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            samples_per_bit: SAMPLES_PER_BIT,
            fsk_space_ratio: FSK_SPACE_RATIO,
            pwm_duty_one: PWM_DUTY_ONE,
            pwm_duty_zero: PWM_DUTY_ZERO,
            ppm_offset_one: PPM_OFFSET_ONE,
            ppm_offset_zero: PPM_OFFSET_ZERO,
            ppm_pulse_width: PPM_PULSE_WIDTH,
        }
    }
}

impl SynthConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SAMPLES_PER_BIT).contains(&self.samples_per_bit) {
            return Err(SynthError::invalid_parameter(
                "samples_per_bit",
                format!(
                    "must be between 1 and {MAX_SAMPLES_PER_BIT}, got {}",
                    self.samples_per_bit
                ),
            ));
        }
        if !(self.fsk_space_ratio.is_finite() && self.fsk_space_ratio > 0.0) {
            return Err(SynthError::invalid_parameter(
                "fsk_space_ratio",
                format!("must be greater than 0, got {}", self.fsk_space_ratio),
            ));
        }
        for (name, duty) in [
            ("pwm_duty_one", self.pwm_duty_one),
            ("pwm_duty_zero", self.pwm_duty_zero),
        ] {
            if !(duty > 0.0 && duty <= 1.0) {
                return Err(SynthError::invalid_parameter(
                    name,
                    format!("must be in (0, 1], got {duty}"),
                ));
            }
        }
        if !(self.ppm_pulse_width > 0.0 && self.ppm_pulse_width <= 1.0) {
            return Err(SynthError::invalid_parameter(
                "ppm_pulse_width",
                format!("must be in (0, 1], got {}", self.ppm_pulse_width),
            ));
        }
        for (name, offset) in [
            ("ppm_offset_one", self.ppm_offset_one),
            ("ppm_offset_zero", self.ppm_offset_zero),
        ] {
            // pulse has to end inside the bit period
            if !(offset >= 0.0 && offset + self.ppm_pulse_width <= 1.0) {
                return Err(SynthError::invalid_parameter(
                    name,
                    format!(
                        "pulse [{offset}, {}) must fit in the bit period",
                        offset + self.ppm_pulse_width
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Load from a JSON file and validate.
    pub fn from_json_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        config
            .validate()
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        Ok(config)
    }
}
