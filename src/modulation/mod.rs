//! Modulation schemes
//!
//! Each scheme is a pure per-sample rule. Carrier keying (ASK, FSK, PSK)
//! lives in [`keying`], pulse modulation (PAM, PWM, PPM) in [`pulse`].
//!
//! ```text
//!            ┌──────────── Scheme ────────────┐
//!            ▼                                ▼
//!   keying: ASK FSK PSK            pulse: PAM PWM PPM
//!   (sinusoidal carrier)           (baseband pulse train)
//! ```

pub mod keying;
pub mod pulse;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::bits::Bit;
use crate::config::SynthConfig;
use crate::error::SynthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Ask,
    Fsk,
    Psk,
    Pam,
    Pwm,
    Ppm,
}

/// Whether a scheme rides on the sinusoidal carrier or is a baseband pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Carrier,
    Pulse,
}

/// Description of a scheme for listings and the `/schemes` endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SchemeInfo {
    pub name: &'static str,
    pub full_name: &'static str,
    pub family: Family,
    /// What the bit value changes in the output
    pub keyed_property: &'static str,
}

/// Everything a per-sample rule needs to know about one output sample
#[derive(Debug, Clone, Copy)]
pub struct SampleContext {
    pub bit: Bit,
    /// Absolute time of the sample (s)
    pub t: f64,
    /// Time since the start of the active bit (s)
    pub t_local: f64,
    /// Sample index within the bit, 0..samples_per_bit
    pub index: usize,
    pub frequency: f64,
    pub amplitude: f64,
}

impl Scheme {
    pub const ALL: [Scheme; 6] = [
        Scheme::Ask,
        Scheme::Fsk,
        Scheme::Psk,
        Scheme::Pam,
        Scheme::Pwm,
        Scheme::Ppm,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scheme::Ask => "ASK",
            Scheme::Fsk => "FSK",
            Scheme::Psk => "PSK",
            Scheme::Pam => "PAM",
            Scheme::Pwm => "PWM",
            Scheme::Ppm => "PPM",
        }
    }

    pub fn info(self) -> SchemeInfo {
        let (full_name, family, keyed_property) = match self {
            Scheme::Ask => (
                "Amplitude Shift Keying",
                Family::Carrier,
                "carrier on/off",
            ),
            Scheme::Fsk => (
                "Frequency Shift Keying",
                Family::Carrier,
                "tone frequency",
            ),
            Scheme::Psk => ("Phase Shift Keying", Family::Carrier, "carrier phase"),
            Scheme::Pam => (
                "Pulse Amplitude Modulation",
                Family::Pulse,
                "pulse height",
            ),
            Scheme::Pwm => ("Pulse Width Modulation", Family::Pulse, "pulse width"),
            Scheme::Ppm => (
                "Pulse Position Modulation",
                Family::Pulse,
                "pulse position",
            ),
        };
        SchemeInfo {
            name: self.name(),
            full_name,
            family,
            keyed_property,
        }
    }

    /// Modulated output for one sample
    pub fn sample(self, ctx: &SampleContext, config: &SynthConfig) -> f64 {
        match self {
            Scheme::Ask => keying::ask(ctx),
            Scheme::Fsk => keying::fsk(ctx, config),
            Scheme::Psk => keying::psk(ctx),
            Scheme::Pam => pulse::pam(ctx),
            Scheme::Pwm => pulse::pwm(ctx, config),
            Scheme::Ppm => pulse::ppm(ctx, config),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scheme {
    type Err = SynthError;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Scheme::ALL
            .into_iter()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SynthError::UnsupportedScheme(s.to_string()))
    }
}

impl Serialize for Scheme {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Scheme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
