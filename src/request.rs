//! Request decoding for the `/modulate` contract
//!
//! The browser form posts `{ amplitude, frequency, bitstream, type }`. Number
//! inputs arrive as text, and fields may be missing, so decoding happens in
//! two steps: a lenient [`WireRequest`] straight from JSON, then a checked
//! [`ModulationRequest`].

use serde::{Deserialize, Serialize};

use crate::bits::{self, SymbolSequence};
use crate::error::{BitstreamError, Result, SynthError, ensure_positive};
use crate::modulation::Scheme;
use crate::synth::{ModulationResult, Synthesizer};
use crate::utils::consts::*;

/// JSON number, or a string holding one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberField {
    Number(f64),
    Text(String),
}

impl NumberField {
    fn resolve(&self, name: &'static str) -> Result<f64> {
        match self {
            NumberField::Number(value) => Ok(*value),
            NumberField::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                SynthError::invalid_parameter(name, format!("{text:?} is not a number"))
            }),
        }
    }
}

impl From<f64> for NumberField {
    fn from(value: f64) -> Self {
        NumberField::Number(value)
    }
}

/// Request body as sent by the client. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireRequest {
    #[serde(default, rename = "type")]
    pub scheme: Option<String>,
    #[serde(default)]
    pub amplitude: Option<NumberField>,
    #[serde(default)]
    pub frequency: Option<NumberField>,
    #[serde(default)]
    pub bitstream: Option<String>,
}

/// Fully validated request
#[derive(Debug, Clone, PartialEq)]
pub struct ModulationRequest {
    pub scheme: Scheme,
    pub bitstream: SymbolSequence,
    pub frequency: f64,
    pub amplitude: f64,
}

impl WireRequest {
    pub fn from_json(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    /// Apply defaults and validate.
    ///
    /// Checks run in order scheme, bitstream, frequency, amplitude; the first
    /// failure is returned. `max_bits` caps the bitstream length.
    pub fn validate(&self, max_bits: Option<usize>) -> Result<ModulationRequest> {
        let scheme = self
            .scheme
            .as_deref()
            .unwrap_or(DEFAULT_SCHEME)
            .parse::<Scheme>()?;

        let bitstream = self.bitstream.as_deref().unwrap_or(DEFAULT_BITSTREAM);
        if let Some(max) = max_bits {
            let len = bitstream.chars().count();
            if len > max {
                return Err(BitstreamError::TooLong { len, max }.into());
            }
        }
        let bitstream = bits::parse(bitstream)?;

        let frequency = match &self.frequency {
            Some(field) => field.resolve("frequency")?,
            None => DEFAULT_FREQUENCY,
        };
        let amplitude = match &self.amplitude {
            Some(field) => field.resolve("amplitude")?,
            None => DEFAULT_AMPLITUDE,
        };

        Ok(ModulationRequest {
            scheme,
            bitstream,
            frequency: ensure_positive("frequency", frequency)?,
            amplitude: ensure_positive("amplitude", amplitude)?,
        })
    }
}

impl ModulationRequest {
    pub fn new(
        scheme: Scheme,
        bitstream: SymbolSequence,
        frequency: f64,
        amplitude: f64,
    ) -> Result<Self> {
        Ok(Self {
            scheme,
            bitstream,
            frequency: ensure_positive("frequency", frequency)?,
            amplitude: ensure_positive("amplitude", amplitude)?,
        })
    }

    pub fn run(&self, synth: &Synthesizer) -> Result<ModulationResult> {
        synth.synthesize(&self.bitstream, self.frequency, self.amplitude, self.scheme)
    }

    /// Back to the wire shape, e.g. for logging or replay
    pub fn to_wire(&self) -> WireRequest {
        WireRequest {
            scheme: Some(self.scheme.name().to_string()),
            amplitude: Some(self.amplitude.into()),
            frequency: Some(self.frequency.into()),
            bitstream: Some(self.bitstream.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Result<ModulationRequest> {
        WireRequest::from_json(json.as_bytes())
            .unwrap()
            .validate(None)
    }

    #[test]
    fn test_numbers_or_strings() {
        let request = decode(
            r#"{"amplitude": "5", "frequency": 2.5, "bitstream": "101", "type": "PSK"}"#,
        )
        .unwrap();
        assert_eq!(request.scheme, Scheme::Psk);
        assert_eq!(request.amplitude, 5.0);
        assert_eq!(request.frequency, 2.5);
        assert_eq!(request.bitstream.to_string(), "101");

        let request = decode(r#"{"amplitude": " 1e1 ", "bitstream": "1"}"#).unwrap();
        assert_eq!(request.amplitude, 10.0);
    }

    #[test]
    fn test_defaults() {
        let request = decode("{}").unwrap();
        assert_eq!(request.scheme, Scheme::Ask);
        assert_eq!(request.amplitude, DEFAULT_AMPLITUDE);
        assert_eq!(request.frequency, DEFAULT_FREQUENCY);
        assert_eq!(request.bitstream.to_string(), DEFAULT_BITSTREAM);

        let request = decode(r#"{"type": null, "amplitude": null}"#).unwrap();
        assert_eq!(request.scheme, Scheme::Ask);
    }

    #[test]
    fn test_error_classes() {
        assert_eq!(
            decode(r#"{"bitstream": "102"}"#).unwrap_err().kind(),
            "invalid_bitstream"
        );
        assert_eq!(
            decode(r#"{"bitstream": ""}"#).unwrap_err().kind(),
            "invalid_bitstream"
        );
        assert_eq!(
            decode(r#"{"frequency": 0}"#).unwrap_err().kind(),
            "invalid_parameter"
        );
        assert_eq!(
            decode(r#"{"amplitude": "loud"}"#).unwrap_err().kind(),
            "invalid_parameter"
        );
        assert_eq!(
            decode(r#"{"type": "XYZ"}"#).unwrap_err().kind(),
            "unsupported_scheme"
        );
    }

    #[test]
    fn test_max_bits() {
        let wire = WireRequest {
            bitstream: Some("10101".into()),
            ..Default::default()
        };
        assert!(wire.validate(Some(5)).is_ok());
        assert_eq!(
            wire.validate(Some(4)),
            Err(SynthError::InvalidBitstream(BitstreamError::TooLong {
                len: 5,
                max: 4
            }))
        );
    }

    #[test]
    fn test_wire_round_trip() {
        let request = decode(r#"{"type": "pwm", "bitstream": "01", "frequency": "3"}"#)
            .unwrap();
        assert_eq!(request.to_wire().validate(None).unwrap(), request);
    }

    #[test]
    fn test_malformed_json() {
        assert!(WireRequest::from_json(b"{not json").is_err());
        assert!(WireRequest::from_json(br#"{"amplitude": [1]}"#).is_err());
    }
}
