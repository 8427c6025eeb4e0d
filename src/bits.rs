//! Bit parser: text bitstream -> typed symbol sequence

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{BitstreamError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bit {
    Zero,
    One,
}

impl Bit {
    /// Signal level of the bit: 0.0 or 1.0
    pub fn level(self) -> f64 {
        match self {
            Bit::Zero => 0.0,
            Bit::One => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Bit::Zero => Bit::One,
            Bit::One => Bit::Zero,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Bit::Zero => '0',
            Bit::One => '1',
        }
    }
}

/// Non-empty ordered sequence of bits.
///
/// Only constructed through [`parse`] or [`SymbolSequence::random`], so an
/// instance is always valid input for the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolSequence(Vec<Bit>);

/// Parse a string of '0'/'1' characters. Order is preserved one-to-one.
pub fn parse(bitstream: &str) -> Result<SymbolSequence> {
    if bitstream.is_empty() {
        return Err(BitstreamError::Empty.into());
    }

    let bits = bitstream
        .chars()
        .enumerate()
        .map(|(position, ch)| match ch {
            '0' => Ok(Bit::Zero),
            '1' => Ok(Bit::One),
            _ => Err(BitstreamError::InvalidChar { ch, position }),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(SymbolSequence(bits))
}

impl SymbolSequence {
    /// Reproducible pseudo-random sequence for demos and sweeps.
    pub fn random(len: usize, seed: u64) -> Result<Self> {
        if len == 0 {
            return Err(BitstreamError::Empty.into());
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let bits = (0..len)
            .map(|_| {
                if rng.random_bool(0.5) {
                    Bit::One
                } else {
                    Bit::Zero
                }
            })
            .collect();
        Ok(Self(bits))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Bit] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Bit> + '_ {
        self.0.iter().copied()
    }

    /// Every bit inverted (same length, still non-empty)
    pub fn inverted(&self) -> Self {
        Self(self.0.iter().map(|b| b.flipped()).collect())
    }
}

impl FromStr for SymbolSequence {
    type Err = crate::error::SynthError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

impl fmt::Display for SymbolSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.0 {
            write!(f, "{}", bit.as_char())?;
        }
        Ok(())
    }
}
