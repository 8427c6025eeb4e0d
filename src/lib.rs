//! Digital/analog modulation signal synthesizer.
//!
//! ```text
//! "10110" ──parse──▶ SymbolSequence ──Synthesizer──▶ { time, digital, carrier, modulated }
//!                                        ▲
//!                         Scheme: ASK FSK PSK PAM PWM PPM
//! ```
//!
//! The engine ([`bits`], [`modulation`], [`synth`]) is pure. [`request`]
//! decodes the JSON contract, [`server`] exposes it over HTTP and [`batch`]
//! / [`io`] cover offline use.

pub mod batch;
pub mod bits;
pub mod config;
pub mod error;
pub mod io;
pub mod modulation;
pub mod request;
pub mod server;
pub mod synth;
pub mod ui;
pub mod utils;

pub use bits::{Bit, SymbolSequence, parse};
pub use config::SynthConfig;
pub use error::{BitstreamError, SynthError};
pub use modulation::Scheme;
pub use request::{ModulationRequest, WireRequest};
pub use synth::{ModulationResult, Synthesizer, synthesize};
