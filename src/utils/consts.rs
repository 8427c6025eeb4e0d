/// 日志级别（可被 RUST_LOG 覆盖）
pub const LOG_LEVEL: &str = "info";

/// Log level used when `--verbose` is passed
pub const VERBOSE_LOG_LEVEL: &str = "debug";

// ============================================================================
// Synthesis Parameters
// ============================================================================

/// Samples per bit period, shared by every scheme
pub const SAMPLES_PER_BIT: usize = 100;

/// Upper bound for a configured `samples_per_bit` (keeps one request's
/// series within a few hundred MB at MAX_BITSTREAM_LEN bits)
pub const MAX_SAMPLES_PER_BIT: usize = 10_000;

/// FSK space tone as a fraction of the carrier (f0 = f * ratio)
pub const FSK_SPACE_RATIO: f64 = 0.5;

/// PWM duty cycle for a '1' bit
pub const PWM_DUTY_ONE: f64 = 0.75;

/// PWM duty cycle for a '0' bit
pub const PWM_DUTY_ZERO: f64 = 0.25;

/// PPM pulse start for a '1' bit (fraction of the bit period)
pub const PPM_OFFSET_ONE: f64 = 0.6;

/// PPM pulse start for a '0' bit (fraction of the bit period)
pub const PPM_OFFSET_ZERO: f64 = 0.1;

/// PPM pulse width (fraction of the bit period)
pub const PPM_PULSE_WIDTH: f64 = 0.1;

// ============================================================================
// Request Defaults (fields the form may leave out)
// ============================================================================

pub const DEFAULT_SCHEME: &str = "ASK";
pub const DEFAULT_AMPLITUDE: f64 = 1.0;
pub const DEFAULT_FREQUENCY: f64 = 5.0;
pub const DEFAULT_BITSTREAM: &str = "00111001";

// ============================================================================
// HTTP Endpoint
// ============================================================================

pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Overridden by the PORT environment variable
pub const DEFAULT_PORT: u16 = 5000;

pub const PORT_ENV_VAR: &str = "PORT";

pub const DEFAULT_WORKERS: usize = 4;

/// Origins allowed to call the endpoint from a browser
pub const CORS_ORIGINS: &[&str] = &[
    "https://dso-one.vercel.app",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
];

/// Longest bitstream accepted over HTTP (N * SAMPLES_PER_BIT samples per series)
pub const MAX_BITSTREAM_LEN: usize = 1024;

/// Request body limit in bytes
pub const MAX_BODY_BYTES: usize = 64 * 1024;

pub const MAX_HEADER_COUNT: usize = 64;

/// Longest accepted request or header line in bytes
pub const MAX_LINE_BYTES: usize = 8 * 1024;

/// Socket read/write timeout (milliseconds)
pub const SOCKET_TIMEOUT_MS: u64 = 5_000;

/// How often the accept loop checks the shutdown flag (milliseconds)
pub const ACCEPT_POLL_MS: u64 = 50;
