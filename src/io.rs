use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::request::WireRequest;
use crate::synth::ModulationResult;

fn ensure_parent(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// One value per line, 4 decimals
pub fn write_to_txt(samples: &[f64], path: &Path) -> io::Result<()> {
    ensure_parent(path)?;
    let mut file = BufWriter::new(File::create(path)?);
    for &sample in samples {
        writeln!(file, "{:.4}", sample)?;
    }
    file.flush()
}

/// `<dir>/time.txt`, `<dir>/digital.txt`, ... one file per series
pub fn write_series_txt(result: &ModulationResult, dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    for (name, series) in result.series() {
        write_to_txt(series, &dir.join(format!("{name}.txt")))?;
    }
    Ok(())
}

pub fn write_json<T: Serialize>(value: &T, path: &Path) -> io::Result<()> {
    ensure_parent(path)?;
    let mut file = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut file, value)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, format!("{err}")))?;
    file.flush()
}

/// Requests for batch mode: a JSON array of request objects.
pub fn read_requests(path: &Path) -> io::Result<Vec<WireRequest>> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, format!("{err}")))
}

/// 16-bit mono WAV. `signal` is divided by `full_scale` and clipped to [-1, 1].
pub fn write_to_wav(
    signal: &[f64],
    full_scale: f64,
    sample_rate: u32,
    filename: &Path,
) -> io::Result<()> {
    ensure_parent(filename)?;
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(filename, spec)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, format!("{err}")))?;
    let amplitude = i16::MAX as f64;
    for &sample in signal {
        let normalized = (sample / full_scale).clamp(-1.0, 1.0);
        writer
            .write_sample((normalized * amplitude).round() as i16)
            .map_err(|err| {
                io::Error::new(io::ErrorKind::Other, format!("{err}"))
            })?;
    }
    writer
        .finalize()
        .map_err(|err| io::Error::new(io::ErrorKind::Other, format!("{err}")))?;
    Ok(())
}

/// Samples of a 16-bit WAV scaled back to [-1, 1]
pub fn read_wav(filename: &Path) -> io::Result<Vec<f64>> {
    let reader = hound::WavReader::open(filename)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, format!("{err}")))?;
    let amplitude = i16::MAX as f64;
    reader
        .into_samples::<i16>()
        .map(|sample| {
            sample
                .map(|value| value as f64 / amplitude)
                .map_err(|err| {
                    io::Error::new(io::ErrorKind::Other, format!("{err}"))
                })
        })
        .collect()
}
