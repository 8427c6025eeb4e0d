//! Batch mode: many requests from one file, one JSON result per request

use std::io;
use std::path::Path;

use tracing::{debug, warn};

use crate::io::write_json;
use crate::request::WireRequest;
use crate::synth::Synthesizer;
use crate::ui::progress::{ProgressManager, templates};
use crate::utils::dump::{BatchEntry, BatchSummary};

const BAR_ID: &str = "batch";

/// Synthesize every request into `out_dir/NNNN_<scheme>.json`.
///
/// A rejected request is recorded in the summary and skipped. Only I/O
/// errors abort the run.
pub fn run_batch(
    requests: &[WireRequest],
    synth: &Synthesizer,
    out_dir: &Path,
    max_bits: Option<usize>,
    progress: &ProgressManager,
) -> io::Result<BatchSummary> {
    std::fs::create_dir_all(out_dir)?;
    progress
        .create_bar(BAR_ID, requests.len() as u64, templates::BATCH, "")
        .unwrap_or_else(|err| debug!("Progress bar unavailable: {}", err));

    let mut summary = BatchSummary::default();
    for (index, wire) in requests.iter().enumerate() {
        let outcome = wire
            .validate(max_bits)
            .and_then(|request| Ok((request.run(synth)?, request)));

        let entry = match outcome {
            Ok((result, request)) => {
                let file_name = format!("{:04}_{}.json", index, request.scheme);
                write_json(&result, &out_dir.join(&file_name))?;
                let _ = progress.set_message(BAR_ID, &file_name);
                BatchEntry {
                    index,
                    scheme: Some(request.scheme.to_string()),
                    bits: request.bitstream.len(),
                    samples: result.len(),
                    output: Some(file_name),
                    error: None,
                }
            }
            Err(err) => {
                warn!("Request {} rejected: {}", index, err);
                BatchEntry {
                    index,
                    scheme: wire.scheme.clone(),
                    bits: wire
                        .bitstream
                        .as_deref()
                        .map_or(0, |b| b.chars().count()),
                    samples: 0,
                    output: None,
                    error: Some(format!("{}: {}", err.kind(), err)),
                }
            }
        };
        summary.push(entry);
        let _ = progress.inc(BAR_ID, 1);
    }

    write_json(&summary, &out_dir.join("summary.json"))?;
    let _ = progress.finish(
        BAR_ID,
        &format!("{} ok, {} failed", summary.succeeded, summary.failed),
    );
    Ok(summary)
}
