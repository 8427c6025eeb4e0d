use serde::{Deserialize, Serialize};

/// Outcome of one request in a batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub index: usize,
    pub scheme: Option<String>,
    pub bits: usize,
    pub samples: usize,
    pub output: Option<String>,
    pub error: Option<String>,
}

/// Written as `summary.json` next to the per-request files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub entries: Vec<BatchEntry>,
}

impl BatchSummary {
    pub fn push(&mut self, entry: BatchEntry) {
        self.total += 1;
        if entry.error.is_some() {
            self.failed += 1;
        } else {
            self.succeeded += 1;
        }
        self.entries.push(entry);
    }
}
