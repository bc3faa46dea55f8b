//! Spike-train loader.
//!
//! `spikeTrains.csv` has the header `Time,NeuronId` and one row per
//! firing, times in seconds with fixed four-decimal precision, ordered
//! by non-decreasing time. The loader checks the ordering (the playback
//! engine assumes it and never re-sorts) and drops rows before the
//! configured start time, so the engine only ever sees due events.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use spikescope_core::types::{NeuronId, SpikeEvent};
use tracing::debug;

/// Expected header of `spikeTrains.csv`.
const HEADER: &str = "Time,NeuronId";

/// Errors raised while loading a spike train.
#[derive(Debug, thiserror::Error)]
pub enum SpikeTrainError {
    /// Failed to read the file from disk.
    #[error("failed to read spike train: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The file does not start with the expected header.
    #[error("bad spike train header: expected {HEADER:?}, found {found:?}")]
    Header {
        /// The header line actually present (empty for an empty file).
        found: String,
    },

    /// A row failed to parse.
    #[error("bad spike train row at line {line}: {message}")]
    Parse {
        /// 1-based line number of the offending row.
        line: usize,
        /// What was wrong with the row.
        message: String,
    },

    /// A row's time went backwards.
    #[error("spike train out of order at line {line}: {time} after {previous}")]
    OutOfOrder {
        /// 1-based line number of the offending row.
        line: usize,
        /// Time of the offending row.
        time: f64,
        /// Time of the preceding row.
        previous: f64,
    },
}

/// Load a spike train, dropping rows with `Time < start_time`.
///
/// The ordering check runs over the whole file, including rows that are
/// filtered out, so a corrupt recording fails even when the corruption
/// precedes the start time.
///
/// # Errors
///
/// Returns [`SpikeTrainError`] on I/O failure, a missing or wrong
/// header, an unparseable row, or a backwards timestamp.
pub fn load_spike_train(
    path: &Path,
    start_time: f64,
) -> Result<Vec<SpikeEvent>, SpikeTrainError> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => String::new(),
    };
    if header.trim_end() != HEADER {
        return Err(SpikeTrainError::Header { found: header });
    }

    let mut events = Vec::new();
    let mut previous: Option<f64> = None;

    for (index, line) in lines.enumerate() {
        let line = line?;
        let row = line.trim_end();
        if row.is_empty() {
            continue;
        }
        let line_number = index + 2;

        let (time_field, id_field) =
            row.split_once(',')
                .ok_or_else(|| SpikeTrainError::Parse {
                    line: line_number,
                    message: format!("expected two comma-separated fields, got {row:?}"),
                })?;

        let time: f64 = time_field.parse().map_err(|err| SpikeTrainError::Parse {
            line: line_number,
            message: format!("bad time {time_field:?}: {err}"),
        })?;
        if !time.is_finite() {
            return Err(SpikeTrainError::Parse {
                line: line_number,
                message: format!("non-finite time {time_field:?}"),
            });
        }
        let neuron: u32 = id_field.parse().map_err(|err| SpikeTrainError::Parse {
            line: line_number,
            message: format!("bad neuron id {id_field:?}: {err}"),
        })?;

        if let Some(previous) = previous {
            if time < previous {
                return Err(SpikeTrainError::OutOfOrder {
                    line: line_number,
                    time,
                    previous,
                });
            }
        }
        previous = Some(time);

        if time >= start_time {
            events.push(SpikeEvent::new(NeuronId::new(neuron), time));
        }
    }

    debug!(
        path = %path.display(),
        events = events.len(),
        start_time,
        "Spike train loaded"
    );
    Ok(events)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    use tempfile::TempDir;

    fn write_train(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("spikeTrains.csv");
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_and_filters_by_start_time() {
        let dir = TempDir::new().unwrap();
        let path = write_train(
            &dir,
            "Time,NeuronId\n37.9990,5\n38.0000,3\n38.0000,9\n38.0002,3\n",
        );

        let events = load_spike_train(&path, 38.0).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], SpikeEvent::new(NeuronId::new(3), 38.0));
        assert_eq!(events[1], SpikeEvent::new(NeuronId::new(9), 38.0));
        assert_eq!(events[2].neuron, NeuronId::new(3));
    }

    #[test]
    fn empty_body_is_ok() {
        let dir = TempDir::new().unwrap();
        let path = write_train(&dir, "Time,NeuronId\n");
        let events = load_spike_train(&path, 0.0).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn missing_header_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write_train(&dir, "38.0000,3\n");
        assert!(matches!(
            load_spike_train(&path, 0.0),
            Err(SpikeTrainError::Header { .. })
        ));
    }

    #[test]
    fn out_of_order_rows_are_fatal_even_before_start_time() {
        let dir = TempDir::new().unwrap();
        let path = write_train(&dir, "Time,NeuronId\n10.0000,1\n9.0000,2\n");
        assert!(matches!(
            load_spike_train(&path, 38.0),
            Err(SpikeTrainError::OutOfOrder { line: 3, .. })
        ));
    }

    #[test]
    fn equal_timestamps_keep_source_order() {
        let dir = TempDir::new().unwrap();
        let path = write_train(&dir, "Time,NeuronId\n1.0000,7\n1.0000,2\n1.0000,5\n");
        let events = load_spike_train(&path, 0.0).unwrap();
        let ids: Vec<u32> = events.iter().map(|e| e.neuron.into_inner()).collect();
        assert_eq!(ids, vec![7, 2, 5]);
    }

    #[test]
    fn malformed_row_reports_line_number() {
        let dir = TempDir::new().unwrap();
        let path = write_train(&dir, "Time,NeuronId\n1.0000,3\nnot-a-time,4\n");
        assert!(matches!(
            load_spike_train(&path, 0.0),
            Err(SpikeTrainError::Parse { line: 3, .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.csv");
        assert!(matches!(
            load_spike_train(&path, 0.0),
            Err(SpikeTrainError::Io { .. })
        ));
    }
}
