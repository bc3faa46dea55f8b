//! Neuron-table loaders.
//!
//! `locations.csv` (`NeuronId,LocationX,LocationY`) holds one normalized
//! coordinate pair per neuron; `neuronInfos.csv` (`NeuronId,IsInhibitory`)
//! holds one category flag per neuron, serialized as `0`/`1`. Both
//! tables are dense: row `i` must carry neuron ID `i`, because the
//! catalog joins them by row index. The two row counts are checked
//! against each other later, by catalog construction.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

/// Errors raised while loading a neuron table.
#[derive(Debug, thiserror::Error)]
pub enum NeuronTableError {
    /// Failed to read the file from disk.
    #[error("failed to read neuron table: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The file does not start with the expected header.
    #[error("bad neuron table header: expected {expected:?}, found {found:?}")]
    Header {
        /// The header the table format requires.
        expected: &'static str,
        /// The header line actually present (empty for an empty file).
        found: String,
    },

    /// A row failed to parse.
    #[error("bad neuron table row at line {line}: {message}")]
    Parse {
        /// 1-based line number of the offending row.
        line: usize,
        /// What was wrong with the row.
        message: String,
    },

    /// A row carries the wrong neuron ID for its position.
    #[error("neuron table not dense at line {line}: expected id {expected}, found {found}")]
    NotDense {
        /// 1-based line number of the offending row.
        line: usize,
        /// The row index the table position implies.
        expected: usize,
        /// The neuron ID the row actually carries.
        found: u32,
    },
}

/// Expected header of `locations.csv`.
const LOCATIONS_HEADER: &str = "NeuronId,LocationX,LocationY";

/// Expected header of `neuronInfos.csv`.
const INFOS_HEADER: &str = "NeuronId,IsInhibitory";

/// Load normalized neuron locations, in row (= neuron ID) order.
///
/// # Errors
///
/// Returns [`NeuronTableError`] on I/O failure, a wrong header, an
/// unparseable row, or a non-dense ID column.
pub fn load_locations(path: &Path) -> Result<Vec<(f64, f64)>, NeuronTableError> {
    let rows = read_rows(path, LOCATIONS_HEADER)?;
    let mut locations = Vec::with_capacity(rows.len());

    for (line, row) in rows {
        let mut fields = row.split(',');
        let id_field = fields.next().unwrap_or_default();
        let (Some(x_field), Some(y_field)) = (fields.next(), fields.next()) else {
            return Err(NeuronTableError::Parse {
                line,
                message: format!("expected three comma-separated fields, got {row:?}"),
            });
        };

        check_dense(line, locations.len(), id_field)?;
        let x: f64 = x_field.parse().map_err(|err| NeuronTableError::Parse {
            line,
            message: format!("bad x coordinate {x_field:?}: {err}"),
        })?;
        let y: f64 = y_field.parse().map_err(|err| NeuronTableError::Parse {
            line,
            message: format!("bad y coordinate {y_field:?}: {err}"),
        })?;
        locations.push((x, y));
    }

    debug!(path = %path.display(), neurons = locations.len(), "Locations loaded");
    Ok(locations)
}

/// Load per-neuron inhibitory flags, in row (= neuron ID) order.
///
/// The simulator serializes the flag as `0`/`1`; `true`/`false` is
/// accepted too.
///
/// # Errors
///
/// Returns [`NeuronTableError`] on I/O failure, a wrong header, an
/// unparseable row, or a non-dense ID column.
pub fn load_inhibitory_flags(path: &Path) -> Result<Vec<bool>, NeuronTableError> {
    let rows = read_rows(path, INFOS_HEADER)?;
    let mut flags = Vec::with_capacity(rows.len());

    for (line, row) in rows {
        let Some((id_field, flag_field)) = row.split_once(',') else {
            return Err(NeuronTableError::Parse {
                line,
                message: format!("expected two comma-separated fields, got {row:?}"),
            });
        };

        check_dense(line, flags.len(), id_field)?;
        let flag = match flag_field {
            "0" | "false" => false,
            "1" | "true" => true,
            other => {
                return Err(NeuronTableError::Parse {
                    line,
                    message: format!("bad inhibitory flag {other:?}"),
                })
            }
        };
        flags.push(flag);
    }

    debug!(path = %path.display(), neurons = flags.len(), "Inhibitory flags loaded");
    Ok(flags)
}

/// Read all non-empty body rows of a headed CSV file, with 1-based line
/// numbers.
fn read_rows(
    path: &Path,
    expected_header: &'static str,
) -> Result<Vec<(usize, String)>, NeuronTableError> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => String::new(),
    };
    if header.trim_end() != expected_header {
        return Err(NeuronTableError::Header {
            expected: expected_header,
            found: header,
        });
    }

    let mut rows = Vec::new();
    for (index, line) in lines.enumerate() {
        let line = line?;
        let row = line.trim_end();
        if !row.is_empty() {
            rows.push((index + 2, row.to_owned()));
        }
    }
    Ok(rows)
}

/// Check that a row's ID column matches its position in the table.
fn check_dense(line: usize, position: usize, id_field: &str) -> Result<(), NeuronTableError> {
    let found: u32 = id_field.parse().map_err(|err| NeuronTableError::Parse {
        line,
        message: format!("bad neuron id {id_field:?}: {err}"),
    })?;
    if found as usize != position {
        return Err(NeuronTableError::NotDense {
            line,
            expected: position,
            found,
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_locations_in_row_order() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "locations.csv",
            "NeuronId,LocationX,LocationY\n0,0.1,0.9\n1,0.5,0.5\n2,0.25,0.75\n",
        );

        let locations = load_locations(&path).unwrap();
        assert_eq!(locations.len(), 3);
        assert!((locations[0].0 - 0.1).abs() < f64::EPSILON);
        assert!((locations[2].1 - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn loads_flags_in_both_serializations() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "neuronInfos.csv",
            "NeuronId,IsInhibitory\n0,0\n1,1\n2,false\n3,true\n",
        );

        let flags = load_inhibitory_flags(&path).unwrap();
        assert_eq!(flags, vec![false, true, false, true]);
    }

    #[test]
    fn non_dense_ids_are_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "neuronInfos.csv",
            "NeuronId,IsInhibitory\n0,0\n2,1\n",
        );
        assert!(matches!(
            load_inhibitory_flags(&path),
            Err(NeuronTableError::NotDense {
                line: 3,
                expected: 1,
                found: 2
            })
        ));
    }

    #[test]
    fn wrong_header_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "locations.csv", "X,Y\n0.1,0.9\n");
        assert!(matches!(
            load_locations(&path),
            Err(NeuronTableError::Header { .. })
        ));
    }

    #[test]
    fn bad_flag_value_reports_line() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "neuronInfos.csv",
            "NeuronId,IsInhibitory\n0,maybe\n",
        );
        assert!(matches!(
            load_inhibitory_flags(&path),
            Err(NeuronTableError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn truncated_location_row_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "locations.csv",
            "NeuronId,LocationX,LocationY\n0,0.5\n",
        );
        assert!(matches!(
            load_locations(&path),
            Err(NeuronTableError::Parse { line: 2, .. })
        ));
    }
}
