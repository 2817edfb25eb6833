//! Numeric column files: one data point per line, `x y [sigma]`.
//!
//! Files ending in `.csv` are comma separated; anything else is split on runs of
//! whitespace. Blank lines and lines starting with `#` are skipped. A missing third
//! column means unit uncertainty.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("Failed to read data file '{path}': {source}", path = path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("'{path}' line {line}: expected 2 or 3 columns, found {found}", path = path.display())]
    ColumnCount {
        path: PathBuf,
        line: u64,
        found: usize,
    },

    #[error("'{path}' line {line}: cannot parse '{value}' as a number", path = path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        value: String,
    },

    #[error("'{path}' line {line}: uncertainty must be positive, got {sigma}", path = path.display())]
    NonPositiveSigma { path: PathBuf, line: u64, sigma: f64 },

    #[error("Data file '{path}' contains no data points", path = path.display())]
    Empty { path: PathBuf },
}

/// A set of `(x, y, sigma)` observations, stored column-wise.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub sigma: Vec<f64>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: f64, y: f64, sigma: f64) {
        self.x.push(x);
        self.y.push(y);
        self.sigma.push(sigma);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn load(path: &Path) -> Result<Self, DataError> {
        let comma_separated = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .delimiter(if comma_separated { b',' } else { b' ' })
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DataError::Csv {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut dataset = Self::new();
        for result in reader.records() {
            let record = result.map_err(|e| DataError::Csv {
                path: path.to_path_buf(),
                source: e,
            })?;
            let line = record.position().map_or(0, |p| p.line());

            let fields: Vec<&str> = record
                .iter()
                .flat_map(str::split_whitespace)
                .filter(|f| !f.is_empty())
                .collect();
            if fields.is_empty() {
                continue;
            }
            if !(2..=3).contains(&fields.len()) {
                return Err(DataError::ColumnCount {
                    path: path.to_path_buf(),
                    line,
                    found: fields.len(),
                });
            }

            let parse = |value: &str| {
                value.parse::<f64>().map_err(|_| DataError::Parse {
                    path: path.to_path_buf(),
                    line,
                    value: value.to_string(),
                })
            };
            let x = parse(fields[0])?;
            let y = parse(fields[1])?;
            let sigma = match fields.get(2) {
                Some(value) => parse(value)?,
                None => 1.0,
            };
            if sigma.is_nan() || sigma <= 0.0 {
                return Err(DataError::NonPositiveSigma {
                    path: path.to_path_buf(),
                    line,
                    sigma,
                });
            }

            dataset.push(x, y, sigma);
        }

        if dataset.is_empty() {
            return Err(DataError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_reads_whitespace_separated_columns() {
        let dir = tempdir().unwrap();
        let path = write(
            &dir,
            "curve.dat",
            "# z F sigma\n600  0.10 0.01\n\n625\t0.12   0.02\n650 0.15\n",
        );

        let data = Dataset::load(&path).unwrap();

        assert_eq!(data.len(), 3);
        assert_eq!(data.x, vec![600.0, 625.0, 650.0]);
        assert_eq!(data.y, vec![0.10, 0.12, 0.15]);
        assert_eq!(data.sigma, vec![0.01, 0.02, 1.0]);
    }

    #[test]
    fn load_reads_comma_separated_columns_from_csv_files() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "curve.csv", "600, 0.10\n625 ,0.12, 0.5\n");

        let data = Dataset::load(&path).unwrap();

        assert_eq!(data.x, vec![600.0, 625.0]);
        assert_eq!(data.sigma, vec![1.0, 0.5]);
    }

    #[test]
    fn load_reports_unparsable_values_with_line_number() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "bad.dat", "1 2\n3 abc\n");

        match Dataset::load(&path) {
            Err(DataError::Parse { line, value, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn load_rejects_wrong_column_count() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "bad.dat", "1 2 3 4\n");
        assert!(matches!(
            Dataset::load(&path),
            Err(DataError::ColumnCount { found: 4, .. })
        ));
    }

    #[test]
    fn load_rejects_non_positive_sigma() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "bad.dat", "1 2 0\n");
        assert!(matches!(
            Dataset::load(&path),
            Err(DataError::NonPositiveSigma { .. })
        ));
    }

    #[test]
    fn load_rejects_file_without_data() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "empty.dat", "# nothing here\n\n");
        assert!(matches!(Dataset::load(&path), Err(DataError::Empty { .. })));
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.dat");
        assert!(matches!(Dataset::load(&path), Err(DataError::Csv { .. })));
    }
}
