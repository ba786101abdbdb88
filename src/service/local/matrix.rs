//! Tab-separated time series files, headerless, one row per time step.

use std::path::Path;

use crate::model::matrix::Matrix;
use crate::utils::error::{Result, StudyError};

/// Reads a TSV matrix. A missing or empty file is an empty matrix, which is
/// how the simulator treats unset series.
pub fn read_matrix(path: &Path) -> Result<Matrix> {
    if !path.exists() {
        return Ok(Matrix::default());
    }
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = Vec::with_capacity(record.len());
        for field in record.iter() {
            let value = field.trim().parse::<f64>().map_err(|_| StudyError::MatrixDownload {
                path: path.display().to_string(),
                cause: format!("invalid number `{field}`"),
            })?;
            row.push(value);
        }
        rows.push(row);
    }
    Ok(Matrix::new(rows))
}

pub fn write_matrix(path: &Path, matrix: &Matrix) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    for row in matrix.rows() {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let matrix = read_matrix(&dir.path().join("absent.txt")).unwrap();
        assert!(matrix.is_empty());
    }

    #[test]
    fn writes_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.txt");
        let matrix = Matrix::new(vec![vec![1.0, 2.5], vec![3.0, 4.0]]);

        write_matrix(&path, &matrix).unwrap();
        let read_back = read_matrix(&path).unwrap();
        assert_eq!(read_back, matrix);
    }

    #[test]
    fn rejects_non_numeric_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "1.0\toops\n").unwrap();
        assert!(read_matrix(&path).is_err());
    }
}
