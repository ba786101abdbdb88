use serde::{Deserialize, Serialize};

/// Dense time-series matrix, rows = time steps, columns = Monte-Carlo
/// scenarios (or fixed columns for structured inputs such as hydro maxpower).
///
/// AntaresWeb exchanges these as JSON arrays of rows; the on-disk format is
/// tab-separated text without header.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix {
    rows: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// A matrix with the same value in every cell.
    pub fn filled(value: f64, nb_rows: usize, nb_cols: usize) -> Self {
        Self {
            rows: vec![vec![value; nb_cols]; nb_rows],
        }
    }

    pub fn zeros(nb_rows: usize, nb_cols: usize) -> Self {
        Self::filled(0.0, nb_rows, nb_cols)
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn nb_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn nb_cols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Vec<f64>>> for Matrix {
    fn from(rows: Vec<Vec<f64>>) -> Self {
        Self::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_matrix_has_requested_shape() {
        let m = Matrix::filled(1.5, 8760, 2);
        assert_eq!(m.nb_rows(), 8760);
        assert_eq!(m.nb_cols(), 2);
        assert_eq!(m.rows()[0][1], 1.5);
    }

    #[test]
    fn empty_matrix_has_no_columns() {
        let m = Matrix::default();
        assert!(m.is_empty());
        assert_eq!(m.nb_cols(), 0);
    }

    #[test]
    fn serializes_as_plain_rows() {
        let m = Matrix::new(vec![vec![1.0, 2.0]]);
        assert_eq!(serde_json::to_string(&m).unwrap(), "[[1.0,2.0]]");
    }
}
