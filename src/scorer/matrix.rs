//! Dense benefit matrix
//!
//! Row-major, rows are workload positions, columns are candidates in
//! enumeration order.

/// Rectangular real-valued matrix of per-query, per-candidate benefits
#[derive(Debug, Clone, PartialEq)]
pub struct BenefitMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl BenefitMatrix {
    /// Creates a zero-filled matrix
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Number of rows (queries)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (candidates)
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Sets the value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    /// Sum of a column over all rows
    pub fn column_total(&self, col: usize) -> f64 {
        (0..self.rows).map(|row| self.get(row, col)).sum()
    }
}
