/// A dense, row-major table of per-frame projection values.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionTable {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl ProjectionTable {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// `(frames, dimensions)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row < self.rows {
            Some(&self.data[row * self.cols..(row + 1) * self.cols])
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_has_requested_shape() {
        let table = ProjectionTable::zeros(3, 4);
        assert_eq!(table.shape(), (3, 4));
        assert_eq!(table.as_slice().len(), 12);
    }

    #[test]
    fn out_of_range_access_returns_none() {
        let table = ProjectionTable::zeros(2, 2);
        assert_eq!(table.get(1, 1), Some(0.0));
        assert_eq!(table.get(2, 0), None);
        assert_eq!(table.get(0, 2), None);
        assert!(table.row(2).is_none());
        assert_eq!(table.row(1), Some(&[0.0f32, 0.0][..]));
    }

    #[test]
    fn empty_tables_are_allowed() {
        let table = ProjectionTable::zeros(0, 5);
        assert_eq!(table.shape(), (0, 5));
        assert!(table.as_slice().is_empty());
        assert!(table.row(0).is_none());
    }
}
