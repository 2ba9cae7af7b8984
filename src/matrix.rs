//! A dense row-major score matrix used during set-to-set similarity

/// Pairwise similarity scores of two term sets
///
/// Row `i` holds the scores of the `i`-th term of the first set against
/// every term of the second set. Custom
/// [`crate::similarity::SimilarityCombiner`] implementations reduce this
/// matrix to a single score.
pub struct ScoreMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl ScoreMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * self.cols + col] = value;
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// The maximum of every row
    pub fn row_maxes(&self) -> Vec<f32> {
        (0..self.rows)
            .map(|row| {
                self.data[row * self.cols..(row + 1) * self.cols]
                    .iter()
                    .fold(f32::MIN, |max, &value| max.max(value))
            })
            .collect()
    }

    /// The maximum of every column
    pub fn col_maxes(&self) -> Vec<f32> {
        (0..self.cols)
            .map(|col| {
                (0..self.rows)
                    .map(|row| self.data[row * self.cols + col])
                    .fold(f32::MIN, |max, value| max.max(value))
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn maxes() {
        let mut m = ScoreMatrix::new(2, 3);
        m.set(0, 0, 0.1);
        m.set(0, 1, 0.7);
        m.set(0, 2, 0.3);
        m.set(1, 0, 0.9);
        m.set(1, 1, 0.2);
        m.set(1, 2, 0.4);

        assert_eq!(m.row_maxes(), vec![0.7, 0.9]);
        assert_eq!(m.col_maxes(), vec![0.9, 0.7, 0.4]);
    }

    #[test]
    fn empty() {
        assert!(ScoreMatrix::new(0, 5).is_empty());
        assert!(ScoreMatrix::new(5, 0).is_empty());
        assert!(!ScoreMatrix::new(1, 1).is_empty());
    }
}
