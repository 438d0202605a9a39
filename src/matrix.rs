use rand::distributions::Uniform;
use rand::Rng;
use serde::{Serialize, Serializer};
use std::ops::{Index, IndexMut};

/// A dense matrix with one row per output unit and one column per input unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Mat {
    rows: usize,
    cols: usize,
    data: Vec<f64>, // row-major array
}

impl Mat {
    /// Fills a new matrix with samples drawn uniformly from `[-1, 1]`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, rows: usize, cols: usize) -> Self {
        let range = Uniform::new_inclusive(-1.0, 1.0);
        Mat {
            rows,
            cols,
            data: (0..rows * cols).map(|_| rng.sample(range)).collect(),
        }
    }

    /// Builds a matrix from explicit rows, which must all have equal length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let cols = rows.first().map_or(0, |r| r.len());
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        Some(Mat {
            rows: rows.len(),
            cols,
            data: rows.iter().flatten().cloned().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }
}

impl Index<(usize, usize)> for Mat {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Mat {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row * self.cols + col]
    }
}

/// Serializes as a list of rows.
impl Serialize for Mat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq((0..self.rows).map(|i| self.row(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_values_are_bounded() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = Mat::random(&mut rng, 4, 3);
        assert_eq!((m.rows(), m.cols()), (4, 3));
        for i in 0..m.rows() {
            assert!(m.row(i).iter().all(|w| (-1.0..=1.0).contains(w)));
        }
    }

    #[test]
    fn same_seed_same_matrix() {
        let a = Mat::random(&mut StdRng::seed_from_u64(3), 2, 5);
        let b = Mat::random(&mut StdRng::seed_from_u64(3), 2, 5);
        assert_eq!(a, b);
    }

    #[test]
    fn rows_are_row_major() {
        let mut m = Mat::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.row(1), &[3.0, 4.0]);
        assert_eq!(m[(0, 1)], 2.0);
        m.row_mut(0)[0] = 9.0;
        assert_eq!(m.get(0, 0), Some(9.0));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(0, 2), None);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(Mat::from_rows(&[vec![1.0], vec![2.0, 3.0]]).is_none());
    }
}
