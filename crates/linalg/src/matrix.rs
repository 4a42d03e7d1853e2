use faer::Mat;
use num_complex::Complex64;
use thiserror::Error;

pub type C64 = Complex64;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    #[error("row {row} has {found} entries, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("{what}: index {index} out of range for dimension {dim}")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        dim: usize,
    },
    #[error("{0:?} is not a permutation")]
    NotPermutation(Vec<usize>),
    #[error("shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
}

/// Dense row-major complex matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct CMatrix {
    pub data: Vec<C64>,
    pub rows: usize,
    pub cols: usize,
}

impl CMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![C64::new(0.0, 0.0); rows * cols],
            rows,
            cols,
        }
    }

    pub fn identity(d: usize) -> Self {
        let mut m = Self::zeros(d, d);
        for i in 0..d {
            m.set(i, i, C64::new(1.0, 0.0));
        }
        m
    }

    pub fn from_rows(rows: &[Vec<C64>]) -> Result<Self, LinalgError> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (row, r) in rows.iter().enumerate() {
            if r.len() != cols {
                return Err(LinalgError::RaggedRows {
                    row,
                    expected: cols,
                    found: r.len(),
                });
            }
            data.extend_from_slice(r);
        }
        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    pub fn from_real_rows(rows: &[Vec<f64>]) -> Result<Self, LinalgError> {
        let rows: Vec<Vec<C64>> = rows
            .iter()
            .map(|r| r.iter().map(|&x| C64::new(x, 0.0)).collect())
            .collect();
        Self::from_rows(&rows)
    }

    #[inline]
    fn idx(&self, r: usize, c: usize) -> usize {
        r * self.cols + c
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> C64 {
        self.data[self.idx(r, c)]
    }

    #[inline]
    pub fn set(&mut self, r: usize, c: usize, v: C64) {
        let i = self.idx(r, c);
        self.data[i] = v;
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn row(&self, r: usize) -> &[C64] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    pub fn adjoint(&self) -> Self {
        let mut out = Self::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.set(c, r, self.get(r, c).conj());
            }
        }
        out
    }

    pub fn matmul(&self, rhs: &Self) -> Result<Self, LinalgError> {
        if self.cols != rhs.rows {
            return Err(LinalgError::ShapeMismatch {
                left: (self.rows, self.cols),
                right: (rhs.rows, rhs.cols),
            });
        }
        let mut out = Self::zeros(self.rows, rhs.cols);
        for r in 0..self.rows {
            for k in 0..self.cols {
                let a = self.get(r, k);
                if a == C64::new(0.0, 0.0) {
                    continue;
                }
                for c in 0..rhs.cols {
                    let i = out.idx(r, c);
                    out.data[i] += a * rhs.get(k, c);
                }
            }
        }
        Ok(out)
    }

    /// Rows `start..end`, all columns.
    pub fn row_block(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.rows);
        let start = start.min(end);
        Self {
            data: self.data[start * self.cols..end * self.cols].to_vec(),
            rows: end - start,
            cols: self.cols,
        }
    }

    /// Leading `rows x cols` block.
    pub fn top_left(&self, rows: usize, cols: usize) -> Self {
        let rows = rows.min(self.rows);
        let cols = cols.min(self.cols);
        let mut out = Self::zeros(rows, cols);
        for r in 0..rows {
            for c in 0..cols {
                out.set(r, c, self.get(r, c));
            }
        }
        out
    }

    /// `self ⊕ other`, block diagonal.
    pub fn direct_sum(&self, other: &Self) -> Self {
        let mut out = Self::zeros(self.rows + other.rows, self.cols + other.cols);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.set(r, c, self.get(r, c));
            }
        }
        for r in 0..other.rows {
            for c in 0..other.cols {
                out.set(self.rows + r, self.cols + c, other.get(r, c));
            }
        }
        out
    }

    /// Gram matrix of rows `from..`: G[b][a] = Σ_{i ≥ from} conj(M[i][b]) M[i][a].
    pub fn tail_gram(&self, from: usize) -> Self {
        let mut g = Self::zeros(self.cols, self.cols);
        for i in from..self.rows {
            let row = self.row(i);
            for b in 0..self.cols {
                let rb = row[b].conj();
                if rb == C64::new(0.0, 0.0) {
                    continue;
                }
                for a in 0..self.cols {
                    let k = g.idx(b, a);
                    g.data[k] += rb * row[a];
                }
            }
        }
        g
    }

    /// Left-multiplies by a 2x2 block acting on rows `i` and `j`.
    pub fn apply_two_mode(&mut self, i: usize, j: usize, u: [[C64; 2]; 2]) -> Result<(), LinalgError> {
        for &k in &[i, j] {
            if k >= self.rows {
                return Err(LinalgError::IndexOutOfRange {
                    what: "two-mode row",
                    index: k,
                    dim: self.rows,
                });
            }
        }
        self.mix_rows(i, j, u);
        Ok(())
    }

    /// [`CMatrix::apply_two_mode`] without the row check; callers keep
    /// `i` and `j` below `rows`.
    pub(crate) fn mix_rows(&mut self, i: usize, j: usize, u: [[C64; 2]; 2]) {
        for c in 0..self.cols {
            let a = self.get(i, c);
            let b = self.get(j, c);
            self.set(i, c, u[0][0] * a + u[0][1] * b);
            self.set(j, c, u[1][0] * a + u[1][1] * b);
        }
    }

    /// Multiplies row `i` by `phase`.
    pub fn scale_row(&mut self, i: usize, phase: C64) {
        for c in 0..self.cols {
            let v = self.get(i, c);
            self.set(i, c, v * phase);
        }
    }

    /// Largest entrywise deviation of M M† (and M† M) from the identity.
    pub fn unitarity_deviation(&self) -> f64 {
        if !self.is_square() {
            return f64::INFINITY;
        }
        let d = self.rows;
        let mut worst: f64 = 0.0;
        for i in 0..d {
            for j in 0..d {
                let mut row_dot = C64::new(0.0, 0.0);
                let mut col_dot = C64::new(0.0, 0.0);
                for k in 0..d {
                    row_dot += self.get(i, k) * self.get(j, k).conj();
                    col_dot += self.get(k, i).conj() * self.get(k, j);
                }
                let target = if i == j { 1.0 } else { 0.0 };
                worst = worst
                    .max((row_dot - C64::new(target, 0.0)).norm())
                    .max((col_dot - C64::new(target, 0.0)).norm());
            }
        }
        worst
    }

    pub fn is_unitary(&self, tolerance: f64) -> bool {
        self.unitarity_deviation() <= tolerance
    }

    /// Singular values in non-increasing order.
    pub fn singular_values(&self) -> Vec<f64> {
        if self.rows == 0 || self.cols == 0 {
            return vec![];
        }
        let mut m = Mat::<C64>::zeros(self.rows, self.cols);
        for r in 0..self.rows {
            for c in 0..self.cols {
                m.write(r, c, self.get(r, c));
            }
        }

        let svd = m.thin_svd();
        let s = svd.s_diagonal();

        let mut out = Vec::with_capacity(s.nrows());
        for i in 0..s.nrows() {
            out.push(s.read(i).re);
        }
        out.sort_by(|a, b| b.total_cmp(a));
        out
    }

    pub fn max_abs_diff(&self, other: &Self) -> Result<f64, LinalgError> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(LinalgError::ShapeMismatch {
                left: (self.rows, self.cols),
                right: (other.rows, other.cols),
            });
        }
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max))
    }
}
