use crate::error::BosonError;
use crate::fock::Occupation;
use linalg::CMatrix;

/// Unitary on `total_modes()` modes whose first `physical_modes()` modes are
/// observed. Any further modes are loss environments that start empty and are
/// never reported.
#[derive(Clone, Debug)]
pub struct Network {
    matrix: CMatrix,
    physical_modes: usize,
}

/// Square, finite and unitary within `tolerance`.
pub fn validate_unitary(u: &CMatrix, tolerance: f64) -> Result<(), BosonError> {
    if !u.is_square() {
        return Err(BosonError::NotSquare {
            rows: u.rows,
            cols: u.cols,
        });
    }
    for r in 0..u.rows {
        for c in 0..u.cols {
            if !u.get(r, c).is_finite() {
                return Err(BosonError::NonFiniteEntry { row: r, col: c });
            }
        }
    }
    let deviation = u.unitarity_deviation();
    if deviation > tolerance {
        return Err(BosonError::NotUnitary {
            deviation,
            tolerance,
        });
    }
    Ok(())
}

impl Network {
    pub fn lossless(u: CMatrix, tolerance: f64) -> Result<Self, BosonError> {
        validate_unitary(&u, tolerance)?;
        let physical_modes = u.rows;
        Ok(Self {
            matrix: u,
            physical_modes,
        })
    }

    pub(crate) fn from_augmented(matrix: CMatrix, physical_modes: usize) -> Self {
        Self {
            matrix,
            physical_modes,
        }
    }

    pub fn matrix(&self) -> &CMatrix {
        &self.matrix
    }

    pub fn physical_modes(&self) -> usize {
        self.physical_modes
    }

    pub fn total_modes(&self) -> usize {
        self.matrix.rows
    }

    pub fn is_lossy(&self) -> bool {
        self.physical_modes < self.matrix.rows
    }

    /// Physical input padded with empty environment modes.
    pub fn embed(&self, input: &Occupation) -> Result<Occupation, BosonError> {
        if input.modes() != self.physical_modes {
            return Err(BosonError::ModeCountMismatch {
                what: "input occupation",
                expected: self.physical_modes,
                found: input.modes(),
            });
        }
        Ok(input.padded(self.total_modes() - self.physical_modes))
    }
}
