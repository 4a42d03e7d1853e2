use crate::error::BosonError;
use crate::fock::Occupation;
use linalg::CMatrix;

/// red_{T,S}(U): row i of `u` repeated `output[i]` times and column j repeated
/// `input[j]` times, both in increasing index order.
///
/// `output` indexes the rows of `u` and `input` its columns, so rectangular
/// blocks (a leading row block, a Gram matrix) reduce the same way as the
/// full interferometer.
pub fn reduce(u: &CMatrix, output: &Occupation, input: &Occupation) -> Result<CMatrix, BosonError> {
    if output.modes() != u.rows {
        return Err(BosonError::ModeCountMismatch {
            what: "output occupation vs matrix rows",
            expected: u.rows,
            found: output.modes(),
        });
    }
    if input.modes() != u.cols {
        return Err(BosonError::ModeCountMismatch {
            what: "input occupation vs matrix columns",
            expected: u.cols,
            found: input.modes(),
        });
    }
    let (n_in, n_out) = (input.photons(), output.photons());
    if n_in != n_out {
        return Err(BosonError::PhotonCountMismatch {
            input: n_in,
            output: n_out,
        });
    }

    Ok(select(u, &output.photon_modes(), &input.photon_modes()))
}

/// Submatrix with the given row and column indices, repeats allowed.
/// Indices must be in range.
pub(crate) fn select(u: &CMatrix, rows: &[usize], cols: &[usize]) -> CMatrix {
    let mut out = CMatrix::zeros(rows.len(), cols.len());
    for (r, &i) in rows.iter().enumerate() {
        let src = u.row(i);
        for (c, &j) in cols.iter().enumerate() {
            out.set(r, c, src[j]);
        }
    }
    out
}
