use crate::matrix::{CMatrix, LinalgError, C64};
use rng::ONDRng;
use std::f64::consts::PI;

/// Lossless beam splitter with mixing angle `theta` and phase `phi`:
/// [[cos θ, -e^{-iφ} sin θ], [e^{iφ} sin θ, cos θ]].
pub fn beam_splitter(theta: f64, phi: f64) -> [[C64; 2]; 2] {
    let c = theta.cos();
    let s = theta.sin();
    [
        [C64::new(c, 0.0), -C64::from_polar(s, -phi)],
        [C64::from_polar(s, phi), C64::new(c, 0.0)],
    ]
}

/// 50:50 beam splitter.
pub fn balanced_beam_splitter() -> [[C64; 2]; 2] {
    beam_splitter(PI / 4.0, 0.0)
}

/// Mach-Zehnder block: [[e^{iφ} cos θ, -sin θ], [e^{iφ} sin θ, cos θ]].
pub fn mzi(theta: f64, phi: f64) -> [[C64; 2]; 2] {
    let e = C64::from_polar(1.0, phi);
    let c = theta.cos();
    let s = theta.sin();
    [
        [e * c, C64::new(-s, 0.0)],
        [e * s, C64::new(c, 0.0)],
    ]
}

/// Single-mode phase shifter on mode `k` of a `d`-mode network.
pub fn phase_shifter(d: usize, k: usize, phi: f64) -> Result<CMatrix, LinalgError> {
    if k >= d {
        return Err(LinalgError::IndexOutOfRange {
            what: "phase shifter mode",
            index: k,
            dim: d,
        });
    }
    let mut u = CMatrix::identity(d);
    u.set(k, k, C64::from_polar(1.0, phi));
    Ok(u)
}

/// Two-mode block embedded in a `d`-mode identity.
pub fn embed_two_mode(d: usize, i: usize, j: usize, block: [[C64; 2]; 2]) -> Result<CMatrix, LinalgError> {
    let mut u = CMatrix::identity(d);
    u.apply_two_mode(i, j, block)?;
    Ok(u)
}

/// Mode relabelling: input mode `j` exits in mode `perm[j]`.
pub fn permutation(perm: &[usize]) -> Result<CMatrix, LinalgError> {
    let d = perm.len();
    let mut seen = vec![false; d];
    for &p in perm {
        if p >= d || seen[p] {
            return Err(LinalgError::NotPermutation(perm.to_vec()));
        }
        seen[p] = true;
    }
    let mut u = CMatrix::zeros(d, d);
    for (j, &p) in perm.iter().enumerate() {
        u.set(p, j, C64::new(1.0, 0.0));
    }
    Ok(u)
}

/// Balanced multiport: U[j][k] = e^{2πi jk/d} / √d.
pub fn fourier(d: usize) -> CMatrix {
    let mut u = CMatrix::zeros(d, d);
    let norm = 1.0 / (d as f64).sqrt();
    for j in 0..d {
        for k in 0..d {
            let angle = 2.0 * PI * (j * k) as f64 / d as f64;
            u.set(j, k, C64::from_polar(norm, angle));
        }
    }
    u
}

/// Random interferometer from a rectangular MZI mesh (d layers, alternating
/// even/odd nearest-neighbour pairs) followed by output phases.
pub fn random_mesh(d: usize, rng: &mut ONDRng) -> CMatrix {
    let mut u = CMatrix::identity(d);
    for layer in 0..d {
        let mut i = layer % 2;
        while i + 1 < d {
            let theta = rng.next_range(0.0, PI / 2.0, b"MESH_THETA");
            let phi = rng.next_range(0.0, 2.0 * PI, b"MESH_PHI");
            u.mix_rows(i, i + 1, mzi(theta, phi));
            i += 2;
        }
    }
    for k in 0..d {
        let phi = rng.next_range(0.0, 2.0 * PI, b"MESH_OUT");
        u.scale_row(k, C64::from_polar(1.0, phi));
    }
    u
}
