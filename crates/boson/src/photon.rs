use crate::error::BosonError;
use crate::fock::Occupation;
use crate::network::Network;
use crate::permanent::permanent;
use crate::reduction::select;
use crate::sampler::draw_index;
use linalg::C64;
use rng::ONDRng;
use tracing::{debug, warn};

/// Clifford & Clifford photon-by-photon sampling on the full (augmented)
/// unitary. Photon `k` picks its output mode with weight
/// |per(A[r ∪ {i}, c_0..c_k])|², Laplace-expanded along the new row so only
/// the k minors of order k-1 are needed per step. Environment modes are
/// sampled like any other and dropped at the end.
pub(crate) fn sample_photon_by_photon(network: &Network, input: &Occupation, rng: &mut ONDRng) -> Result<Occupation, BosonError> {
    if let Some((mode, &photons)) = input.counts().iter().enumerate().find(|(_, &s)| s > 1) {
        return Err(BosonError::CollidingInput { mode, photons });
    }

    let u = network.matrix();
    let m = u.rows;
    let n = input.photons();

    let mut cols = input.photon_modes();
    rng.shuffle(&mut cols, b"PHOTON_ORDER");

    let mut rows: Vec<usize> = Vec::with_capacity(n);
    let mut weights = vec![0.0; m];
    for k in 0..n {
        let active = &cols[..=k];

        let mut minors = Vec::with_capacity(k + 1);
        let mut others = Vec::with_capacity(k);
        for skip in 0..=k {
            others.clear();
            others.extend(active.iter().enumerate().filter(|(j, _)| *j != skip).map(|(_, &c)| c));
            minors.push(permanent(&select(u, &rows, &others))?);
        }

        for (i, w) in weights.iter_mut().enumerate() {
            let row = u.row(i);
            let mut amp = C64::new(0.0, 0.0);
            for (j, &c) in active.iter().enumerate() {
                amp += row[c] * minors[j];
            }
            *w = amp.norm_sqr();
        }

        let x = rng.next_f64(b"PHOTON_MODE");
        let chosen = match draw_index(&weights, x) {
            Some(i) => i,
            None => {
                let total: f64 = weights.iter().sum();
                warn!(photon = k, total, "photon weights vanished");
                return Err(BosonError::VanishingWeights { mode: k, total });
            }
        };
        debug!(photon = k, mode = chosen, "photon placed");
        rows.push(chosen);
    }

    let full = Occupation::from_photon_modes(m, &rows)?;
    Ok(full.prefix(network.physical_modes()))
}
