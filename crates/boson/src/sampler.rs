use crate::error::BosonError;
use crate::fock::Occupation;
use crate::network::Network;
use crate::photon::sample_photon_by_photon;
use crate::probability::marginal_probability;
use linalg::CMatrix;
use rng::ONDRng;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Strategy {
    /// One output mode at a time, drawing its count from the marginal
    /// conditioned on the modes already fixed.
    #[default]
    ModeByMode,
    /// One photon at a time (Clifford & Clifford). Needs at most one photon
    /// per input mode.
    PhotonByPhoton,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "modebymode" | "mode" => Ok(Strategy::ModeByMode),
            "photonbyphoton" | "photon" => Ok(Strategy::PhotonByPhoton),
            other => Err(format!("unknown sampling strategy `{}`", other)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::ModeByMode => write!(f, "mode-by-mode"),
            Strategy::PhotonByPhoton => write!(f, "photon-by-photon"),
        }
    }
}

/// Inverse-CDF draw. `x` in [0, 1) is scaled by the total weight and the
/// first index whose running sum is strictly greater than it is chosen.
/// Non-positive weights are never chosen. If round-off leaves the target at
/// or past the final running sum, the last positive weight wins. `None` when
/// the weights have no positive finite mass.
pub fn draw_index(weights: &[f64], x: f64) -> Option<usize> {
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if !(total > 0.0) || !total.is_finite() {
        return None;
    }

    let target = x * total;
    let mut acc = 0.0;
    let mut last_positive = None;
    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        acc += w;
        last_positive = Some(i);
        if target < acc {
            return Some(i);
        }
    }
    last_positive
}

/// Draws one physical output occupation for `input` sent through `network`.
pub fn sample(network: &Network, input: &Occupation, strategy: Strategy, rng: &mut ONDRng) -> Result<Occupation, BosonError> {
    let embedded = network.embed(input)?;
    match strategy {
        Strategy::ModeByMode => sample_mode_by_mode(network, &embedded, rng),
        Strategy::PhotonByPhoton => sample_photon_by_photon(network, &embedded, rng),
    }
}

fn sample_mode_by_mode(network: &Network, input: &Occupation, rng: &mut ONDRng) -> Result<Occupation, BosonError> {
    let u = network.matrix();
    let d = network.physical_modes();
    let conserving = !network.is_lossy();

    let mut placed = Vec::with_capacity(d);
    let mut remaining = input.photons();

    for mode in 0..d {
        if remaining == 0 {
            placed.push(0);
            continue;
        }
        if conserving && mode + 1 == d {
            placed.push(remaining);
            break;
        }

        let weights = conditional_weights(u, input, &mut placed, remaining)?;
        let total: f64 = weights.iter().sum();
        debug!(mode, remaining, total, "conditional weights");

        let x = rng.next_f64(b"MODE_COUNT");
        let c = match draw_index(&weights, x) {
            Some(c) => c,
            None => {
                warn!(mode, total, "conditional weights vanished");
                return Err(BosonError::VanishingWeights { mode, total });
            }
        };
        placed.push(c);
        remaining -= c;
    }

    Ok(Occupation::new(placed))
}

/// Unnormalised weights for placing `0..=remaining` photons in mode
/// `placed.len()`, given the counts already fixed in `placed`. Each weight is
/// the marginal of the extended prefix.
fn conditional_weights(u: &CMatrix, input: &Occupation, placed: &mut Vec<usize>, remaining: usize) -> Result<Vec<f64>, BosonError> {
    let mut weights = Vec::with_capacity(remaining + 1);
    for c in 0..=remaining {
        placed.push(c);
        let p = marginal_probability(u, input, &Occupation::new(placed.clone()));
        placed.pop();
        weights.push(p?);
    }
    Ok(weights)
}

/// Probability that the mode-by-mode sampler emits `output`: the product,
/// along the sampler's own path, of each drawn weight over the positive mass
/// of its step. A forced last mode contributes 1.
pub fn path_probability(network: &Network, input: &Occupation, output: &Occupation) -> Result<f64, BosonError> {
    let embedded = network.embed(input)?;
    let d = network.physical_modes();
    if output.modes() != d {
        return Err(BosonError::ModeCountMismatch {
            what: "output occupation",
            expected: d,
            found: output.modes(),
        });
    }
    let u = network.matrix();
    let conserving = !network.is_lossy();

    let mut placed = Vec::with_capacity(d);
    let mut remaining = embedded.photons();
    let mut p = 1.0;
    for (mode, &t) in output.counts().iter().enumerate() {
        if t > remaining {
            return Ok(0.0);
        }
        if remaining == 0 {
            placed.push(0);
            continue;
        }
        if conserving && mode + 1 == d {
            if t != remaining {
                return Ok(0.0);
            }
            break;
        }

        let weights = conditional_weights(u, &embedded, &mut placed, remaining)?;
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if !(total > 0.0) || !total.is_finite() {
            return Err(BosonError::VanishingWeights { mode, total });
        }
        p *= weights[t].max(0.0) / total;
        if p == 0.0 {
            return Ok(0.0);
        }
        placed.push(t);
        remaining -= t;
    }
    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_skips_zero_weights() {
        let w = [0.0, 0.5, 0.0, 0.5];
        assert_eq!(draw_index(&w, 0.0), Some(1));
        assert_eq!(draw_index(&w, 0.49), Some(1));
        assert_eq!(draw_index(&w, 0.5), Some(3));
        assert_eq!(draw_index(&w, 0.999_999), Some(3));
    }

    #[test]
    fn draw_boundary_goes_right() {
        // target equal to a running sum picks the next branch
        assert_eq!(draw_index(&[1.0, 1.0], 0.5), Some(1));
    }

    #[test]
    fn draw_rejects_empty_mass() {
        assert_eq!(draw_index(&[0.0, 0.0], 0.3), None);
        assert_eq!(draw_index(&[], 0.3), None);
        assert_eq!(draw_index(&[f64::NAN], 0.3), None);
    }

    #[test]
    fn strategy_parses() {
        assert_eq!("mode-by-mode".parse::<Strategy>().unwrap(), Strategy::ModeByMode);
        assert_eq!("PHOTON_BY_PHOTON".parse::<Strategy>().unwrap(), Strategy::PhotonByPhoton);
        assert!("exact".parse::<Strategy>().is_err());
    }

    #[test]
    fn unreachable_outputs_have_zero_path_probability() {
        let u = linalg::unitary::fourier(3);
        let net = Network::lossless(u, 1e-9).unwrap();
        let s = Occupation::new(vec![1, 1, 0]);
        assert_eq!(path_probability(&net, &s, &Occupation::new(vec![3, 0, 0])).unwrap(), 0.0);
        assert_eq!(path_probability(&net, &s, &Occupation::new(vec![1, 0, 0])).unwrap(), 0.0);
        assert!(path_probability(&net, &s, &Occupation::new(vec![1, 1])).is_err());
    }
}
