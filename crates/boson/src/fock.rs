use crate::error::BosonError;
use linalg::LinalgError;
use std::fmt;

/// Photon counts per mode. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Occupation(Vec<usize>);

impl Occupation {
    pub fn new(counts: Vec<usize>) -> Self {
        Self(counts)
    }

    pub fn vacuum(modes: usize) -> Self {
        Self(vec![0; modes])
    }

    pub fn counts(&self) -> &[usize] {
        &self.0
    }

    pub fn modes(&self) -> usize {
        self.0.len()
    }

    pub fn photons(&self) -> usize {
        self.0.iter().sum()
    }

    pub fn get(&self, mode: usize) -> usize {
        self.0.get(mode).copied().unwrap_or(0)
    }

    /// ln(∏ t_i!)
    pub fn ln_factorial_product(&self) -> f64 {
        self.0.iter().map(|&t| ln_factorial(t)).sum()
    }

    /// Each mode index repeated once per photon, in increasing mode order.
    pub fn photon_modes(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.photons());
        for (mode, &t) in self.0.iter().enumerate() {
            out.extend(std::iter::repeat(mode).take(t));
        }
        out
    }

    pub fn from_photon_modes(modes: usize, photons: &[usize]) -> Result<Self, BosonError> {
        let mut counts = vec![0; modes];
        for &p in photons {
            match counts.get_mut(p) {
                Some(c) => *c += 1,
                None => {
                    return Err(BosonError::ModeCountMismatch {
                        what: "photon mode index",
                        expected: modes,
                        found: p + 1,
                    })
                }
            }
        }
        Ok(Self(counts))
    }

    /// First `k` modes.
    pub fn prefix(&self, k: usize) -> Self {
        Self(self.0[..k.min(self.0.len())].to_vec())
    }

    /// Appends `extra` empty modes.
    pub fn padded(&self, extra: usize) -> Self {
        let mut counts = self.0.clone();
        counts.resize(self.0.len() + extra, 0);
        Self(counts)
    }

    /// Relabels modes: the photons of mode `j` move to mode `perm[j]`.
    /// `perm` must be a permutation of `0..modes`.
    pub fn permuted(&self, perm: &[usize]) -> Result<Self, BosonError> {
        let d = self.0.len();
        let mut counts = vec![0; d];
        let mut seen = vec![false; d];
        if perm.len() != d {
            return Err(LinalgError::NotPermutation(perm.to_vec()).into());
        }
        for (&p, &t) in perm.iter().zip(&self.0) {
            if p >= d || seen[p] {
                return Err(LinalgError::NotPermutation(perm.to_vec()).into());
            }
            seen[p] = true;
            counts[p] = t;
        }
        Ok(Self(counts))
    }

    /// Componentwise difference, `None` if any entry would go negative.
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        if self.0.len() != other.0.len() {
            return None;
        }
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| a.checked_sub(*b))
            .collect::<Option<Vec<_>>>()
            .map(Self)
    }

    /// Every `a` with `a_j <= self_j` and `Σ a = photons`.
    pub fn sub_occupations(&self, photons: usize) -> Vec<Self> {
        let mut out = vec![];
        let mut current = Vec::with_capacity(self.0.len());
        fill_bounded(&self.0, photons, &mut current, &mut out);
        out
    }

    /// ∏ C(self_j, a_j)
    pub fn choose_weight(&self, sub: &Self) -> f64 {
        self.0
            .iter()
            .zip(&sub.0)
            .map(|(&n, &k)| binomial(n as u64, k as u64) as f64)
            .product()
    }

    /// Every occupation of `modes` modes holding exactly `photons` photons,
    /// in lexicographic order.
    pub fn all_with_photons(modes: usize, photons: usize) -> Vec<Self> {
        let mut out = vec![];
        let mut current = Vec::with_capacity(modes);
        fill_compositions(modes, photons, true, &mut current, &mut out);
        out
    }

    /// Every occupation of `modes` modes holding at most `photons` photons.
    pub fn all_up_to(modes: usize, photons: usize) -> Vec<Self> {
        let mut out = vec![];
        let mut current = Vec::with_capacity(modes);
        fill_compositions(modes, photons, false, &mut current, &mut out);
        out
    }

    /// C(n + d - 1, d - 1), saturating.
    pub fn outcome_count(modes: usize, photons: usize) -> u64 {
        if modes == 0 {
            return u64::from(photons == 0);
        }
        binomial((photons + modes - 1) as u64, (modes - 1) as u64)
    }

    /// C(n + d, d), saturating.
    pub fn outcome_count_up_to(modes: usize, photons: usize) -> u64 {
        binomial((photons + modes) as u64, modes as u64)
    }
}

impl From<Vec<usize>> for Occupation {
    fn from(value: Vec<usize>) -> Self {
        Self(value)
    }
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|")?;
        for (i, t) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", t)?;
        }
        write!(f, "⟩")
    }
}

fn fill_compositions(modes: usize, remaining: usize, exact: bool, current: &mut Vec<usize>, out: &mut Vec<Occupation>) {
    if current.len() == modes {
        if !exact || remaining == 0 {
            out.push(Occupation(current.clone()));
        }
        return;
    }
    if exact && current.len() + 1 == modes {
        current.push(remaining);
        out.push(Occupation(current.clone()));
        current.pop();
        return;
    }
    for c in 0..=remaining {
        current.push(c);
        fill_compositions(modes, remaining - c, exact, current, out);
        current.pop();
    }
}

fn fill_bounded(bounds: &[usize], remaining: usize, current: &mut Vec<usize>, out: &mut Vec<Occupation>) {
    let k = current.len();
    if k == bounds.len() {
        if remaining == 0 {
            out.push(Occupation(current.clone()));
        }
        return;
    }
    let capacity: usize = bounds[k + 1..].iter().sum();
    let lo = remaining.saturating_sub(capacity);
    let hi = bounds[k].min(remaining);
    for c in lo..=hi {
        current.push(c);
        fill_bounded(bounds, remaining - c, current, out);
        current.pop();
    }
}

/// ln(k!) by direct summation of logarithms.
pub fn ln_factorial(k: usize) -> f64 {
    (2..=k).map(|i| (i as f64).ln()).sum()
}

/// C(n, k), saturating at u64::MAX.
pub fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        acc = acc * (n - i) as u128 / (i + 1) as u128;
        if acc > u64::MAX as u128 {
            return u64::MAX;
        }
    }
    acc as u64
}
