use crate::error::BosonError;
use crate::fock::binomial;

/// Upper bounds checked before any exponential-cost work starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Budget {
    /// Largest permanent order (total photon number) accepted.
    pub max_photons: usize,
    pub max_modes: usize,
    /// Largest outcome space an exact probability table may enumerate.
    pub max_outcomes: u64,
    /// Largest estimated permanent work (complex multiply-adds) one
    /// mode-by-mode shot may need. See [`Budget::mode_by_mode_cost`].
    pub max_mode_by_mode_ops: u64,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            max_photons: 20,
            max_modes: 512,
            max_outcomes: 1_000_000,
            max_mode_by_mode_ops: 10_000_000_000,
        }
    }
}

impl Budget {
    pub fn check_photons(&self, photons: usize) -> Result<(), BosonError> {
        check("photons", photons as u64, self.max_photons as u64)
    }

    pub fn check_modes(&self, modes: usize) -> Result<(), BosonError> {
        check("modes", modes as u64, self.max_modes as u64)
    }

    pub fn check_outcomes(&self, outcomes: u64) -> Result<(), BosonError> {
        check("outcomes", outcomes, self.max_outcomes)
    }

    /// Upper estimate of the work in one mode-by-mode shot with `photons`
    /// photons over `modes` visited modes. A marginal whose prefix holds `m`
    /// photons pairs up to C(n, m)² sub-occupations, each pair costing an
    /// order-(n-m) Glynn permanent; every visited mode may touch each `m`.
    pub fn mode_by_mode_cost(photons: usize, modes: usize) -> u64 {
        let n = photons as u64;
        let per_mode = (0..=n).fold(0u64, |acc, m| {
            let subs = binomial(n, m);
            let rest = n - m;
            let glynn = rest
                .max(1)
                .saturating_mul(1u64.checked_shl(rest as u32).unwrap_or(u64::MAX));
            acc.saturating_add(subs.saturating_mul(subs).saturating_mul(glynn))
        });
        per_mode.saturating_mul(modes as u64)
    }

    pub fn check_mode_by_mode(&self, photons: usize, modes: usize) -> Result<(), BosonError> {
        check(
            "mode-by-mode ops",
            Self::mode_by_mode_cost(photons, modes),
            self.max_mode_by_mode_ops,
        )
    }
}

fn check(what: &'static str, requested: u64, limit: u64) -> Result<(), BosonError> {
    if requested > limit {
        return Err(BosonError::BudgetExceeded {
            what,
            requested,
            limit,
        });
    }
    Ok(())
}
