use boson::Occupation;
use std::collections::BTreeMap;

/// Pearson goodness-of-fit of observed counts against exact probabilities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChiSquare {
    pub statistic: f64,
    pub dof: usize,
}

impl ChiSquare {
    /// Statistic within `sigmas` standard deviations (√(2 dof)) of its mean.
    pub fn within(&self, sigmas: f64) -> bool {
        let dof = self.dof as f64;
        self.statistic <= dof + sigmas * (2.0 * dof).sqrt()
    }
}

/// Bins whose expected count falls below 5 are pooled, smallest first, until
/// the pool reaches 5. Observed outcomes absent from `table` count against
/// the pool.
pub fn chi_square(histogram: &BTreeMap<Occupation, usize>, table: &[(Occupation, f64)], shots: usize) -> ChiSquare {
    let total = shots as f64;

    let mut bins: Vec<(f64, f64)> = table
        .iter()
        .map(|(t, p)| (p * total, histogram.get(t).copied().unwrap_or(0) as f64))
        .collect();
    bins.sort_by(|a, b| a.0.total_cmp(&b.0));

    let listed: f64 = bins.iter().map(|b| b.1).sum();
    let stray = histogram.values().sum::<usize>() as f64 - listed;

    let mut merged = Vec::with_capacity(bins.len());
    let mut pool = (0.0, stray.max(0.0));
    for (expected, observed) in bins {
        if expected >= 5.0 {
            merged.push((expected, observed));
            continue;
        }
        pool.0 += expected;
        pool.1 += observed;
        if pool.0 >= 5.0 {
            merged.push(pool);
            pool = (0.0, 0.0);
        }
    }
    if pool.0 > 0.0 || pool.1 > 0.0 {
        match merged.first_mut() {
            Some(first) => {
                first.0 += pool.0;
                first.1 += pool.1;
            }
            None => merged.push(pool),
        }
    }

    let statistic = merged
        .iter()
        .filter(|(e, _)| *e > 0.0)
        .map(|(e, o)| (o - e) * (o - e) / e)
        .sum();

    ChiSquare {
        statistic,
        dof: merged.len().saturating_sub(1),
    }
}
