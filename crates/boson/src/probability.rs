use crate::error::BosonError;
use crate::fock::Occupation;
use crate::permanent::permanent;
use crate::reduction::reduce;
use linalg::{CMatrix, C64};
use tracing::warn;

/// Negative round-off tolerated (and clamped to zero) in a probability.
pub const NEGATIVE_TOLERANCE: f64 = 1e-10;

fn check_input(u: &CMatrix, input: &Occupation) -> Result<(), BosonError> {
    if input.modes() != u.cols {
        return Err(BosonError::ModeCountMismatch {
            what: "input occupation",
            expected: u.cols,
            found: input.modes(),
        });
    }
    Ok(())
}

fn finite_permanent(m: &CMatrix) -> Result<C64, BosonError> {
    let p = permanent(m)?;
    if !p.is_finite() {
        return Err(BosonError::NonFinitePermanent { order: m.rows });
    }
    Ok(p)
}

/// per(red_{T,S}(U)) / √(∏S! ∏T!). Zero when photon numbers differ.
pub fn amplitude(u: &CMatrix, input: &Occupation, output: &Occupation) -> Result<C64, BosonError> {
    check_input(u, input)?;
    if output.modes() != u.rows {
        return Err(BosonError::ModeCountMismatch {
            what: "output occupation",
            expected: u.rows,
            found: output.modes(),
        });
    }
    if input.photons() != output.photons() {
        return Ok(C64::new(0.0, 0.0));
    }
    let per = finite_permanent(&reduce(u, output, input)?)?;
    let ln_norm = 0.5 * (input.ln_factorial_product() + output.ln_factorial_product());
    Ok(per * (-ln_norm).exp())
}

/// p(S, T) = |per(red_{T,S}(U))|² / (∏S! ∏T!).
///
/// Unequal photon numbers give 0 without touching the permanent. The
/// factorial denominator is combined in log space.
pub fn probability(u: &CMatrix, input: &Occupation, output: &Occupation) -> Result<f64, BosonError> {
    check_input(u, input)?;
    if output.modes() != u.rows {
        return Err(BosonError::ModeCountMismatch {
            what: "output occupation",
            expected: u.rows,
            found: output.modes(),
        });
    }
    if input.photons() != output.photons() {
        return Ok(0.0);
    }
    let per = finite_permanent(&reduce(u, output, input)?)?;
    Ok(from_permanent(per, input.ln_factorial_product() + output.ln_factorial_product()))
}

fn from_permanent(per: C64, ln_denominator: f64) -> f64 {
    let norm = per.norm();
    if norm == 0.0 {
        return 0.0;
    }
    (2.0 * norm.ln() - ln_denominator).exp()
}

/// Probability that output modes `0..k` hold exactly `prefix` photons, summed
/// over every arrangement of the remaining photons in modes `k..`.
///
/// Splitting each photon's creation operator into its part on the first `k`
/// rows and its part on the rest gives
///
/// P = 1/(∏S! ∏t!) Σ_{a,b} w(a) w(b) per(red_{t,a}(U_top)) conj(per(red_{t,b}(U_top))) per(red_{S-b,S-a}(G))
///
/// where `a`, `b` run over sub-occupations of `S` holding `|t|` photons,
/// `w(a) = ∏ C(S_j, a_j)`, `U_top` is rows `0..k` and `G = U_rest† U_rest`.
/// No completion is enumerated. With `k` equal to the row count this is
/// [`probability`].
pub fn marginal_probability(u: &CMatrix, input: &Occupation, prefix: &Occupation) -> Result<f64, BosonError> {
    check_input(u, input)?;
    let k = prefix.modes();
    if k > u.rows {
        return Err(BosonError::ModeCountMismatch {
            what: "output prefix",
            expected: u.rows,
            found: k,
        });
    }
    let n = input.photons();
    let m = prefix.photons();
    if m > n {
        return Ok(0.0);
    }
    if k == u.rows {
        return probability(u, input, prefix);
    }

    let top = u.row_block(0, k);
    let gram = u.tail_gram(k);

    let subs = input.sub_occupations(m);
    let mut amps = Vec::with_capacity(subs.len());
    let mut rests = Vec::with_capacity(subs.len());
    for a in &subs {
        let per = finite_permanent(&reduce(&top, prefix, a)?)?;
        amps.push(per * input.choose_weight(a));
        // a_j <= S_j by construction
        rests.push(input.checked_sub(a).unwrap_or_else(|| Occupation::vacuum(input.modes())));
    }

    // G is Hermitian, so the (b, a) term is the conjugate of the (a, b) term.
    let mut total = 0.0;
    for i in 0..subs.len() {
        if amps[i] == C64::new(0.0, 0.0) {
            continue;
        }
        for j in i..subs.len() {
            if amps[j] == C64::new(0.0, 0.0) {
                continue;
            }
            let g = finite_permanent(&reduce(&gram, &rests[j], &rests[i])?)?;
            let term = (amps[i] * amps[j].conj() * g).re;
            total += if i == j { term } else { 2.0 * term };
        }
    }

    let value = total * (-(input.ln_factorial_product() + prefix.ln_factorial_product())).exp();
    clamp_round_off(value, k.saturating_sub(1))
}

fn clamp_round_off(value: f64, mode: usize) -> Result<f64, BosonError> {
    if !value.is_finite() {
        return Err(BosonError::NonFinitePermanent { order: mode + 1 });
    }
    if value < -NEGATIVE_TOLERANCE {
        warn!(mode, value, "marginal probability negative beyond round-off");
        return Err(BosonError::NegativeProbability { mode, value });
    }
    Ok(value.max(0.0))
}
