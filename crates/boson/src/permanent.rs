use crate::error::BosonError;
use linalg::{CMatrix, C64};

/// Largest order whose Gray-code loop index fits in a u64.
pub const MAX_ORDER: usize = 63;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Method {
    /// Glynn's formula in Gray-code order, O(n 2^n).
    #[default]
    Glynn,
    /// Ryser's inclusion-exclusion in Gray-code order, O(n 2^n).
    Ryser,
    /// Direct sum over all n! permutations. Reference only.
    Naive,
}

/// per(A) = Σ_σ ∏_i A[σ(i), i], computed with Glynn's formula.
///
/// The empty matrix has permanent 1. Accumulation is in complex double
/// precision; beyond n ≈ 20 cancellation between the 2^(n-1) signed terms can
/// swamp the result for matrices whose permanent is small relative to its
/// terms. That ceiling is inherent to both formulas and is not corrected here.
pub fn permanent(a: &CMatrix) -> Result<C64, BosonError> {
    permanent_with(a, Method::Glynn)
}

pub fn permanent_with(a: &CMatrix, method: Method) -> Result<C64, BosonError> {
    if !a.is_square() {
        return Err(BosonError::NotSquare {
            rows: a.rows,
            cols: a.cols,
        });
    }
    let n = a.rows;
    if n > MAX_ORDER {
        return Err(BosonError::BudgetExceeded {
            what: "permanent order",
            requested: n as u64,
            limit: MAX_ORDER as u64,
        });
    }
    Ok(match method {
        Method::Glynn => glynn(&a.data, n),
        Method::Ryser => ryser(&a.data, n),
        Method::Naive => naive(&a.data, n),
    })
}

fn glynn(a: &[C64], n: usize) -> C64 {
    match n {
        0 => return C64::new(1.0, 0.0),
        1 => return a[0],
        _ => {}
    }

    // col_sums[j] = Σ_i δ_i a[i][j], all δ = +1 to start
    let mut col_sums = vec![C64::new(0.0, 0.0); n];
    for i in 0..n {
        for j in 0..n {
            col_sums[j] += a[i * n + j];
        }
    }

    let mut total: C64 = col_sums.iter().product();
    let mut sign = 1.0;
    let terms: u64 = 1 << (n - 1);

    for k in 1..terms {
        // δ_0 stays +1; bit b of the Gray code drives δ_{b+1}
        let bit = k.trailing_zeros() as usize;
        let row = bit + 1;
        let gray = k ^ (k >> 1);
        let factor = if gray & (1 << bit) != 0 { -2.0 } else { 2.0 };
        for j in 0..n {
            col_sums[j] += a[row * n + j] * factor;
        }
        sign = -sign;
        let prod: C64 = col_sums.iter().product();
        total += prod * sign;
    }

    total / terms as f64
}

fn ryser(a: &[C64], n: usize) -> C64 {
    if n == 0 {
        return C64::new(1.0, 0.0);
    }

    // row_sums[i] = Σ_{j ∈ subset} a[i][j]
    let mut row_sums = vec![C64::new(0.0, 0.0); n];
    let mut total = C64::new(0.0, 0.0);
    let mut size = 0usize;
    let subsets: u64 = 1 << n;

    for k in 1..subsets {
        let col = k.trailing_zeros() as usize;
        let gray = k ^ (k >> 1);
        if gray & (1 << col) != 0 {
            size += 1;
            for i in 0..n {
                row_sums[i] += a[i * n + col];
            }
        } else {
            size -= 1;
            for i in 0..n {
                row_sums[i] -= a[i * n + col];
            }
        }
        let prod: C64 = row_sums.iter().product();
        if size % 2 == 0 {
            total += prod;
        } else {
            total -= prod;
        }
    }

    if n % 2 == 0 {
        total
    } else {
        -total
    }
}

fn naive(a: &[C64], n: usize) -> C64 {
    fn expand(a: &[C64], n: usize, col: usize, used: &mut [bool]) -> C64 {
        if col == n {
            return C64::new(1.0, 0.0);
        }
        let mut acc = C64::new(0.0, 0.0);
        for row in 0..n {
            if used[row] {
                continue;
            }
            let v = a[row * n + col];
            if v == C64::new(0.0, 0.0) {
                continue;
            }
            used[row] = true;
            acc += v * expand(a, n, col + 1, used);
            used[row] = false;
        }
        acc
    }

    let mut used = vec![false; n];
    expand(a, n, 0, &mut used)
}
