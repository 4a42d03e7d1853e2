use boson::probability::{marginal_probability, probability};
use boson::{BosonError, Budget, Network, Occupation};

/// Probability of observing `output` on the physical modes. For a lossy
/// network this is the marginal over every environment configuration.
pub fn outcome_probability(network: &Network, input: &Occupation, output: &Occupation) -> Result<f64, BosonError> {
    let embedded = network.embed(input)?;
    if output.modes() != network.physical_modes() {
        return Err(BosonError::ModeCountMismatch {
            what: "output occupation",
            expected: network.physical_modes(),
            found: output.modes(),
        });
    }
    if network.is_lossy() {
        marginal_probability(network.matrix(), &embedded, output)
    } else {
        probability(network.matrix(), &embedded, output)
    }
}

/// Every reachable physical outcome with its exact probability, in
/// lexicographic order. Refused when the outcome space exceeds
/// `budget.max_outcomes`.
pub fn probability_table(network: &Network, input: &Occupation, budget: &Budget) -> Result<Vec<(Occupation, f64)>, BosonError> {
    let d = network.physical_modes();
    let n = input.photons();
    budget.check_photons(n)?;

    let outcomes = if network.is_lossy() {
        budget.check_outcomes(Occupation::outcome_count_up_to(d, n))?;
        Occupation::all_up_to(d, n)
    } else {
        budget.check_outcomes(Occupation::outcome_count(d, n))?;
        Occupation::all_with_photons(d, n)
    };

    outcomes
        .into_iter()
        .map(|t| outcome_probability(network, input, &t).map(|p| (t, p)))
        .collect()
}
