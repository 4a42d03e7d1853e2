use boson::{BosonError, Budget, Occupation, Strategy};
use linalg::unitary::fourier;
use linalg::{CMatrix, C64};
use simulator::{CancelToken, NetworkSpec, SamplingRequest, SimConfig, SimError, Simulator};

fn boson_err(e: SimError) -> BosonError {
    match e {
        SimError::Boson(b) => b,
        other => panic!("expected core error, got {}", other),
    }
}

#[test]
fn non_unitary_rejected_up_front() {
    let mut u = fourier(3);
    u.set(0, 0, C64::new(2.0, 0.0));
    let req = SamplingRequest::new(Occupation::new(vec![1, 0, 0]), NetworkSpec::Lossless(u), 10);
    let err = boson_err(Simulator::default().run(&req, &CancelToken::new()).unwrap_err());
    assert!(matches!(err, BosonError::NotUnitary { .. }), "{}", err);
}

#[test]
fn non_square_rejected() {
    let req = SamplingRequest::new(Occupation::new(vec![1, 0]), NetworkSpec::Lossless(CMatrix::zeros(2, 3)), 1);
    let err = boson_err(Simulator::default().run(&req, &CancelToken::new()).unwrap_err());
    assert_eq!(err, BosonError::NotSquare { rows: 2, cols: 3 });
}

#[test]
fn transmissivity_out_of_range_rejected() {
    let desc = NetworkSpec::lossy(fourier(2), vec![0.5, -0.1]);
    let req = SamplingRequest::new(Occupation::new(vec![1, 0]), desc, 1);
    let err = boson_err(Simulator::default().run(&req, &CancelToken::new()).unwrap_err());
    assert_eq!(err, BosonError::InvalidTransmissivity { mode: 1, value: -0.1 });
}

#[test]
fn input_length_must_match_network() {
    let req = SamplingRequest::new(Occupation::new(vec![1, 0, 0]), NetworkSpec::Lossless(fourier(2)), 1);
    let err = boson_err(Simulator::default().run(&req, &CancelToken::new()).unwrap_err());
    assert!(matches!(err, BosonError::ModeCountMismatch { .. }), "{}", err);
}

#[test]
fn photon_budget_enforced_before_work() {
    let budget = Budget {
        max_photons: 3,
        ..Budget::default()
    };
    let sim = Simulator::new(SimConfig::default().with_budget(budget));
    let req = SamplingRequest::new(Occupation::new(vec![2, 2]), NetworkSpec::Lossless(fourier(2)), 1);
    let err = boson_err(sim.run(&req, &CancelToken::new()).unwrap_err());
    assert!(err.is_budget(), "{}", err);
}

#[test]
fn mode_by_mode_cost_refused_before_work() {
    // 20 photons in 20 modes is within the photon cap but far past the
    // default mode-by-mode work limit
    let input = Occupation::new(vec![1; 20]);
    let req = SamplingRequest::new(input, NetworkSpec::Lossless(fourier(20)), 1).with_seed(b"big");
    let err = boson_err(Simulator::default().run(&req, &CancelToken::new()).unwrap_err());
    assert!(
        matches!(err, BosonError::BudgetExceeded { what: "mode-by-mode ops", .. }),
        "{}",
        err
    );

    // the photon sampler has no such blow-up and is accepted
    let photon = SimConfig::default().with_strategy(Strategy::PhotonByPhoton);
    assert!(req.validate(&photon).is_ok());
}

#[test]
fn outcome_budget_limits_tables() {
    let budget = Budget {
        max_outcomes: 10,
        ..Budget::default()
    };
    let sim = Simulator::new(SimConfig::default().with_budget(budget));
    let err = boson_err(
        sim.probability_table(&Occupation::new(vec![1, 1, 1, 0]), &NetworkSpec::Lossless(fourier(4)))
            .unwrap_err(),
    );
    assert_eq!(
        err,
        BosonError::BudgetExceeded {
            what: "outcomes",
            requested: 20,
            limit: 10
        }
    );
}

#[test]
fn photon_strategy_rejects_bunched_input_up_front() {
    let sim = Simulator::new(SimConfig::default().with_strategy(Strategy::PhotonByPhoton));
    let req = SamplingRequest::new(Occupation::new(vec![2, 0]), NetworkSpec::Lossless(fourier(2)), 5);
    let err = boson_err(sim.run(&req, &CancelToken::new()).unwrap_err());
    assert_eq!(err, BosonError::CollidingInput { mode: 0, photons: 2 });
}

#[test]
fn mismatched_photon_count_is_probability_zero() {
    let p = Simulator::default()
        .probability(
            &Occupation::new(vec![1, 1]),
            &Occupation::new(vec![1, 0]),
            &NetworkSpec::Lossless(fourier(2)),
        )
        .unwrap();
    assert_eq!(p, 0.0);
}

#[test]
fn cancelled_token_stops_every_shot() {
    let token = CancelToken::new();
    token.cancel();
    let req = SamplingRequest::new(Occupation::new(vec![1, 1]), NetworkSpec::Lossless(fourier(2)), 25).with_seed(b"c");
    let set = Simulator::default().run(&req, &token).unwrap();
    assert_eq!(set.len(), 25);
    assert_eq!(set.cancelled(), 25);
    assert_eq!(set.samples().count(), 0);
    assert!(!set.is_complete());
}
