use boson::fock::Occupation;
use boson::probability::{marginal_probability, probability};
use boson::sampler::{path_probability, sample, Strategy};
use boson::{BosonError, LossyNetwork, Network};
use linalg::unitary::{balanced_beam_splitter, embed_two_mode, permutation, random_mesh};
use linalg::CMatrix;
use rng::ONDRng;
use std::collections::HashMap;

const TOL: f64 = 1e-9;

#[test]
fn path_probability_equals_oracle() {
    let u = random_mesh(4, &mut ONDRng::new(b"path"));
    let net = Network::lossless(u.clone(), TOL).unwrap();
    let s = Occupation::new(vec![1, 2, 0, 1]);
    for t in Occupation::all_with_photons(4, 4) {
        let exact = probability(&u, &s, &t).unwrap();
        let path = path_probability(&net, &s, &t).unwrap();
        assert!((exact - path).abs() < 1e-10, "T = {}: {} vs {}", t, exact, path);
    }
}

#[test]
fn lossy_path_probability_equals_marginal() {
    let u = random_mesh(3, &mut ONDRng::new(b"lossy-path"));
    let net: Network = LossyNetwork::new(&u, &[0.9, 0.4, 0.7], boson::LossPlacement::Input, TOL)
        .unwrap()
        .into();
    let s = Occupation::new(vec![2, 0, 1]);
    let embedded = net.embed(&s).unwrap();
    for t in Occupation::all_up_to(3, 3) {
        let exact = marginal_probability(net.matrix(), &embedded, &t).unwrap();
        let path = path_probability(&net, &s, &t).unwrap();
        assert!((exact - path).abs() < 1e-10, "T = {}: {} vs {}", t, exact, path);
    }
}

#[test]
fn mode_by_mode_frequencies_follow_path_probability() {
    let u = random_mesh(3, &mut ONDRng::new(b"freq"));
    let net = Network::lossless(u, TOL).unwrap();
    let s = Occupation::new(vec![1, 1, 0]);
    let shots = 6000;
    let mut counts: HashMap<Occupation, usize> = HashMap::new();
    for shot in 0..shots {
        let t = sample(&net, &s, Strategy::ModeByMode, &mut ONDRng::for_shot(b"freq", shot)).unwrap();
        *counts.entry(t).or_default() += 1;
    }
    for t in Occupation::all_with_photons(3, 2) {
        let p = path_probability(&net, &s, &t).unwrap();
        let freq = counts.get(&t).copied().unwrap_or(0) as f64 / shots as f64;
        let sigma = (p * (1.0 - p) / shots as f64).sqrt().max(1e-3);
        assert!((freq - p).abs() < 5.0 * sigma, "T = {}: freq {} vs p {}", t, freq, p);
    }
}

#[test]
fn identity_sampler_returns_input() {
    let net = Network::lossless(CMatrix::identity(4), TOL).unwrap();
    let s = Occupation::new(vec![0, 2, 1, 0]);
    for strategy in [Strategy::ModeByMode] {
        for shot in 0..20 {
            let mut rng = ONDRng::for_shot(b"ident", shot);
            assert_eq!(sample(&net, &s, strategy, &mut rng).unwrap(), s);
        }
    }
    let single = Occupation::new(vec![1, 0, 1, 1]);
    for shot in 0..20 {
        let mut rng = ONDRng::for_shot(b"ident-photon", shot);
        assert_eq!(sample(&net, &single, Strategy::PhotonByPhoton, &mut rng).unwrap(), single);
    }
}

#[test]
fn permutation_sampler_relabels() {
    let perm = [2, 0, 1];
    let net = Network::lossless(permutation(&perm).unwrap(), TOL).unwrap();
    let s = Occupation::new(vec![1, 0, 1]);
    let mut rng = ONDRng::new(b"perm");
    for strategy in [Strategy::ModeByMode, Strategy::PhotonByPhoton] {
        assert_eq!(sample(&net, &s, strategy, &mut rng).unwrap(), s.permuted(&perm).unwrap());
    }
}

#[test]
fn hong_ou_mandel_never_coincides() {
    let u = embed_two_mode(2, 0, 1, balanced_beam_splitter()).unwrap();
    let net = Network::lossless(u, TOL).unwrap();
    let s = Occupation::new(vec![1, 1]);
    for strategy in [Strategy::ModeByMode, Strategy::PhotonByPhoton] {
        let mut counts: HashMap<Occupation, usize> = HashMap::new();
        for shot in 0..2000 {
            let mut rng = ONDRng::for_shot(b"hom", shot);
            *counts.entry(sample(&net, &s, strategy, &mut rng).unwrap()).or_default() += 1;
        }
        assert_eq!(counts.get(&Occupation::new(vec![1, 1])), None, "{}: {:?}", strategy, counts);
        let bunched = counts[&Occupation::new(vec![2, 0])] as f64 / 2000.0;
        assert!((bunched - 0.5).abs() < 0.05, "{}: {}", strategy, bunched);
    }
}

#[test]
fn samples_conserve_photons() {
    let u = random_mesh(5, &mut ONDRng::new(b"conserve"));
    let net = Network::lossless(u, TOL).unwrap();
    let s = Occupation::new(vec![1, 1, 0, 1, 0]);
    for strategy in [Strategy::ModeByMode, Strategy::PhotonByPhoton] {
        for shot in 0..50 {
            let t = sample(&net, &s, strategy, &mut ONDRng::for_shot(b"c", shot)).unwrap();
            assert_eq!(t.photons(), 3);
            assert_eq!(t.modes(), 5);
        }
    }
}

#[test]
fn strategies_agree_in_distribution() {
    let u = random_mesh(3, &mut ONDRng::new(b"agree"));
    let net = Network::lossless(u.clone(), TOL).unwrap();
    let s = Occupation::new(vec![1, 1, 0]);
    let shots = 4000;
    for strategy in [Strategy::ModeByMode, Strategy::PhotonByPhoton] {
        let mut counts: HashMap<Occupation, usize> = HashMap::new();
        for shot in 0..shots {
            let t = sample(&net, &s, strategy, &mut ONDRng::for_shot(b"agree", shot)).unwrap();
            *counts.entry(t).or_default() += 1;
        }
        for t in Occupation::all_with_photons(3, 2) {
            let p = probability(&u, &s, &t).unwrap();
            let f = counts.get(&t).copied().unwrap_or(0) as f64 / shots as f64;
            let sigma = (p * (1.0 - p) / shots as f64).sqrt();
            assert!((f - p).abs() < 5.0 * sigma + 1e-3, "{} T = {}: f = {}, p = {}", strategy, t, f, p);
        }
    }
}

#[test]
fn photon_strategy_rejects_bunched_input() {
    let net = Network::lossless(CMatrix::identity(2), TOL).unwrap();
    let err = sample(&net, &Occupation::new(vec![2, 0]), Strategy::PhotonByPhoton, &mut ONDRng::new(b"x")).unwrap_err();
    assert_eq!(err, BosonError::CollidingInput { mode: 0, photons: 2 });
}

#[test]
fn wrong_input_length_rejected() {
    let net = Network::lossless(CMatrix::identity(3), TOL).unwrap();
    assert!(matches!(
        sample(&net, &Occupation::new(vec![1, 0]), Strategy::ModeByMode, &mut ONDRng::new(b"x")),
        Err(BosonError::ModeCountMismatch { .. })
    ));
}

#[test]
fn total_loss_yields_vacuum() {
    let u = random_mesh(3, &mut ONDRng::new(b"dark"));
    let net: Network = LossyNetwork::uniform(&u, 0.0, TOL).unwrap().into();
    let s = Occupation::new(vec![1, 0, 1]);
    for strategy in [Strategy::ModeByMode, Strategy::PhotonByPhoton] {
        for shot in 0..50 {
            let t = sample(&net, &s, strategy, &mut ONDRng::for_shot(b"dark", shot)).unwrap();
            assert_eq!(t, Occupation::vacuum(3));
        }
    }
}

#[test]
fn lossy_path_probability_is_normalised() {
    let u = random_mesh(3, &mut ONDRng::new(b"lossy-norm"));
    let net: Network = LossyNetwork::new(&u, &[0.3, 0.8, 0.6], boson::LossPlacement::Output, TOL)
        .unwrap()
        .into();
    let s = Occupation::new(vec![1, 1, 1]);
    let total: f64 = Occupation::all_up_to(3, 3)
        .iter()
        .map(|t| path_probability(&net, &s, t).unwrap())
        .sum();
    assert!((total - 1.0).abs() < 1e-10, "total = {}", total);
}

#[test]
fn single_photon_loss_matches_transmissivity() {
    let eta = 0.35;
    let net: Network = LossyNetwork::uniform(&CMatrix::identity(1), eta, TOL).unwrap().into();
    let s = Occupation::new(vec![1]);
    let survived = path_probability(&net, &s, &Occupation::new(vec![1])).unwrap();
    assert!((survived - eta).abs() < 1e-12, "P = {}", survived);
}
