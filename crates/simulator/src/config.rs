use crate::error::SimError;
use boson::{Budget, Strategy};
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Worker threads for shot fan-out (0 = rayon default pool).
    pub threads: usize,
    /// Largest entrywise deviation of U U† from the identity accepted.
    pub unitarity_tolerance: f64,
    pub budget: Budget,
    pub strategy: Strategy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            unitarity_tolerance: 1e-9,
            budget: Budget::default(),
            strategy: Strategy::default(),
        }
    }
}

impl SimConfig {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.unitarity_tolerance = tolerance;
        self
    }

    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Defaults overridden by `BOSON_THREADS`, `BOSON_UNITARITY_TOL`,
    /// `BOSON_MAX_PHOTONS`, `BOSON_MAX_MODE_BY_MODE_OPS` and `BOSON_STRATEGY`.
    pub fn from_env() -> Result<Self, SimError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, SimError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = lookup("BOSON_THREADS") {
            cfg.threads = parse("BOSON_THREADS", &v)?;
        }
        if let Some(v) = lookup("BOSON_UNITARITY_TOL") {
            let tol: f64 = parse("BOSON_UNITARITY_TOL", &v)?;
            if !(tol >= 0.0) || !tol.is_finite() {
                return Err(SimError::Config {
                    key: "BOSON_UNITARITY_TOL",
                    value: v,
                    reason: "must be a finite non-negative number".to_string(),
                });
            }
            cfg.unitarity_tolerance = tol;
        }
        if let Some(v) = lookup("BOSON_MAX_PHOTONS") {
            cfg.budget.max_photons = parse("BOSON_MAX_PHOTONS", &v)?;
        }
        if let Some(v) = lookup("BOSON_MAX_MODE_BY_MODE_OPS") {
            cfg.budget.max_mode_by_mode_ops = parse("BOSON_MAX_MODE_BY_MODE_OPS", &v)?;
        }
        if let Some(v) = lookup("BOSON_STRATEGY") {
            cfg.strategy = parse("BOSON_STRATEGY", &v)?;
        }
        Ok(cfg)
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, SimError>
where
    T: FromStr,
    T::Err: ToString,
{
    value.trim().parse().map_err(|e: T::Err| SimError::Config {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_is_default() {
        assert_eq!(SimConfig::from_lookup(lookup(&[])).unwrap(), SimConfig::default());
    }

    #[test]
    fn overrides_apply() {
        let cfg = SimConfig::from_lookup(lookup(&[
            ("BOSON_THREADS", "4"),
            ("BOSON_UNITARITY_TOL", "1e-6"),
            ("BOSON_MAX_PHOTONS", "12"),
            ("BOSON_MAX_MODE_BY_MODE_OPS", "5000"),
            ("BOSON_STRATEGY", "photon-by-photon"),
        ]))
        .unwrap();
        assert_eq!(cfg.threads, 4);
        assert_eq!(cfg.unitarity_tolerance, 1e-6);
        assert_eq!(cfg.budget.max_photons, 12);
        assert_eq!(cfg.budget.max_mode_by_mode_ops, 5000);
        assert_eq!(cfg.strategy, Strategy::PhotonByPhoton);
    }

    #[test]
    fn malformed_value_names_key() {
        let err = SimConfig::from_lookup(lookup(&[("BOSON_THREADS", "many")])).unwrap_err();
        assert!(matches!(err, SimError::Config { key: "BOSON_THREADS", .. }), "{}", err);

        let err = SimConfig::from_lookup(lookup(&[("BOSON_UNITARITY_TOL", "-1")])).unwrap_err();
        assert!(matches!(err, SimError::Config { key: "BOSON_UNITARITY_TOL", .. }), "{}", err);
    }
}
