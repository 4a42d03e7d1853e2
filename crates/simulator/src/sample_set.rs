use crate::error::SimError;
use boson::Occupation;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    pub shot: usize,
    pub outcome: Occupation,
}

/// Per-shot results in shot order. A failed or cancelled shot leaves the
/// others untouched.
#[derive(Debug)]
pub struct SampleSet {
    shots: Vec<Result<Sample, SimError>>,
}

impl SampleSet {
    pub(crate) fn new(shots: Vec<Result<Sample, SimError>>) -> Self {
        Self { shots }
    }

    pub fn len(&self) -> usize {
        self.shots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    pub fn results(&self) -> &[Result<Sample, SimError>] {
        &self.shots
    }

    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.shots.iter().filter_map(|r| r.as_ref().ok())
    }

    pub fn outcomes(&self) -> Vec<Occupation> {
        self.samples().map(|s| s.outcome.clone()).collect()
    }

    /// (shot index, error) for every shot without a sample.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &SimError)> {
        self.shots
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().err().map(|e| (i, e)))
    }

    pub fn cancelled(&self) -> usize {
        self.failures().filter(|(_, e)| e.is_cancelled()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.shots.iter().all(Result::is_ok)
    }

    pub fn histogram(&self) -> BTreeMap<Occupation, usize> {
        let mut counts = BTreeMap::new();
        for s in self.samples() {
            *counts.entry(s.outcome.clone()).or_insert(0) += 1;
        }
        counts
    }
}
