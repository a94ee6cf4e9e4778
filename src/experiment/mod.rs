// Experiment Module - lightweight A/B bucketing for the marketing pages
//
// Weighted-random variant assignment, sticky per visitor via a pluggable
// store (the client-storage analogue), and event counters keyed by
// (test, variant, event).

use std::collections::HashMap;
use std::sync::Mutex;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("experiment {name} has no variants")]
    NoVariants { name: String },
    #[error("experiment {name} has zero total weight")]
    ZeroWeight { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    pub weight: u32,
}

impl Variant {
    pub fn new(name: impl Into<String>, weight: u32) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// An A/B test definition with weighted variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    pub name: String,
    pub variants: Vec<Variant>,
}

impl Experiment {
    pub fn new(name: impl Into<String>, variants: Vec<Variant>) -> Result<Self, ExperimentError> {
        let name = name.into();
        if variants.is_empty() {
            return Err(ExperimentError::NoVariants { name });
        }
        if variants.iter().map(|v| v.weight).sum::<u32>() == 0 {
            return Err(ExperimentError::ZeroWeight { name });
        }
        Ok(Self { name, variants })
    }

    fn total_weight(&self) -> u32 {
        self.variants.iter().map(|v| v.weight).sum()
    }

    /// Deterministic pick for a roll in `[0, total_weight)`.
    fn pick(&self, roll: u32) -> &str {
        let mut remaining = roll;
        for variant in &self.variants {
            if remaining < variant.weight {
                return &variant.name;
            }
            remaining -= variant.weight;
        }
        // Unreachable for rolls within range; fall back to the last variant.
        &self.variants[self.variants.len() - 1].name
    }
}

/// Persisted variant assignments, one per test. The browser implementation
/// sits on local storage; tests and server-side rendering use the in-memory
/// store.
pub trait VariantStore: Send + Sync {
    fn get(&self, test: &str) -> Option<String>;
    fn set(&self, test: &str, variant: &str);
}

#[derive(Debug, Default)]
pub struct InMemoryVariantStore {
    assignments: Mutex<HashMap<String, String>>,
}

impl InMemoryVariantStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VariantStore for InMemoryVariantStore {
    fn get(&self, test: &str) -> Option<String> {
        self.assignments
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(test)
            .cloned()
    }

    fn set(&self, test: &str, variant: &str) {
        self.assignments
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(test.to_string(), variant.to_string());
    }
}

/// Assigns visitors to variants: sticky once stored, weighted-random on the
/// first exposure.
pub struct ExperimentAssigner<S: VariantStore> {
    store: S,
}

impl<S: VariantStore> ExperimentAssigner<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn assign(&self, experiment: &Experiment) -> String {
        if let Some(existing) = self.store.get(&experiment.name) {
            return existing;
        }
        let roll = rand::rng().random_range(0..experiment.total_weight());
        let variant = experiment.pick(roll).to_string();
        self.store.set(&experiment.name, &variant);
        tracing::debug!(test = %experiment.name, variant = %variant, "assigned experiment variant");
        variant
    }
}

/// Event counters keyed by (test, variant, event), e.g. exposures and
/// conversions.
#[derive(Debug, Default)]
pub struct ExperimentMetrics {
    counts: Mutex<HashMap<(String, String, String), u64>>,
}

impl ExperimentMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, test: &str, variant: &str, event: &str) {
        let mut counts = self
            .counts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *counts
            .entry((test.to_string(), variant.to_string(), event.to_string()))
            .or_insert(0) += 1;
    }

    pub fn count(&self, test: &str, variant: &str, event: &str) -> u64 {
        self.counts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&(test.to_string(), variant.to_string(), event.to_string()))
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headline_test() -> Experiment {
        Experiment::new(
            "hero-headline",
            vec![Variant::new("control", 1), Variant::new("bold", 1)],
        )
        .unwrap()
    }

    #[test]
    fn rejects_degenerate_experiments() {
        assert!(Experiment::new("empty", vec![]).is_err());
        assert!(Experiment::new("weightless", vec![Variant::new("a", 0)]).is_err());
    }

    #[test]
    fn weighted_pick_walks_the_buckets() {
        let experiment = Experiment::new(
            "cta-copy",
            vec![Variant::new("a", 2), Variant::new("b", 3)],
        )
        .unwrap();
        assert_eq!(experiment.pick(0), "a");
        assert_eq!(experiment.pick(1), "a");
        assert_eq!(experiment.pick(2), "b");
        assert_eq!(experiment.pick(4), "b");
    }

    #[test]
    fn assignment_is_sticky() {
        let assigner = ExperimentAssigner::new(InMemoryVariantStore::new());
        let experiment = headline_test();
        let first = assigner.assign(&experiment);
        for _ in 0..20 {
            assert_eq!(assigner.assign(&experiment), first);
        }
    }

    #[test]
    fn single_variant_always_wins() {
        let assigner = ExperimentAssigner::new(InMemoryVariantStore::new());
        let experiment =
            Experiment::new("solo", vec![Variant::new("only", 7)]).unwrap();
        assert_eq!(assigner.assign(&experiment), "only");
    }

    #[test]
    fn metrics_count_per_test_variant_event() {
        let metrics = ExperimentMetrics::new();
        metrics.record("hero-headline", "bold", "exposure");
        metrics.record("hero-headline", "bold", "exposure");
        metrics.record("hero-headline", "bold", "conversion");
        assert_eq!(metrics.count("hero-headline", "bold", "exposure"), 2);
        assert_eq!(metrics.count("hero-headline", "bold", "conversion"), 1);
        assert_eq!(metrics.count("hero-headline", "control", "exposure"), 0);
    }
}
