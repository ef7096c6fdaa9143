//! Feature extraction for linear function approximation.

use std::fmt::Debug;
use std::hash::Hash;

/// Maps a `(state, action)` pair to named numeric feature contributions.
///
/// Must be pure: the same pair always yields the same feature list. The
/// agent's Q-value is the dot product of this list with its learned weight
/// vector, so richer extractors trade generalization against resolution
/// without touching the agent itself.
pub trait FeatureExtractor<S, A> {
    /// Feature identifier. Weights are stored per key.
    type Key: Clone + Eq + Hash + Debug;

    /// Feature contributions of taking `action` in `state`.
    fn features(&self, state: &S, action: &A) -> Vec<(Self::Key, f64)>;
}

/// Indicator feature on the exact `(state, action)` pair.
///
/// One feature per pair with contribution 1, which makes linear Q-learning
/// collapse to the tabular algorithm: every pair learns its own weight and
/// nothing generalizes across pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFeatures;

impl<S, A> FeatureExtractor<S, A> for IdentityFeatures
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    type Key = (S, A);

    fn features(&self, state: &S, action: &A) -> Vec<((S, A), f64)> {
        vec![((state.clone(), action.clone()), 1.0)]
    }
}
