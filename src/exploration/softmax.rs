use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng,
};

use crate::{Error, Result};

/// Softmax action selection (also known as Boltzmann exploration)
///
/// Samples index `i` with probability proportional to exp(v<sub>i</sub> / τ). The values are
/// shifted by their maximum before exponentiating, which leaves the distribution unchanged
/// but keeps large `values / temperature` from overflowing to infinity.
pub fn softmax<R: Rng + ?Sized>(values: &[f64], temperature: f64, rng: &mut R) -> Result<usize> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let weights = values.iter().map(|v| ((v - max) / temperature).exp());
    let dist = WeightedIndex::new(weights).map_err(|e| {
        Error::InvalidConfiguration(format!("cannot sample softmax over {values:?}: {e}"))
    })?;
    Ok(dist.sample(rng))
}
