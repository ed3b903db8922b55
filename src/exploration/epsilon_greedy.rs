use rand::Rng;

use super::{argmax, random};

/// Exploration policy result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Explore,
    Exploit,
}

impl Choice {
    /// Flip the epsilon coin: explore with probability `epsilon`
    ///
    /// `epsilon = 1` always explores and `epsilon = 0` never does.
    pub fn draw<R: Rng + ?Sized>(epsilon: f64, rng: &mut R) -> Self {
        if rng.gen::<f64>() < epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}

/// Epsilon greedy action selection
///
/// With probability `epsilon` a uniformly random index, otherwise the first index
/// attaining the maximum of `values`.
///
/// **Panics** if `values` is empty
pub fn epsilon_greedy<R: Rng + ?Sized>(values: &[f64], epsilon: f64, rng: &mut R) -> usize {
    match Choice::draw(epsilon, rng) {
        Choice::Explore => random(values.len(), rng),
        Choice::Exploit => argmax(values),
    }
}
