use rand::rngs::StdRng;

use crate::{
    agent::Agent, exploration, transition::Transition, util::rng_from_seed, Error, Result,
};

/// An agent that acts uniformly at random and never learns
///
/// Useful as a baseline for the returns of learning agents.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    nr_actions: usize,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(nr_actions: usize, seed: Option<u64>) -> Result<Self> {
        if nr_actions == 0 {
            return Err(Error::InvalidConfiguration(String::from(
                "`nr_actions` must be positive",
            )));
        }
        Ok(Self {
            nr_actions,
            rng: rng_from_seed(seed),
        })
    }
}

impl<S> Agent<S> for RandomAgent {
    fn policy(&mut self, _state: &S) -> usize {
        exploration::random(self.nr_actions, &mut self.rng)
    }

    fn update(&mut self, transition: &Transition<S>) -> Result<()> {
        if transition.action >= self.nr_actions {
            return Err(Error::InvalidAction {
                action: transition.action,
                nr_actions: self.nr_actions,
            });
        }
        Ok(())
    }
}
