use rand::rngs::StdRng;

use crate::{env::Environment, exploration::Policy, util::rng_from_seed, Error, Result};

/// A sample-average learner for single-state problems such as multi-armed bandits
///
/// Keeps one value estimate and one visitation count per action and chooses actions with
/// any [`Policy`], which makes it the natural client of the count based [`Policy::Ucb1`].
/// Estimates are updated with the rule
///
/// Q<sub>n+1</sub> = Q<sub>n</sub> + (R<sub>n</sub> - Q<sub>n</sub>) / n
///
/// where n is the number of times the action was taken.
#[derive(Debug, Clone)]
pub struct BanditLearner {
    policy: Policy,
    values: Vec<f64>,
    counts: Vec<u32>,
    rng: StdRng,
}

impl BanditLearner {
    pub fn new(nr_actions: usize, policy: Policy, seed: Option<u64>) -> Result<Self> {
        if nr_actions == 0 {
            return Err(Error::InvalidConfiguration(String::from(
                "`nr_actions` must be positive",
            )));
        }
        Ok(Self {
            policy,
            values: vec![0.0; nr_actions],
            counts: vec![0; nr_actions],
            rng: rng_from_seed(seed),
        })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Choose an action based on the current estimates and the exploration policy
    pub fn act(&mut self) -> Result<usize> {
        self.policy
            .select(&self.values, Some(self.counts.as_slice()), &mut self.rng)
    }

    /// Learn from the reward of a single pull
    pub fn learn(&mut self, action: usize, reward: f64) -> Result<()> {
        let nr_actions = self.values.len();
        let (Some(value), Some(count)) = (self.values.get_mut(action), self.counts.get_mut(action))
        else {
            return Err(Error::InvalidAction { action, nr_actions });
        };
        *count += 1;
        *value += (reward - *value) / *count as f64;
        Ok(())
    }

    /// Run the learner for one episode of the given environment
    ///
    /// **Returns** the reward of every step
    pub fn go<E: Environment>(&mut self, env: &mut E) -> Result<Vec<f64>> {
        env.reset();
        let mut rewards = Vec::new();
        loop {
            let action = self.act()?;
            let step = env.step(action);
            self.learn(action, step.reward)?;
            rewards.push(step.reward);
            if step.is_done() {
                break;
            }
        }
        Ok(rewards)
    }
}
