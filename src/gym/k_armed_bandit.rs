use rand::{rngs::StdRng, Rng};
use rand_distr::{Distribution, Normal, StandardNormal};

use crate::{
    env::{Environment, Step},
    exploration::argmax,
    util::rng_from_seed,
    Error, Result,
};

/// K-armed bandit environment
///
/// A simple environment with K arms, each of which has a normal distribution of rewards
/// with unit variance. The means are drawn from a standard normal distribution.
/// The goal is to learn which arm has the highest mean reward. Episodes are truncated
/// after `step_limit` pulls.
pub struct KArmedBandit {
    arms: Vec<Normal<f64>>,
    step_limit: usize,
    steps: usize,
    rng: StdRng,
}

impl KArmedBandit {
    /// Initialize a new K-armed bandit environment
    pub fn new(k: usize, step_limit: usize, seed: Option<u64>) -> Result<Self> {
        if k == 0 || step_limit == 0 {
            return Err(Error::InvalidConfiguration(String::from(
                "a bandit needs at least one arm and one step",
            )));
        }
        let mut rng = rng_from_seed(seed);
        let arms = (0..k)
            .map(|_| {
                let mean: f64 = rng.sample(StandardNormal);
                Normal::new(mean, 1.0)
                    .map_err(|e| Error::InvalidConfiguration(format!("bad arm: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            arms,
            step_limit,
            steps: 0,
            rng,
        })
    }

    /// Mean reward of every arm
    pub fn means(&self) -> Vec<f64> {
        self.arms.iter().map(Normal::mean).collect()
    }

    /// The arm with the highest mean reward
    pub fn optimal_action(&self) -> usize {
        argmax(&self.means())
    }
}

impl Environment for KArmedBandit {
    type State = ();
    type Info = ();

    fn nr_actions(&self) -> usize {
        self.arms.len()
    }

    fn reset(&mut self) -> Self::State {
        self.steps = 0;
    }

    /// Pulling an arm that does not exist pays nothing
    fn step(&mut self, action: usize) -> Step<Self::State, Self::Info> {
        let done = self.steps >= self.step_limit;
        let reward = match self.arms.get(action) {
            Some(arm) if !done => arm.sample(&mut self.rng),
            _ => 0.0,
        };
        if !done {
            self.steps += 1;
        }
        Step {
            state: (),
            reward,
            terminated: false,
            truncated: self.steps >= self.step_limit,
            info: (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{algo::BanditLearner, exploration::Policy};

    #[test]
    fn k_armed_bandit_functional() {
        let mut env = KArmedBandit::new(3, 2, Some(0)).unwrap();
        assert_eq!(env.nr_actions(), 3);
        assert!(env.optimal_action() < 3);

        env.reset();
        let step = env.step(1);
        assert!(step.reward.is_finite(), "Reward is finite");
        assert!(!step.is_done());
        assert!(env.step(0).truncated);

        let after = env.step(2);
        assert!(after.truncated);
        assert_eq!(after.reward, 0.0, "No reward after the step limit");

        assert!(KArmedBandit::new(0, 10, None).is_err());
    }

    #[test]
    fn ucb1_beats_uniform_play() {
        let mut env = KArmedBandit::new(5, 2000, Some(21)).unwrap();
        let mut learner = BanditLearner::new(5, Policy::ucb1(2.0), Some(21)).unwrap();
        let rewards = learner.go(&mut env).unwrap();
        assert_eq!(rewards.len(), 2000);
        assert_eq!(learner.counts().iter().sum::<u32>(), 2000);

        let means = env.means();
        let uniform = means.iter().sum::<f64>() / means.len() as f64;
        let late = rewards[1000..].iter().sum::<f64>() / 1000.0;
        assert!(late > uniform, "late average {late} vs uniform {uniform}");
        assert!(
            learner.counts()[env.optimal_action()] > 400,
            "{:?}",
            learner.counts()
        );
    }
}
