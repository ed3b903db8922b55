use crate::{agent::Agent, ensure_interval, env::Environment, transition::Transition, Result};

/// Runs episodes of an [`Environment`] with an [`Agent`] and reports discounted returns
///
/// The driver discounts rewards with its own `gamma`, independently of any discount
/// factor the agent uses for learning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeDriver {
    gamma: f64,
}

impl EpisodeDriver {
    /// **Errors** if `gamma` is not in the interval `(0,1]`
    pub fn new(gamma: f64) -> Result<Self> {
        ensure_interval!(gamma, > 0.0, 1.0);
        Ok(Self { gamma })
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Run one episode to completion, feeding every transition to the agent
    ///
    /// **Returns** the discounted return Σ γ<sup>t</sup> r<sub>t</sub>
    pub fn run<E, A>(&self, env: &mut E, agent: &mut A) -> Result<f64>
    where
        E: Environment,
        A: Agent<E::State>,
    {
        let mut state = env.reset();
        let mut discounted_return = 0.0;
        let mut time_step = 0;

        loop {
            let action = agent.policy(&state);
            let step = env.step(action);
            let transition = Transition {
                state,
                action,
                reward: step.reward,
                next_state: step.state,
                terminated: step.terminated,
                truncated: step.truncated,
            };
            agent.update(&transition)?;
            let done = transition.is_last();

            discounted_return += self.gamma.powi(time_step) * transition.reward;
            time_step += 1;
            state = transition.next_state;

            if done {
                break;
            }
        }

        Ok(discounted_return)
    }

    /// Run `episodes` consecutive episodes
    ///
    /// **Returns** the discounted return of every episode
    pub fn train<E, A>(&self, env: &mut E, agent: &mut A, episodes: usize) -> Result<Vec<f64>>
    where
        E: Environment,
        A: Agent<E::State>,
    {
        (0..episodes)
            .map(|episode| {
                let discounted_return = self.run(env, agent)?;
                log::info!("{episode}: {discounted_return}");
                Ok(discounted_return)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{
        algo::{TdAgent, TdAgentConfig},
        env::tests::{Corridor, MockEnv},
    };

    fn config(nr_actions: usize) -> TdAgentConfig {
        TdAgentConfig {
            nr_actions,
            gamma: 0.9,
            alpha: 0.5,
            epsilon_decay: 0.1,
            seed: Some(17),
        }
    }

    #[test]
    fn one_step_episode() {
        for mut agent in [
            TdAgent::sarsa(config(1)).unwrap(),
            TdAgent::q_learning(config(1)).unwrap(),
        ] {
            let mut env = MockEnv::new(1);
            let ret = EpisodeDriver::new(0.9)
                .unwrap()
                .run(&mut env, &mut agent)
                .unwrap();
            assert_eq!(ret, 1.0);
            assert_eq!(agent.q(&0usize), &[0.5]);
            assert_eq!(agent.updates(), 1);
        }
    }

    #[test]
    fn one_step_episode_leaves_other_actions() {
        let mut agent = TdAgent::q_learning(config(3)).unwrap();
        agent.set_epsilon(0.0).unwrap();
        let mut env = MockEnv::new(3);
        EpisodeDriver::new(0.9)
            .unwrap()
            .run(&mut env, &mut agent)
            .unwrap();
        // decay lands on the floor of 0.1 only after the action was chosen greedily
        assert_eq!(agent.q(&0usize), &[0.5, 0.0, 0.0]);
    }

    #[test]
    fn repeated_episodes_converge_monotonically() {
        let mut agent = TdAgent::sarsa(config(1)).unwrap();
        let mut env = MockEnv::new(1);
        let driver = EpisodeDriver::new(0.9).unwrap();

        let mut previous = 0.0;
        for k in 1..=20 {
            driver.run(&mut env, &mut agent).unwrap();
            let q = agent.q(&0usize)[0];
            assert!(q > previous && q <= 1.0, "Q = {q} after {k} episodes");
            assert_relative_eq!(1.0 - q, 0.5f64.powi(k), epsilon = 1e-12);
            previous = q;
        }
    }

    #[test]
    fn discounted_return_uses_driver_gamma() {
        // corridor of 4 cells walked right with no exploration: reward 1 at t = 2
        let mut agent = TdAgent::q_learning(config(2)).unwrap();
        for state in 0..3usize {
            agent.q(&state).copy_from_slice(&[0.0, 1.0]);
        }
        let mut env = Corridor::new(4, 100);

        let driver = EpisodeDriver::new(0.5).unwrap();
        let ret = driver.run(&mut env, &mut GreedyOnly(&mut agent)).unwrap();
        assert_eq!(ret, 0.25);
    }

    #[test]
    fn truncation_ends_episode() {
        let mut agent = TdAgent::q_learning(config(2)).unwrap();
        let mut env = Corridor::new(1000, 7);
        EpisodeDriver::new(1.0)
            .unwrap()
            .run(&mut env, &mut agent)
            .unwrap();
        assert_eq!(agent.updates(), 7);
    }

    #[test]
    fn train_reports_every_episode() {
        let mut agent = TdAgent::q_learning(config(2)).unwrap();
        let mut env = MockEnv::new(2);
        let returns = EpisodeDriver::new(0.9)
            .unwrap()
            .train(&mut env, &mut agent, 12)
            .unwrap();
        assert_eq!(returns.len(), 12);
        assert!(returns.iter().all(|&r| r == 0.0 || r == 1.0));
    }

    #[test]
    fn corridor_is_learnable() {
        let mut agent = TdAgent::q_learning(TdAgentConfig {
            nr_actions: 2,
            gamma: 0.9,
            alpha: 0.3,
            epsilon_decay: 0.001,
            seed: Some(5),
        })
        .unwrap();
        let mut env = Corridor::new(6, 30);
        EpisodeDriver::new(0.9)
            .unwrap()
            .train(&mut env, &mut agent, 100)
            .unwrap();
        for state in 0..5usize {
            assert_eq!(agent.greedy_action(&state), 1, "Moving right is preferred in {state}");
        }
    }

    #[test]
    fn driver_gamma_is_validated() {
        assert!(EpisodeDriver::new(0.0).is_err());
        assert!(EpisodeDriver::new(1.5).is_err());
    }

    /// Acts greedily on the wrapped agent's estimates while letting it learn
    struct GreedyOnly<'a>(&'a mut TdAgent);

    impl Agent<usize> for GreedyOnly<'_> {
        fn policy(&mut self, state: &usize) -> usize {
            self.0.greedy_action(state)
        }

        fn update(&mut self, transition: &Transition<usize>) -> Result<()> {
            self.0.update(transition)
        }
    }
}
