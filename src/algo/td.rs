use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::{
    agent::Agent,
    decay::{self, Decay},
    ensure_interval,
    exploration::{argmax, epsilon_greedy},
    transition::Transition,
    util::rng_from_seed,
    value::{Discretize, ValueStore},
    Error, Result,
};

/// Configuration for the [`TdAgent`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TdAgentConfig {
    /// Size of the action space, must be positive
    ///
    /// **Default**: `4`
    pub nr_actions: usize,
    /// The discount factor, in `(0,1]`
    ///
    /// **Default**: `0.997`
    pub gamma: f64,
    /// The learning rate, in `(0,1]`
    ///
    /// **Default**: `0.1`
    pub alpha: f64,
    /// Amount subtracted from the exploration rate after every update, in `(0,1]`.
    /// It is also the floor the exploration rate never drops below.
    ///
    /// **Default**: `0.0001`
    pub epsilon_decay: f64,
    /// Seed for the agent's random number generator, or entropy if `None`
    ///
    /// **Default**: `None`
    pub seed: Option<u64>,
}

impl Default for TdAgentConfig {
    fn default() -> Self {
        Self {
            nr_actions: 4,
            gamma: 0.997,
            alpha: 0.1,
            epsilon_decay: 0.0001,
            seed: None,
        }
    }
}

impl TdAgentConfig {
    /// Check every hyperparameter, returning [`Error::InvalidConfiguration`] for the first invalid one
    pub fn validate(&self) -> Result<()> {
        if self.nr_actions == 0 {
            return Err(Error::InvalidConfiguration(String::from(
                "`nr_actions` must be positive",
            )));
        }
        ensure_interval!(self.gamma, > 0.0, 1.0);
        ensure_interval!(self.alpha, > 0.0, 1.0);
        ensure_interval!(self.epsilon_decay, > 0.0, 1.0);
        Ok(())
    }
}

/// How a [`TdAgent`] estimates the value of the state following a non-terminal transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bootstrap {
    /// On-policy: the value of a freshly sampled epsilon greedy action in the next state
    Sarsa,
    /// Off-policy: the maximum value in the next state
    QLearning,
}

/// A tabular temporal-difference learning agent
///
/// The agent keeps a [`ValueStore`] of action-value estimates and acts epsilon greedy on
/// them. Its exploration rate starts at `1.0` and is lowered by `epsilon_decay` on every
/// update, down to `epsilon_decay` itself. Each update applies
///
/// Q(s,a) ← Q(s,a) + α(target - Q(s,a))
///
/// where the target is `r` for terminal transitions and `r + γ·Q'(s')` otherwise, with the
/// continuation value `Q'(s')` chosen by the agent's [`Bootstrap`].
///
/// The SARSA continuation samples its own action in `s'` with the current (already decayed)
/// exploration rate. That sample is independent of the action the agent will actually take
/// in `s'` on the next step.
#[derive(Debug, Clone)]
pub struct TdAgent {
    config: TdAgentConfig,
    bootstrap: Bootstrap,
    store: ValueStore,
    schedule: decay::Linear,
    epsilon: f64,
    updates: u64,
    rng: StdRng,
}

impl TdAgent {
    /// Initialize a new agent with an empty value store
    pub fn new(config: TdAgentConfig, bootstrap: Bootstrap) -> Result<Self> {
        config.validate()?;
        let schedule = decay::Linear::new(config.epsilon_decay, 1.0, config.epsilon_decay)?;
        Ok(Self {
            store: ValueStore::new(config.nr_actions),
            epsilon: schedule.initial(),
            schedule,
            updates: 0,
            rng: rng_from_seed(config.seed),
            bootstrap,
            config,
        })
    }

    /// Initialize a new on-policy SARSA agent
    pub fn sarsa(config: TdAgentConfig) -> Result<Self> {
        Self::new(config, Bootstrap::Sarsa)
    }

    /// Initialize a new off-policy Q-learning agent
    pub fn q_learning(config: TdAgentConfig) -> Result<Self> {
        Self::new(config, Bootstrap::QLearning)
    }

    /// Rebuild an agent from previously learned parts
    pub(crate) fn from_parts(
        config: TdAgentConfig,
        bootstrap: Bootstrap,
        store: ValueStore,
        epsilon: f64,
        updates: u64,
    ) -> Result<Self> {
        let mut agent = Self::new(config, bootstrap)?;
        if store.nr_actions() != agent.config.nr_actions {
            return Err(Error::InvalidConfiguration(format!(
                "value store holds {} actions per state, expected {}",
                store.nr_actions(),
                agent.config.nr_actions
            )));
        }
        agent.set_epsilon(epsilon)?;
        agent.store = store;
        agent.updates = updates;
        Ok(agent)
    }

    pub fn config(&self) -> &TdAgentConfig {
        &self.config
    }

    pub fn bootstrap(&self) -> Bootstrap {
        self.bootstrap
    }

    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    /// Current exploration rate
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Override the exploration rate, e.g. `0.0` to evaluate the greedy policy
    ///
    /// Later updates keep decaying from the new value.
    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<()> {
        ensure_interval!(epsilon, 0.0, 1.0);
        self.epsilon = epsilon;
        Ok(())
    }

    /// Number of updates applied so far
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Action-value estimates of `state`, created as zeros if the state is new
    ///
    /// The same state always maps to the same row, so writes through the returned slice
    /// are visible to later calls.
    pub fn q<S: Discretize + ?Sized>(&mut self, state: &S) -> &mut [f64] {
        self.store.values_mut(&state.key())
    }

    /// Epsilon greedy action under the current exploration rate
    pub fn act<S: Discretize + ?Sized>(&mut self, state: &S) -> usize {
        let epsilon = self.epsilon;
        let values = self.store.values_mut(&state.key());
        epsilon_greedy(values, epsilon, &mut self.rng)
    }

    /// First action with the highest estimate in `state`
    pub fn greedy_action<S: Discretize + ?Sized>(&mut self, state: &S) -> usize {
        argmax(self.q(state))
    }

    /// Lower the exploration rate by one step of its schedule
    pub fn decay_exploration(&mut self) {
        self.epsilon = self.schedule.step(self.epsilon);
    }

    /// Exploration rate the schedule reaches after `k` updates from the start
    pub fn scheduled_epsilon(&self, k: u64) -> f64 {
        self.schedule.evaluate(k as f64)
    }

    /// Apply one TD update and return the TD error
    ///
    /// Fails with [`Error::InvalidAction`] before touching any state if the action is out of range.
    pub fn learn<S: Discretize>(&mut self, transition: &Transition<S>) -> Result<f64> {
        let &Transition {
            ref state,
            action,
            reward,
            ref next_state,
            terminated,
            ..
        } = transition;

        if action >= self.config.nr_actions {
            return Err(Error::InvalidAction {
                action,
                nr_actions: self.config.nr_actions,
            });
        }

        self.decay_exploration();

        let mut td_target = reward;
        if !terminated {
            td_target += self.config.gamma * self.continuation(next_state);
        }

        let alpha = self.config.alpha;
        let values = self.q(state);
        let td_error = td_target - values[action];
        values[action] += alpha * td_error;
        self.updates += 1;

        log::trace!(
            "update {}: action {action}, target {td_target:.4}, error {td_error:.4}, epsilon {:.4}",
            self.updates,
            self.epsilon
        );

        Ok(td_error)
    }

    fn continuation<S: Discretize>(&mut self, next_state: &S) -> f64 {
        match self.bootstrap {
            Bootstrap::Sarsa => {
                let next_action = self.act(next_state);
                self.q(next_state)[next_action]
            }
            Bootstrap::QLearning => self
                .q(next_state)
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

impl<S: Discretize> Agent<S> for TdAgent {
    fn policy(&mut self, state: &S) -> usize {
        self.act(state)
    }

    fn update(&mut self, transition: &Transition<S>) -> Result<()> {
        self.learn(transition).map(|_| ())
    }
}
