/// Represents an episodic Markov decision process with a discrete action space, defining
/// the dynamics of an environment in which an agent can operate.
///
/// Actions are indices in `[0, nr_actions)`.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// Diagnostic information returned alongside every step
    type Info;

    /// Size of the action space
    fn nr_actions(&self) -> usize;

    /// Reset the environment to an initial state
    ///
    /// **Returns** the state
    fn reset(&mut self) -> Self::State;

    /// Update the environment in response to an action taken by an agent
    ///
    /// Once a step reports `terminated` or `truncated`, further steps must be no-ops that
    /// return the same state, zero reward and the same flags until the next [`reset`](Environment::reset).
    fn step(&mut self, action: usize) -> Step<Self::State, Self::Info>;
}

/// The outcome of [`Environment::step`]
#[derive(Debug, Clone, PartialEq)]
pub struct Step<S, I> {
    pub state: S,
    pub reward: f64,
    /// A terminal state was reached
    pub terminated: bool,
    /// The episode was cut off before reaching a terminal state
    pub truncated: bool,
    pub info: I,
}

impl<S, I> Step<S, I> {
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}
