use crate::{transition::Transition, Result};

/// An agent acting and learning in an environment with states `S` and discrete actions
pub trait Agent<S> {
    /// Behavioral strategy of the agent, maps a state to an action index
    fn policy(&mut self, state: &S) -> usize;

    /// Integrate a single transition into the agent's knowledge
    ///
    /// Called exactly once per environment step, in order.
    fn update(&mut self, transition: &Transition<S>) -> Result<()>;
}
