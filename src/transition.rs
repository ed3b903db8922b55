/// Represents a single transition in the environment
///
/// Built by the episode driver and handed to exactly one agent update.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S> {
    /// The state of the environment before taking the action
    pub state: S,
    /// The action taken in the given state
    pub action: usize,
    /// The reward received after taking the action
    pub reward: f64,
    /// The state of the environment after the action is taken
    pub next_state: S,
    /// The episode reached a terminal state, nothing follows `next_state`
    pub terminated: bool,
    /// The episode was cut off (e.g. by a time limit), `next_state` still has a future
    pub truncated: bool,
}

impl<S> Transition<S> {
    /// Whether this transition ends the episode
    pub fn is_last(&self) -> bool {
        self.terminated || self.truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_last_functional() {
        let mut transition = Transition {
            state: 0u8,
            action: 0,
            reward: 0.0,
            next_state: 1u8,
            terminated: false,
            truncated: false,
        };
        assert!(!transition.is_last());
        transition.truncated = true;
        assert!(transition.is_last());
        transition.terminated = true;
        transition.truncated = false;
        assert!(transition.is_last());
    }
}
