pub mod bandit;
pub mod persist;
pub mod random;
pub mod td;

pub use bandit::BanditLearner;
pub use persist::SavedAgent;
pub use random::RandomAgent;
pub use td::{Bootstrap, TdAgent, TdAgentConfig};
