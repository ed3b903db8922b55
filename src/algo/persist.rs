//! Saving and loading trained TD agents.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use super::td::{Bootstrap, TdAgent, TdAgentConfig};
use crate::{value::ValueStore, Error, Result};

/// A serialized snapshot of a [`TdAgent`]
///
/// Holds everything that determines the agent's behavior except the state of its random
/// number generator, which is re-seeded from `config.seed` on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAgent {
    pub version: u32,
    pub bootstrap: Bootstrap,
    pub config: TdAgentConfig,
    pub epsilon: f64,
    pub updates: u64,
    pub store: ValueStore,
}

impl SavedAgent {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &TdAgent) -> Self {
        Self {
            version: Self::VERSION,
            bootstrap: agent.bootstrap(),
            config: agent.config().clone(),
            epsilon: agent.epsilon(),
            updates: agent.updates(),
            store: agent.store().clone(),
        }
    }

    pub fn into_agent(self) -> Result<TdAgent> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        TdAgent::from_parts(
            self.config,
            self.bootstrap,
            self.store,
            self.epsilon,
            self.updates,
        )
    }
}

impl TdAgent {
    /// Write the agent as JSON
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, &SavedAgent::from_agent(self))?;
        Ok(())
    }

    /// Read an agent written by [`to_writer`](TdAgent::to_writer)
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let saved: SavedAgent = serde_json::from_reader(reader)?;
        saved.into_agent()
    }

    /// Save the agent to a JSON file at `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        log::info!(
            "saved {:?} agent with {} states to {}",
            self.bootstrap(),
            self.store().len(),
            path.display()
        );
        Ok(())
    }

    /// Load an agent saved with [`save`](TdAgent::save)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let agent = Self::from_reader(BufReader::new(File::open(path)?))?;
        log::info!(
            "loaded {:?} agent with {} states from {}",
            agent.bootstrap(),
            agent.store().len(),
            path.display()
        );
        Ok(agent)
    }
}
