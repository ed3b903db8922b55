use std::{collections::HashSet, fs, path::Path};

use rand::{rngs::StdRng, Rng};
use serde::{Deserialize, Serialize};
use strum::{FromRepr, VariantArray};

use crate::{
    ensure_interval,
    env::{Environment, Step},
    util::rng_from_seed,
    value::Discretize,
    Error, Result,
};

pub type Pos = (usize, usize);

#[derive(VariantArray, FromRepr, Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum RoomsAction {
    /// y + 1
    North = 0,
    /// y - 1
    South = 1,
    /// x - 1
    West = 2,
    /// x + 1
    East = 3,
}

/// Channels of a [`GridState`]
#[derive(VariantArray, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Agent = 0,
    Goal = 1,
    Obstacle = 2,
}

/// Multi-channel occupancy grid observed by agents in [`Rooms`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridState {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl GridState {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; Channel::VARIANTS.len() * width * height],
        }
    }

    fn index(&self, channel: Channel, (x, y): Pos) -> usize {
        (channel as usize * self.width + x) * self.height + y
    }

    fn set(&mut self, channel: Channel, pos: Pos) {
        let i = self.index(channel, pos);
        self.cells[i] = true;
    }

    /// Whether `pos` is occupied in `channel`, `false` outside the grid
    pub fn get(&self, channel: Channel, pos: Pos) -> bool {
        pos.0 < self.width && pos.1 < self.height && self.cells[self.index(channel, pos)]
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

impl Discretize for GridState {
    fn encode(&self, buf: &mut Vec<u8>) {
        self.width.encode(buf);
        self.height.encode(buf);
        self.cells.encode(buf);
    }
}

/// Obstacle layout of a [`Rooms`] environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    width: usize,
    height: usize,
    obstacles: HashSet<Pos>,
}

impl Layout {
    /// Parse a map with one row per line and whitespace-separated single-character cells
    ///
    /// The row index is `y` and the column index is `x`. `#` marks an obstacle, any other
    /// character is free space. Grid dimensions are the maximum extents over all rows.
    pub fn parse(text: &str) -> Result<Self> {
        let mut obstacles = HashSet::new();
        let (mut width, mut height) = (0, 0);
        for (y, line) in text.lines().enumerate() {
            for (x, cell) in line.split_whitespace().enumerate() {
                if cell.chars().count() != 1 {
                    return Err(Error::Map(format!(
                        "cell `{cell}` at ({x}, {y}) is not a single character"
                    )));
                }
                if cell == "#" {
                    obstacles.insert((x, y));
                }
                width = width.max(x + 1);
                height = height.max(y + 1);
            }
        }

        if width == 0 || height == 0 {
            return Err(Error::Map(String::from("map is empty")));
        }
        if width < 2 || height < 2 {
            return Err(Error::Map(format!(
                "map is {width}x{height}, must be at least 2x2"
            )));
        }

        let layout = Self {
            width,
            height,
            obstacles,
        };
        if layout.obstacles.contains(&layout.goal()) {
            return Err(Error::Map(format!(
                "goal cell {:?} is an obstacle",
                layout.goal()
            )));
        }
        Ok(layout)
    }

    /// Read and parse a map file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// The goal sits diagonally inside the far corner
    pub fn goal(&self) -> Pos {
        (self.width - 2, self.height - 2)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_obstacle(&self, pos: Pos) -> bool {
        self.obstacles.contains(&pos)
    }
}

/// Configuration for the [`Rooms`] environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomsConfig {
    /// Steps after which an episode is truncated
    ///
    /// **Default**: `100`
    pub time_limit: usize,
    /// Probability of replacing the chosen action with a uniformly random one
    ///
    /// **Default**: `None`
    pub stochastic: Option<f64>,
    /// Seed for start positions and action noise, or entropy if `None`
    ///
    /// **Default**: `None`
    pub seed: Option<u64>,
}

impl Default for RoomsConfig {
    fn default() -> Self {
        Self {
            time_limit: 100,
            stochastic: None,
            seed: None,
        }
    }
}

impl RoomsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.time_limit == 0 {
            return Err(Error::InvalidConfiguration(String::from(
                "`time_limit` must be positive",
            )));
        }
        if let Some(stochastic) = self.stochastic {
            ensure_interval!(stochastic, 0.0, 1.0);
        }
        Ok(())
    }
}

/// Diagnostic information about a [`Rooms`] step
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoomsSummary {
    pub agent_x: usize,
    pub agent_y: usize,
    pub goal_x: usize,
    pub goal_y: usize,
    pub time_step: usize,
    /// Undiscounted return accumulated since the environment was created
    pub score: f64,
}

/// A grid world of rooms separated by walls
///
/// The agent starts on a random free cell and must reach the goal at
/// `(width - 2, height - 2)`, which pays a reward of `1` and terminates the episode.
/// Episodes are truncated after `time_limit` steps. Moves into walls or out of the grid
/// leave the agent in place. With `stochastic = p`, every action is replaced by a random
/// one with probability `p`.
pub struct Rooms {
    layout: Layout,
    goal: Pos,
    occupiable: Vec<Pos>,
    time_limit: usize,
    stochastic: Option<f64>,
    rng: StdRng,
    agent: Pos,
    time: usize,
    terminated: bool,
    truncated: bool,
    score: f64,
}

impl Rooms {
    pub fn new(layout: Layout, config: RoomsConfig) -> Result<Self> {
        config.validate()?;
        let goal = layout.goal();
        let occupiable = (0..layout.width)
            .flat_map(|x| (0..layout.height).map(move |y| (x, y)))
            .filter(|&pos| pos != goal && !layout.is_obstacle(pos))
            .collect::<Vec<_>>();
        if occupiable.is_empty() {
            return Err(Error::Map(String::from("map has no free start cell")));
        }

        let mut env = Self {
            layout,
            goal,
            agent: occupiable[0],
            occupiable,
            time_limit: config.time_limit,
            stochastic: config.stochastic,
            rng: rng_from_seed(config.seed),
            time: 0,
            terminated: false,
            truncated: false,
            score: 0.0,
        };
        env.reset();
        Ok(env)
    }

    /// Load the layout from a map file
    pub fn from_path(path: impl AsRef<Path>, config: RoomsConfig) -> Result<Self> {
        Self::new(Layout::from_path(path)?, config)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn agent_position(&self) -> Pos {
        self.agent
    }

    /// Cells an episode can start from
    pub fn occupiable_positions(&self) -> &[Pos] {
        &self.occupiable
    }

    /// Restart the episode with the agent on a chosen free cell
    pub fn reset_to(&mut self, pos: Pos) -> Result<GridState> {
        if !self.occupiable.contains(&pos) {
            return Err(Error::Map(format!("{pos:?} is not a free start cell")));
        }
        self.reset();
        self.agent = pos;
        Ok(self.state())
    }

    pub fn state(&self) -> GridState {
        let mut state = GridState::new(self.layout.width, self.layout.height);
        state.set(Channel::Agent, self.agent);
        state.set(Channel::Goal, self.goal);
        for &pos in &self.layout.obstacles {
            state.set(Channel::Obstacle, pos);
        }
        state
    }

    pub fn summary(&self) -> RoomsSummary {
        RoomsSummary {
            agent_x: self.agent.0,
            agent_y: self.agent.1,
            goal_x: self.goal.0,
            goal_y: self.goal.1,
            time_step: self.time,
            score: self.score,
        }
    }

    /// Step with exactly `action`, bypassing action noise
    pub fn step_with_action(&mut self, action: usize) -> Step<GridState, RoomsSummary> {
        if self.terminated || self.truncated {
            return Step {
                state: self.state(),
                reward: 0.0,
                terminated: self.terminated,
                truncated: self.truncated,
                info: self.summary(),
            };
        }

        self.time += 1;
        let (x, y) = self.agent;
        let (width, height) = (self.layout.width, self.layout.height);
        let target = match RoomsAction::from_repr(action) {
            Some(RoomsAction::North) if y + 1 < height => Some((x, y + 1)),
            Some(RoomsAction::South) if y > 0 => Some((x, y - 1)),
            Some(RoomsAction::West) if x > 0 => Some((x - 1, y)),
            Some(RoomsAction::East) if x + 1 < width => Some((x + 1, y)),
            Some(_) => None,
            None => {
                log::warn!("ignoring unknown rooms action {action}");
                None
            }
        };
        if let Some(pos) = target.filter(|&pos| !self.layout.is_obstacle(pos)) {
            self.agent = pos;
        }

        self.terminated = self.agent == self.goal;
        let reward = if self.terminated { 1.0 } else { 0.0 };
        self.score += reward;
        self.truncated = self.time >= self.time_limit;

        if self.terminated || self.truncated {
            log::debug!(
                "rooms episode over after {} steps, terminated: {}, truncated: {}",
                self.time,
                self.terminated,
                self.truncated
            );
        }

        Step {
            state: self.state(),
            reward,
            terminated: self.terminated,
            truncated: self.truncated,
            info: self.summary(),
        }
    }
}

impl Environment for Rooms {
    type State = GridState;
    type Info = RoomsSummary;

    fn nr_actions(&self) -> usize {
        RoomsAction::VARIANTS.len()
    }

    fn reset(&mut self) -> Self::State {
        self.terminated = false;
        self.truncated = false;
        self.time = 0;
        self.agent = self.occupiable[self.rng.gen_range(0..self.occupiable.len())];
        self.state()
    }

    fn step(&mut self, action: usize) -> Step<Self::State, Self::Info> {
        let action = match self.stochastic {
            Some(p) if self.rng.gen::<f64>() < p => self.rng.gen_range(0..self.nr_actions()),
            _ => action,
        };
        self.step_with_action(action)
    }
}
