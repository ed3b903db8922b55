use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An implementation of a time-decaying value
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f64) -> f64;
}

fn validate(rate: f64, vi: f64, vf: f64) -> Result<()> {
    ((rate >= 0.0 && vi >= vf) || (rate < 0.0 && vi <= vf))
        .then_some(())
        .ok_or_else(|| {
            Error::InvalidConfiguration(String::from("`vi - vf` must have same sign as `rate`"))
        })
}

/// v(t) = max(v<sub>i</sub> - rt, v<sub>f</sub>)
///
/// This is the schedule of the TD agents' exploration rate, which starts at `1.0`
/// and loses `epsilon_decay` per update, floored at `epsilon_decay` itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Linear {
    rate: f64,
    vi: f64,
    vf: f64,
}

impl Linear {
    pub fn new(rate: f64, vi: f64, vf: f64) -> Result<Self> {
        validate(rate, vi, vf)?;
        Ok(Self { rate, vi, vf })
    }

    /// Advance a current value by a single time step
    ///
    /// v ← max(v - r, v<sub>f</sub>)
    pub fn step(&self, value: f64) -> f64 {
        (value - self.rate).max(self.vf)
    }

    /// The initial value v<sub>i</sub>
    pub fn initial(&self) -> f64 {
        self.vi
    }
}

impl Decay for Linear {
    fn evaluate(&self, t: f64) -> f64 {
        let &Self { rate, vi, vf } = self;
        (vi - rate * t).max(vf)
    }
}
