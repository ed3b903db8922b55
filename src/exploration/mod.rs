use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{ensure_interval, Error, Result};

mod epsilon_greedy;
mod random;
mod softmax;
mod ucb;

pub use epsilon_greedy::{epsilon_greedy, Choice};
pub use random::random;
pub use softmax::softmax;
pub use ucb::ucb1;

/// Index of the first maximum in `values`
///
/// Ties resolve to the lowest index and `NaN` entries never win, so the result is
/// deterministic for any input. Returns `0` for an empty slice.
pub fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best_i, best_v), (i, &v)| {
            if v > best_v {
                (i, v)
            } else {
                (best_i, best_v)
            }
        })
        .0
}

/// A named action selection strategy
///
/// Every variant maps a slice of value estimates (and, for [`Policy::Ucb1`], visitation
/// counts) to an action index through [`Policy::select`]. Policies hold only their
/// parameters; the caller owns the estimates, the counts and the random number generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", try_from = "PolicyRepr")]
pub enum Policy {
    /// Uniformly random, ignores the estimates
    Random,
    /// Random with probability `epsilon`, greedy otherwise
    EpsilonGreedy { epsilon: f64 },
    /// Softmax sampling (also known as Boltzmann exploration)
    Boltzmann { temperature: f64 },
    /// Upper confidence bound, requires visitation counts
    Ucb1 { exploration_constant: f64 },
}

impl Policy {
    pub fn epsilon_greedy(epsilon: f64) -> Result<Self> {
        let policy = Self::EpsilonGreedy { epsilon };
        policy.validate()?;
        Ok(policy)
    }

    pub fn boltzmann(temperature: f64) -> Result<Self> {
        let policy = Self::Boltzmann { temperature };
        policy.validate()?;
        Ok(policy)
    }

    /// A higher `exploration_constant` equates to more exploration. If unsure where to start, 1 is a good default value.
    pub fn ucb1(exploration_constant: f64) -> Self {
        Self::Ucb1 {
            exploration_constant,
        }
    }

    /// Check the parameters of the policy
    ///
    /// `epsilon` must lie in `[0,1]` and `temperature` must be positive and finite.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::EpsilonGreedy { epsilon } => {
                ensure_interval!(epsilon, 0.0, 1.0);
            }
            Self::Boltzmann { temperature } if !(temperature > 0.0 && temperature.is_finite()) => {
                return Err(Error::InvalidConfiguration(format!(
                    "`temperature` must be positive and finite, got {temperature}"
                )));
            }
            _ => {}
        }
        Ok(())
    }

    /// Whether [`select`](Policy::select) needs visitation counts
    pub fn needs_counts(&self) -> bool {
        matches!(self, Self::Ucb1 { .. })
    }

    /// Choose an action index in `[0, values.len())`
    ///
    /// `counts` is ignored by every policy except [`Policy::Ucb1`], which requires one count per value.
    pub fn select<R: Rng + ?Sized>(
        &self,
        values: &[f64],
        counts: Option<&[u32]>,
        rng: &mut R,
    ) -> Result<usize> {
        if values.is_empty() {
            return Err(Error::EmptyActionSpace);
        }
        self.validate()?;

        match *self {
            Self::Random => Ok(random(values.len(), rng)),
            Self::EpsilonGreedy { epsilon } => Ok(epsilon_greedy(values, epsilon, rng)),
            Self::Boltzmann { temperature } => softmax(values, temperature, rng),
            Self::Ucb1 {
                exploration_constant,
            } => {
                let counts = counts.unwrap_or_default();
                if counts.len() != values.len() {
                    return Err(Error::MissingCounts {
                        expected: values.len(),
                        found: counts.len(),
                    });
                }
                Ok(ucb1(values, counts, exploration_constant))
            }
        }
    }
}

/// Wire form of [`Policy`], checked on the way in
#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum PolicyRepr {
    Random,
    EpsilonGreedy { epsilon: f64 },
    Boltzmann { temperature: f64 },
    Ucb1 { exploration_constant: f64 },
}

impl TryFrom<PolicyRepr> for Policy {
    type Error = Error;

    fn try_from(repr: PolicyRepr) -> Result<Self> {
        let policy = match repr {
            PolicyRepr::Random => Self::Random,
            PolicyRepr::EpsilonGreedy { epsilon } => Self::EpsilonGreedy { epsilon },
            PolicyRepr::Boltzmann { temperature } => Self::Boltzmann { temperature },
            PolicyRepr::Ucb1 {
                exploration_constant,
            } => Self::Ucb1 {
                exploration_constant,
            },
        };
        policy.validate()?;
        Ok(policy)
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::EpsilonGreedy { epsilon: 0.1 }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn argmax_first_max() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), 1);
        assert_eq!(argmax(&[0.0, 0.0, 0.0]), 0);
        assert_eq!(argmax(&[-2.0, -1.0]), 1);
        assert_eq!(argmax(&[f64::NAN, 1.0]), 1);
        assert_eq!(argmax(&[f64::NEG_INFINITY, f64::NEG_INFINITY]), 0);
        assert_eq!(argmax(&[5.0]), 0);
    }

    #[test]
    fn select_rejects_empty_values() {
        let mut rng = StdRng::seed_from_u64(0);
        for policy in [
            Policy::Random,
            Policy::epsilon_greedy(0.5).unwrap(),
            Policy::boltzmann(1.0).unwrap(),
            Policy::ucb1(1.0),
        ] {
            assert!(matches!(
                policy.select(&[], Some(&[][..]), &mut rng),
                Err(Error::EmptyActionSpace)
            ));
        }
    }

    #[test]
    fn ucb1_requires_matching_counts() {
        let mut rng = StdRng::seed_from_u64(0);
        let policy = Policy::ucb1(1.0);
        assert!(policy.needs_counts());
        assert!(matches!(
            policy.select(&[0.0, 1.0], None, &mut rng),
            Err(Error::MissingCounts {
                expected: 2,
                found: 0
            })
        ));
        assert!(matches!(
            policy.select(&[0.0, 1.0], Some(&[1][..]), &mut rng),
            Err(Error::MissingCounts {
                expected: 2,
                found: 1
            })
        ));
        assert_eq!(policy.select(&[0.0, 1.0], Some(&[1, 1][..]), &mut rng).unwrap(), 1);
    }

    #[test]
    fn single_action_space() {
        let mut rng = StdRng::seed_from_u64(3);
        for policy in [
            Policy::Random,
            Policy::epsilon_greedy(1.0).unwrap(),
            Policy::epsilon_greedy(0.0).unwrap(),
            Policy::boltzmann(0.01).unwrap(),
            Policy::ucb1(2.0),
        ] {
            for counts in [[0u32], [4]] {
                assert_eq!(policy.select(&[7.5], Some(&counts[..]), &mut rng).unwrap(), 0);
            }
        }
    }

    #[test]
    fn constructors_validate() {
        assert!(Policy::epsilon_greedy(1.1).is_err());
        assert!(Policy::epsilon_greedy(-0.1).is_err());
        assert!(Policy::boltzmann(0.0).is_err());
        assert!(Policy::boltzmann(f64::INFINITY).is_err());
    }

    #[test]
    fn policy_from_json() {
        let policy: Policy = serde_json::from_str(r#"{"kind":"ucb1","exploration_constant":2.0}"#).unwrap();
        assert_eq!(policy, Policy::ucb1(2.0));
        let policy: Policy = serde_json::from_str(r#"{"kind":"random"}"#).unwrap();
        assert_eq!(policy, Policy::Random);
    }

    #[test]
    fn policy_from_json_rejects_bad_parameters() {
        for json in [
            r#"{"kind":"boltzmann","temperature":-1.0}"#,
            r#"{"kind":"boltzmann","temperature":0.0}"#,
            r#"{"kind":"epsilon_greedy","epsilon":1.5}"#,
            r#"{"kind":"epsilon_greedy","epsilon":-0.1}"#,
        ] {
            assert!(serde_json::from_str::<Policy>(json).is_err(), "{json}");
        }
        let policy: Policy =
            serde_json::from_str(r#"{"kind":"boltzmann","temperature":0.5}"#).unwrap();
        assert_eq!(policy, Policy::boltzmann(0.5).unwrap());
    }

    #[test]
    fn select_rejects_bad_parameters() {
        let mut rng = StdRng::seed_from_u64(0);
        for policy in [
            Policy::Boltzmann { temperature: -1.0 },
            Policy::Boltzmann { temperature: 0.0 },
            Policy::Boltzmann {
                temperature: f64::NAN,
            },
            Policy::EpsilonGreedy { epsilon: 2.0 },
            Policy::EpsilonGreedy { epsilon: f64::NAN },
        ] {
            assert!(
                matches!(
                    policy.select(&[0.0, 1000.0], None, &mut rng),
                    Err(Error::InvalidConfiguration(_))
                ),
                "{policy:?}"
            );
        }
    }
}
