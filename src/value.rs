use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Canonical lookup key of a state in a [`ValueStore`]
///
/// Two value-equal states must encode to identical keys, see [`Discretize`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(Vec<u8>);

impl StateKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for StateKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Number of discretization steps per unit used when keying floating-point states
pub const FLOAT_KEY_SCALE: f64 = 1e6;

/// Canonical, order-preserving encoding of a state into a [`StateKey`]
///
/// Encodings provided by this crate:
/// - integers and `()` encode to their little-endian bytes
/// - tuples concatenate the encodings of their fields
/// - `bool` slices are bit-packed, preceded by their length
/// - `f64` slices round every value to a multiple of `1 / FLOAT_KEY_SCALE`, so values
///   closer than `1e-6` to the same grid point share a key and `-0.0 == 0.0`
pub trait Discretize {
    /// Append the encoding of `self` to `buf`
    fn encode(&self, buf: &mut Vec<u8>);

    fn key(&self) -> StateKey {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        StateKey(buf)
    }
}

impl<T: Discretize + ?Sized> Discretize for &T {
    fn encode(&self, buf: &mut Vec<u8>) {
        (**self).encode(buf)
    }
}

impl Discretize for () {
    fn encode(&self, _buf: &mut Vec<u8>) {}
}

macro_rules! discretize_int {
    ($($t:ty),*) => {
        $(
            impl Discretize for $t {
                fn encode(&self, buf: &mut Vec<u8>) {
                    buf.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

discretize_int!(u8, u16, u32, u64, i8, i16, i32, i64);

impl Discretize for usize {
    fn encode(&self, buf: &mut Vec<u8>) {
        (*self as u64).encode(buf)
    }
}

impl<A: Discretize, B: Discretize> Discretize for (A, B) {
    fn encode(&self, buf: &mut Vec<u8>) {
        self.0.encode(buf);
        self.1.encode(buf);
    }
}

impl<A: Discretize, B: Discretize, C: Discretize> Discretize for (A, B, C) {
    fn encode(&self, buf: &mut Vec<u8>) {
        self.0.encode(buf);
        self.1.encode(buf);
        self.2.encode(buf);
    }
}

impl Discretize for [bool] {
    fn encode(&self, buf: &mut Vec<u8>) {
        self.len().encode(buf);
        for chunk in self.chunks(8) {
            let byte = chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (i, &bit)| byte | ((bit as u8) << i));
            buf.push(byte);
        }
    }
}

impl Discretize for [f64] {
    fn encode(&self, buf: &mut Vec<u8>) {
        self.len().encode(buf);
        for x in self {
            ((x * FLOAT_KEY_SCALE).round() as i64).encode(buf);
        }
    }
}

impl<T> Discretize for Vec<T>
where
    [T]: Discretize,
{
    fn encode(&self, buf: &mut Vec<u8>) {
        self.as_slice().encode(buf)
    }
}

/// A table of action-value estimates, one fixed-length vector per state
///
/// Rows are created lazily as zero vectors the first time a state is looked up and are
/// never removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoreRepr", into = "StoreRepr")]
pub struct ValueStore {
    nr_actions: usize,
    table: HashMap<StateKey, Vec<f64>>,
}

impl ValueStore {
    pub fn new(nr_actions: usize) -> Self {
        Self {
            nr_actions,
            table: HashMap::new(),
        }
    }

    pub fn nr_actions(&self) -> usize {
        self.nr_actions
    }

    /// Mutable view of the estimates of `key`, inserting a zero vector if it is unseen
    ///
    /// Every call with the same key returns the same underlying row.
    pub fn values_mut(&mut self, key: &StateKey) -> &mut [f64] {
        let nr_actions = self.nr_actions;
        self.table
            .entry(key.clone())
            .or_insert_with(|| vec![0.0; nr_actions])
    }

    /// Estimates of `key` without materializing it
    pub fn get(&self, key: &StateKey) -> Option<&[f64]> {
        self.table.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &StateKey) -> bool {
        self.table.contains_key(key)
    }

    /// Number of states seen so far
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &[f64])> {
        self.table.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

/// Serialized form of a [`ValueStore`] with rows sorted by key
#[derive(Serialize, Deserialize)]
struct StoreRepr {
    nr_actions: usize,
    rows: Vec<(StateKey, Vec<f64>)>,
}

impl From<ValueStore> for StoreRepr {
    fn from(store: ValueStore) -> Self {
        let mut rows = store.table.into_iter().collect::<Vec<_>>();
        rows.sort_by(|(a, _), (b, _)| a.cmp(b));
        Self {
            nr_actions: store.nr_actions,
            rows,
        }
    }
}

impl TryFrom<StoreRepr> for ValueStore {
    type Error = Error;

    fn try_from(repr: StoreRepr) -> Result<Self> {
        if let Some((_, row)) = repr.rows.iter().find(|(_, row)| row.len() != repr.nr_actions) {
            return Err(Error::InvalidConfiguration(format!(
                "value row has {} entries, expected {}",
                row.len(),
                repr.nr_actions
            )));
        }
        Ok(Self {
            nr_actions: repr.nr_actions,
            table: repr.rows.into_iter().collect(),
        })
    }
}
