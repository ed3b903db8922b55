use rand::{rngs::StdRng, SeedableRng};

/// Checks that a numerical value lies in an interval and returns
/// [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration) from the enclosing function if not
///
/// `ensure_interval!(x, a, b)` checks the closed interval `[a,b]`, while
/// `ensure_interval!(x, > a, b)` checks the half-open interval `(a,b]`.
///
/// ### Example
/// ```ignore
/// let gamma = 1.5;
/// ensure_interval!(gamma, > 0.0, 1.0);
/// ```
/// This returns an error with the message "invalid configuration: `gamma` must be in the interval (0, 1], got 1.5".
#[macro_export]
macro_rules! ensure_interval {
    ($var:expr, > $a:expr, $b:expr) => {
        if !($var > $a && $var <= $b) {
            return Err($crate::Error::InvalidConfiguration(format!(
                "`{}` must be in the interval ({}, {}], got {}",
                stringify!($var),
                $a,
                $b,
                $var,
            )));
        }
    };
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::Error::InvalidConfiguration(format!(
                "`{}` must be in the interval [{}, {}], got {}",
                stringify!($var),
                $a,
                $b,
                $var,
            )));
        }
    };
}

/// A seeded generator for reproducible runs, or one seeded from entropy
pub(crate) fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, Result};

    fn half_open(x: f64) -> Result<()> {
        ensure_interval!(x, > 0.0, 1.0);
        Ok(())
    }

    fn closed(x: f64) -> Result<()> {
        ensure_interval!(x, 0.0, 1.0);
        Ok(())
    }

    #[test]
    fn ensure_interval_functional() {
        assert!(half_open(1.0).is_ok());
        assert!(half_open(0.5).is_ok());
        assert!(half_open(0.0).is_err());
        assert!(half_open(f64::NAN).is_err());
        assert!(closed(0.0).is_ok());
        assert!(closed(1.0).is_ok());
        assert!(closed(-0.1).is_err());
    }

    #[test]
    fn seeded_rngs_repeat() {
        use rand::Rng;

        let a: [u64; 4] = super::rng_from_seed(Some(8)).gen();
        let b: [u64; 4] = super::rng_from_seed(Some(8)).gen();
        assert_eq!(a, b);
    }

    #[test]
    fn error_names_the_variable() {
        let Err(Error::InvalidConfiguration(msg)) = half_open(2.0) else {
            panic!("expected an invalid configuration error");
        };
        assert!(msg.contains("`x`"), "{msg}");
        assert!(msg.contains("(0, 1]"), "{msg}");
    }
}
