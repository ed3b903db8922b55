use rand::Rng;

/// Uniformly random action index in `[0, len)`
///
/// **Panics** if `len` is zero
pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> usize {
    rng.gen_range(0..len)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn random_covers_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[random(4, &mut rng)] = true;
        }
        assert!(seen.iter().all(|&s| s), "Every action drawn at least once");
    }
}
