use super::argmax;

/// UCB1 action selection
///
/// Actions that were never taken score `+∞`, so each is tried once before exploitation
/// starts. Otherwise the score is `q + c * sqrt(ln(N) / n)` with `N` the total count and
/// `n` the action's own count. Ties resolve to the lowest index.
///
/// `values` and `counts` must have the same length.
pub fn ucb1(values: &[f64], counts: &[u32], exploration_constant: f64) -> usize {
    let total: f64 = counts.iter().map(|&n| n as f64).sum();
    let k = total.ln();
    let scores = values
        .iter()
        .zip(counts)
        .map(|(&q, &count)| {
            if count == 0 {
                return f64::INFINITY;
            }
            q + exploration_constant * (k / count as f64).sqrt()
        })
        .collect::<Vec<_>>();

    argmax(&scores)
}
