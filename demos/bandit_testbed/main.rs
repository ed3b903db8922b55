use std::error::Error;

use log::info;
use tdrl::{algo::BanditLearner, exploration::Policy, gym::KArmedBandit};

const K: usize = 10;
const STEP_LIMIT: usize = 1000;
const NUM_RUNS: u64 = 200;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let policies = [
        ("random", Policy::Random),
        ("epsilon = 0.1", Policy::epsilon_greedy(0.1)?),
        ("boltzmann t = 0.2", Policy::boltzmann(0.2)?),
        ("ucb1 c = 2", Policy::ucb1(2.0)),
    ];

    let mut average_reward = [[0.0; STEP_LIMIT]; 4];
    let mut optimal = [0u64; 4];
    for run in 0..NUM_RUNS {
        for (i, (_, policy)) in policies.iter().enumerate() {
            // Every policy faces the same arms in a given run
            let mut env = KArmedBandit::new(K, STEP_LIMIT, Some(run))?;
            let mut learner = BanditLearner::new(K, policy.clone(), Some(run))?;
            for (t, r) in learner.go(&mut env)?.into_iter().enumerate() {
                average_reward[i][t] += r / NUM_RUNS as f64;
            }
            let counts = learner.counts();
            if most_pulled(counts) == env.optimal_action() {
                optimal[i] += 1;
            }
        }
        info!("run {run} done");
    }

    println!("{:<20} {:>12} {:>12} {:>10}", "policy", "first 100", "last 100", "optimal");
    for (i, (name, _)) in policies.iter().enumerate() {
        let first = average_reward[i][..100].iter().sum::<f64>() / 100.0;
        let last = average_reward[i][STEP_LIMIT - 100..].iter().sum::<f64>() / 100.0;
        println!(
            "{name:<20} {first:>12.3} {last:>12.3} {:>9.1}%",
            100.0 * optimal[i] as f64 / NUM_RUNS as f64
        );
    }

    Ok(())
}

fn most_pulled(counts: &[u32]) -> usize {
    counts
        .iter()
        .enumerate()
        .max_by_key(|(_, c)| **c)
        .map_or(0, |(i, _)| i)
}
