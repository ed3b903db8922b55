use std::{env, error::Error, fs, path::Path};

use log::info;
use tdrl::{
    algo::{Bootstrap, TdAgent},
    config::ExperimentConfig,
    gym::Rooms,
};

const USAGE: &str = "usage: rooms_td <layout> [sarsa|q_learning] [episodes] [model.json]";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(layout) = args.first() else {
        eprintln!("{USAGE}");
        return Ok(());
    };

    let path = Path::new("demos/rooms_td");
    let mut config = match fs::metadata(path.join("config.json")) {
        Ok(_) => ExperimentConfig::from_path(path.join("config.json"))?,
        Err(_) => ExperimentConfig::default(),
    };
    if let Some(algorithm) = args.get(1) {
        config.algorithm = match algorithm.as_str() {
            "sarsa" => Bootstrap::Sarsa,
            "q_learning" | "qlearning" => Bootstrap::QLearning,
            other => return Err(format!("unknown algorithm `{other}`\n{USAGE}").into()),
        };
    }
    if let Some(episodes) = args.get(2) {
        config.episodes = episodes.parse()?;
    }
    config.validate()?;

    let mut env = Rooms::from_path(
        path.join("layouts").join(format!("{layout}.txt")),
        config.rooms.clone(),
    )?;
    let driver = config.build_driver()?;

    let out = path.join("out");
    fs::create_dir_all(&out)?;

    let (mut agent, csv_path) = match args.get(3) {
        Some(model) => {
            let mut agent = TdAgent::load(out.join(model))?;
            agent.set_epsilon(0.0)?;
            info!("evaluating {model} on {layout}");
            (agent, out.join(format!("test_{layout}.csv")))
        }
        None => {
            info!("training {:?} on {layout}", config.algorithm);
            (
                config.build_agent()?,
                out.join(format!("{layout}_{:?}_training_data.csv", config.algorithm)),
            )
        }
    };

    let returns = driver.train(&mut env, &mut agent, config.episodes)?;

    let mut wtr = csv::Writer::from_path(&csv_path)?;
    wtr.write_record(["episode", "return"])?;
    for (i, ret) in returns.iter().enumerate() {
        wtr.write_record([i.to_string(), ret.to_string()])?;
    }
    wtr.flush()?;

    if args.get(3).is_none() {
        agent.save(out.join(format!(
            "{layout}_{:?}_episodes_{}.json",
            config.algorithm, config.episodes
        )))?;
    }

    let tail = returns.len().min(10);
    let mean = returns[returns.len() - tail..].iter().sum::<f64>() / tail as f64;
    println!(
        "{} episodes on {layout}: mean discounted return over the last {tail} was {mean:.4}, \
         {} states visited",
        returns.len(),
        agent.store().len()
    );

    Ok(())
}
