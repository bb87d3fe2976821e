//! RHEA benchmark runner
//!
//! Plays a target-matching puzzle with the planner across many seeds in
//! parallel and prints a JSON summary.

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use rhea_planner::agents::{MultiUnitRandomPlayer, RandomPlayer};
use rhea_planner::core::types::ActionIndex;
use rhea_planner::model::{MultiUnitPlayer, SimplePlayer};
use rhea_planner::{
    GameModel, MultiUnitGameModel, MultiUnitRhea, MultiUnitRheaConfig, Result, RheaConfig,
    RheaError,
};

/// Benchmark the rolling horizon planner on a target-matching puzzle
#[derive(Parser, Debug)]
#[command(name = "rhea_bench")]
#[command(about = "Run the RHEA planner over many seeded puzzle episodes")]
struct Args {
    /// Number of seeded episodes
    #[arg(long, default_value_t = 32)]
    seeds: u64,

    /// Steps per episode
    #[arg(long, default_value_t = 20)]
    length: usize,

    /// Legal actions per unit
    #[arg(long, default_value_t = 4)]
    branching: usize,

    /// Controlled units; more than one uses the multi-unit planner
    #[arg(long, default_value_t = 1)]
    units: usize,

    /// Planner TOML; overrides the search flags below
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    #[arg(long, default_value_t = 5)]
    horizon: usize,

    #[arg(long, default_value_t = 10)]
    iterations: usize,

    #[arg(long, default_value_t = 0.2)]
    mutation: f64,

    /// Discount factor (single unit only)
    #[arg(long)]
    discount: Option<f64>,

    /// Start every decision from a fresh plan
    #[arg(long, default_value_t = false)]
    cold: bool,

    /// Play uniformly random actions instead of planning
    #[arg(long, default_value_t = false)]
    random: bool,
}

/// Every unit earns a point each step it plays its hidden target action
#[derive(Debug, Clone)]
struct TargetPuzzle {
    targets: Vec<Vec<ActionIndex>>,
    branching: usize,
    step: usize,
    matched: usize,
}

impl TargetPuzzle {
    fn generate(units: usize, length: usize, branching: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let targets = (0..units)
            .map(|_| (0..length).map(|_| rng.gen_range(0..branching)).collect())
            .collect();
        Self {
            targets,
            branching,
            step: 0,
            matched: 0,
        }
    }

    fn max_score(&self) -> usize {
        self.targets.iter().map(Vec::len).sum()
    }
}

impl GameModel for TargetPuzzle {
    fn n_actions(&self) -> usize {
        self.branching.pow(self.targets.len() as u32)
    }

    fn act(&mut self, action: ActionIndex) {
        let mut rest = action;
        let joint: Vec<ActionIndex> = (0..self.targets.len())
            .map(|_| {
                let a = rest % self.branching;
                rest /= self.branching;
                a
            })
            .collect();
        self.combo_act(&joint);
    }

    fn score(&self) -> f64 {
        self.matched as f64
    }

    fn is_terminal(&self) -> bool {
        self.targets.first().map_or(true, |t| self.step >= t.len())
    }

    fn copy_state(&self) -> Result<Self> {
        Ok(self.clone())
    }
}

impl MultiUnitGameModel for TargetPuzzle {
    fn n_units(&self) -> usize {
        self.targets.len()
    }

    fn n_actions_unit(&self, _unit: usize) -> usize {
        self.branching
    }

    fn combo_act(&mut self, actions: &[ActionIndex]) {
        if self.is_terminal() {
            return;
        }
        let step = self.step;
        let hits = self
            .targets
            .iter()
            .zip(actions)
            .filter(|(target, &action)| target[step] == action)
            .count();
        self.matched += hits;
        self.step += 1;
    }
}

#[derive(Debug, Serialize)]
struct EpisodeResult {
    seed: u64,
    score: f64,
    max_score: usize,
    decisions: usize,
    mean_decision_us: f64,
}

#[derive(Debug, Serialize)]
struct BenchSummary {
    planner: String,
    episodes: usize,
    mean_score: f64,
    mean_fraction_matched: f64,
    mean_decision_us: f64,
    results: Vec<EpisodeResult>,
}

fn play_episode(args: &Args, config: &RheaConfig, seed: u64) -> Result<EpisodeResult> {
    let mut puzzle = TargetPuzzle::generate(args.units, args.length, args.branching, seed);
    let max_score = puzzle.max_score();
    let mut decisions = 0;
    let mut total_us = 0u64;

    if args.units == 1 && !args.random {
        let mut planner = rhea_planner::Rhea::new(config.clone().with_seed(seed))?;
        while !puzzle.is_terminal() {
            let action = planner.get_action(&puzzle)?;
            total_us += planner.last_report().map_or(0, |r| r.elapsed_us);
            puzzle.act(action);
            decisions += 1;
        }
    } else if !args.random {
        let multi_config = MultiUnitRheaConfig {
            search: config.search.clone(),
        }
        .with_seed(seed);
        let mut planner = MultiUnitRhea::new(multi_config)?;
        while !puzzle.is_terminal() {
            let actions = planner.get_actions(&puzzle)?;
            total_us += planner.last_report().map_or(0, |r| r.elapsed_us);
            puzzle.combo_act(&actions);
            decisions += 1;
        }
    } else if args.units == 1 {
        let mut player = RandomPlayer::new(Some(seed));
        while !puzzle.is_terminal() {
            let action = player.get_action(&puzzle)?;
            puzzle.act(action);
            decisions += 1;
        }
    } else {
        let mut player = MultiUnitRandomPlayer::new(Some(seed));
        while !puzzle.is_terminal() {
            let actions = player.get_actions(&puzzle)?;
            puzzle.combo_act(&actions);
            decisions += 1;
        }
    }

    Ok(EpisodeResult {
        seed,
        score: puzzle.score(),
        max_score,
        decisions,
        mean_decision_us: if decisions > 0 {
            total_us as f64 / decisions as f64
        } else {
            0.0
        },
    })
}

/// Resolve and check the planner settings for this run
fn build_config(args: &Args) -> Result<RheaConfig> {
    if args.units == 0 || args.branching == 0 {
        return Err(RheaError::InvalidConfiguration(
            "units and branching must be greater than zero".into(),
        ));
    }

    let config = match &args.config {
        Some(path) => RheaConfig::load(path)?,
        None => RheaConfig::new()
            .with_horizon(args.horizon)
            .with_iterations(args.iterations)
            .with_mutation_probability(args.mutation)
            .with_warm_start(!args.cold)
            .with_discount(args.discount),
    };
    config.validate()?;

    // Joint rollouts are never discounted
    if args.units > 1 && !args.random && config.discount.is_some() {
        return Err(RheaError::InvalidConfiguration(
            "discount applies to single-unit planning only".into(),
        ));
    }
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rhea_planner=info")),
        )
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;

    tracing::info!(
        "Running {} episodes: {} unit(s), {} steps, branching {}",
        args.seeds,
        args.units,
        args.length,
        args.branching
    );

    let results = (0..args.seeds)
        .into_par_iter()
        .map(|seed| play_episode(&args, &config, seed))
        .collect::<Result<Vec<_>>>()?;

    let episodes = results.len().max(1) as f64;
    let summary = BenchSummary {
        planner: if args.random { "random" } else { "rhea" }.to_string(),
        episodes: results.len(),
        mean_score: results.iter().map(|r| r.score).sum::<f64>() / episodes,
        mean_fraction_matched: results
            .iter()
            .map(|r| r.score / r.max_score.max(1) as f64)
            .sum::<f64>()
            / episodes,
        mean_decision_us: results.iter().map(|r| r.mean_decision_us).sum::<f64>() / episodes,
        results,
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
