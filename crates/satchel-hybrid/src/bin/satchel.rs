// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Command line front end.
//!
//! ```text
//! satchel --instance <file> [--seed N] [--parallel] [--time SECS] [--rounds N]
//!         [--stagnation N] [--iterations MIN MAX] [--threshold X]
//!         [--heuristics a,b,...] [--log-every N]
//! ```
//!
//! Logging is configured through `RUST_LOG` and defaults to `info`.

use satchel_heuristics::registry::{HeuristicKind, HeuristicRegistry};
use satchel_hybrid::{
    config::{CoordinatorConfig, ExecutionMode},
    coordinator::CoordinatorBuilder,
};
use satchel_model::loading::ProblemLoader;
use satchel_search::monitor::{
    composite::CompositeMonitor, log::LogMonitor, round_limit::RoundLimitMonitor,
    time_limit::TimeLimitMonitor,
};
use std::{error::Error, path::PathBuf, time::Duration};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Cli {
    instance_path: Option<PathBuf>,
    config: CoordinatorConfig,
    heuristics: Option<Vec<HeuristicKind>>,
    time_limit: Option<Duration>,
    round_limit: Option<u64>,
    log_every: u64,
}

/// Parses a comma separated list of heuristic names, dropping repeats.
fn parse_kinds(list: &str) -> Option<Vec<HeuristicKind>> {
    let mut kinds: Vec<HeuristicKind> = Vec::new();
    for name in list.split(',') {
        let kind = HeuristicKind::from_name(name.trim())?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Some(kinds)
}

fn parse_cli() -> Cli {
    let mut args = std::env::args().skip(1);

    let mut instance_path: Option<PathBuf> = None;
    let mut config = CoordinatorConfig::default();
    let mut heuristics: Option<Vec<HeuristicKind>> = None;
    let mut time_limit: Option<Duration> = None;
    let mut round_limit: Option<u64> = None;
    let mut log_every: u64 = 100;

    while let Some(a) = args.next() {
        match a.as_str() {
            "--instance" => instance_path = args.next().map(PathBuf::from),
            "--seed" => config.seed = args.next().and_then(|x| x.parse().ok()).unwrap_or(config.seed),
            "--parallel" => config.execution = ExecutionMode::Parallel,
            "--time" => {
                time_limit = args
                    .next()
                    .and_then(|x| x.parse::<f64>().ok())
                    .filter(|secs| secs.is_finite() && *secs >= 0.0)
                    .map(Duration::from_secs_f64)
            }
            "--rounds" => round_limit = args.next().and_then(|x| x.parse().ok()),
            "--stagnation" => {
                config.max_rounds_without_improvement = args
                    .next()
                    .and_then(|x| x.parse().ok())
                    .unwrap_or(config.max_rounds_without_improvement)
            }
            "--iterations" => {
                config.min_iterations = args
                    .next()
                    .and_then(|x| x.parse().ok())
                    .unwrap_or(config.min_iterations);
                config.max_iterations = args
                    .next()
                    .and_then(|x| x.parse().ok())
                    .unwrap_or(config.max_iterations);
            }
            "--threshold" => {
                config.worse_than_best_threshold = args
                    .next()
                    .and_then(|x| x.parse().ok())
                    .unwrap_or(config.worse_than_best_threshold)
            }
            "--heuristics" => heuristics = args.next().as_deref().and_then(parse_kinds),
            "--log-every" => {
                log_every = args
                    .next()
                    .and_then(|x| x.parse().ok())
                    .filter(|&n| n > 0)
                    .unwrap_or(log_every)
            }
            other if instance_path.is_none() && !other.starts_with("--") => {
                instance_path = Some(PathBuf::from(other))
            }
            _ => {}
        }
    }

    Cli {
        instance_path,
        config,
        heuristics,
        time_limit,
        round_limit,
        log_every,
    }
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    enable_tracing();

    let cli = parse_cli();
    let Some(path) = cli.instance_path.as_ref() else {
        return Err("usage: satchel --instance <file> [options]".into());
    };

    let model = ProblemLoader::<i64>::new().from_path(path)?;
    let registry = match &cli.heuristics {
        Some(kinds) => HeuristicRegistry::from_kinds(kinds),
        None => HeuristicRegistry::default(),
    };

    info!(
        instance = %path.display(),
        items = model.num_items(),
        capacity = model.capacity(),
        registry = %registry,
        config = %cli.config,
        "satchel configuration"
    );

    let mut coordinator = CoordinatorBuilder::new(model)
        .with_registry(registry)
        .with_config(cli.config)
        .build()?;

    let mut monitor = CompositeMonitor::<i64>::new();
    monitor.add_monitor(LogMonitor::new(cli.log_every));
    if let Some(limit) = cli.time_limit {
        monitor.add_monitor(TimeLimitMonitor::new(limit));
    }
    if let Some(limit) = cli.round_limit {
        monitor.add_monitor(RoundLimitMonitor::new(limit));
    }

    let outcome = coordinator.solve_with_monitor(monitor);

    println!("{}", outcome);
    println!("{}", coordinator.report());
    Ok(())
}
