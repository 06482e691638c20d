#[macro_use]
extern crate tracing;

use anyhow::{bail, ensure, Context, Result};
use binary_ccl::{
    alg::IncrementalLabeler,
    bbox::label_cropped,
    mask::load_mask,
    synthetic::random_grid,
    utils::{self, throughput},
    verify::{check_equivalence, component_count, same_partition},
    BenchResult, BinaryGrid, Connectivity, LabelGrid, Strategy, StrategyReport,
};
use clap::Parser;
use rand::{prelude::*, rngs::StdRng};
use rayon::prelude::*;
use std::{fs::File, io::BufWriter, path::PathBuf, time::Instant};

#[derive(Debug, Parser)]
struct Args {
    /// Grid height (for random grids)
    #[clap(long, default_value_t = 1000)]
    height: usize,

    /// Grid width (for random grids)
    #[clap(long, default_value_t = 1000)]
    width: usize,

    /// Foreground probability per cell (for random grids)
    #[clap(short, long, default_value_t = 0.3)]
    density: f64,

    /// Seed for the random grid
    #[clap(long)]
    seed: Option<u64>,

    /// Benchmark on a mask image instead of a random grid
    #[clap(short, long, value_parser)]
    mask: Option<PathBuf>,

    /// Number of timed runs per strategy
    #[clap(short, long, default_value_t = 10)]
    iterations: usize,

    /// Use 8-connectivity
    #[clap(short, long)]
    eight: bool,

    /// Strategies to run
    #[clap(short, long, value_enum, multiple_values = true)]
    strategies: Vec<Strategy>,

    /// Label only the foreground bounding box
    #[clap(long)]
    crop: bool,

    /// Also time the incremental labeler on shuffled pixels
    #[clap(long)]
    stream: bool,

    /// Number of extra random grids to cross-check all strategies on
    #[clap(long, default_value_t = 0)]
    verify_trials: usize,

    /// Output file
    #[clap(short, long, value_parser)]
    output: Option<PathBuf>,

    /// Per-strategy rows as CSV
    #[clap(long, value_parser)]
    csv: Option<PathBuf>,

    /// Number of threads
    #[clap(short = 't', long)]
    num_threads: Option<usize>,
}

fn main() -> Result<()> {
    utils::init_tracing_subscriber("info")?;
    let args = Args::parse();
    info!("args: {:#?}", args);
    utils::setup_rayon(args.num_threads)?;
    ensure!(
        (0. ..=1.).contains(&args.density),
        "density must be within [0, 1], got {}",
        args.density
    );
    ensure!(args.iterations > 0, "need at least one iteration");

    let begin = Instant::now();
    let connectivity = Connectivity::from(args.eight);
    let strategies = if args.strategies.is_empty() {
        Strategy::ALL.to_vec()
    } else {
        args.strategies.clone()
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let grid = match &args.mask {
        Some(path) => load_mask(path)?,
        None => random_grid(args.height, args.width, args.density, &mut rng),
    };
    let (height, width) = grid.shape();
    let foreground = grid.foreground_count();
    info!(
        "grid {}x{}, foreground {} ({:.1}%), connectivity {}",
        height,
        width,
        foreground,
        100. * foreground as f64 / (height * width).max(1) as f64,
        connectivity
    );

    let mut reports = Vec::with_capacity(strategies.len() + 1);
    let mut outputs: Vec<(Strategy, LabelGrid)> = Vec::with_capacity(strategies.len());
    for &strategy in &strategies {
        let run = |g: &BinaryGrid| {
            if args.crop {
                label_cropped(g, strategy, connectivity)
            } else {
                strategy.label(g, connectivity)
            }
        };

        let begin_strategy = Instant::now();
        for _ in 0..args.iterations {
            run(&grid);
        }
        let total_time = Instant::now() - begin_strategy;
        let avg_time = total_time / args.iterations as u32;

        let labels = run(&grid);
        let report = StrategyReport {
            strategy: strategy.to_string(),
            avg_time,
            total_time,
            iterations: args.iterations,
            num_of_components: component_count(&labels),
            throughput: throughput(height * width, avg_time.as_secs_f64()),
        };
        info!(
            "{:>10}: {:?} per run, {} components",
            report.strategy, report.avg_time, report.num_of_components
        );
        reports.push(report);
        outputs.push((strategy, labels));
    }

    if let Some(((s_ref, reference), rest)) = outputs.split_first() {
        for (s, labels) in rest {
            if !same_partition(reference, labels) {
                bail!("{} and {} disagree on the partition", s_ref, s);
            }
        }
        info!("all {} strategies agree", outputs.len());
    }

    if args.stream {
        let mut pixels: Vec<(usize, usize)> = (0..height)
            .flat_map(|r| (0..width).map(move |c| (r, c)))
            .filter(|&(r, c)| grid.is_foreground(r, c))
            .collect();
        pixels.shuffle(&mut rng);

        let begin_stream = Instant::now();
        let mut num_of_components = 0;
        for _ in 0..args.iterations {
            let mut labeler = IncrementalLabeler::new(height, width, connectivity);
            for &(r, c) in &pixels {
                labeler.add_pixel(r, c);
            }
            num_of_components = labeler.num_of_components();
        }
        let total_time = Instant::now() - begin_stream;
        let avg_time = total_time / args.iterations as u32;
        info!(
            "{:>10}: {:?} per run, {} components",
            "stream", avg_time, num_of_components
        );
        if let Some(first) = reports.first() {
            ensure!(
                first.num_of_components == num_of_components,
                "stream found {} components but {} found {}",
                num_of_components,
                first.strategy,
                first.num_of_components
            );
        }
        reports.push(StrategyReport {
            strategy: "stream".to_string(),
            avg_time,
            total_time,
            iterations: args.iterations,
            num_of_components,
            throughput: throughput(foreground, avg_time.as_secs_f64()),
        });
    }

    if args.verify_trials > 0 {
        let seeds: Vec<u64> = (0..args.verify_trials).map(|_| rng.gen()).collect();
        let (trial_height, trial_width) = (height.min(256), width.min(256));
        seeds
            .into_par_iter()
            .enumerate()
            .try_for_each(|(i, seed)| -> Result<()> {
                let mut rng = StdRng::seed_from_u64(seed);
                let density = rng.gen_range(0.05..0.95);
                let g = random_grid(trial_height, trial_width, density, &mut rng);
                for connectivity in [Connectivity::Four, Connectivity::Eight] {
                    check_equivalence(&g, connectivity, &Strategy::ALL).with_context(|| {
                        format!("trial #{} (seed {}, density {:.3})", i, seed, density)
                    })?;
                }
                Ok(())
            })?;
        info!("{} verification trials passed", args.verify_trials);
    }

    let result = BenchResult {
        height,
        width,
        foreground,
        connectivity,
        total_time: Instant::now() - begin,
        reports,
    };

    if let Some(output) = &args.output {
        let out = BufWriter::new(File::create(output)?);
        serde_json::to_writer_pretty(out, &result)?;
    }
    if let Some(csv_path) = &args.csv {
        let mut writer = csv::Writer::from_path(csv_path)?;
        for report in &result.reports {
            writer.serialize(report)?;
        }
        writer.flush()?;
    }

    Ok(())
}
