#![warn(clippy::pedantic)]

use std::{fs, path::PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use env_logger::TimestampPrecision;
use itertools::Itertools;
use log::LevelFilter;
use owo_colors::OwoColorize;
use qube_core::{AnimationMode, Cube, Orientation, Puzzle, TwistyCube, parse_moves};
use qube_solver::{LayerSolver, QubeConfig, run_stress};

/// Scrambles and solves twisty cubes
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The configuration file to use, in TOML format. Defaults apply when
    /// omitted.
    #[arg(long, short = 'c', value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count)]
    log_level: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scramble a 3x3x3 cube, then solve it and print both states.
    Solve {
        /// The move sequence to scramble with, e.g. "F R U' R'". A random
        /// scramble is used when omitted.
        #[arg(long)]
        scramble: Option<String>,
        /// Seed for the random scramble.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Solve many random cubes in parallel and report the tally.
    Stress {
        /// How many cubes to solve.
        #[arg(long)]
        count: Option<usize>,
        /// How many cubes may be solved at once.
        #[arg(long)]
        workers: Option<usize>,
        /// Seed for the scrambles.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print a randomly scrambled cube.
    Scramble {
        /// The cube's dimension.
        #[arg(long, short = 'n', default_value_t = 3)]
        dimension: usize,
        /// The fewest random quarter turns to apply.
        #[arg(long, default_value_t = 20)]
        min: usize,
        /// The most random quarter turns to apply.
        #[arg(long, default_value_t = 60)]
        max: usize,
        /// Seed for the scramble.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn rng(seed: Option<u64>) -> fastrand::Rng {
    seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)
}

/// Prints the cube unfolded around the front face.
fn print_net(cube: &Cube) {
    let n = cube.dimension();
    let row = |orientation: Orientation, r: usize| {
        cube.face(orientation).colors()[r * n..(r + 1) * n]
            .iter()
            .map(|color| {
                let (red, green, blue) = color.rgb();
                format!("{} ", "■".truecolor(red, green, blue))
            })
            .join("")
    };
    let pad = " ".repeat(2 * n);

    for r in 0..n {
        println!("{pad}{}", row(Orientation::Up, r));
    }
    for r in 0..n {
        println!(
            "{}{}{}{}",
            row(Orientation::Left, r),
            row(Orientation::Front, r),
            row(Orientation::Right, r),
            row(Orientation::Back, r)
        );
    }
    for r in 0..n {
        println!("{pad}{}", row(Orientation::Down, r));
    }
    println!();
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.log_level {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let mut config = match &cli.config {
        Some(path) => toml::from_str::<QubeConfig>(
            &fs::read_to_string(path)
                .wrap_err_with(|| format!("Failed to read {}", path.display()))?,
        )
        .wrap_err("Failed to parse the configuration file")?,
        None => QubeConfig::default(),
    };

    match cli.command {
        Commands::Solve { scramble, seed } => {
            let puzzle = match scramble {
                Some(moves) => {
                    let puzzle = Puzzle::new(3);
                    for mv in parse_moves(&moves)? {
                        puzzle.turn(mv.request())?.wait()?;
                    }
                    puzzle
                }
                None => {
                    let mut cube = Cube::new(3);
                    let stress = &config.stress;
                    cube.scramble(&mut rng(seed), stress.scramble_min, stress.scramble_max);
                    Puzzle::from_cube(cube, AnimationMode::Instant)
                }
            };
            print_net(&puzzle.snapshot());

            let report = LayerSolver::new(&puzzle)
                .with_config(config.solver)
                .solve()?;
            print_net(&puzzle.snapshot());

            for stage in &report.stages {
                println!(
                    "{:<32} {:>3} iterations {:>4} quarter turns",
                    stage.stage.to_string().bold(),
                    stage.iterations,
                    stage.quarter_turns
                );
            }
            println!(
                "Solved in {} quarter turns in {:.3}s",
                report.quarter_turns().green(),
                report.elapsed.as_secs_f64()
            );
            if !puzzle.is_solved() {
                return Err(eyre!("The solver finished but the cube is not solved"));
            }
        }
        Commands::Stress {
            count,
            workers,
            seed,
        } => {
            if let Some(count) = count {
                config.stress.count = count;
            }
            if let Some(workers) = workers {
                config.stress.workers = workers;
            }
            if seed.is_some() {
                config.stress.seed = seed;
            }

            let report = run_stress(&config.stress, &config.solver)?;
            let tally = format!("Cubes solved: ({}/{}).", report.solved(), report.total());
            if report.all_solved() {
                println!("{}", tally.green());
                println!("All cubes solved!");
            } else {
                println!("{}", tally.red());
                for outcome in report.outcomes.iter().filter(|outcome| !outcome.solved) {
                    match &outcome.result {
                        Ok(_) => println!("Cube {} was left unsolved", outcome.index + 1),
                        Err(e) => println!("Cube {} failed: {e}", outcome.index + 1),
                    }
                }
            }
            println!("Finished in {:.3}s", report.elapsed.as_secs_f64());
        }
        Commands::Scramble {
            dimension,
            min,
            max,
            seed,
        } => {
            if dimension == 0 {
                return Err(eyre!("A cube needs at least one layer"));
            }
            let mut cube = Cube::new(dimension);
            let turns = cube.scramble(&mut rng(seed), min, max);
            print_net(&cube);
            println!("Applied {turns} random quarter turns");
        }
    }

    Ok(())
}
