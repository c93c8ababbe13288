//! Lazor Puzzle Solver
//!
//! Reads `.bff` puzzles, searches for a block placement that lights every
//! target, prints the board and saves a report next to the other solutions.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};

use lazor::persistence::{self, SolutionReport};
use lazor::render;
use lazor::solver::{self, SolverConfig};
use lazor::{bff, grid, Placement};

/// Solves Lazor laser-and-block puzzles.
#[derive(Parser)]
#[command(name = "lazor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Per-beam step cap (defaults to the number of beam states on the board).
    #[arg(long, global = true, env = "LAZOR_STEP_CAP")]
    step_cap: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve puzzles and save a report for each solved one.
    Solve {
        /// Puzzle files in `.bff` format.
        #[arg(required = true)]
        puzzles: Vec<PathBuf>,
        /// Directory for solution reports.
        #[arg(long, env = "LAZOR_OUT_DIR", default_value = ".")]
        out: PathBuf,
        /// Print results without writing reports or images.
        #[arg(long)]
        no_save: bool,
        /// Skip the PNG drawing of each solved board.
        #[arg(long)]
        no_png: bool,
    },
    /// Trace the puzzle with only its fixed blocks and print the beam paths.
    Trace {
        puzzle: PathBuf,
    },
    /// Print a saved JSON report.
    Show {
        report: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = SolverConfig {
        step_cap: cli.step_cap,
    };
    let result = match cli.command {
        Command::Solve {
            puzzles,
            out,
            no_save,
            no_png,
        } => {
            let output = Output {
                dir: out,
                save: !no_save,
                png: !no_save && !no_png,
            };
            run_solve(&puzzles, &output, &config)
        }
        Command::Trace { puzzle } => run_trace(&puzzle, &config),
        Command::Show { report } => run_show(&report),
    };

    if let Err(e) = result {
        error!("{e:#}");
        std::process::exit(1);
    }
}

/// Logs to stderr; `RUST_LOG` overrides the level picked from `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Where and what `solve` writes for each solved puzzle.
struct Output {
    dir: PathBuf,
    save: bool,
    png: bool,
}

/// Solves each puzzle in turn; unsolvable puzzles are reported, not fatal.
fn run_solve(puzzles: &[PathBuf], output: &Output, config: &SolverConfig) -> Result<()> {
    let mut timings = Vec::with_capacity(puzzles.len());

    for path in puzzles {
        let name = bff::puzzle_name(path);
        let grid = bff::load(path).with_context(|| format!("loading {}", path.display()))?;

        let started = Instant::now();
        let outcome = solver::solve_with(&grid, config);
        let elapsed = started.elapsed();
        timings.push((name.clone(), elapsed));

        match outcome {
            Ok(solution) => {
                let report = SolutionReport::new(&name, &grid, &solution)?;
                print!("{}", persistence::format_report(&report));
                println!("solved in {:.3}s\n", elapsed.as_secs_f64());

                let out = &output.dir;
                if output.save {
                    let saved = persistence::save(out, &report)
                        .with_context(|| format!("saving report to {}", out.display()))?;
                    info!("wrote {}", saved.display());
                }
                if output.png {
                    let drawn = render::save_png(out, &report)
                        .with_context(|| format!("drawing {name} to {}", out.display()))?;
                    info!("wrote {}", drawn.display());
                }
            }
            Err(no_solution) => {
                println!("{name}: {no_solution} in {:.3}s\n", elapsed.as_secs_f64());
            }
        }
    }

    if timings.len() > 1 {
        println!("Execution times:");
        for (name, elapsed) in &timings {
            println!("  {name}: {:.3}s", elapsed.as_secs_f64());
        }
    }
    Ok(())
}

/// Prints the paths produced by the fixed blocks alone.
fn run_trace(path: &Path, config: &SolverConfig) -> Result<()> {
    let grid = bff::load(path).with_context(|| format!("loading {}", path.display()))?;
    let placement = Placement::new();

    print!("{}", grid::format_board(&grid, &placement)?);
    let paths = solver::trace_all(&grid, &placement, config)?;
    for (i, beam) in paths.iter().enumerate() {
        let points: Vec<String> = beam.points.iter().map(ToString::to_string).collect();
        println!("laser {}: {}", i + 1, points.join(" "));
    }

    let lit = grid
        .targets()
        .iter()
        .filter(|&target| paths.iter().any(|beam| beam.points.contains(target)))
        .count();
    println!("{lit}/{} targets lit", grid.targets().len());
    Ok(())
}

/// Loads a saved report and prints it.
fn run_show(path: &Path) -> Result<()> {
    let report =
        persistence::load(path).with_context(|| format!("reading report {}", path.display()))?;
    print!("{}", persistence::format_report(&report));
    Ok(())
}
