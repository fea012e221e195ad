//! relay-alloc — batch solver binary.
//!
//! Reads a complete instance (file argument or stdin), runs preprocessing
//! and the local search, then writes the delivery report to stdout.  All
//! diagnostics go to stderr so stdout stays a clean data stream for the
//! external checker.  Wall-clock/memory limits are the supervisor's job —
//! nothing here watches the clock.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result, bail};

use ra_core::SearchRng;
use ra_model::{load_instance, load_instance_reader};
use ra_output::write_report;
use ra_solver::{PlanContext, SearchParams, allocate, optimize};

// ── Defaults ──────────────────────────────────────────────────────────────────

const DEFAULT_SEED: u64 = 42;
const DEFAULT_ITERATIONS: usize = 150;

const USAGE: &str = "\
usage: relay-alloc [OPTIONS] [INPUT]

Reads the instance from INPUT (or stdin) and writes the delivery report
to stdout.

options:
  --seed <u64>        RNG seed for the local search (default 42)
  --iterations <n>    local-search iteration budget (default 150)
  -h, --help          print this message";

// ── Options ───────────────────────────────────────────────────────────────────

struct Options {
    input: Option<PathBuf>,
    seed: u64,
    iterations: usize,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Option<Self>> {
        let mut opts = Options {
            input: None,
            seed: DEFAULT_SEED,
            iterations: DEFAULT_ITERATIONS,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(None),
                "--seed" => {
                    let v = args.next().context("--seed requires a value")?;
                    opts.seed = v.parse().with_context(|| format!("invalid --seed {v:?}"))?;
                }
                "--iterations" => {
                    let v = args.next().context("--iterations requires a value")?;
                    opts.iterations =
                        v.parse().with_context(|| format!("invalid --iterations {v:?}"))?;
                }
                flag if flag.starts_with('-') => bail!("unknown option {flag:?}"),
                path => {
                    if opts.input.is_some() {
                        bail!("more than one input path given");
                    }
                    opts.input = Some(PathBuf::from(path));
                }
            }
        }
        Ok(Some(opts))
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("relay-alloc: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let Some(opts) = Options::parse(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    let start = Instant::now();
    let instance = match &opts.input {
        Some(path) => load_instance(path).with_context(|| format!("reading {}", path.display()))?,
        None => load_instance_reader(io::stdin().lock()).context("reading stdin")?,
    };
    let parsed = start.elapsed();

    let ctx = PlanContext::build(&instance);
    let preprocessed = start.elapsed();

    let mut rng = SearchRng::new(opts.seed);
    let params = SearchParams { max_iterations: opts.iterations, ..SearchParams::default() };
    let outcome = optimize(&ctx, &instance.flows, &params, &mut rng)?;

    // Final pass with the best solution yields the schedules to report.
    let alloc = allocate(&ctx, &instance.flows, &outcome.solution)?;

    let stdout = io::stdout().lock();
    let mut out = BufWriter::new(stdout);
    write_report(&mut out, &instance.flows, &alloc.schedules)?;
    out.flush().context("flushing report")?;

    eprintln!(
        "relay-alloc: {} flows on {}×{} grid, horizon {} | parse {:.0?}, preprocess {:.0?}, \
         search {} iters, total {:.0?} | score {:.4}",
        instance.flows.len(),
        instance.grid.width,
        instance.grid.height,
        instance.horizon,
        parsed,
        preprocessed - parsed,
        outcome.iterations,
        start.elapsed(),
        alloc.score,
    );
    Ok(())
}
