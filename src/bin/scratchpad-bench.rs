use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use scratchpad::bench::{self, BenchConfig, Kernel};
use scratchpad::common::logger;
use scratchpad::cpu_features;

#[derive(Parser)]
#[command(name = "scratchpad-bench")]
#[command(about = "Compare scalar baselines against SIMD-dispatched kernels")]
struct Args {
    /// Path to a YAML harness configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Kernel to run (repeatable); overrides the configuration
    #[arg(short, long = "kernel", value_name = "NAME")]
    kernels: Vec<Kernel>,

    /// Timed calls per measurement
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Input size in bytes for the buffer kernels
    #[arg(short, long)]
    size: Option<usize>,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> scratchpad::Result<BenchConfig> {
    let mut config = match &args.config {
        Some(path) => BenchConfig::from_file(path)?,
        None => BenchConfig::default(),
    };

    if !args.kernels.is_empty() {
        config.kernels = args.kernels.clone();
    }
    if let Some(iterations) = args.iterations {
        config.iterations = iterations;
    }
    if let Some(size) = args.size {
        config.input_size = size;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    if args.print_config {
        return match config.to_yaml() {
            Ok(yaml) => {
                print!("{}", yaml);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {}", e);
                ExitCode::from(1)
            }
        };
    }

    println!("Scalar vs dispatched ({})\n", cpu_features().best_isa());

    match bench::run(&config) {
        Ok(results) => {
            print!("{}", bench::format_table(&results));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}
