use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::Parser;
use nestml_cocos::{check_file, CheckOptions, CoCosManager, Severity};

/// checks the context conditions of the neurons in a .nestml file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input filename
    #[arg(required_unless_present = "list")]
    input: Option<String>,

    /// Only check the neuron with this name
    #[arg(short, long)]
    neuron: Option<String>,

    /// Only run this context condition (can be repeated)
    #[arg(short, long = "coco")]
    cocos: Vec<String>,

    /// Lowest level of diagnostics to print: INFO, WARNING or ERROR
    #[arg(short, long, default_value = "INFO")]
    logging_level: Severity,

    /// Run the context conditions of a neuron in parallel
    #[arg(short, long)]
    parallel: bool,

    /// List the available context conditions and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<ExitCode> {
    // library logging is opt-in through RUST_LOG, diagnostics are printed below
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();
    let cli = Args::parse();

    if cli.list {
        for name in CoCosManager::default().names() {
            println!("{}", name);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let input = cli.input.ok_or_else(|| anyhow!("no input file given"))?;
    let options = CheckOptions {
        parallel: cli.parallel,
        logging_level: cli.logging_level,
        neuron: cli.neuron,
        cocos: cli.cocos,
    };
    let logger = check_file(&input, &options)?;
    for diagnostic in logger
        .diagnostics()
        .iter()
        .filter(|diagnostic| diagnostic.severity >= options.logging_level)
    {
        println!("{}", diagnostic);
    }

    if logger.has_errors() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
