mod arg_parser;
mod config;
mod logging;

use arg_parser::ArgParser;
use config::Config;

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use synclib::{Orchestrator, OutputSink};
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::load(Path::new(config::CONFIG_PATH));
    if let Err(e) = logging::init(&config.logging) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }

    let args = ArgParser::parse();
    info!(pairs = ?args.src_dst, "parsed src/dst pairs");
    info!(extra_args = ?args.extra_args, "extra rsync args");

    let (sink, drain) = OutputSink::stdout();
    let orchestrator = Orchestrator::new(sink);
    let results = orchestrator.run_all(args.src_dst, args.extra_args).await;
    drop(orchestrator); // last sink handle; lets the drain task flush and exit
    if let Ok(Err(e)) = drain.await {
        eprintln!("parsync: console write failed: {}", e);
    }

    let mut failed = 0usize;
    for outcome in &results {
        match outcome {
            Ok(result) if result.success() => {}
            Ok(_) => failed += 1,
            Err(e) => {
                // the relay already printed tool-reported errors; faults
                // like a missing executable only show up here
                failed += 1;
                eprintln!("parsync: {}", e);
            }
        }
    }
    if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
