use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use yamlstruct::{
    cli::{Cli, Commands},
    commands,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v / -q. Logs go to stderr so inspect output stays clean.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("Command line: {:?}", cli);

    let result = match &cli.command {
        Commands::Convert(args) => commands::convert::run(&cli, args.clone()),
        Commands::Inspect(args) => commands::inspect::run(&cli, args.clone()),
        Commands::Init(args) => commands::init::run(&cli, args.clone()),
    };

    match result {
        Ok(()) => {
            info!("Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
