use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod pid;

use home_price_estimator::{config, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Logging settings come from the config file; a broken file is reported
    // by the command itself once tracing is up
    let defaults = config::load_config(&args.config).unwrap_or_default();
    init_tracing(&defaults.server.log_level, &defaults.server.log_format);

    match args.get_command() {
        cli::Commands::Start { pid_file } => {
            commands::start::execute(&args.config, pid_file).await?;
        }
        cli::Commands::Stop {
            pid_file,
            force,
            timeout,
        } => {
            commands::stop::execute(pid_file, force, timeout).await?;
        }
        cli::Commands::Reload { pid_file } => {
            commands::reload::execute(pid_file).await?;
        }
        cli::Commands::Test => {
            commands::test::execute(&args.config)?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config)?,
            cli::ConfigCommands::Validate => commands::config::validate(&args.config)?,
        },
        cli::Commands::Locations => {
            commands::locations::execute(&args.config)?;
        }
        cli::Commands::Estimate {
            location,
            sqft,
            bhk,
            bath,
        } => {
            commands::estimate::execute(&args.config, &location, sqft, bhk, bath)?;
        }
        cli::Commands::Version => {
            println!("Home Price Estimator v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "Model artifact format: v{}",
                home_price_estimator::model::CURRENT_FORMAT_VERSION
            );
        }
    }

    Ok(())
}
