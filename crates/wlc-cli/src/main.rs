mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod ui;

use crate::cli::{Cli, Commands};
use crate::commands::CommandContext;
use crate::error::Result;
use crate::ui::UiManager;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!("wlc v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let file_config = config::load_file_config(cli.config.as_deref(), &cli.set_values)?;
    let ui = UiManager::new(cli.quiet);
    let context = CommandContext {
        verbose: cli.verbose > 0,
        temperature: cli.temperature,
        file_config: &file_config,
        ui: &ui,
    };

    let command_result = match &cli.command {
        Commands::RhoF(args) => {
            info!("Dispatching to 'rho_F' command.");
            commands::continuum::rho_f(args, &context)
        }
        Commands::FRho(args) => {
            info!("Dispatching to 'F_rho' command.");
            commands::continuum::f_rho(args, &context)
        }
        Commands::CavityRhoF(args) => {
            info!("Dispatching to 'cavity_rho_F' command.");
            commands::cavity::rho_f(args, &context)
        }
        Commands::CavityRhoFAndGradient(args) => {
            info!("Dispatching to 'cavity_rho_F_and_gradient' command.");
            commands::cavity::rho_f_and_gradient(args, &context)
        }
        Commands::MarkoFit(args) => {
            info!("Dispatching to 'Marko_fit' command.");
            commands::fit::run(args, &context)
        }
    };

    ui.finish();

    match command_result {
        Ok(output) => {
            println!("{}", output);
            info!("Command completed successfully.");
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {}", e);
            Err(e)
        }
    }
}
