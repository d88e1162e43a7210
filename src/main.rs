// src/main.rs — ProficiencyPro entry point

use clap::Parser;
use std::sync::Arc;

use proficiencypro::analysis::AnalysisService;
use proficiencypro::cli::{self, Cli, Commands};
use proficiencypro::infra::config::Config;
use proficiencypro::infra::logger;
use proficiencypro::provider;
use proficiencypro::roster::{loader, sample, Roster};
use proficiencypro::views::Cohort;

#[tokio::main]
async fn main() {
    // Initialize logging (respects PROFICIENCYPRO_LOG / RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let roster_path = cli.roster.clone().or_else(|| config.roster.path.clone());
    let data = match roster_path {
        Some(path) => loader::load_roster(&path)?,
        None => sample::data()?,
    };
    let roster = Arc::new(Roster::new(data));

    // Dispatch commands that don't need a provider
    match &cli.command {
        Commands::Stats { manager } => {
            return cli::stats::show_stats(&roster, *manager, cli.json);
        }
        Commands::Export { ids, role, output } => {
            let cohort = Cohort::from_parts(ids.clone(), role.clone());
            return cli::export::run_export(&roster, cohort, output.as_deref());
        }
        _ => {}
    }

    let provider = provider::build_provider(&config.provider)?;
    let service = Arc::new(AnalysisService::new(provider));

    match cli.command {
        Commands::Analyze { id } => cli::analyze::run_analyze(&roster, &service, id, cli.json).await,
        Commands::Plan { id } => cli::analyze::run_plan(&roster, &service, id, cli.json).await,
        Commands::Team { role, ids } => {
            let cohort = Cohort::from_parts(ids, role);
            cli::analyze::run_team(&roster, &service, cohort, cli.json).await
        }
        Commands::Serve { port } => cli::serve::run_serve(&config, roster, service, port).await,
        Commands::Stats { .. } | Commands::Export { .. } => Ok(()),
    }
}
