// src/cli/mod.rs — CLI definition (clap derive)

pub mod analyze;
pub mod export;
pub mod serve;
pub mod stats;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::roster::{EmployeeId, UserId};

#[derive(Parser)]
#[command(
    name = "proficiencypro",
    about = "Training proficiency dashboard and AI gap analysis",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Roster JSON file (overrides config; bundled sample otherwise)
    #[arg(long, global = true)]
    pub roster: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Status distribution, program and trainer effectiveness
    Stats {
        /// Only this manager's direct reports
        #[arg(long)]
        manager: Option<UserId>,
    },
    /// Gap & strength analysis for one employee
    Analyze {
        id: EmployeeId,
    },
    /// Action plan for one employee (runs the gap analysis first if needed)
    Plan {
        id: EmployeeId,
    },
    /// Team analysis for a job role or an explicit list of employees
    Team {
        /// Job role, e.g. "Data Analyst"
        #[arg(long, conflicts_with = "ids")]
        role: Option<String>,
        /// Comma-separated employee ids
        #[arg(long, value_delimiter = ',', required_unless_present = "role")]
        ids: Option<Vec<EmployeeId>>,
    },
    /// Export proficiency records as CSV
    Export {
        /// Comma-separated employee ids
        #[arg(long, value_delimiter = ',', conflicts_with = "role")]
        ids: Option<Vec<EmployeeId>>,
        /// Job role
        #[arg(long)]
        role: Option<String>,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Serve the HTTP API
    Serve {
        /// Port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
}
