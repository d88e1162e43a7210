// src/cli/export.rs — CSV export command

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::export;
use crate::roster::Roster;
use crate::views::Cohort;

/// Write the cohort's proficiency records as CSV to `output`, or stdout.
pub fn run_export(roster: &Roster, cohort: Cohort, output: Option<&Path>) -> anyhow::Result<()> {
    let members = cohort.resolve(roster);
    if members.is_empty() {
        tracing::warn!("Export selection matched no employees");
    }

    match output {
        Some(path) => {
            let file = BufWriter::new(File::create(path)?);
            let rows = export::write_csv(&members, file)?;
            println!("Exported {rows} rows to {}", path.display());
        }
        None => {
            export::write_csv(&members, std::io::stdout().lock())?;
            tracing::debug!(
                "Suggested file name: {}",
                cohort.export_file_name(&members)
            );
        }
    }
    Ok(())
}
