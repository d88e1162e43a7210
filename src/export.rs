// src/export.rs — CSV export of proficiency records
//
// One row per (employee, proficiency record). Fields containing a comma,
// double quote or line break are quoted with inner quotes doubled.

use std::io::Write;

use crate::infra::errors::ExportError;
use crate::roster::Employee;

pub const HEADERS: [&str; 6] = [
    "Employee ID",
    "Employee Name",
    "Role",
    "Training",
    "Perimeter",
    "Score",
];

pub fn write_csv<W: Write>(employees: &[Employee], out: W) -> Result<usize, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record(HEADERS)?;
    let mut rows = 0;
    for employee in employees {
        let id = employee.id.to_string();
        for record in &employee.proficiency {
            writer.write_record([
                id.as_str(),
                employee.name.as_str(),
                employee.role.as_str(),
                employee.training.as_str(),
                record.perimeter.label(),
                record.score.to_string().as_str(),
            ])?;
            rows += 1;
        }
    }
    writer.flush()?;

    if rows == 0 {
        tracing::warn!("CSV export contains no proficiency rows");
    }
    tracing::debug!("Exported {rows} rows for {} employees", employees.len());
    Ok(rows)
}

pub fn to_csv_string(employees: &[Employee]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(employees, &mut buffer)?;
    String::from_utf8(buffer).map_err(|_| ExportError::Encoding)
}

/// `file_name("proficiency-report", "John Davis")` is
/// `proficiency-report-John_Davis.csv`. Only ASCII letters, digits, `-`, `_`
/// and `.` survive, so the name is always safe inside a quoted header value.
pub fn file_name(prefix: &str, label: &str) -> String {
    let label: String = label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    format!("{prefix}-{label}.csv")
}
