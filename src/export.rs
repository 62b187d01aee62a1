use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::Application;

pub const EXPORT_FILE_NAME: &str = "jobtrackr_export.csv";

pub const COLUMNS: [&str; 8] = [
    "company",
    "role",
    "status",
    "date_applied",
    "next_action_date",
    "location",
    "url",
    "notes",
];

/// Writes a header row plus one row per application, in `COLUMNS` order.
pub fn write_csv<W: Write>(writer: W, applications: &[Application]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(COLUMNS)?;
    for app in applications {
        let applied = app.date_applied.to_string();
        let next_action = app
            .next_action_date
            .map(|d| d.to_string())
            .unwrap_or_default();
        out.write_record([
            app.company.as_str(),
            app.role.as_str(),
            app.status.as_str(),
            applied.as_str(),
            next_action.as_str(),
            app.location.as_deref().unwrap_or(""),
            app.url.as_deref().unwrap_or(""),
            app.notes.as_deref().unwrap_or(""),
        ])?;
    }
    out.flush()?;
    Ok(())
}

pub fn export_to_dir(dir: &Path, applications: &[Application]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;
    let path = dir.join(EXPORT_FILE_NAME);
    export_to_file(&path, applications)?;
    Ok(path)
}

pub fn export_to_file(path: &Path, applications: &[Application]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    write_csv(file, applications)
        .with_context(|| format!("Failed to write export file: {}", path.display()))
}
