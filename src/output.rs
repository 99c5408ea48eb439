//! CI result sink.
//!
//! Runs report their outcome as `key=value` lines. When a collector file is
//! configured through `$GITHUB_OUTPUT` the lines are appended there (the
//! GitHub Actions step-output convention); otherwise they go to stdout so
//! local runs stay scriptable.

use std::env;
use std::fs::OpenOptions;
use std::io::Write;

use crate::pipeline::SyncReport;
use crate::version::Version;

/// Environment variable naming the collector file, if any.
pub const OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Emit the report to the configured sink.
pub fn emit(report: &SyncReport) -> std::io::Result<()> {
    let lines = render(report);
    match env::var_os(OUTPUT_ENV) {
        Some(path) => {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            file.write_all(lines.as_bytes())?;
        }
        None => print!("{lines}"),
    }
    Ok(())
}

/// Render the report as `key=value` lines.
pub fn render(report: &SyncReport) -> String {
    format!(
        "current_version={}\nnew_version={}\nhas_update={}\n",
        value_or_unknown(report.current.as_ref()),
        value_or_unknown(report.new_version()),
        report.has_update,
    )
}

fn value_or_unknown(version: Option<&Version>) -> String {
    version.map_or_else(|| "unknown".to_string(), |v| v.to_string())
}
