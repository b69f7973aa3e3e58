//! JSON report artifact
//!
//! One file per run, named `skyaudit_<YYYYmmdd_HHMMSS>.json`, containing
//! the raw result set and the three summary views. Opaque probe fields in
//! the records pass through unmodified.

use crate::error::{ReportError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skyaudit_core::{RunResult, Summary};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Everything a run exports, in one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub run: RunResult,
    pub summary: Summary,
}

impl Report {
    pub fn new(run: RunResult, summary: Summary) -> Self {
        Self {
            generated_at: Utc::now(),
            run,
            summary,
        }
    }

    fn file_name(&self) -> String {
        format!(
            "skyaudit_{}.json",
            self.generated_at.format("%Y%m%d_%H%M%S")
        )
    }
}

/// Write the report under `output_dir`, creating the directory if needed
///
/// Returns the path of the written artifact.
pub async fn write_json_report(report: &Report, output_dir: &Path) -> Result<PathBuf> {
    if !output_dir.exists() {
        fs::create_dir_all(output_dir)
            .await
            .map_err(|source| ReportError::CreateDir {
                path: output_dir.to_path_buf(),
                source,
            })?;
        tracing::debug!("Created output directory: {}", output_dir.display());
    }

    let path = output_dir.join(report.file_name());
    let body = serde_json::to_vec_pretty(report)?;
    fs::write(&path, body)
        .await
        .map_err(|source| ReportError::Write {
            path: path.clone(),
            source,
        })?;

    tracing::debug!(
        "Wrote report with {} outcomes to {}",
        report.run.task_count(),
        path.display()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyaudit_core::{AuditTask, TaskOutcome, aggregate};
    use skyaudit_probe::ResourceRecord;

    fn sample_report() -> Report {
        let now = Utc::now();
        let run = RunResult {
            regions: vec!["us-east-1".into()],
            services: vec!["ec2".into()],
            outcomes: vec![TaskOutcome::ok(
                AuditTask::new("us-east-1", "ec2"),
                vec![
                    ResourceRecord::new("instance", "i-0abc")
                        .with("instance_type", "t3.micro")
                        .with("state", "running"),
                ],
            )],
            issues: Vec::new(),
            started_at: now,
            finished_at: now,
        };
        let summary = aggregate(&run).unwrap();
        Report::new(run, summary)
    }

    #[tokio::test]
    async fn test_write_creates_dir_and_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let output_dir = tmp.path().join("results");
        let report = sample_report();

        let path = write_json_report(&report, &output_dir).await.unwrap();
        assert!(path.exists());
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("skyaudit_")
        );

        // Round-trips, with opaque probe fields intact
        let body = std::fs::read_to_string(&path).unwrap();
        let back: Report = serde_json::from_str(&body).unwrap();
        assert_eq!(back.run.outcomes, report.run.outcomes);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            value["run"]["outcomes"][0]["records"][0]["instance_type"],
            "t3.micro"
        );
    }
}
