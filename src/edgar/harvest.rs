use itertools::Itertools;
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::cik::Cik;
use super::client::{FetchError, SubmissionsSource};
use super::filing::{self, FilingRecord};
use super::submissions::ExtractError;
use crate::core::config::HarvestConfig;
use crate::utils::dirs::ensure_parent_dir;
use crate::utils::progress::ProgressTracker;

/// Why a single CIK contributed no records.
#[derive(Debug, Error)]
pub enum CikFailureKind {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

#[derive(Debug)]
pub struct CikFailure {
    pub cik: Cik,
    pub error: CikFailureKind,
}

/// Everything a run collected, in configuration order.
#[derive(Debug, Default)]
pub struct HarvestReport {
    pub records: Vec<FilingRecord>,
    pub processed: Vec<Cik>,
    pub failures: Vec<CikFailure>,
}

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("failed to serialize filings: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fetch and extract every configured CIK, one at a time.
///
/// Failures stay local to the CIK that caused them; the returned report holds
/// the records of every CIK that succeeded.
pub async fn harvest<S>(
    source: &S,
    config: &HarvestConfig,
    progress: &ProgressTracker,
) -> HarvestReport
where
    S: SubmissionsSource + ?Sized,
{
    let mut report = HarvestReport::default();

    for cik in &config.ciks {
        progress.update_message(&format!("CIK {}", cik));

        let outcome = match source.fetch_submissions(cik).await {
            Ok(document) => {
                filing::extract(cik, &document, &config.forms).map_err(CikFailureKind::from)
            }
            Err(e) => Err(CikFailureKind::from(e)),
        };

        match outcome {
            Ok(records) => {
                info!("CIK {}: {} matching filings", cik, records.len());
                report.records.extend(records);
                report.processed.push(cik.clone());
            }
            Err(e) => {
                warn!("Skipping CIK {}: {}", cik, e);
                report.failures.push(CikFailure {
                    cik: cik.clone(),
                    error: e,
                });
            }
        }

        progress.increment(1);
    }

    progress.finish();
    report
}

/// Serialize `records` as an indented JSON array, replacing whatever `path`
/// held before.
pub fn write_records(path: &Path, records: &[FilingRecord]) -> Result<(), HarvestError> {
    let content = serde_json::to_string_pretty(records)?;
    let io_err = |source| HarvestError::Write {
        path: path.to_path_buf(),
        source,
    };
    ensure_parent_dir(path).map_err(io_err)?;
    fs::write(path, content).map_err(io_err)?;
    info!("Saved {} filings to {:?}", records.len(), path);
    Ok(())
}

/// Write `report.records` to the configured output path. On failure the
/// processed CIKs are logged before the error is returned.
pub fn save(config: &HarvestConfig, report: &HarvestReport) -> Result<(), HarvestError> {
    write_records(&config.output_path, &report.records).map_err(|e| {
        error!(
            "{}; processed CIKs were: [{}]",
            e,
            report.processed.iter().join(", ")
        );
        e
    })
}

/// Harvest, then write the output file. Only a failed write is fatal.
pub async fn run<S>(
    source: &S,
    config: &HarvestConfig,
    progress: &ProgressTracker,
) -> Result<HarvestReport, HarvestError>
where
    S: SubmissionsSource + ?Sized,
{
    let report = harvest(source, config, progress).await;
    save(config, &report)?;
    Ok(report)
}
