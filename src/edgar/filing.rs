use itertools::Itertools;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::cik::Cik;
use super::report::ReportType;
use super::submissions::{ExtractError, FilingRow, SubmissionsDocument};

pub const EDGAR_ARCHIVES_URL: &str = "https://www.sec.gov/Archives/edgar/data";

/// One matching filing, as written to the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingRecord {
    #[serde(rename = "cik")]
    pub identifier: String,
    #[serde(rename = "company")]
    pub company_name: Option<String>,
    #[serde(rename = "filed")]
    pub filed_date: String,
    #[serde(rename = "accession")]
    pub accession_number: String,
    // Carries primaryDocDescription verbatim. The output key says "amount
    // raised" but nothing here is a parsed offering amount.
    #[serde(rename = "amount_raised")]
    pub amount_field: Option<String>,
    pub industry: Option<String>,
    #[serde(rename = "url")]
    pub document_url: String,
}

/// `{archives}/{cik}/{accession without dashes}/{primary document}`
pub fn document_url(cik: &Cik, accession_number: &str, primary_document: &str) -> String {
    let accession_number = accession_number.replace('-', "");
    format!(
        "{}/{}/{}/{}",
        EDGAR_ARCHIVES_URL, cik, accession_number, primary_document
    )
}

impl FilingRecord {
    fn assemble(cik: &Cik, document: &SubmissionsDocument, row: &FilingRow<'_>) -> Self {
        FilingRecord {
            identifier: cik.to_string(),
            company_name: document.name.clone(),
            filed_date: row.filing_date.to_string(),
            accession_number: row.accession_number.to_string(),
            amount_field: row.primary_doc_description.map(str::to_string),
            industry: document.sic_description.clone(),
            document_url: document_url(cik, row.accession_number, row.primary_document),
        }
    }
}

/// Pull every filing whose form type is in `forms` out of the recent table of
/// `document`, in table order.
///
/// A document without a recent table (or without a `form` column) yields no
/// records. If a column is too short at a matching position the whole
/// document is rejected, including records already assembled from it.
pub fn extract(
    cik: &Cik,
    document: &SubmissionsDocument,
    forms: &[ReportType],
) -> Result<Vec<FilingRecord>, ExtractError> {
    let Some(recent) = document.recent() else {
        debug!("CIK {} has no recent filings table", cik);
        return Ok(Vec::new());
    };

    let mut records = Vec::new();
    for (index, form) in recent.report_type.iter().enumerate() {
        if !forms.iter().any(|rt| rt.matches(form)) {
            continue;
        }
        let row = recent.row(index)?;
        let record = FilingRecord::assemble(cik, document, &row);
        debug!("Constructed document URL: {}", record.document_url);
        records.push(record);
    }

    log_filing_summary(cik, document, records.len());

    Ok(records)
}

fn log_filing_summary(cik: &Cik, document: &SubmissionsDocument, matched: usize) {
    let forms = document
        .recent()
        .map(|r| r.report_type.as_slice())
        .unwrap_or_default();
    let unique_report_types: std::collections::BTreeSet<_> = forms.iter().collect();
    info!(
        "Filings summary for CIK {} ({}): {} recent filings, {} unique report types ({}), {} matched",
        cik,
        document.name.as_deref().unwrap_or("unknown company"),
        forms.len(),
        unique_report_types.len(),
        unique_report_types.into_iter().join(", "),
        matched
    );
}
